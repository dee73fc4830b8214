use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt::Display;

const MIN_LENGTH: usize = 6;
const MAX_LENGTH: usize = 32;

/// A validated slug identifying a shortened link.
///
/// Slugs are 6-32 characters drawn from the base62 alphabet
/// (`[0-9a-zA-Z]`). Once a slug is persisted it is never reassigned.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Slug(SmolStr);

impl Slug {
    /// Creates a new `Slug` after validating the input.
    pub fn new(slug: impl Into<String>) -> Result<Self, CoreError> {
        let slug = slug.into();
        Self::validate(&slug)?;
        Ok(Self(SmolStr::new(slug)))
    }

    /// Creates a `Slug` without validation.
    ///
    /// Use this only for slugs produced by trusted internal sources
    /// (the codec, or rows read back from the durable store).
    pub fn new_unchecked(slug: impl AsRef<str>) -> Self {
        Self(SmolStr::new(slug.as_ref()))
    }

    /// Returns the slug as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(slug: &str) -> Result<(), CoreError> {
        if slug.len() < MIN_LENGTH || slug.len() > MAX_LENGTH {
            return Err(CoreError::InvalidSlug(format!(
                "length must be between {} and {}, got {}",
                MIN_LENGTH,
                MAX_LENGTH,
                slug.len()
            )));
        }

        if !slug.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(CoreError::InvalidSlug(format!(
                "must contain only base62 symbols ([0-9a-zA-Z]): '{}'",
                slug
            )));
        }

        Ok(())
    }
}

impl std::fmt::Debug for Slug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Slug").field(&self.0).finish()
    }
}

impl Display for Slug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for Slug {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Slug {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = SmolStr::deserialize(deserializer)?;
        Slug::new(s.as_str()).map_err(serde::de::Error::custom)
    }
}
