use burrow_core::{KvCache, LinkStore};
use tracing::trace;

use crate::directory::LinkDirectory;
use crate::error::{DirectoryError, Result};

/// Sits in front of the directory for inputs that may be a full short
/// URL rather than a bare slug.
///
/// The resolver only unwraps already-short URLs; it never attempts a
/// reverse lookup of arbitrary original URLs. Anything that does not
/// look like `scheme://host[:port]/slug` resolves to absent without
/// touching the cache or the store.
pub struct DecodeResolver<S, C> {
    directory: LinkDirectory<S, C>,
}

impl<S, C> Clone for DecodeResolver<S, C> {
    fn clone(&self) -> Self {
        Self {
            directory: self.directory.clone(),
        }
    }
}

impl<S: LinkStore, C: KvCache> DecodeResolver<S, C> {
    pub fn new(directory: LinkDirectory<S, C>) -> Self {
        Self { directory }
    }

    /// Resolves an input that may be a full short URL.
    ///
    /// Blank input is [`DirectoryError::EmptyInput`] — a caller-facing
    /// condition distinct from the absent result a lookup miss yields.
    pub async fn find_by_url(&self, input: &str) -> Result<Option<String>> {
        let input = input.trim();
        if input.is_empty() {
            return Err(DirectoryError::EmptyInput);
        }

        let Some(slug) = extract_slug(input) else {
            trace!(input, "input is not shaped like a short URL");
            return Ok(None);
        };

        self.directory.find_by_slug(slug).await
    }
}

/// Returns the trailing path segment when `input` has the shape of a
/// short URL: an http(s) scheme, a non-empty host (which never contains
/// a slash), and exactly one non-empty path segment of base62 symbols
/// with no further path, query, or fragment.
fn extract_slug(input: &str) -> Option<&str> {
    let (scheme, rest) = input.split_once("://")?;
    if !scheme.eq_ignore_ascii_case("http") && !scheme.eq_ignore_ascii_case("https") {
        return None;
    }

    let (host, segment) = rest.split_once('/')?;
    if host.is_empty() || segment.is_empty() {
        return None;
    }
    if !segment.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }

    Some(segment)
}
