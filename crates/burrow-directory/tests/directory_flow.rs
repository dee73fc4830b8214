//! End-to-end flow over the in-memory backends: creation, both lookup
//! directions, decode disambiguation, and the cache-aside behavior after
//! a cache wipe.

use burrow_cache::{InMemoryKvCache, KvCache};
use burrow_directory::{DecodeResolver, DirectoryError, LinkDirectory};
use burrow_storage::InMemoryLinkStore;

struct Fixture {
    directory: LinkDirectory<InMemoryLinkStore, InMemoryKvCache>,
    resolver: DecodeResolver<InMemoryLinkStore, InMemoryKvCache>,
    store: InMemoryLinkStore,
    cache: InMemoryKvCache,
}

impl Fixture {
    fn new() -> Self {
        let store = InMemoryLinkStore::new();
        let cache = InMemoryKvCache::new();
        let directory = LinkDirectory::new(store.clone(), cache.clone());
        let resolver = DecodeResolver::new(directory.clone());
        Self {
            directory,
            resolver,
            store,
            cache,
        }
    }
}

#[tokio::test]
async fn encode_decode_scenario() {
    let fixture = Fixture::new();

    let first = fixture
        .directory
        .find_or_create_by_url("https://a.com")
        .await
        .unwrap();
    assert_eq!(first.slug.as_str(), "a00000");

    let second = fixture
        .directory
        .find_or_create_by_url("https://b.com")
        .await
        .unwrap();
    assert_eq!(second.slug.as_str(), "a00001");

    assert_eq!(
        fixture.directory.find_by_slug("a00000").await.unwrap(),
        Some("https://a.com".to_string())
    );
    assert_eq!(
        fixture
            .resolver
            .find_by_url("http://host/a00001")
            .await
            .unwrap(),
        Some("https://b.com".to_string())
    );
    assert_eq!(
        fixture.resolver.find_by_url("https://a.com").await.unwrap(),
        None
    );
}

#[tokio::test]
async fn round_trip_through_full_short_url() {
    let fixture = Fixture::new();

    let link = fixture
        .directory
        .find_or_create_by_url("https://example.com/some/deep/page?q=1")
        .await
        .unwrap();

    let short = link.short_url("http://localhost:3000");
    assert_eq!(short, format!("http://localhost:3000/{}", link.slug));

    assert_eq!(
        fixture.resolver.find_by_url(&short).await.unwrap(),
        Some("https://example.com/some/deep/page?q=1".to_string())
    );
    assert_eq!(
        fixture
            .directory
            .find_by_slug(link.slug.as_str())
            .await
            .unwrap(),
        Some("https://example.com/some/deep/page?q=1".to_string())
    );
}

#[tokio::test]
async fn survives_a_cache_wipe() {
    let fixture = Fixture::new();

    let link = fixture
        .directory
        .find_or_create_by_url("https://example.com")
        .await
        .unwrap();

    // Wiping the cache also wipes the allocator's counter; lookups must
    // keep resolving from the store, and the existing row must still
    // dedup creation.
    fixture.cache.clear();

    assert_eq!(
        fixture
            .directory
            .find_by_slug(link.slug.as_str())
            .await
            .unwrap(),
        Some("https://example.com".to_string())
    );

    let again = fixture
        .directory
        .find_or_create_by_url("https://example.com")
        .await
        .unwrap();
    assert_eq!(again.id, link.id);
    assert_eq!(fixture.store.len(), 1);
}

#[tokio::test]
async fn cache_holds_the_inverse_pair_after_each_operation() {
    let fixture = Fixture::new();

    let link = fixture
        .directory
        .find_or_create_by_url("https://a.com")
        .await
        .unwrap();

    let slug_of_url = fixture
        .cache
        .get("url:https://a.com")
        .await
        .unwrap()
        .unwrap();
    let url_of_slug = fixture
        .cache
        .get(&format!("slug:{}", link.slug))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(slug_of_url, link.slug.as_str());
    assert_eq!(url_of_slug, "https://a.com");
}

#[tokio::test]
async fn blank_inputs_are_reported_not_resolved() {
    let fixture = Fixture::new();

    assert!(matches!(
        fixture.directory.find_or_create_by_url("").await,
        Err(DirectoryError::Validation(_))
    ));
    assert!(matches!(
        fixture.resolver.find_by_url("").await,
        Err(DirectoryError::EmptyInput)
    ));
    assert_eq!(fixture.store.len(), 0);
}
