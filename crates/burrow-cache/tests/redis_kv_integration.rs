//! Integration tests for [`RedisKvCache`] against a real Redis server.
//!
//! These tests start a disposable Redis container and are ignored by
//! default; run them with `cargo test -- --ignored` on a machine with a
//! Docker daemon.

use std::time::Duration;

use burrow_cache::{KvCache, RedisKvCache};
use burrow_test_infra::redis::RedisServer;

/// Test fixture that manages a Redis container.
struct RedisFixture {
    _redis: RedisServer,
    redis_url: String,
}

impl RedisFixture {
    async fn start() -> Self {
        let redis = RedisServer::new().await.expect("start redis");
        let redis_url = redis.url().await.expect("redis url");

        // Give the server a moment to finish accepting connections.
        tokio::time::sleep(Duration::from_millis(500)).await;

        Self {
            _redis: redis,
            redis_url,
        }
    }

    async fn cache(&self) -> RedisKvCache {
        let client =
            redis::Client::open(self.redis_url.as_str()).expect("create redis client");
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .expect("connect to redis");
        RedisKvCache::new(conn)
    }
}

#[tokio::test]
#[ignore = "requires a local Docker daemon"]
async fn get_set_round_trip() {
    let fixture = RedisFixture::start().await;
    let cache = fixture.cache().await;

    assert_eq!(cache.get("url:https://example.com").await.unwrap(), None);

    cache.set("url:https://example.com", "a00000").await.unwrap();
    assert_eq!(
        cache.get("url:https://example.com").await.unwrap(),
        Some("a00000".to_string())
    );
}

#[tokio::test]
#[ignore = "requires a local Docker daemon"]
async fn incr_initializes_and_counts() {
    let fixture = RedisFixture::start().await;
    let cache = fixture.cache().await;

    assert_eq!(cache.incr("url_counter", 1, 1).await.unwrap(), 1);
    assert_eq!(cache.incr("url_counter", 1, 1).await.unwrap(), 2);
    assert_eq!(cache.incr("url_counter", 1, 1).await.unwrap(), 3);
}

#[tokio::test]
#[ignore = "requires a local Docker daemon"]
async fn incr_honors_distinct_initial() {
    let fixture = RedisFixture::start().await;
    let cache = fixture.cache().await;

    assert_eq!(cache.incr("seeded", 1, 1000).await.unwrap(), 1000);
    assert_eq!(cache.incr("seeded", 1, 1000).await.unwrap(), 1001);
}

#[tokio::test]
#[ignore = "requires a local Docker daemon"]
async fn incr_is_atomic_across_connections() {
    let fixture = RedisFixture::start().await;

    let mut handles = Vec::new();
    for _ in 0..4 {
        let cache = fixture.cache().await;
        handles.push(tokio::spawn(async move {
            for _ in 0..50 {
                cache.incr("shared_counter", 1, 1).await.unwrap();
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let cache = fixture.cache().await;
    assert_eq!(
        cache.get("shared_counter").await.unwrap(),
        Some("200".to_string())
    );
}

#[tokio::test]
#[ignore = "requires a local Docker daemon"]
async fn prefix_isolates_keys() {
    let fixture = RedisFixture::start().await;

    let client = redis::Client::open(fixture.redis_url.as_str()).expect("client");
    let conn = client
        .get_multiplexed_async_connection()
        .await
        .expect("connect");

    let first = RedisKvCache::with_prefix(conn.clone(), "one:");
    let second = RedisKvCache::with_prefix(conn, "two:");

    first.set("k", "first").await.unwrap();
    second.set("k", "second").await.unwrap();

    assert_eq!(first.get("k").await.unwrap(), Some("first".to_string()));
    assert_eq!(second.get("k").await.unwrap(), Some("second".to_string()));
}
