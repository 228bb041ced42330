use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;

fn counting_fetch(
    calls: &AtomicUsize,
    value: u32,
) -> impl Future<Output = Result<u32, ApiError>> + '_ {
    async move {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok(value)
    }
}

#[tokio::test]
async fn fresh_reads_are_served_from_memory() {
    let cache = QueryCache::default();
    let calls = AtomicUsize::new(0);

    let first = cache
        .fetch(QueryKey::new(1, resource::USERS, "page=1"), || counting_fetch(&calls, 10))
        .await
        .unwrap();
    let second = cache
        .fetch(QueryKey::new(1, resource::USERS, "page=1"), || counting_fetch(&calls, 99))
        .await
        .unwrap();

    assert_eq!((first, second), (10, 10));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn scopes_and_params_are_separate_entries() {
    let cache = QueryCache::default();
    let calls = AtomicUsize::new(0);

    cache.fetch(QueryKey::new(1, resource::USERS, "page=1"), || counting_fetch(&calls, 1)).await.unwrap();
    cache.fetch(QueryKey::new(2, resource::USERS, "page=1"), || counting_fetch(&calls, 2)).await.unwrap();
    cache.fetch(QueryKey::new(1, resource::USERS, "page=2"), || counting_fetch(&calls, 3)).await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(cache.len(), 3);
}

#[tokio::test]
async fn stale_entries_are_refetched() {
    let cache = QueryCache::new(Duration::ZERO);
    let calls = AtomicUsize::new(0);

    cache.fetch(QueryKey::new(1, resource::PROFILE, ""), || counting_fetch(&calls, 1)).await.unwrap();
    let again = cache
        .fetch(QueryKey::new(1, resource::PROFILE, ""), || counting_fetch(&calls, 2))
        .await
        .unwrap();

    assert_eq!(again, 2);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn expired_entries_are_swept_on_insert() {
    let cache = QueryCache::new(Duration::from_millis(1));
    let calls = AtomicUsize::new(0);

    for page in 0..50 {
        let key = QueryKey::new(1, resource::USERS, format!("search={page}"));
        cache.fetch(key, || counting_fetch(&calls, page)).await.unwrap();
    }
    tokio::time::sleep(Duration::from_millis(20)).await;
    cache
        .fetch(QueryKey::new(1, resource::USERS, "search=last"), || counting_fetch(&calls, 0))
        .await
        .unwrap();

    assert_eq!(cache.len(), 1);
}

#[tokio::test]
async fn failures_are_not_cached() {
    let cache = QueryCache::default();
    let key = || QueryKey::new(1, resource::PAYMENTS, "");

    let failed: Result<u32, ApiError> = cache
        .fetch(key(), || async { Err(ApiError::Status { status: 500, message: None }) })
        .await;
    assert!(failed.is_err());
    assert!(cache.is_empty());

    let ok = cache.fetch(key(), || async { Ok(5_u32) }).await.unwrap();
    assert_eq!(ok, 5);
}

#[tokio::test]
async fn invalidation_by_resource_and_scope() {
    let cache = QueryCache::default();
    cache.fetch(QueryKey::new(1, resource::PARTNERS, ""), || async { Ok(1_u32) }).await.unwrap();
    cache.fetch(QueryKey::new(2, resource::PARTNERS, ""), || async { Ok(2_u32) }).await.unwrap();
    cache.fetch(QueryKey::new(1, resource::PROFILE, ""), || async { Ok(3_u32) }).await.unwrap();

    cache.invalidate(resource::PARTNERS);
    assert_eq!(cache.len(), 1);

    cache.invalidate_scope("1");
    assert!(cache.is_empty());
}

#[test]
fn loadable_serializes_with_status_tag() {
    let ready = Loadable::from_result(Ok::<_, ApiError>(vec![1, 2]));
    assert_eq!(
        serde_json::to_value(&ready).unwrap(),
        serde_json::json!({"status": "ready", "data": [1, 2]})
    );

    let failed: Loadable<u32> = Loadable::from_result(Err(ApiError::Status {
        status: 502,
        message: Some("Upstream down".into()),
    }));
    assert!(!failed.is_ready());
    assert_eq!(
        serde_json::to_value(&failed).unwrap(),
        serde_json::json!({"status": "error", "message": "Upstream down"})
    );
}
