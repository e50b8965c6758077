use mm_auth::RefreshTokenLedger;
use mm_storage::{InMemoryRefreshTokenStore, RefreshTokenRecord, RefreshTokenStore};
use std::sync::Arc;

#[tokio::test]
async fn stored_token_validates_until_revoked() {
    let store = Arc::new(InMemoryRefreshTokenStore::new());
    let ledger = RefreshTokenLedger::new(store.clone(), 3600);

    ledger.store(7, "token-a").await.expect("store");
    assert!(ledger.validate("token-a").await.expect("validate"));

    ledger.revoke("token-a").await.expect("revoke");
    assert!(!ledger.validate("token-a").await.expect("validate"));
    // 重复删除不报错
    ledger.revoke("token-a").await.expect("revoke");
}

#[tokio::test]
async fn absent_token_is_invalid() {
    let ledger = RefreshTokenLedger::new(Arc::new(InMemoryRefreshTokenStore::new()), 3600);
    assert!(!ledger.validate("missing").await.expect("validate"));
    assert!(ledger.consume("missing").await.expect("consume").is_none());
}

#[tokio::test]
async fn expired_entry_is_deleted_on_validate() {
    let store = Arc::new(InMemoryRefreshTokenStore::new());
    store
        .insert_refresh_token(RefreshTokenRecord::new("stale", 7, 1))
        .await
        .expect("insert");
    let ledger = RefreshTokenLedger::new(store.clone(), 3600);

    assert!(!ledger.validate("stale").await.expect("validate"));
    assert!(store.is_empty());
}

#[tokio::test]
async fn expired_entry_is_not_consumable() {
    let store = Arc::new(InMemoryRefreshTokenStore::new());
    store
        .insert_refresh_token(RefreshTokenRecord::new("stale", 7, 1))
        .await
        .expect("insert");
    let ledger = RefreshTokenLedger::new(store.clone(), 3600);

    assert!(ledger.consume("stale").await.expect("consume").is_none());
    assert!(store.is_empty());
}

#[tokio::test]
async fn expiry_is_computed_server_side() {
    let store = Arc::new(InMemoryRefreshTokenStore::new());
    let ledger = RefreshTokenLedger::new(store.clone(), 3600);
    ledger.store(7, "token-a").await.expect("store");

    let record = store
        .find_refresh_token("token-a")
        .await
        .expect("find")
        .expect("record");
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock")
        .as_secs();
    assert!(record.expires_at >= now + 3590 && record.expires_at <= now + 3600);
    assert_eq!(record.token_type, "refresh");
}

#[tokio::test]
async fn huge_ttl_saturates_instead_of_overflowing() {
    let store = Arc::new(InMemoryRefreshTokenStore::new());
    let ledger = RefreshTokenLedger::new(store.clone(), u64::MAX);
    ledger.store(7, "token-a").await.expect("store");

    let record = store
        .find_refresh_token("token-a")
        .await
        .expect("find")
        .expect("record");
    assert_eq!(record.expires_at, u64::MAX);
    assert!(ledger.validate("token-a").await.expect("validate"));
}

#[tokio::test]
async fn revoke_all_only_touches_owner() {
    let store = Arc::new(InMemoryRefreshTokenStore::new());
    let ledger = RefreshTokenLedger::new(store.clone(), 3600);
    ledger.store(1, "a-1").await.expect("store");
    ledger.store(1, "a-2").await.expect("store");
    ledger.store(2, "b-1").await.expect("store");

    assert_eq!(ledger.revoke_all(1).await.expect("revoke all"), 2);
    assert!(!ledger.validate("a-1").await.expect("validate"));
    assert!(ledger.validate("b-1").await.expect("validate"));
}
