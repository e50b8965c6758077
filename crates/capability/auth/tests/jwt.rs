use domain::Role;
use mm_auth::{JwtManager, TokenPayload};

fn payload() -> TokenPayload {
    TokenPayload {
        user_id: 42,
        email: "student@school.test".to_string(),
        role: Role::Student,
    }
}

#[test]
fn jwt_issue_and_decode() {
    let jwt = JwtManager::new("access-secret", "refresh-secret", 3600, 7200);

    let tokens = jwt.issue_tokens(&payload()).expect("tokens");
    let access = jwt.decode_access(&tokens.access_token).expect("access");
    let refresh = jwt.decode_refresh(&tokens.refresh_token).expect("refresh");

    assert_eq!(access, payload());
    assert_eq!(refresh, payload());
    assert!(tokens.refresh_expires_at > tokens.access_expires_at);
}

#[test]
fn huge_ttl_saturates_instead_of_overflowing() {
    let jwt = JwtManager::new("access-secret", "refresh-secret", u64::MAX, u64::MAX);

    let tokens = jwt.issue_tokens(&payload()).expect("tokens");
    assert_eq!(tokens.access_expires_at, u64::MAX);
    assert_eq!(tokens.refresh_expires_at, u64::MAX);
    assert!(jwt.decode_access(&tokens.access_token).is_some());
    assert!(jwt.decode_refresh(&tokens.refresh_token).is_some());
}

#[test]
fn secrets_are_not_interchangeable() {
    let jwt = JwtManager::new("access-secret", "refresh-secret", 3600, 7200);
    let tokens = jwt.issue_tokens(&payload()).expect("tokens");

    assert!(jwt.decode_access(&tokens.refresh_token).is_none());
    assert!(jwt.decode_refresh(&tokens.access_token).is_none());

    let other = JwtManager::new("other-access", "other-refresh", 3600, 7200);
    assert!(other.decode_access(&tokens.access_token).is_none());
    assert!(other.decode_refresh(&tokens.refresh_token).is_none());
}

#[test]
fn malformed_token_yields_none() {
    let jwt = JwtManager::new("access-secret", "refresh-secret", 3600, 7200);
    assert!(jwt.decode_access("").is_none());
    assert!(jwt.decode_access("not.a.jwt").is_none());
    assert!(jwt.decode_refresh("garbage").is_none());
}

#[test]
fn refresh_tokens_differ_within_same_second() {
    let jwt = JwtManager::new("access-secret", "refresh-secret", 3600, 7200);
    let first = jwt.issue_tokens(&payload()).expect("tokens");
    let second = jwt.issue_tokens(&payload()).expect("tokens");
    assert_ne!(first.refresh_token, second.refresh_token);
}

#[tokio::test]
async fn expired_access_token_rejected() {
    let jwt = JwtManager::new("access-secret", "refresh-secret", 0, 7200);
    let tokens = jwt.issue_tokens(&payload()).expect("tokens");
    tokio::time::sleep(std::time::Duration::from_millis(1100)).await;
    assert!(jwt.decode_access(&tokens.access_token).is_none());
    assert!(jwt.decode_refresh(&tokens.refresh_token).is_some());
}
