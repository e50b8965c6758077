use std::sync::Arc;

use domain::Role;
use mm_auth::{AuthError, AuthService, JwtManager, Registration};
use mm_storage::{InMemoryRefreshTokenStore, InMemoryUserStore};

fn service() -> (AuthService, Arc<InMemoryRefreshTokenStore>) {
    let refresh_store = Arc::new(InMemoryRefreshTokenStore::new());
    let jwt = JwtManager::new("access-secret", "refresh-secret", 3600, 7200);
    let auth = AuthService::new(Arc::new(InMemoryUserStore::new()), refresh_store.clone(), jwt);
    (auth, refresh_store)
}

fn registration(email: &str) -> Registration {
    Registration {
        email: email.to_string(),
        password: "password-1".to_string(),
        role: Role::Student,
        first_name: None,
        last_name: None,
        school_id: Some(1),
    }
}

#[tokio::test]
async fn refresh_token_is_single_use_after_rotation() {
    let (auth, refresh_store) = service();
    auth.register(registration("s@x.com")).await.expect("register");

    let (_, tokens1) = auth.login("s@x.com", "password-1").await.expect("login");
    let (_, tokens2) = auth.refresh(&tokens1.refresh_token).await.expect("refresh");
    assert_ne!(tokens1.refresh_token, tokens2.refresh_token);

    let result = auth.refresh(&tokens1.refresh_token).await;
    assert!(matches!(result, Err(AuthError::TokenInvalid)));

    // 注册一条 + 轮换后的一条
    assert_eq!(refresh_store.len(), 2);
    auth.refresh(&tokens2.refresh_token).await.expect("second rotation");
}

#[tokio::test]
async fn refresh_rejects_token_missing_from_ledger() {
    let (auth, _) = service();
    let (_, tokens) = auth.register(registration("s@x.com")).await.expect("register");
    auth.logout(Some(&tokens.refresh_token)).await.expect("logout");

    let result = auth.refresh(&tokens.refresh_token).await;
    assert!(matches!(result, Err(AuthError::TokenInvalid)));
}

#[tokio::test]
async fn access_token_cannot_be_used_to_refresh() {
    let (auth, _) = service();
    let (_, tokens) = auth.register(registration("s@x.com")).await.expect("register");

    let result = auth.refresh(&tokens.access_token).await;
    assert!(matches!(result, Err(AuthError::TokenInvalid)));
}

#[tokio::test]
async fn concurrent_refresh_has_single_winner() {
    let (auth, _) = service();
    let auth = Arc::new(auth);
    let (_, tokens) = auth.register(registration("s@x.com")).await.expect("register");

    let mut handles = Vec::new();
    for _ in 0..8 {
        let auth = auth.clone();
        let token = tokens.refresh_token.clone();
        handles.push(tokio::spawn(async move { auth.refresh(&token).await.is_ok() }));
    }
    let mut winners = 0;
    for handle in handles {
        if handle.await.expect("join") {
            winners += 1;
        }
    }
    assert_eq!(winners, 1);
}

#[tokio::test]
async fn concurrent_logins_are_independent() {
    let (auth, _) = service();
    auth.register(registration("s@x.com")).await.expect("register");

    let (first, second) = tokio::join!(
        auth.login("s@x.com", "password-1"),
        auth.login("s@x.com", "password-1")
    );
    let (_, first) = first.expect("login 1");
    let (_, second) = second.expect("login 2");
    assert_ne!(first.refresh_token, second.refresh_token);

    auth.logout(Some(&first.refresh_token)).await.expect("logout");
    assert!(auth.refresh(&first.refresh_token).await.is_err());
    auth.refresh(&second.refresh_token).await.expect("other device still valid");
}

#[tokio::test]
async fn logout_all_revokes_every_device() {
    let (auth, refresh_store) = service();
    let (user, _) = auth.register(registration("s@x.com")).await.expect("register");
    let (_, other) = auth.login("s@x.com", "password-1").await.expect("login");

    let revoked = auth.logout_all(user.user_id).await.expect("logout all");
    assert_eq!(revoked, 2);
    assert!(refresh_store.is_empty());
    assert!(auth.refresh(&other.refresh_token).await.is_err());
}
