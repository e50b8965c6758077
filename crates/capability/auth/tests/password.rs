use mm_auth::{hash_password, verify_password};

#[test]
fn argon2_hash_verifies() {
    let hash = hash_password("correct horse").expect("hash");
    assert!(hash.starts_with("$argon2id$"));
    assert!(verify_password(&hash, "correct horse"));
}

#[test]
fn wrong_password_rejected() {
    let hash = hash_password("correct horse").expect("hash");
    assert!(!verify_password(&hash, "wrong horse"));
}

#[test]
fn salts_are_random() {
    let first = hash_password("same-password").expect("hash");
    let second = hash_password("same-password").expect("hash");
    assert_ne!(first, second);
    assert!(verify_password(&first, "same-password"));
    assert!(verify_password(&second, "same-password"));
}

#[test]
fn malformed_stored_hash_is_mismatch() {
    assert!(!verify_password("", "anything"));
    assert!(!verify_password("plaintext-password", "plaintext-password"));
    assert!(!verify_password("$argon2id$broken", "anything"));
}
