use domain::{Role, SessionUser};

fn student() -> SessionUser {
    SessionUser {
        user_id: 7,
        email: "a@x.com".to_string(),
        role: Role::Student,
        first_name: Some("Ada".to_string()),
        last_name: Some("Lovelace".to_string()),
        school_id: Some(1),
    }
}

#[test]
fn session_user_display_name() {
    let mut user = student();
    assert_eq!(user.display_name(), "Ada Lovelace");

    user.first_name = None;
    user.last_name = Some("  ".to_string());
    assert_eq!(user.display_name(), "a@x.com");
}

#[test]
fn session_user_role_check() {
    let user = student();
    assert!(user.has_any_role(&[Role::Teacher, Role::Student]));
    assert!(!user.has_any_role(&[Role::Admin]));
    assert!(user.same_school(Some(1)));
    assert!(!user.same_school(Some(2)));
    assert!(!user.same_school(None));
}

#[test]
fn role_parses_case_insensitive() {
    assert_eq!("Teacher".parse::<Role>(), Ok(Role::Teacher));
    assert_eq!(" admin ".parse::<Role>(), Ok(Role::Admin));
    assert!("principal".parse::<Role>().is_err());
    assert_eq!(Role::Student.to_string(), "student");
}
