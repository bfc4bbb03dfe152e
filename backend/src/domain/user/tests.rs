//! Tests for user value types.

use super::*;
use rstest::rstest;

fn sample_user() -> User {
    User::from_parts(
        UserId::new(7).expect("valid id"),
        NewUser {
            email: Email::new("ada@example.org").expect("valid email"),
            firstname: PersonName::new("Ada", "firstname").expect("valid name"),
            lastname: PersonName::new("Lovelace", "lastname").expect("valid name"),
            age: Age::new(36).expect("valid age"),
            credential: CredentialHash::new("salt$hash"),
            verified: false,
            verification_token: VerificationToken::new("abcdefghijklmnop"),
        },
    )
}

#[rstest]
#[case("ada@example.org", true)]
#[case(" ADA@Example.ORG ", true)]
#[case("ada@localhost", false)]
#[case("@example.org", false)]
#[case("ada@@example.org", false)]
#[case("ada@example..org", false)]
#[case("a da@example.org", false)]
#[case("", false)]
fn email_validation(#[case] raw: &str, #[case] valid: bool) {
    assert_eq!(Email::new(raw).is_ok(), valid);
}

#[rstest]
fn names_are_trimmed_and_bounded() {
    let name = PersonName::new("  Grace ", "firstname").expect("valid name");
    assert_eq!(name.as_ref(), "Grace");

    let err = PersonName::new("   ", "lastname").expect_err("blank rejected");
    assert_eq!(err, UserValidationError::EmptyName { field: "lastname" });

    let long = "x".repeat(65);
    assert!(matches!(
        PersonName::new(long, "firstname"),
        Err(UserValidationError::NameTooLong { .. })
    ));
}

#[rstest]
#[case(0, true)]
#[case(150, true)]
#[case(151, false)]
fn age_bounds(#[case] years: u16, #[case] valid: bool) {
    assert_eq!(Age::new(years).is_ok(), valid);
}

#[rstest]
fn verification_tokens_are_sixteen_alphanumerics() {
    let token = VerificationToken::generate();
    assert_eq!(token.as_str().len(), 16);
    assert!(token.as_str().chars().all(|c| c.is_ascii_alphanumeric()));
}

#[rstest]
fn serialisation_hides_secrets() {
    let value = serde_json::to_value(sample_user()).expect("serialise user");
    let object = value.as_object().expect("user is an object");
    assert!(!object.contains_key("credential"));
    assert!(!object.contains_key("verification_token"));
    assert_eq!(object.get("email").and_then(|v| v.as_str()), Some("ada@example.org"));
}

#[rstest]
fn apply_only_touches_supplied_fields() {
    let mut user = sample_user();
    user.apply(UserChanges {
        age: Some(Age::new(37).expect("valid age")),
        ..UserChanges::default()
    });
    assert_eq!(user.age().years(), 37);
    assert_eq!(user.firstname().as_ref(), "Ada");
    assert_eq!(user.credential().as_str(), "salt$hash");
}

#[rstest]
fn password_debug_is_redacted() {
    let password = Password::new("hunter2").expect("non-empty password");
    assert_eq!(format!("{password:?}"), "Password(**redacted**)");
    assert!(Password::new("").is_err());
}
