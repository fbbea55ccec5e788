//! Validation coverage for user value types.

use super::*;
use rstest::rstest;

#[rstest]
#[case("", UserValidationError::EmptyUsername)]
#[case("   ", UserValidationError::EmptyUsername)]
#[case("ab", UserValidationError::UsernameLength { min: USERNAME_MIN, max: USERNAME_MAX })]
#[case("abcdefghijklmnopqrstu", UserValidationError::UsernameLength { min: USERNAME_MIN, max: USERNAME_MAX })]
fn rejects_invalid_usernames(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(Username::new(raw), Err(expected));
}

#[rstest]
#[case("bob", "bob")]
#[case("  alice  ", "alice")]
#[case("abcdefghijklmnopqrst", "abcdefghijklmnopqrst")]
fn accepts_and_trims_usernames(#[case] raw: &str, #[case] expected: &str) {
    let username = Username::new(raw).expect("valid username");
    assert_eq!(username.as_ref(), expected);
}

#[rstest]
#[case("", UserValidationError::EmptyEmail)]
#[case("a@b", UserValidationError::EmailLength { min: EMAIL_MIN, max: EMAIL_MAX })]
#[case("not-an-email", UserValidationError::InvalidEmail)]
#[case("alice@example", UserValidationError::InvalidEmail)]
#[case("alice@example.c", UserValidationError::InvalidEmail)]
fn rejects_invalid_emails(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(Email::new(raw), Err(expected));
}

#[rstest]
fn rejects_overlong_email() {
    let raw = format!("{}@example.com", "a".repeat(40));
    assert_eq!(
        Email::new(raw),
        Err(UserValidationError::EmailLength {
            min: EMAIL_MIN,
            max: EMAIL_MAX
        })
    );
}

#[rstest]
#[case("alice@example.com")]
#[case("first.last+tag@sub.example.org")]
fn accepts_valid_emails(#[case] raw: &str) {
    assert_eq!(Email::new(raw).expect("valid email").as_ref(), raw);
}

#[rstest]
#[case("", "alice@example.com", "pw", "username")]
#[case("alice", "bad", "pw", "email")]
#[case("alice", "alice@example.com", "", "password")]
fn registration_reports_first_invalid_field(
    #[case] username: &str,
    #[case] email: &str,
    #[case] password: &str,
    #[case] field: &str,
) {
    let err = Registration::try_from_parts(username, email, password, "")
        .expect_err("invalid registration must fail");
    assert_eq!(err.field(), field);
}

#[rstest]
fn registration_keeps_password_whitespace() {
    let reg = Registration::try_from_parts("alice", "alice@example.com", " pw ", "hi")
        .expect("valid registration");
    assert_eq!(reg.password(), " pw ");
    assert_eq!(reg.bio(), "hi");
}

#[rstest]
fn username_deserialisation_validates() {
    let result: Result<Username, _> = serde_json::from_str("\"x\"");
    assert!(result.is_err());
}
