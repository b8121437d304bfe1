//! Regression coverage for user value types and record semantics.

use super::*;
use chrono::Duration;
use rstest::rstest;

fn email(raw: &str) -> EmailAddress {
    EmailAddress::new(raw).expect("valid email")
}

fn sample_user() -> User {
    let created = Utc::now();
    User::new(
        UserId::random(),
        email("ada@example.com"),
        Some(FullName::new("Ada Lovelace").expect("valid name")),
        true,
        created,
        created,
    )
}

#[rstest]
#[case("ada@example.com")]
#[case("a.b+tag@sub.domain.org")]
fn email_accepts_plausible_addresses(#[case] raw: &str) {
    assert_eq!(email(raw).as_ref(), raw);
}

#[rstest]
#[case("", UserValidationError::EmptyEmail)]
#[case("   ", UserValidationError::EmptyEmail)]
#[case("not-an-email", UserValidationError::InvalidEmail)]
#[case("missing@tld", UserValidationError::InvalidEmail)]
#[case("two@@example.com", UserValidationError::InvalidEmail)]
fn email_rejects_malformed_addresses(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(EmailAddress::new(raw).unwrap_err(), expected);
}

#[test]
fn email_rejects_overlong_addresses() {
    let local = "a".repeat(EMAIL_MAX);
    let raw = format!("{local}@example.com");
    assert_eq!(
        EmailAddress::new(raw).unwrap_err(),
        UserValidationError::EmailTooLong { max: EMAIL_MAX }
    );
}

#[test]
fn full_name_rejects_blank_and_overlong_input() {
    assert_eq!(
        FullName::new("  ").unwrap_err(),
        UserValidationError::EmptyFullName
    );
    assert_eq!(
        FullName::new("x".repeat(FULL_NAME_MAX + 1)).unwrap_err(),
        UserValidationError::FullNameTooLong { max: FULL_NAME_MAX }
    );
}

#[rstest]
#[case("", UserValidationError::EmptyId)]
#[case("not-a-uuid", UserValidationError::InvalidId)]
#[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6", UserValidationError::InvalidId)]
fn user_id_rejects_malformed_input(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(UserId::new(raw).unwrap_err(), expected);
}

#[test]
fn user_id_round_trips_through_display() {
    let id = UserId::random();
    let reparsed = UserId::new(id.to_string()).expect("display output parses");
    assert_eq!(reparsed, id);
}

#[test]
fn new_user_defaults_to_active() {
    let candidate = NewUser::new(email("ada@example.com"), None);
    assert!(candidate.is_active());
    assert!(!candidate.with_active(false).is_active());
}

#[test]
fn with_changes_applies_only_requested_fields() {
    let user = sample_user();
    let later = user.updated_at() + Duration::seconds(5);

    let changes = UserChanges::none().with_active(false);
    let updated = user.with_changes(&changes, later);

    assert_eq!(updated.id(), user.id());
    assert_eq!(updated.email(), user.email());
    assert_eq!(updated.full_name(), user.full_name());
    assert!(!updated.is_active());
    assert_eq!(updated.created_at(), user.created_at());
    assert_eq!(updated.updated_at(), later);
}

#[test]
fn with_changes_distinguishes_clearing_from_leaving_full_name() {
    let user = sample_user();
    let later = user.updated_at() + Duration::seconds(1);

    let untouched = user.with_changes(&UserChanges::none(), later);
    assert_eq!(untouched.full_name(), user.full_name());

    let cleared = user.with_changes(&UserChanges::none().with_full_name(None), later);
    assert_eq!(cleared.full_name(), None);
}

#[test]
fn changes_report_emptiness() {
    assert!(UserChanges::none().is_empty());
    assert!(!UserChanges::none().with_active(true).is_empty());
}

#[test]
fn user_serialises_to_camel_case_json() {
    let user = sample_user();
    let value = serde_json::to_value(&user).expect("user serialises");

    assert_eq!(value["id"], user.id().to_string());
    assert_eq!(value["email"], "ada@example.com");
    assert_eq!(value["fullName"], "Ada Lovelace");
    assert_eq!(value["isActive"], true);
    assert!(value.get("full_name").is_none());
    assert!(value["createdAt"].is_string());
    assert!(value["updatedAt"].is_string());
}

#[test]
fn user_deserialisation_enforces_email_validity() {
    let raw = serde_json::json!({
        "id": "3fa85f64-5717-4562-b3fc-2c963f66afa6",
        "email": "not-an-email",
        "fullName": null,
        "isActive": true,
        "createdAt": "2026-01-01T00:00:00Z",
        "updatedAt": "2026-01-01T00:00:00Z",
    });
    assert!(serde_json::from_value::<User>(raw).is_err());
}
