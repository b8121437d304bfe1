//! Regression coverage for the domain error payload.

use super::*;
use rstest::rstest;
use serde_json::json;

#[rstest]
#[case(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
#[case(Error::forbidden("denied"), ErrorCode::Forbidden)]
#[case(Error::not_found("missing"), ErrorCode::NotFound)]
#[case(Error::conflict("duplicate"), ErrorCode::Conflict)]
#[case(Error::validation_failed("malformed"), ErrorCode::ValidationFailed)]
#[case(Error::service_unavailable("down"), ErrorCode::ServiceUnavailable)]
#[case(Error::internal("boom"), ErrorCode::InternalError)]
fn constructors_set_the_expected_code(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[test]
fn try_new_rejects_blank_messages() {
    let result = Error::try_new(ErrorCode::NotFound, "   ");
    assert_eq!(result, Err(ErrorValidationError::EmptyMessage));
}

#[test]
fn details_round_trip_through_json() {
    let error = Error::conflict("Email 'a@b.com' is already registered")
        .with_details(json!({ "email": "a@b.com" }));

    let encoded = serde_json::to_value(&error).expect("error serialises");
    assert_eq!(encoded["code"], "conflict");
    assert_eq!(encoded["message"], "Email 'a@b.com' is already registered");
    assert_eq!(encoded["details"]["email"], "a@b.com");

    let decoded: Error = serde_json::from_value(encoded).expect("error deserialises");
    assert_eq!(decoded.code(), ErrorCode::Conflict);
    assert_eq!(decoded.details(), error.details());
}

#[test]
fn trace_id_is_never_serialised_into_the_body() {
    let error = Error::internal("boom").with_trace_id("00000000-0000-0000-0000-000000000000");
    let encoded = serde_json::to_value(&error).expect("error serialises");
    assert!(encoded.get("traceId").is_none());
    assert_eq!(
        error.trace_id(),
        Some("00000000-0000-0000-0000-000000000000")
    );
}

#[test]
fn display_prints_the_message() {
    let error = Error::not_found("User with ID 'x' not found");
    assert_eq!(error.to_string(), "User with ID 'x' not found");
}
