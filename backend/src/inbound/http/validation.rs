//! Shared validation helpers for inbound HTTP adapters.
//!
//! Structural validation failures never reach the service: they are rejected
//! here with a 422 envelope whose `details` field carries a machine-readable
//! list of `{location, message}` entries.

use actix_web::HttpRequest;
use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::domain::{Error, PageValidationError, UserId, UserValidationError};

/// One field-level validation failure: where it happened and why.
pub(crate) fn field_error(location: &[&str], message: impl Into<String>) -> Value {
    json!({ "location": location, "message": message.into() })
}

/// Wrap field-level entries into the 422 validation envelope.
pub(crate) fn validation_error(entries: Vec<Value>) -> Error {
    Error::validation_failed("request validation failed").with_details(Value::Array(entries))
}

/// Parse a path segment as a [`UserId`], rejecting malformed input upstream
/// of the service.
pub(crate) fn parse_user_id(raw: &str) -> Result<UserId, Error> {
    Uuid::parse_str(raw)
        .map(UserId::from_uuid)
        .map_err(|_| {
            validation_error(vec![field_error(
                &["path", "user_id"],
                format!("'{raw}' is not a valid UUID"),
            )])
        })
}

/// Map a window validation failure onto the offending query parameter.
pub(crate) fn page_validation_error(error: &PageValidationError) -> Error {
    let location: &[&str] = match error {
        PageValidationError::NegativeOffset { .. } => &["query", "offset"],
        PageValidationError::LimitOutOfRange { .. } => &["query", "limit"],
    };
    validation_error(vec![field_error(location, error.to_string())])
}

/// Map a body field validation failure onto its JSON location.
pub(crate) fn body_field_error(field: &str, error: &UserValidationError) -> Error {
    validation_error(vec![field_error(&["body", field], error.to_string())])
}

/// Convert JSON body extraction failures (malformed JSON, unknown fields,
/// wrong types) into the 422 validation envelope.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    validation_error(vec![field_error(&["body"], err.to_string())]).into()
}

/// Convert query string extraction failures into the 422 validation envelope.
pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    validation_error(vec![field_error(&["query"], err.to_string())]).into()
}

/// Convert path extraction failures into the 422 validation envelope.
pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    validation_error(vec![field_error(&["path"], err.to_string())]).into()
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;

    #[test]
    fn parse_user_id_accepts_uuids() {
        let id = parse_user_id("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("uuid parses");
        assert_eq!(id.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
    }

    #[test]
    fn parse_user_id_rejects_other_input() {
        let error = parse_user_id("42").expect_err("malformed id rejected");
        assert_eq!(error.code(), ErrorCode::ValidationFailed);
        let details = error.details().expect("details present");
        assert_eq!(details[0]["location"][0], "path");
        assert_eq!(details[0]["location"][1], "user_id");
    }

    #[test]
    fn page_errors_point_at_the_offending_parameter() {
        let offset_error =
            page_validation_error(&PageValidationError::NegativeOffset { offset: -1 });
        let details = offset_error.details().expect("details present");
        assert_eq!(details[0]["location"][1], "offset");

        let limit_error = page_validation_error(&PageValidationError::LimitOutOfRange {
            limit: 0,
            max: 100,
        });
        let details = limit_error.details().expect("details present");
        assert_eq!(details[0]["location"][1], "limit");
    }
}
