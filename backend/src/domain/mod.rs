//! Domain primitives, aggregates, and services.
//!
//! Purpose: define the strongly typed `User` entity, the transport-agnostic
//! error taxonomy, the pagination window, and the service enforcing the
//! business invariants. Types are immutable; invariants and serialisation
//! contracts (serde) are documented on each type.

pub mod error;
pub mod page;
pub mod ports;
pub mod trace_id;
pub mod user;
mod users_service;

#[cfg(test)]
mod users_service_tests;

pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::page::{DEFAULT_LIMIT, MAX_LIMIT, Page, PageValidationError};
pub use self::trace_id::TraceId;
pub use self::user::{
    EMAIL_MAX, EmailAddress, FULL_NAME_MAX, FullName, NewUser, User, UserChanges, UserId,
    UserValidationError,
};
pub use self::users_service::UserService;
