//! Port abstraction for user persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::{EmailAddress, NewUser, Page, User, UserChanges, UserId};

/// Persistence errors raised by user repository adapters.
///
/// Absence of a record is reported as a value (`Ok(None)`), never as an
/// error. The only storage fact the repository interprets is the unique
/// constraint on email, reported as [`UserPersistenceError::DuplicateEmail`]
/// so the service can translate the race the pre-check cannot close.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserPersistenceError {
    /// Repository connection could not be established.
    #[error("user repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("user repository query failed: {message}")]
    Query { message: String },
    /// The unique constraint on email rejected a write.
    #[error("email '{email}' is already persisted")]
    DuplicateEmail { email: String },
}

impl UserPersistenceError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Create a duplicate-email error for the given address.
    pub fn duplicate_email(email: impl Into<String>) -> Self {
        Self::DuplicateEmail {
            email: email.into(),
        }
    }
}

/// Sole translator between entity operations and the entity store.
///
/// Implementations own no business rules: uniqueness and existence are the
/// service's concern, and every mutation writes through synchronously.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new user, generating identifier and timestamps.
    async fn create(&self, candidate: &NewUser) -> Result<User, UserPersistenceError>;

    /// Fetch a user by identifier; absence is a value, not an error.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by email; same contract as [`UserRepository::find_by_id`].
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// List users in creation order, applying the window.
    async fn list(&self, page: Page) -> Result<Vec<User>, UserPersistenceError>;

    /// Apply the change set to an existing user, refreshing `updated_at`.
    async fn update(
        &self,
        existing: &User,
        changes: &UserChanges,
    ) -> Result<User, UserPersistenceError>;

    /// Remove the persisted user.
    async fn delete(&self, existing: &User) -> Result<(), UserPersistenceError>;
}
