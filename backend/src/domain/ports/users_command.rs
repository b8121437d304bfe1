//! Driving port for user mutations invoked by inbound adapters.

use async_trait::async_trait;

use crate::domain::{Error, NewUser, User, UserChanges, UserId};

/// Mutating user operations exposed to inbound adapters.
///
/// Implementations enforce the business invariants: email uniqueness on
/// create (and on update when the email changes) and existence before any
/// mutation.
#[async_trait]
pub trait UsersCommand: Send + Sync {
    /// Create a new user; fails with `Conflict` when the email is taken.
    async fn create_user(&self, candidate: NewUser) -> Result<User, Error>;

    /// Apply a change set to an existing user; fails with `NotFound` when the
    /// identifier is absent and `Conflict` when an email change collides.
    async fn update_user(&self, id: &UserId, changes: UserChanges) -> Result<User, Error>;

    /// Delete an existing user; fails with `NotFound` when absent.
    async fn delete_user(&self, id: &UserId) -> Result<(), Error>;
}
