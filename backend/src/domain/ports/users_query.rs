//! Driving port for user reads invoked by inbound adapters.

use async_trait::async_trait;

use crate::domain::{Error, Page, User, UserId};

/// Read-only user operations exposed to inbound adapters.
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Fetch a user by identifier; fails with `NotFound` when absent.
    async fn get_user(&self, id: &UserId) -> Result<User, Error>;

    /// List users in creation order within the given window.
    async fn list_users(&self, page: Page) -> Result<Vec<User>, Error>;
}
