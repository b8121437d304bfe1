//! User domain service.
//!
//! Implements the driving ports for user CRUD, enforcing the two business
//! invariants: email uniqueness and existence before mutation. Persistence
//! facts are translated into domain outcomes here; inbound adapters only see
//! [`Error`] values.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::instrument;

use crate::domain::ports::{UserPersistenceError, UserRepository, UsersCommand, UsersQuery};
use crate::domain::{EmailAddress, Error, NewUser, Page, User, UserChanges, UserId};

/// User service implementing [`UsersCommand`] and [`UsersQuery`].
///
/// The service never caches: every read and write goes through the
/// repository, and a failed write is reported immediately without retries.
#[derive(Clone)]
pub struct UserService<R> {
    repository: Arc<R>,
}

impl<R> UserService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

fn map_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => Error::service_unavailable(message),
        UserPersistenceError::Query { message } => Error::internal(message),
        // The storage constraint is the authority on uniqueness; a violation
        // slipping past the pre-check still surfaces as a conflict.
        UserPersistenceError::DuplicateEmail { email } => duplicate_email_error(&email),
    }
}

fn duplicate_email_error(email: &str) -> Error {
    Error::conflict(format!("Email '{email}' is already registered"))
        .with_details(json!({ "email": email, "code": "duplicate_email" }))
}

fn user_not_found_error(id: &UserId) -> Error {
    Error::not_found(format!("User with ID '{id}' not found"))
        .with_details(json!({ "userId": id.to_string(), "code": "user_not_found" }))
}

impl<R> UserService<R>
where
    R: UserRepository,
{
    async fn email_taken(&self, email: &EmailAddress) -> Result<bool, Error> {
        let existing = self
            .repository
            .find_by_email(email)
            .await
            .map_err(map_persistence_error)?;
        Ok(existing.is_some())
    }

    async fn fetch_existing(&self, id: &UserId) -> Result<User, Error> {
        let maybe_user = self
            .repository
            .find_by_id(id)
            .await
            .map_err(map_persistence_error)?;
        maybe_user.ok_or_else(|| user_not_found_error(id))
    }
}

#[async_trait]
impl<R> UsersCommand for UserService<R>
where
    R: UserRepository,
{
    #[instrument(skip(self, candidate), fields(email = %candidate.email()))]
    async fn create_user(&self, candidate: NewUser) -> Result<User, Error> {
        // Advisory pre-check; the unique constraint closes the race.
        if self.email_taken(candidate.email()).await? {
            return Err(duplicate_email_error(candidate.email().as_ref()));
        }
        self.repository
            .create(&candidate)
            .await
            .map_err(map_persistence_error)
    }

    #[instrument(skip(self, changes), fields(user_id = %id))]
    async fn update_user(&self, id: &UserId, changes: UserChanges) -> Result<User, Error> {
        let existing = self.fetch_existing(id).await?;

        if let Some(new_email) = changes.email() {
            if new_email != existing.email() && self.email_taken(new_email).await? {
                return Err(duplicate_email_error(new_email.as_ref()));
            }
        }

        self.repository
            .update(&existing, &changes)
            .await
            .map_err(map_persistence_error)
    }

    #[instrument(skip(self), fields(user_id = %id))]
    async fn delete_user(&self, id: &UserId) -> Result<(), Error> {
        let existing = self.fetch_existing(id).await?;
        self.repository
            .delete(&existing)
            .await
            .map_err(map_persistence_error)
    }
}

#[async_trait]
impl<R> UsersQuery for UserService<R>
where
    R: UserRepository,
{
    #[instrument(skip(self), fields(user_id = %id))]
    async fn get_user(&self, id: &UserId) -> Result<User, Error> {
        self.fetch_existing(id).await
    }

    #[instrument(skip(self), fields(offset = page.offset(), limit = page.limit()))]
    async fn list_users(&self, page: Page) -> Result<Vec<User>, Error> {
        self.repository
            .list(page)
            .await
            .map_err(map_persistence_error)
    }
}
