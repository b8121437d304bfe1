//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! This adapter translates the domain's repository port into SQL against the
//! `users` table. It owns no business rules: absence is reported as a value,
//! and the only storage fact it interprets is the unique constraint on email,
//! surfaced as [`UserPersistenceError::DuplicateEmail`].

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{EmailAddress, FullName, NewUser, Page, User, UserChanges, UserId};

use super::models::{NewUserRow, UserRow, UserUpdateRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to port connection errors.
fn map_pool_error(error: PoolError) -> UserPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            UserPersistenceError::connection(message)
        }
    }
}

/// Map common Diesel error variants for read paths.
fn map_read_error(error: diesel::result::Error) -> UserPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => UserPersistenceError::query("record not found"),
        DieselError::QueryBuilderError(_) => UserPersistenceError::query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            UserPersistenceError::connection("database connection error")
        }
        DieselError::DatabaseError(_, _) => UserPersistenceError::query("database error"),
        _ => UserPersistenceError::query("database error"),
    }
}

/// Map Diesel errors for write paths, detecting the email unique constraint.
///
/// `email` is the address the write attempted to persist, reported back so
/// the service can phrase the conflict.
fn map_write_error(error: diesel::result::Error, email: &str) -> UserPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    if let DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) = &error {
        debug!(
            message = info.message(),
            constraint = ?info.constraint_name(),
            "unique constraint rejected user write"
        );
        return UserPersistenceError::duplicate_email(email);
    }
    map_read_error(error)
}

/// Convert a database row to a domain [`User`].
///
/// Stored rows were validated when written; a row failing validation here
/// indicates out-of-band writes and is reported as a query error.
fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let email = EmailAddress::new(row.email)
        .map_err(|err| UserPersistenceError::query(format!("stored email invalid: {err}")))?;
    let full_name = row
        .full_name
        .map(FullName::new)
        .transpose()
        .map_err(|err| UserPersistenceError::query(format!("stored full name invalid: {err}")))?;
    Ok(User::new(
        UserId::from_uuid(row.id),
        email,
        full_name,
        row.is_active,
        row.created_at,
        row.updated_at,
    ))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, candidate: &NewUser) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let now = Utc::now();
        let row = NewUserRow {
            id: Uuid::new_v4(),
            email: candidate.email().as_ref(),
            full_name: candidate.full_name().map(AsRef::as_ref),
            is_active: candidate.is_active(),
            created_at: now,
            updated_at: now,
        };

        let inserted: UserRow = diesel::insert_into(users::table)
            .values(&row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_write_error(err, candidate.email().as_ref()))?;

        row_to_user(inserted)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .find(*id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_read_error)?;

        row.map(row_to_user).transpose()
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_read_error)?;

        row.map(row_to_user).transpose()
    }

    async fn list(&self, page: Page) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // Creation order with the id as tie-breaker keeps the window stable.
        let rows: Vec<UserRow> = users::table
            .order((users::created_at.asc(), users::id.asc()))
            .offset(page.offset())
            .limit(page.limit())
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_read_error)?;

        rows.into_iter().map(row_to_user).collect()
    }

    async fn update(
        &self,
        existing: &User,
        changes: &UserChanges,
    ) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let changeset = UserUpdateRow {
            email: changes.email().map(AsRef::as_ref),
            full_name: changes.full_name().map(|name| name.map(AsRef::as_ref)),
            is_active: changes.is_active(),
            updated_at: Utc::now(),
        };
        let attempted_email = changes.email().unwrap_or_else(|| existing.email());

        let updated: UserRow = diesel::update(users::table.find(*existing.id().as_uuid()))
            .set(&changeset)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_write_error(err, attempted_email.as_ref()))?;

        row_to_user(updated)
    }

    async fn delete(&self, existing: &User) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::delete(users::table.find(*existing.id().as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_read_error)?;
        Ok(())
    }
}
