//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementation of the domain repository port backed by
//! PostgreSQL via `diesel-async` with `bb8` connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapter**: the repository only translates between Diesel models
//!   and domain types; no business logic resides here.
//! - **Internal models**: Diesel row structs (`models.rs`) and schema
//!   definitions (`schema.rs`) are implementation details, never exposed to
//!   the domain layer.
//! - **Strongly typed errors**: database failures are mapped to
//!   [`crate::domain::ports::UserPersistenceError`] variants; the unique
//!   constraint on email is the one storage fact given a dedicated variant.

mod diesel_user_repository;
mod models;
mod pool;
mod schema;

pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
