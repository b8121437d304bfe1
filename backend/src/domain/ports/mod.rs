//! Domain ports: traits decoupling the domain from adapters.
//!
//! Driving ports ([`UsersCommand`], [`UsersQuery`]) are implemented by the
//! domain service and consumed by inbound adapters. The driven port
//! ([`UserRepository`]) is implemented by outbound persistence adapters.

mod user_repository;
mod users_command;
mod users_query;

pub use user_repository::{UserPersistenceError, UserRepository};
pub use users_command::UsersCommand;
pub use users_query::UsersQuery;
