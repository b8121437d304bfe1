//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation;
//! regenerate with `diesel print-schema` when migrations change.

diesel::table! {
    /// User accounts table.
    ///
    /// The `id` column is the primary key (UUID v4). `email` carries a unique
    /// constraint backed by an index supporting equality lookups.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Unique email address (max 255 characters).
        email -> Varchar,
        /// Optional human-readable name (max 255 characters).
        full_name -> Nullable<Varchar>,
        /// Whether the account is active.
        is_active -> Bool,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp, refreshed on every mutation.
        updated_at -> Timestamptz,
    }
}
