//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed user and snippet stores using Diesel ORM
//! - **memory**: mutex-guarded stores for tests and database-less runs
//! - **security**: Argon2 credential hashing and JWT signing
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod memory;
pub mod persistence;
pub mod security;
