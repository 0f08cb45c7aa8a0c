//! SQLite storage implementation for the quotes service.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the storage trait defined in `quotes-core` and contains:
//! - Database connection pooling and management
//! - Embedded Diesel migrations
//! - The single-writer actor that serializes writes
//! - The quote repository and its database model types
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies exist.
//! The core crate is database-agnostic and works with traits.
//!
//! ```text
//! core (domain, QuoteRepositoryTrait)
//!       │
//!       ▼
//! storage-sqlite (this crate)
//!       │
//!       ▼
//!   SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;

// Repository implementations
pub mod quotes;

// Re-export database utilities
pub use db::{
    create_pool, establish_connection, get_connection, init, run_migrations, spawn_writer,
    DbConnection, DbPool, PoolSettings, WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

pub use quotes::QuoteRepository;

// Re-export from quotes-core for convenience
pub use quotes_core::errors::{DatabaseError, Error, Result};
