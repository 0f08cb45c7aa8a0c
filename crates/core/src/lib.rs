//! Quotes Core - Domain entities, services, and traits.
//!
//! This crate contains the business rules of the quotes service.
//! It is database-agnostic and defines the repository trait that is
//! implemented by the `storage-sqlite` crate.

pub mod constants;
pub mod deadline;
pub mod errors;
pub mod quotes;

pub use deadline::Deadline;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
