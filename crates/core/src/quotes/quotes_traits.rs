//! Quote repository and service traits.
//!
//! The repository trait abstracts the persistence layer so the service can be
//! exercised against mock implementations and storage backends can be swapped
//! without touching business rules.

use async_trait::async_trait;

use super::quotes_model::{CreateQuoteRequest, NewQuote, Quote, QuoteFilter};
use crate::deadline::Deadline;
use crate::errors::Result;

/// Trait defining the contract for quote repository operations.
///
/// Implementations must never block the async runtime and must surface a
/// missing record as [`crate::Error::NotFound`].
#[async_trait]
pub trait QuoteRepositoryTrait: Send + Sync {
    /// Inserts a quote, assigning its id and both timestamps.
    async fn create(&self, new_quote: NewQuote) -> Result<Quote>;

    /// Matching quotes, newest first, with limit and offset applied.
    ///
    /// Returns an empty vector when nothing matches.
    async fn get_all(&self, filter: QuoteFilter) -> Result<Vec<Quote>>;

    async fn get_by_id(&self, quote_id: i64) -> Result<Quote>;

    /// Any stored quote, in backend random order.
    async fn get_random(&self) -> Result<Quote>;

    async fn delete(&self, quote_id: i64) -> Result<()>;

    /// Number of quotes matching the author constraint; limit and offset are ignored.
    async fn count(&self, filter: QuoteFilter) -> Result<i64>;

    /// Liveness probe against the backend.
    async fn health_check(&self) -> Result<()>;
}

/// Trait for quote service operations.
///
/// Every operation takes the caller's deadline; the service narrows it to its
/// own per-operation budget.
#[async_trait]
pub trait QuoteServiceTrait: Send + Sync {
    async fn create_quote(&self, request: CreateQuoteRequest, deadline: Deadline)
        -> Result<Quote>;

    async fn get_all_quotes(&self, filter: QuoteFilter, deadline: Deadline) -> Result<Vec<Quote>>;

    async fn count_quotes(&self, filter: QuoteFilter, deadline: Deadline) -> Result<i64>;

    async fn get_random_quote(&self, deadline: Deadline) -> Result<Quote>;

    async fn get_quote(&self, quote_id: i64, deadline: Deadline) -> Result<Quote>;

    async fn delete_quote(&self, quote_id: i64, deadline: Deadline) -> Result<()>;

    async fn health_check(&self, deadline: Deadline) -> Result<()>;
}
