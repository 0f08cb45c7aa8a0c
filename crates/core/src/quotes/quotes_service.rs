//! Quote application service.
//!
//! Sits between the HTTP layer and [`QuoteRepositoryTrait`]: validates input, applies
//! listing defaults, bounds every storage call with a deadline and classifies
//! storage failures so that callers only see `Validation`, `NotFound` or
//! `OperationFailed`.

use async_trait::async_trait;
use log::{debug, error, info};
use std::sync::Arc;

use super::quotes_model::{CreateQuoteRequest, Quote, QuoteFilter};
use super::quotes_traits::{QuoteRepositoryTrait, QuoteServiceTrait};
use crate::constants::{
    COUNT_QUOTES_TIMEOUT, CREATE_QUOTE_TIMEOUT, DELETE_QUOTE_TIMEOUT, GET_QUOTE_TIMEOUT,
    HEALTH_CHECK_TIMEOUT, LIST_QUOTES_TIMEOUT, RANDOM_QUOTE_TIMEOUT,
};
use crate::deadline::Deadline;
use crate::errors::{Error, Result, ValidationError};

pub struct QuoteService<R: QuoteRepositoryTrait> {
    repository: Arc<R>,
}

impl<R: QuoteRepositoryTrait> QuoteService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        QuoteService { repository }
    }
}

/// Maps a storage failure onto the error kinds the service exposes.
fn classify(operation: &'static str, err: Error) -> Error {
    if err.is_not_found() {
        return Error::NotFound;
    }
    match err {
        Error::Validation(_) | Error::OperationFailed { .. } => err,
        other => Error::OperationFailed {
            operation,
            source: Box::new(other),
        },
    }
}

fn ensure_positive_id(operation: &'static str, quote_id: i64) -> Result<()> {
    if quote_id <= 0 {
        debug!("Rejected {} for invalid id {}", operation, quote_id);
        return Err(ValidationError::InvalidId(quote_id).into());
    }
    Ok(())
}

#[async_trait]
impl<R: QuoteRepositoryTrait> QuoteServiceTrait for QuoteService<R> {
    async fn create_quote(
        &self,
        mut request: CreateQuoteRequest,
        deadline: Deadline,
    ) -> Result<Quote> {
        if let Err(e) = request.validate() {
            debug!("Invalid quote request: {} ({:?})", e, request);
            return Err(e.into());
        }

        let new_quote = request.into_new_quote();
        let author = new_quote.author.clone();

        let created = deadline
            .cap(CREATE_QUOTE_TIMEOUT)
            .run(self.repository.create(new_quote))
            .await
            .map_err(|e| {
                error!("Failed to create quote for author '{}': {}", author, e);
                classify("create quote", e)
            })?;

        info!(
            "Quote created successfully: id={}, author={}",
            created.id, created.author
        );
        Ok(created)
    }

    async fn get_all_quotes(&self, filter: QuoteFilter, deadline: Deadline) -> Result<Vec<Quote>> {
        let filter = filter.normalized();

        let quotes = deadline
            .cap(LIST_QUOTES_TIMEOUT)
            .run(self.repository.get_all(filter.clone()))
            .await
            .map_err(|e| {
                error!("Failed to get quotes with filter {:?}: {}", filter, e);
                classify("get quotes", e)
            })?;

        debug!("Retrieved {} quotes with filter {:?}", quotes.len(), filter);
        Ok(quotes)
    }

    async fn count_quotes(&self, filter: QuoteFilter, deadline: Deadline) -> Result<i64> {
        let filter = filter.normalized();

        deadline
            .cap(COUNT_QUOTES_TIMEOUT)
            .run(self.repository.count(filter.clone()))
            .await
            .map_err(|e| {
                error!("Failed to count quotes with filter {:?}: {}", filter, e);
                classify("count quotes", e)
            })
    }

    async fn get_random_quote(&self, deadline: Deadline) -> Result<Quote> {
        let quote = deadline
            .cap(RANDOM_QUOTE_TIMEOUT)
            .run(self.repository.get_random())
            .await
            .map_err(|e| {
                error!("Failed to get random quote: {}", e);
                classify("get random quote", e)
            })?;

        debug!(
            "Retrieved random quote: id={}, author={}",
            quote.id, quote.author
        );
        Ok(quote)
    }

    async fn get_quote(&self, quote_id: i64, deadline: Deadline) -> Result<Quote> {
        ensure_positive_id("get quote", quote_id)?;

        deadline
            .cap(GET_QUOTE_TIMEOUT)
            .run(self.repository.get_by_id(quote_id))
            .await
            .map_err(|e| {
                error!("Failed to get quote {}: {}", quote_id, e);
                classify("get quote", e)
            })
    }

    async fn delete_quote(&self, quote_id: i64, deadline: Deadline) -> Result<()> {
        ensure_positive_id("delete quote", quote_id)?;

        deadline
            .cap(DELETE_QUOTE_TIMEOUT)
            .run(self.repository.delete(quote_id))
            .await
            .map_err(|e| {
                error!("Failed to delete quote {}: {}", quote_id, e);
                classify("delete quote", e)
            })?;

        info!("Quote deleted successfully: id={}", quote_id);
        Ok(())
    }

    async fn health_check(&self, deadline: Deadline) -> Result<()> {
        deadline
            .cap(HEALTH_CHECK_TIMEOUT)
            .run(self.repository.health_check())
            .await
            .map_err(|e| {
                error!("Database health check failed: {}", e);
                classify("check database health", e)
            })
    }
}
