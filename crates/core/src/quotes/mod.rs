//! Quotes module - domain models, services, and traits.
//!
//! ```text
//! HTTP handler → QuoteServiceTrait → QuoteRepositoryTrait (DB)
//! ```

mod quotes_model;
mod quotes_service;
mod quotes_traits;

#[cfg(test)]
mod quotes_model_tests;

pub use quotes_model::{CreateQuoteRequest, NewQuote, Quote, QuoteFilter};
pub use quotes_service::QuoteService;
pub use quotes_traits::{QuoteRepositoryTrait, QuoteServiceTrait};
