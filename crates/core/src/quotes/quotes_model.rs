//! Quote domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_QUOTE_LIMIT, MAX_AUTHOR_LEN, MAX_QUOTE_LIMIT, MAX_QUOTE_TEXT_LEN};
use crate::errors::ValidationError;

/// Domain model representing a stored quote
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Quote {
    pub id: i64,
    pub author: String,
    #[serde(rename = "quote")]
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for inserting a quote. Storage assigns id and timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuote {
    pub author: String,
    pub text: String,
}

/// Raw create request as received from a client.
///
/// Missing fields deserialize as empty strings so that they are reported
/// by [`CreateQuoteRequest::validate`] instead of failing decoding.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CreateQuoteRequest {
    pub author: String,
    pub quote: String,
}

impl CreateQuoteRequest {
    pub fn new(author: impl Into<String>, quote: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            quote: quote.into(),
        }
    }

    /// Trims both fields in place, then checks them.
    ///
    /// Checks run in a fixed order and the first failure is returned:
    /// author empty, quote empty, author too long, quote too long.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        trim_in_place(&mut self.author);
        trim_in_place(&mut self.quote);

        if self.author.is_empty() {
            return Err(ValidationError::AuthorRequired);
        }
        if self.quote.is_empty() {
            return Err(ValidationError::QuoteRequired);
        }
        if self.author.chars().count() > MAX_AUTHOR_LEN {
            return Err(ValidationError::AuthorTooLong {
                max: MAX_AUTHOR_LEN,
            });
        }
        if self.quote.chars().count() > MAX_QUOTE_TEXT_LEN {
            return Err(ValidationError::QuoteTooLong {
                max: MAX_QUOTE_TEXT_LEN,
            });
        }

        Ok(())
    }

    /// Converts an already validated request.
    pub fn into_new_quote(self) -> NewQuote {
        NewQuote {
            author: self.author,
            text: self.quote,
        }
    }
}

fn trim_in_place(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}

/// Read-time constraint over the quote collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteFilter {
    /// Case-insensitive substring of the author name.
    pub author: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

impl Default for QuoteFilter {
    fn default() -> Self {
        Self {
            author: None,
            limit: DEFAULT_QUOTE_LIMIT,
            offset: 0,
        }
    }
}

impl QuoteFilter {
    pub fn by_author(author: impl Into<String>) -> Self {
        Self {
            author: Some(author.into()),
            ..Self::default()
        }
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }

    /// Applies defaults and bounds before the filter reaches storage.
    ///
    /// - limit <= 0 becomes [`DEFAULT_QUOTE_LIMIT`]
    /// - limit above [`MAX_QUOTE_LIMIT`] is clamped
    /// - negative offsets become 0
    /// - a blank author means no author constraint
    pub fn normalized(mut self) -> Self {
        if self.limit <= 0 {
            self.limit = DEFAULT_QUOTE_LIMIT;
        } else if self.limit > MAX_QUOTE_LIMIT {
            self.limit = MAX_QUOTE_LIMIT;
        }
        self.offset = self.offset.max(0);
        self.author = self
            .author
            .map(|author| author.trim().to_string())
            .filter(|author| !author.is_empty());
        self
    }
}
