//! Database models for quotes.

use chrono::{DateTime, SecondsFormat, Utc};
use diesel::prelude::*;

use crate::errors::StorageError;
use quotes_core::quotes::{NewQuote, Quote};

/// Database model for quotes
#[derive(Queryable, Identifiable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::quotes)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct QuoteDB {
    pub id: i64,
    pub author: String,
    pub text: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Database model for inserting a quote
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::quotes)]
pub struct NewQuoteDB {
    pub author: String,
    /// Unicode-lowercased author, the column author filters match against.
    pub author_lower: String,
    pub text: String,
    pub created_at: String,
    pub updated_at: String,
}

impl NewQuoteDB {
    /// Builds an insert row whose creation and update times are both `now`.
    pub fn stamped(quote: NewQuote, now: DateTime<Utc>) -> Self {
        let stamp = format_timestamp(now);
        Self {
            author_lower: quote.author.to_lowercase(),
            author: quote.author,
            text: quote.text,
            created_at: stamp.clone(),
            updated_at: stamp,
        }
    }
}

impl TryFrom<QuoteDB> for Quote {
    type Error = StorageError;

    fn try_from(db: QuoteDB) -> Result<Self, Self::Error> {
        Ok(Self {
            id: db.id,
            author: db.author,
            text: db.text,
            created_at: parse_timestamp(&db.created_at)?,
            updated_at: parse_timestamp(&db.updated_at)?,
        })
    }
}

/// Fixed-width UTC form, so text order matches time order.
pub(crate) fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, StorageError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| StorageError::SerializationError(format!("bad timestamp {:?}: {}", raw, e)))
}
