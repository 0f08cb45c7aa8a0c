use async_trait::async_trait;
use chrono::Utc;
use diesel::dsl::{count_star, sql};
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use diesel::SqliteConnection;
use std::sync::Arc;

use quotes_core::errors::{Error, Result};
use quotes_core::quotes::{NewQuote, Quote, QuoteFilter, QuoteRepositoryTrait};

use super::model::{NewQuoteDB, QuoteDB};
use crate::db::{self, DbPool, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::quotes;

pub struct QuoteRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl QuoteRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        QuoteRepository { pool, writer }
    }
}

/// `LIKE` pattern matching `author` anywhere in `author_lower`, with wildcards
/// taken literally. SQLite only folds ASCII case, so both sides are lowered
/// in Rust.
fn author_pattern(author: &str) -> String {
    let mut pattern = String::with_capacity(author.len() + 2);
    pattern.push('%');
    for ch in author.to_lowercase().chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn to_domain(rows: Vec<QuoteDB>) -> Result<Vec<Quote>> {
    rows.into_iter()
        .map(|row| Quote::try_from(row).map_err(Error::from))
        .collect()
}

fn load_quotes(conn: &mut SqliteConnection, filter: &QuoteFilter) -> Result<Vec<Quote>> {
    let mut query = quotes::table
        .select(QuoteDB::as_select())
        .order((quotes::created_at.desc(), quotes::id.desc()))
        .into_boxed();

    if let Some(author) = filter.author.as_deref() {
        query = query.filter(quotes::author_lower.like(author_pattern(author)).escape('\\'));
    }
    if filter.limit > 0 {
        query = query.limit(filter.limit);
    }
    if filter.offset > 0 {
        query = query.offset(filter.offset);
    }

    let rows = query.load::<QuoteDB>(conn).into_core()?;
    to_domain(rows)
}

fn count_matching(conn: &mut SqliteConnection, filter: &QuoteFilter) -> Result<i64> {
    let mut query = quotes::table.select(count_star()).into_boxed();

    if let Some(author) = filter.author.as_deref() {
        query = query.filter(quotes::author_lower.like(author_pattern(author)).escape('\\'));
    }

    query.get_result::<i64>(conn).into_core()
}

#[async_trait]
impl QuoteRepositoryTrait for QuoteRepository {
    async fn create(&self, new_quote: NewQuote) -> Result<Quote> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Quote> {
                let row = NewQuoteDB::stamped(new_quote, Utc::now());

                let stored = diesel::insert_into(quotes::table)
                    .values(&row)
                    .returning(QuoteDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(Quote::try_from(stored)?)
            })
            .await
    }

    async fn get_all(&self, filter: QuoteFilter) -> Result<Vec<Quote>> {
        db::read(&self.pool, move |conn| load_quotes(conn, &filter)).await
    }

    async fn get_by_id(&self, quote_id: i64) -> Result<Quote> {
        db::read(&self.pool, move |conn| {
            let row = quotes::table
                .find(quote_id)
                .select(QuoteDB::as_select())
                .first::<QuoteDB>(conn)
                .optional()
                .map_err(StorageError::from)?
                .ok_or(Error::NotFound)?;
            Ok(Quote::try_from(row)?)
        })
        .await
    }

    async fn get_random(&self) -> Result<Quote> {
        db::read(&self.pool, |conn| {
            let row = quotes::table
                .select(QuoteDB::as_select())
                .order(sql::<BigInt>("RANDOM()"))
                .first::<QuoteDB>(conn)
                .optional()
                .map_err(StorageError::from)?
                .ok_or(Error::NotFound)?;
            Ok(Quote::try_from(row)?)
        })
        .await
    }

    async fn delete(&self, quote_id: i64) -> Result<()> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                let affected = diesel::delete(quotes::table.find(quote_id))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                if affected == 0 {
                    return Err(Error::NotFound);
                }
                Ok(())
            })
            .await
    }

    async fn count(&self, filter: QuoteFilter) -> Result<i64> {
        db::read(&self.pool, move |conn| count_matching(conn, &filter)).await
    }

    async fn health_check(&self) -> Result<()> {
        db::read(&self.pool, |conn| {
            diesel::sql_query("SELECT 1")
                .execute(conn)
                .map_err(StorageError::from)?;
            Ok(())
        })
        .await
    }
}
