use std::sync::Arc;
use std::time::Duration;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
    models::{DeleteConfirmation, Envelope, NewQuote, Quote, QuoteListParams},
};
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header::HeaderName, StatusCode},
    routing::get,
    Json, Router,
};
use quotes_core::Deadline;

const CREATE_BUDGET: Duration = Duration::from_secs(10);
const LIST_BUDGET: Duration = Duration::from_secs(15);
const RANDOM_BUDGET: Duration = Duration::from_secs(10);
const GET_BUDGET: Duration = Duration::from_secs(10);
const DELETE_BUDGET: Duration = Duration::from_secs(10);

pub const TOTAL_COUNT_HEADER: HeaderName = HeaderName::from_static("x-total-count");

/// Parses a path id; only a non-empty run of ASCII digits is accepted.
fn parse_quote_id(raw: &str) -> ApiResult<i64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ApiError::BadRequest("Invalid quote ID".to_string()));
    }
    raw.parse()
        .map_err(|_| ApiError::BadRequest("Invalid quote ID".to_string()))
}

#[utoipa::path(
    post,
    path = "/quotes",
    request_body = NewQuote,
    responses(
        (status = 201, description = "Quote created", body = Quote),
        (status = 400, description = "Malformed body or invalid quote data")
    )
)]
pub async fn create_quote(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewQuote>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Envelope<Quote>>)> {
    let Json(payload) = payload.map_err(|e| {
        tracing::debug!(error = %e, "Invalid JSON in request");
        ApiError::BadRequest("Invalid JSON format".to_string())
    })?;

    let created = state
        .quote_service
        .create_quote(payload.into(), Deadline::after(CREATE_BUDGET))
        .await
        .map_err(|e| ApiError::from_service(e, "Quote not found", "Failed to create quote"))?;

    Ok((StatusCode::CREATED, Json(Envelope::data(Quote::from(created)))))
}

#[utoipa::path(
    get,
    path = "/quotes",
    params(QuoteListParams),
    responses(
        (status = 200, description = "Matching quotes, newest first", body = [Quote],
            headers(("x-total-count" = i64, description = "Number of matching quotes")))
    )
)]
pub async fn list_quotes(
    State(state): State<Arc<AppState>>,
    Query(params): Query<QuoteListParams>,
) -> ApiResult<([(HeaderName, String); 1], Json<Envelope<Vec<Quote>>>)> {
    let filter = params.into_filter();
    let deadline = Deadline::after(LIST_BUDGET);

    let (quotes, total) = tokio::join!(
        state.quote_service.get_all_quotes(filter.clone(), deadline),
        state.quote_service.count_quotes(filter, deadline),
    );
    let failed = |e: quotes_core::Error| {
        ApiError::from_service(e, "No quotes found", "Failed to get quotes")
    };
    let quotes = quotes.map_err(failed)?;
    let total = total.map_err(failed)?;

    let quotes = quotes.into_iter().map(Quote::from).collect();
    Ok((
        [(TOTAL_COUNT_HEADER, total.to_string())],
        Json(Envelope::data(quotes)),
    ))
}

#[utoipa::path(
    get,
    path = "/quotes/random",
    responses(
        (status = 200, description = "A random quote", body = Quote),
        (status = 404, description = "No quotes stored")
    )
)]
pub async fn random_quote(State(state): State<Arc<AppState>>) -> ApiResult<Json<Envelope<Quote>>> {
    let quote = state
        .quote_service
        .get_random_quote(Deadline::after(RANDOM_BUDGET))
        .await
        .map_err(|e| ApiError::from_service(e, "No quotes found", "Failed to get random quote"))?;

    Ok(Json(Envelope::data(Quote::from(quote))))
}

#[utoipa::path(
    get,
    path = "/quotes/{id}",
    params(("id" = i64, Path, description = "Quote id")),
    responses(
        (status = 200, description = "The quote", body = Quote),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "Unknown id")
    )
)]
pub async fn get_quote(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Envelope<Quote>>> {
    let id = parse_quote_id(&id)?;

    let quote = state
        .quote_service
        .get_quote(id, Deadline::after(GET_BUDGET))
        .await
        .map_err(|e| ApiError::from_service(e, "Quote not found", "Failed to get quote"))?;

    Ok(Json(Envelope::data(Quote::from(quote))))
}

#[utoipa::path(
    delete,
    path = "/quotes/{id}",
    params(("id" = i64, Path, description = "Quote id")),
    responses(
        (status = 200, description = "Quote deleted", body = DeleteConfirmation),
        (status = 400, description = "Malformed or non-positive id"),
        (status = 404, description = "Unknown id")
    )
)]
pub async fn delete_quote(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Envelope<DeleteConfirmation>>> {
    let id = parse_quote_id(&id)?;

    state
        .quote_service
        .delete_quote(id, Deadline::after(DELETE_BUDGET))
        .await
        .map_err(|e| ApiError::from_service(e, "Quote not found", "Failed to delete quote"))?;

    Ok(Json(Envelope::data(DeleteConfirmation {
        message: "Quote deleted successfully".to_string(),
    })))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/quotes", get(list_quotes).post(create_quote))
        .route("/quotes/random", get(random_quote))
        .route("/quotes/{id}", get(get_quote).delete(delete_quote))
}

#[cfg(test)]
mod tests {
    use super::parse_quote_id;

    #[test]
    fn ids_must_be_plain_digits() {
        assert_eq!(parse_quote_id("42").unwrap(), 42);
        assert_eq!(parse_quote_id("0").unwrap(), 0);
        for raw in ["", "-1", "+1", "1.0", "abc", " 7", "99999999999999999999"] {
            assert!(parse_quote_id(raw).is_err(), "accepted {raw:?}");
        }
    }
}
