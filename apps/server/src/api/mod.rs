use std::{any::Any, net::SocketAddr, sync::Arc, time::Duration};

use crate::{
    config::Config,
    main_lib::AppState,
    models::{DeleteConfirmation, Envelope, HealthReport, NewQuote, Quote},
};
use axum::{
    error_handling::HandleErrorLayer,
    extract::ConnectInfo,
    http::{header::USER_AGENT, HeaderValue, Request, Response, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use tower::{timeout::TimeoutLayer, BoxError, ServiceBuilder};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any as AnyOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{MakeSpan, OnResponse, TraceLayer},
};
use tracing::Span;
use utoipa::OpenApi;

pub mod health;
pub mod quotes;

#[derive(OpenApi)]
#[openapi(
    paths(
        quotes::create_quote,
        quotes::list_quotes,
        quotes::random_quote,
        quotes::get_quote,
        quotes::delete_quote,
        health::health
    ),
    components(schemas(Quote, NewQuote, DeleteConfirmation, HealthReport)),
    tags((name = "quotes"))
)]
pub struct ApiDoc;

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    let openapi = ApiDoc::openapi();

    let api = Router::new()
        .merge(quotes::router())
        .merge(health::router())
        .with_state(state)
        .route("/openapi.json", get(move || async move { Json(openapi) }));

    with_middleware(api, config)
}

/// Wraps a router in the layers every request passes through.
///
/// From the outside in: request id assignment, request logging, request id
/// echo, panic recovery, whole-request timeout, CORS.
pub fn with_middleware(router: Router, config: &Config) -> Router {
    router
        .layer(cors_layer(&config.cors_allow))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_timeout))
                .layer(TimeoutLayer::new(config.request_timeout)),
        )
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(RequestSpan)
                .on_response(LogResponse),
        )
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

fn cors_layer(allowed: &[String]) -> CorsLayer {
    if allowed.iter().any(|o| o == "*") {
        return CorsLayer::new().allow_origin(AnyOrigin);
    }
    let origins = allowed
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(origin) => Some(origin),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", o);
                None
            }
        })
        .collect::<Vec<_>>();
    CorsLayer::new().allow_origin(origins)
}

/// Requests that outlive the whole-request timeout fail like any other
/// operation: a 500 envelope.
async fn handle_timeout(err: BoxError) -> axum::response::Response {
    if err.is::<tower::timeout::error::Elapsed>() {
        tracing::warn!("Request timed out");
    } else {
        tracing::error!(error = %err, "Unhandled middleware error");
    }

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(Envelope::<()>::error("Internal server error")),
    )
        .into_response()
}

/// Turns a handler panic into a 500 envelope.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> axum::response::Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        *s
    } else {
        "unknown panic payload"
    };
    tracing::error!(panic = %detail, "Panic recovered");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(Envelope::<()>::error("Internal server error")),
    )
        .into_response()
}

/// Span carrying the request line, client address and user agent.
#[derive(Clone, Copy, Debug)]
struct RequestSpan;

impl<B> MakeSpan<B> for RequestSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        let client = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.to_string())
            .unwrap_or_else(|| "-".to_string());
        let user_agent = request
            .headers()
            .get(USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");
        let request_id = request
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");

        tracing::info_span!(
            "http_request",
            method = %request.method(),
            path = %request.uri().path(),
            remote_addr = %client,
            user_agent = %user_agent,
            request_id = %request_id,
        )
    }
}

#[derive(Clone, Copy, Debug)]
struct LogResponse;

impl<B> OnResponse<B> for LogResponse {
    fn on_response(self, response: &Response<B>, latency: Duration, _span: &Span) {
        tracing::info!(
            status = response.status().as_u16(),
            duration = ?latency,
            "HTTP request"
        );
    }
}
