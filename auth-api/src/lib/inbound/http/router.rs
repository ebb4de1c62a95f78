use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::signin::sign_in;
use super::handlers::signup::sign_up;
use crate::account::ports::AccountStore;
use crate::account::service::AccountService;

pub struct AppState<S: AccountStore> {
    pub account_service: Arc<AccountService<S>>,
}

impl<S: AccountStore> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            account_service: Arc::clone(&self.account_service),
        }
    }
}

pub fn create_router<S: AccountStore>(account_service: Arc<AccountService<S>>) -> Router {
    let state = AppState { account_service };

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .route("/", get(root))
        .route("/auth/signup", post(sign_up::<S>))
        .route("/auth/login", post(sign_in::<S>))
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn root() -> &'static str {
    "Hello from Sample Auth API"
}
