use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::authenticate::authenticate;
use super::handlers::create_user::create_user;
use super::handlers::delete_user::delete_user;
use super::handlers::get_user::get_user;
use super::handlers::update_user::update_user;
use super::middleware::authenticate as auth_middleware;
use crate::domain::user::ports::UserServicePort;

pub struct AppState<US: UserServicePort> {
    pub user_service: Arc<US>,
    pub authenticator: Arc<Authenticator>,
}

impl<US: UserServicePort> Clone for AppState<US> {
    fn clone(&self) -> Self {
        Self {
            user_service: Arc::clone(&self.user_service),
            authenticator: Arc::clone(&self.authenticator),
        }
    }
}

pub fn create_router<US: UserServicePort>(
    user_service: Arc<US>,
    authenticator: Arc<Authenticator>,
) -> Router {
    let state = AppState {
        user_service,
        authenticator,
    };

    let public_routes = Router::new()
        .route("/api/users/register", post(create_user::<US>))
        .route("/api/users/login", post(authenticate::<US>));

    let protected_routes = Router::new()
        .route(
            "/api/users/:user_id",
            get(get_user::<US>)
                .put(update_user::<US>)
                .delete(delete_user::<US>),
        )
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state.authenticator),
            auth_middleware,
        ));

    // Headers are not recorded: they carry bearer tokens
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
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
