use axum::{
    Router,
    middleware::{from_fn_with_state, map_response},
    routing::get,
};
use tower_cookies::CookieManagerLayer;
use tower_http::{
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::{handlers, middleware_layer, state::AppState};

/// Builds the application router.
///
/// `/secrettrack` and `/logout` sit behind `require_auth`. Every 401 leaving
/// the router, whatever produced it, becomes a redirect to `/login`.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route(
            "/",
            get(handlers::pages::index).post(handlers::pages::index_submit),
        )
        .route(
            "/index",
            get(handlers::pages::index).post(handlers::pages::index_submit),
        )
        .route("/ep1", get(handlers::pages::ep1))
        .route("/ep2", get(handlers::pages::ep2))
        .route("/ep3", get(handlers::pages::ep3))
        .route(
            "/login",
            get(handlers::auth::login_page).post(handlers::auth::login),
        )
        .route(
            "/register",
            get(handlers::auth::register_page).post(handlers::auth::register),
        )
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route("/secrettrack", get(handlers::pages::secrettrack))
        .route("/logout", get(handlers::auth::logout))
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware_layer::auth::require_auth,
        ))
        .with_state(state.clone());

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .nest_service("/static", ServeDir::new(&state.config.static_dir))
        .fallback(handlers::pages::not_found)
        .layer(map_response(middleware_layer::auth::redirect_unauthorized))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default())
                .on_request(DefaultOnRequest::default().level(Level::DEBUG))
                .on_response(DefaultOnResponse::default().level(Level::DEBUG))
                .on_failure(DefaultOnFailure::default().level(Level::ERROR)),
        )
        .layer(CookieManagerLayer::new())
}
