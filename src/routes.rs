//! Router assembly: every endpoint, shared state, and middleware layers.

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use log::warn;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{handlers, AppState};

/// Builds the HTTP application with all routes and middleware.
///
/// When `front_url` is given, that origin is allowed to make credentialed
/// cross-origin requests; otherwise no CORS headers are emitted.
pub fn build_router(state: AppState, front_url: Option<&str>) -> Router {
    let router = Router::new()
        .route("/", get(handlers::handle_root))
        // ==== AUTH ==== //
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/logout", post(handlers::auth::logout))
        // ==== USERS ==== //
        .route("/users/me", get(handlers::users::me))
        .route("/users/me", post(handlers::users::update_me))
        .route("/users/me/follows", get(handlers::users::my_follows))
        .route("/users/suggestions", get(handlers::users::suggestions))
        .route("/users/search/:search", get(handlers::users::search))
        .route("/users/name/:username", get(handlers::users::by_name))
        .route("/users/:id/follow", post(handlers::users::follow))
        // ==== TWEETS ==== //
        .route("/tweets", post(handlers::tweets::create))
        .route("/tweets", get(handlers::tweets::list))
        .route("/tweets/myfeed", get(handlers::tweets::my_feed))
        .route("/tweets/:id", get(handlers::tweets::single))
        .route("/tweets/:id/reply", post(handlers::tweets::reply))
        .route("/tweets/:id/like", post(handlers::tweets::like))
        .route("/tweets/:id/retweet", post(handlers::tweets::retweet))
        .route("/tweets/:id/replies", get(handlers::tweets::replies))
        .route("/tweets/hashtag/:tag", get(handlers::tweets::by_hashtag))
        .route("/tweets/user/:id", get(handlers::tweets::by_author))
        // ==== HASHTAGS ==== //
        .route("/hashtags/trending", get(handlers::hashtags::trending))
        .route("/hashtags/search/:search", get(handlers::hashtags::search))
        .with_state(state)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));

    match front_url.map(HeaderValue::from_str) {
        Some(Ok(origin)) => router.layer(
            CorsLayer::new()
                .allow_origin(origin)
                .allow_credentials(true)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([header::CONTENT_TYPE, header::HeaderName::from_static("x-access-token")]),
        ),
        Some(Err(_)) => {
            warn!("FRONT_URL is not a valid header value - CORS disabled");
            router
        }
        None => router,
    }
}
