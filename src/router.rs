use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;
use crate::state::AppState;

/// Build the full application router using the global config
pub fn app(state: AppState) -> Router {
    app_with_config(state, crate::config::config())
}

pub fn app_with_config(state: AppState, config: &AppConfig) -> Router {
    let mut router = Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .route("/login", post(public::login))
        // Protected
        .merge(post_routes())
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
        .with_state(state);

    // Global middleware
    if config.security.enable_cors {
        router = router.layer(CorsLayer::permissive());
    }
    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router
}

fn post_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/posts",
            get(protected::posts_list).post(protected::posts_create),
        )
        .route(
            "/api/posts/:id",
            get(protected::posts_get)
                .put(protected::posts_update)
                .delete(protected::posts_delete),
        )
        .route_layer(middleware::from_fn(jwt_auth_middleware))
}
