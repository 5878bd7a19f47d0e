pub mod api;
pub mod auth;
pub mod authz;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod state;

use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{delete, get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;
pub use crate::state::AppState;

/// Build the complete HTTP application around `state`.
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.server.cors_origins);

    Router::new()
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .merge(auth_public_routes())
        .merge(protected_routes(state.clone()))
        .fallback(public::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

fn auth_public_routes() -> Router<AppState> {
    use public::auth;

    Router::new()
        .route("/api/auth/register", post(auth::register_post))
        .route("/api/auth/login", post(auth::login_post))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    use protected::{auth, projects, tasks};

    Router::new()
        .route("/api/auth/me", delete(auth::me_delete))
        .route(
            "/api/projects",
            get(projects::projects_get).post(projects::projects_post),
        )
        .route(
            "/api/projects/:project_id",
            get(projects::project_get)
                .put(projects::project_put)
                .delete(projects::project_delete),
        )
        .route(
            "/api/projects/:project_id/tasks",
            get(tasks::tasks_get).post(tasks::tasks_post),
        )
        .route(
            "/api/projects/:project_id/tasks/:task_id",
            get(tasks::task_get)
                .put(tasks::task_put)
                .delete(tasks::task_delete),
        )
        // Only matched routes are guarded; unknown paths still fall through to 404.
        .route_layer(from_fn_with_state(state, jwt_auth_middleware))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}
