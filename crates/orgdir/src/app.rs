use std::time::Duration;

use axum::{
    http::{header, Method, StatusCode},
    middleware,
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    handlers::{
        auth::{require_api_key, API_KEY_HEADER},
        health::healthz,
        organisations::{
            create_organisation, delete_organisation, get_organisation, list_organisations,
            update_organisation,
        },
        users::{create_user, delete_user, get_user, list_users, update_user},
    },
    state::AppState,
};

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            header::CONTENT_TYPE,
            header::HeaderName::from_static(API_KEY_HEADER),
        ]);

    // Organisation and user routes, behind the API key when one is set
    let directory_routes = Router::new()
        .route(
            "/organisations",
            get(list_organisations).post(create_organisation),
        )
        .route(
            "/organisations/{id}",
            get(get_organisation)
                .put(update_organisation)
                .delete(delete_organisation),
        )
        .route("/organisations/{id}/users", get(list_users).post(create_user))
        .route(
            "/organisations/{id}/users/{user_id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_api_key,
        ));

    let v1_routes = Router::new()
        .route("/healthz", get(healthz))
        .merge(directory_routes)
        .layer(cors);

    Router::new()
        .nest("/v1", v1_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(10),
        ))
        .with_state(state)
}
