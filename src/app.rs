use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post, put}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/theme/toggle", post(handlers::theme_form))
        .route("/api/state", get(handlers::get_state))
        .route("/api/toggle", post(handlers::toggle))
        .route("/api/theme", post(handlers::theme))
        .route("/api/habits", post(handlers::create_habit))
        .route(
            "/api/habits/:id",
            put(handlers::update_habit).delete(handlers::delete_habit),
        )
        .route("/api/reload", post(handlers::reload))
        .with_state(state)
}
