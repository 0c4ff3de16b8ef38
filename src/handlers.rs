use crate::charts::ChartSet;
use crate::dashboard::ToggleOutcome;
use crate::errors::AppError;
use crate::forms::{self, FormOutcome};
use crate::models::{HabitId, HabitNameRequest, ProgressSnapshot, ToggleRequest};
use crate::notify::Toast;
use crate::state::AppState;
use crate::sync;
use crate::theme::{Theme, toggle_theme};
use crate::ui::render_index;
use axum::{
    Json,
    extract::{Path, State},
    response::{Html, Redirect},
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct StateResponse {
    pub current_day: u32,
    pub theme: Theme,
    pub snapshot: ProgressSnapshot,
    pub charts: ChartSet,
    pub toast: Option<Toast>,
}

#[derive(Debug, Serialize)]
pub struct ThemeResponse {
    pub theme: Theme,
    pub icon: &'static str,
    pub charts: ChartSet,
}

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let dashboard = state.dashboard.lock().await;
    Html(render_index(&dashboard))
}

pub async fn get_state(State(state): State<AppState>) -> Json<StateResponse> {
    let dashboard = state.dashboard.lock().await;
    Json(StateResponse {
        current_day: dashboard.current_day(),
        theme: dashboard.theme(),
        snapshot: dashboard.snapshot().clone(),
        charts: dashboard.charts().clone(),
        toast: dashboard.notifications().visible().cloned(),
    })
}

pub async fn toggle(
    State(state): State<AppState>,
    Json(payload): Json<ToggleRequest>,
) -> Result<Json<ToggleOutcome>, AppError> {
    let outcome = sync::toggle(
        &state.api,
        &state.dashboard,
        payload.habit_id,
        payload.day,
        payload.checked,
    )
    .await?;
    Ok(Json(outcome))
}

pub async fn theme(State(state): State<AppState>) -> Result<Json<ThemeResponse>, AppError> {
    let theme = toggle_theme(&state.dashboard, &state.prefs_path).await?;
    let charts = state.dashboard.lock().await.charts().clone();
    Ok(Json(ThemeResponse {
        theme,
        icon: theme.icon(),
        charts,
    }))
}

pub async fn theme_form(State(state): State<AppState>) -> Result<Redirect, AppError> {
    toggle_theme(&state.dashboard, &state.prefs_path).await?;
    Ok(Redirect::to("/"))
}

pub async fn create_habit(
    State(state): State<AppState>,
    Json(payload): Json<HabitNameRequest>,
) -> Result<Json<FormOutcome>, AppError> {
    let outcome = forms::create_habit(&state.api, &state.dashboard, &payload.name).await?;
    Ok(Json(outcome))
}

pub async fn update_habit(
    State(state): State<AppState>,
    Path(id): Path<HabitId>,
    Json(payload): Json<HabitNameRequest>,
) -> Result<Json<FormOutcome>, AppError> {
    let outcome =
        forms::update_habit(&state.api, &state.dashboard, id, &payload.name).await?;
    Ok(Json(outcome))
}

pub async fn delete_habit(
    State(state): State<AppState>,
    Path(id): Path<HabitId>,
) -> Result<Json<FormOutcome>, AppError> {
    let outcome = forms::delete_habit(&state.api, &state.dashboard, id).await?;
    Ok(Json(outcome))
}

pub async fn reload(State(state): State<AppState>) -> Result<Json<StateResponse>, AppError> {
    forms::reload(state.api.as_ref(), &state.dashboard).await?;
    Ok(get_state(State(state)).await)
}
