use crate::api::HabitApi;
use crate::dashboard::{Dashboard, ToggleOutcome};
use crate::errors::DashboardError;
use crate::models::HabitId;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Send one checkbox change to the backend.
///
/// The cell flips immediately and stays disabled until the request settles.
/// The dashboard lock is released while the request is in flight, so other
/// cells stay usable. Exactly one request per call, never retried.
///
/// The request and its settlement run on their own task: dropping the
/// returned future still settles the cell.
pub async fn toggle(
    api: &Arc<dyn HabitApi>,
    dashboard: &Arc<Mutex<Dashboard>>,
    habit_id: HabitId,
    day: u32,
    checked: bool,
) -> Result<ToggleOutcome, DashboardError> {
    let pending = dashboard.lock().await.begin_toggle(habit_id, day, checked)?;
    let api = Arc::clone(api);
    let dashboard = Arc::clone(dashboard);
    let settled = tokio::spawn(async move {
        let result = api.save_log(&pending.request()).await;
        dashboard.lock().await.settle_toggle(pending, result)
    });
    Ok(settled.await?)
}
