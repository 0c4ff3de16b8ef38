use crate::api::HabitApi;
use crate::dashboard::{Control, Dashboard};
use crate::errors::{ApiError, DashboardError, ValidationError};
use crate::models::HabitId;
use crate::notify::{Toast, ToastKind};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

pub const MAX_NAME_LEN: usize = 100;

/// A trimmed, non-empty habit name within the length limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitName(String);

impl HabitName {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let name = raw.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(ValidationError::NameTooLong { max: MAX_NAME_LEN });
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// What the page should do once a form request settles.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FormOutcome {
    pub reload: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toast: Option<Toast>,
}

impl FormOutcome {
    fn inline_error(message: impl Into<String>) -> Self {
        Self {
            reload: false,
            error: Some(message.into()),
            toast: None,
        }
    }
}

pub async fn create_habit(
    api: &Arc<dyn HabitApi>,
    dashboard: &Arc<Mutex<Dashboard>>,
    raw_name: &str,
) -> Result<FormOutcome, DashboardError> {
    let name = HabitName::parse(raw_name)?;
    let request = {
        let (api, name) = (Arc::clone(api), name.clone());
        async move { api.create_habit(name.as_str()).await }
    };
    let result = submit(dashboard, Control::AddHabit, request).await?;

    match result {
        Ok(_) => {
            info!(name = name.as_str(), "habit created");
            refresh(api.as_ref(), dashboard).await;
            Ok(FormOutcome { reload: true, ..Default::default() })
        }
        Err(err) => Ok(FormOutcome::inline_error(failure_message(err, "Failed to add habit"))),
    }
}

pub async fn update_habit(
    api: &Arc<dyn HabitApi>,
    dashboard: &Arc<Mutex<Dashboard>>,
    id: HabitId,
    raw_name: &str,
) -> Result<FormOutcome, DashboardError> {
    let name = HabitName::parse(raw_name)?;
    ensure_known(dashboard, id).await?;
    let request = {
        let (api, name) = (Arc::clone(api), name.clone());
        async move { api.update_habit(id, name.as_str()).await }
    };
    let result = submit(dashboard, Control::EditHabit(id), request).await?;

    match result {
        Ok(_) => {
            info!(habit_id = id, name = name.as_str(), "habit renamed");
            refresh(api.as_ref(), dashboard).await;
            Ok(FormOutcome { reload: true, ..Default::default() })
        }
        Err(err) => Ok(FormOutcome::inline_error(failure_message(err, "Failed to update habit"))),
    }
}

pub async fn delete_habit(
    api: &Arc<dyn HabitApi>,
    dashboard: &Arc<Mutex<Dashboard>>,
    id: HabitId,
) -> Result<FormOutcome, DashboardError> {
    ensure_known(dashboard, id).await?;
    let request = {
        let api = Arc::clone(api);
        async move { api.delete_habit(id).await }
    };
    let result = submit(dashboard, Control::DeleteHabit(id), request).await?;

    match result {
        Ok(_) => {
            info!(habit_id = id, "habit deleted");
            let toast = dashboard.lock().await.notify("Habit deleted", ToastKind::Success);
            refresh(api.as_ref(), dashboard).await;
            Ok(FormOutcome { reload: true, error: None, toast: Some(toast) })
        }
        Err(err) => {
            let message = failure_message(err, "Failed to delete habit");
            let toast = dashboard.lock().await.notify(message, ToastKind::Failure);
            Ok(FormOutcome { reload: false, error: None, toast: Some(toast) })
        }
    }
}

/// Re-fetch the page context and rebuild the dashboard from it.
pub async fn reload(api: &dyn HabitApi, dashboard: &Mutex<Dashboard>) -> Result<(), ApiError> {
    let page = api.load_page().await?;
    page.validate()?;
    dashboard.lock().await.reload(&page);
    Ok(())
}

async fn refresh(api: &dyn HabitApi, dashboard: &Mutex<Dashboard>) {
    if let Err(err) = reload(api, dashboard).await {
        warn!("failed to refresh dashboard: {err}");
        dashboard
            .lock()
            .await
            .notify("Failed to refresh dashboard", ToastKind::Failure);
    }
}

/// Run one request with its submit control disabled for the duration.
///
/// The request runs on its own task, so the control is re-enabled even when
/// the caller goes away before the backend answers.
async fn submit<T, F>(
    dashboard: &Arc<Mutex<Dashboard>>,
    control: Control,
    request: F,
) -> Result<Result<T, ApiError>, DashboardError>
where
    T: Send + 'static,
    F: Future<Output = Result<T, ApiError>> + Send + 'static,
{
    dashboard.lock().await.begin_submit(control)?;
    let dashboard = Arc::clone(dashboard);
    let settled = tokio::spawn(async move {
        let result = request.await;
        dashboard.lock().await.end_submit(control);
        result
    });
    Ok(settled.await?)
}

async fn ensure_known(dashboard: &Mutex<Dashboard>, id: HabitId) -> Result<(), DashboardError> {
    if dashboard.lock().await.grid().habit(id).is_some() {
        Ok(())
    } else {
        Err(DashboardError::UnknownHabit(id))
    }
}

fn failure_message(err: ApiError, fallback: &str) -> String {
    match err {
        ApiError::Rejected(Some(message)) => message,
        ApiError::Rejected(None) => fallback.to_string(),
        ApiError::Transport(_) => "Network error".to_string(),
        ApiError::InvalidPage(_) => fallback.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeApi;
    use crate::models::{Habit, PageContext};
    use crate::theme::Theme;
    use std::time::Duration;
    use tokio::time::{sleep, timeout};

    fn page() -> PageContext {
        PageContext {
            current_day: 1,
            days_in_period: 30,
            habits: vec![Habit { id: 4, name: "Read".into() }],
            ..Default::default()
        }
    }

    fn setup() -> (Arc<FakeApi>, Arc<dyn HabitApi>, Arc<Mutex<Dashboard>>) {
        let fake = Arc::new(FakeApi::new(page()));
        let api: Arc<dyn HabitApi> = fake.clone();
        let dashboard = Arc::new(Mutex::new(Dashboard::new(&page(), Theme::Light)));
        (fake, api, dashboard)
    }

    #[test]
    fn names_are_trimmed_and_bounded() {
        assert_eq!(HabitName::parse("  Read  ").unwrap().as_str(), "Read");
        assert_eq!(HabitName::parse("   "), Err(ValidationError::EmptyName));
        assert_eq!(
            HabitName::parse(&"x".repeat(MAX_NAME_LEN + 1)),
            Err(ValidationError::NameTooLong { max: MAX_NAME_LEN })
        );
        assert!(HabitName::parse(&"é".repeat(MAX_NAME_LEN)).is_ok());
        assert_eq!(ValidationError::EmptyName.to_string(), "Please enter a habit name");
    }

    #[tokio::test]
    async fn empty_name_never_reaches_backend() {
        let (fake, api, dashboard) = setup();

        let err = create_habit(&api, &dashboard, " ").await.unwrap_err();

        assert_eq!(err, DashboardError::Validation(ValidationError::EmptyName));
        assert!(fake.mutations.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn created_habit_reloads_dashboard() {
        let (fake, api, dashboard) = setup();
        fake.page.lock().unwrap().habits.push(Habit { id: 5, name: "Walk".into() });

        let outcome = create_habit(&api, &dashboard, " Walk ").await.unwrap();

        assert!(outcome.reload);
        assert_eq!(fake.mutations.lock().unwrap().as_slice(), ["create Walk"]);
        let dashboard = dashboard.lock().await;
        assert_eq!(dashboard.grid().habits().len(), 2);
        assert!(!dashboard.is_in_flight(Control::AddHabit));
    }

    #[tokio::test]
    async fn backend_error_is_shown_inline() {
        let (fake, api, dashboard) = setup();
        *fake.mutation_result.lock().unwrap() = Err(ApiError::Rejected(Some("Habit already exists".into())));

        let outcome = update_habit(&api, &dashboard, 4, "Read more").await.unwrap();

        assert!(!outcome.reload);
        assert_eq!(outcome.error.as_deref(), Some("Habit already exists"));
        assert!(!dashboard.lock().await.is_in_flight(Control::EditHabit(4)));
    }

    #[tokio::test]
    async fn rejection_without_message_uses_fallback() {
        let (fake, api, dashboard) = setup();
        *fake.mutation_result.lock().unwrap() = Err(ApiError::Rejected(None));

        let outcome = create_habit(&api, &dashboard, "Walk").await.unwrap();
        assert_eq!(outcome.error.as_deref(), Some("Failed to add habit"));

        *fake.mutation_result.lock().unwrap() = Err(ApiError::Transport("reset".into()));
        let outcome = create_habit(&api, &dashboard, "Walk").await.unwrap();
        assert_eq!(outcome.error.as_deref(), Some("Network error"));
    }

    #[tokio::test]
    async fn delete_toasts_then_reloads() {
        let (fake, api, dashboard) = setup();
        fake.page.lock().unwrap().habits.clear();

        let outcome = delete_habit(&api, &dashboard, 4).await.unwrap();

        assert!(outcome.reload);
        assert_eq!(outcome.toast.map(|toast| toast.message).as_deref(), Some("Habit deleted"));
        assert!(dashboard.lock().await.grid().habits().is_empty());
    }

    #[tokio::test]
    async fn failed_delete_keeps_page() {
        let (fake, api, dashboard) = setup();
        *fake.mutation_result.lock().unwrap() = Err(ApiError::Rejected(None));

        let outcome = delete_habit(&api, &dashboard, 4).await.unwrap();

        assert!(!outcome.reload);
        let toast = outcome.toast.unwrap();
        assert_eq!(toast.message, "Failed to delete habit");
        assert_eq!(toast.kind, ToastKind::Failure);
        assert_eq!(dashboard.lock().await.grid().habits().len(), 1);
    }

    #[tokio::test]
    async fn unknown_habit_is_refused() {
        let (fake, api, dashboard) = setup();

        let err = delete_habit(&api, &dashboard, 99).await.unwrap_err();
        assert_eq!(err, DashboardError::UnknownHabit(99));
        assert!(fake.mutations.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn abandoned_submit_reenables_control() {
        let (fake, api, dashboard) = setup();
        let gate = fake.hold_requests();

        let abandoned = timeout(Duration::from_millis(50), create_habit(&api, &dashboard, "Walk")).await;
        assert!(abandoned.is_err());
        assert!(dashboard.lock().await.is_in_flight(Control::AddHabit));

        gate.notify_one();
        timeout(Duration::from_secs(1), async {
            while dashboard.lock().await.is_in_flight(Control::AddHabit) {
                sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .unwrap();

        assert_eq!(fake.mutations.lock().unwrap().as_slice(), ["create Walk"]);
        *fake.gate.lock().unwrap() = None;
        let outcome = create_habit(&api, &dashboard, "Stretch").await.unwrap();
        assert!(outcome.reload);
    }

    #[tokio::test]
    async fn reload_refuses_out_of_range_page() {
        let (fake, api, dashboard) = setup();
        fake.page.lock().unwrap().current_day = 4_000_000_000;

        let err = reload(api.as_ref(), &dashboard).await.unwrap_err();

        assert!(matches!(err, ApiError::InvalidPage(_)));
        assert_eq!(dashboard.lock().await.current_day(), 1);
    }
}
