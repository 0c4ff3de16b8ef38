use crate::api::HabitApi;
use crate::dashboard::Dashboard;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn HabitApi>,
    pub prefs_path: PathBuf,
    pub dashboard: Arc<Mutex<Dashboard>>,
}

impl AppState {
    pub fn new(api: Arc<dyn HabitApi>, prefs_path: PathBuf, dashboard: Dashboard) -> Self {
        Self {
            api,
            prefs_path,
            dashboard: Arc::new(Mutex::new(dashboard)),
        }
    }
}
