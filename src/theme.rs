use crate::dashboard::Dashboard;
use crate::errors::AppError;
use crate::storage::{Preferences, persist_prefs};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::sync::Mutex;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// Colors that change with the theme; everything else in the chart
/// configurations is theme-independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartPalette {
    pub text: &'static str,
    pub grid: &'static str,
    pub donut_remaining: &'static str,
}

const LIGHT: ChartPalette = ChartPalette {
    text: "#212529",
    grid: "rgba(0, 0, 0, 0.05)",
    donut_remaining: "#e9ecef",
};

const DARK: ChartPalette = ChartPalette {
    text: "#e8eaed",
    grid: "rgba(255, 255, 255, 0.1)",
    donut_remaining: "#404550",
};

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Icon class for the toggle button: it shows the theme you switch to.
    pub fn icon(self) -> &'static str {
        match self {
            Theme::Light => "bi bi-moon-fill",
            Theme::Dark => "bi bi-sun-fill",
        }
    }

    pub fn palette(self) -> ChartPalette {
        match self {
            Theme::Light => LIGHT,
            Theme::Dark => DARK,
        }
    }
}

/// Flip the theme, repaint the charts and persist the choice.
///
/// The in-memory theme changes even when the preference file cannot be
/// written. The dashboard stays locked until the write finishes, so the
/// file always holds the theme of the last toggle.
pub async fn toggle_theme(dashboard: &Mutex<Dashboard>, prefs_path: &Path) -> Result<Theme, AppError> {
    let mut dashboard = dashboard.lock().await;
    let theme = dashboard.theme().toggled();
    dashboard.set_theme(theme);
    info!(theme = theme.as_str(), "theme changed");

    if let Err(err) = persist_prefs(prefs_path, &Preferences { theme }).await {
        error!("failed to persist theme preference: {}", err.message);
        return Err(err);
    }
    Ok(theme)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PageContext;
    use crate::storage::load_prefs;

    #[test]
    fn toggle_flips_between_light_and_dark() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::default(), Theme::Light);
    }

    #[test]
    fn icon_and_palette_follow_theme() {
        assert_eq!(Theme::Light.icon(), "bi bi-moon-fill");
        assert_eq!(Theme::Dark.icon(), "bi bi-sun-fill");
        assert_eq!(Theme::Dark.palette().text, "#e8eaed");
        assert_eq!(Theme::Light.palette().grid, "rgba(0, 0, 0, 0.05)");
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Theme::Dark).unwrap(), "\"dark\"");
        let theme: Theme = serde_json::from_str("\"light\"").unwrap();
        assert_eq!(theme, Theme::Light);
    }

    #[tokio::test]
    async fn toggle_repaints_charts_and_persists() {
        let mut path = std::env::temp_dir();
        path.push(format!("habit_dashboard_theme_{}.json", std::process::id()));
        let dashboard = Mutex::new(Dashboard::new(&PageContext::default(), Theme::Light));

        let theme = toggle_theme(&dashboard, &path).await.unwrap();

        assert_eq!(theme, Theme::Dark);
        assert_eq!(load_prefs(&path).await.theme, Theme::Dark);
        let guard = dashboard.lock().await;
        assert_eq!(guard.charts().donut["options"]["plugins"]["legend"]["labels"]["color"], "#e8eaed");
        drop(guard);

        assert_eq!(toggle_theme(&dashboard, &path).await.unwrap(), Theme::Light);
        assert_eq!(load_prefs(&path).await.theme, Theme::Light);
    }

    #[tokio::test]
    async fn concurrent_toggles_leave_file_matching_memory() {
        let mut path = std::env::temp_dir();
        path.push(format!("habit_dashboard_theme_race_{}.json", std::process::id()));
        let dashboard = Mutex::new(Dashboard::new(&PageContext::default(), Theme::Light));

        let (first, second, third) = tokio::join!(
            toggle_theme(&dashboard, &path),
            toggle_theme(&dashboard, &path),
            toggle_theme(&dashboard, &path),
        );
        assert!(first.is_ok() && second.is_ok() && third.is_ok());

        let theme = dashboard.lock().await.theme();
        assert_eq!(theme, Theme::Dark);
        assert_eq!(load_prefs(&path).await.theme, theme);
        let _ = std::fs::remove_file(&path);
    }
}
