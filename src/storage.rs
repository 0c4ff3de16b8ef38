use crate::errors::AppError;
use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;
use tracing::error;

/// The only state the dashboard keeps on disk.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub theme: Theme,
}

pub async fn load_prefs(path: &Path) -> Preferences {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(prefs) => prefs,
            Err(err) => {
                error!("failed to parse preferences file: {err}");
                Preferences::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Preferences::default(),
        Err(err) => {
            error!("failed to read preferences file: {err}");
            Preferences::default()
        }
    }
}

pub async fn persist_prefs(path: &Path, prefs: &Preferences) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }
    let payload = serde_json::to_vec_pretty(prefs).map_err(AppError::internal)?;
    fs::write(path, payload).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn unique_path(tag: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let mut path = std::env::temp_dir();
        path.push(format!("habit_dashboard_{tag}_{}_{nanos}", std::process::id()));
        path.push("prefs.json");
        path
    }

    #[tokio::test]
    async fn missing_file_defaults_to_light() {
        let prefs = load_prefs(&unique_path("missing")).await;
        assert_eq!(prefs.theme, Theme::Light);
    }

    #[tokio::test]
    async fn persisted_theme_is_loaded_back() {
        let path = unique_path("roundtrip");
        persist_prefs(&path, &Preferences { theme: Theme::Dark })
            .await
            .unwrap();
        assert_eq!(load_prefs(&path).await.theme, Theme::Dark);
    }

    #[tokio::test]
    async fn corrupt_file_falls_back_to_default() {
        let path = unique_path("corrupt");
        fs::create_dir_all(path.parent().unwrap()).await.unwrap();
        fs::write(&path, b"{not json").await.unwrap();
        assert_eq!(load_prefs(&path).await.theme, Theme::Light);
    }
}
