use std::{env, path::PathBuf};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_PREFS_PATH: &str = "data/prefs.json";

/// Runtime settings, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub api_url: String,
    pub prefs_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = lookup("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);
        let api_url = lookup("HABIT_API_URL")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let prefs_path = lookup("APP_PREFS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PREFS_PATH));

        Self {
            port,
            api_url,
            prefs_path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_apply_when_unset() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config.port, 8080);
        assert_eq!(config.api_url, "http://127.0.0.1:5000");
        assert_eq!(config.prefs_path, PathBuf::from("data/prefs.json"));
    }

    #[test]
    fn environment_overrides_defaults() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("PORT", "9001"),
            ("HABIT_API_URL", "http://backend:8000"),
            ("APP_PREFS_PATH", "/tmp/prefs.json"),
        ]);
        let config = Config::from_lookup(|key| vars.get(key).map(|value| value.to_string()));
        assert_eq!(config.port, 9001);
        assert_eq!(config.api_url, "http://backend:8000");
        assert_eq!(config.prefs_path, PathBuf::from("/tmp/prefs.json"));
    }

    #[test]
    fn bad_port_falls_back() {
        let config = Config::from_lookup(|key| (key == "PORT").then(|| "http".to_string()));
        assert_eq!(config.port, 8080);
    }
}
