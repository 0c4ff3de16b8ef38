use chrono::Local;
use habit_dashboard::api::{HabitApi, HttpHabitApi};
use habit_dashboard::dashboard::Dashboard;
use habit_dashboard::models::PageContext;
use habit_dashboard::storage::load_prefs;
use habit_dashboard::{AppState, Config, router};
use std::{net::SocketAddr, sync::Arc};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env();
    let api = Arc::new(HttpHabitApi::new(config.api_url.clone()));
    let prefs = load_prefs(&config.prefs_path).await;

    let page = match api.load_page().await {
        Ok(page) => page,
        Err(err) => {
            error!("failed to load dashboard from {}: {err}", config.api_url);
            PageContext::empty_for(Local::now().date_naive())
        }
    };
    info!(
        habits = page.habits.len(),
        current_day = page.current_day,
        theme = prefs.theme.as_str(),
        "dashboard loaded"
    );

    let state = AppState::new(api, config.prefs_path.clone(), Dashboard::new(&page, prefs.theme));
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
