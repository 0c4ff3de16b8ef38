pub mod api;
pub mod app;
pub mod charts;
pub mod config;
pub mod dashboard;
pub mod errors;
pub mod forms;
pub mod grid;
pub mod handlers;
pub mod models;
pub mod notify;
pub mod progress;
pub mod state;
pub mod storage;
pub mod sync;
pub mod theme;
pub mod ui;

pub use app::router;
pub use config::Config;
pub use state::AppState;
