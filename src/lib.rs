pub mod api;
pub mod app;
pub mod cache;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod notify;
pub mod panel;
pub mod renewal;
pub mod session;
pub mod state;
pub mod stats;
pub mod storage;
pub mod ui;

pub use app::router;
pub use config::Config;
pub use panel::Panel;
pub use state::AppState;
