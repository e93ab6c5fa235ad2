pub mod app;
pub mod config;
pub mod errors;
pub mod github;
pub mod handlers;
pub mod models;
pub mod signup;
pub mod state;
pub mod storage;
pub mod ui;
pub mod week;
pub mod widgets;

pub use app::router;
pub use config::SiteConfig;
pub use state::AppState;
