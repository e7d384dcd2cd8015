pub mod app;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod stats;
pub mod storage;
pub mod ui;
pub mod state;
pub mod wrangling;

pub use app::router;
pub use state::AppState;
pub use storage::{load_bookings, resolve_data_path, Dataset};
