// Data model shared by the terminal admin and the web dashboard. Kept free of
// tokio and HTTP so it builds for wasm32.
pub mod domain;
pub mod rate;
pub mod snapshot;

pub use rate::{daily_success_rates, format_rate, RateBand};
pub use snapshot::{DashboardSnapshot, Origins};
