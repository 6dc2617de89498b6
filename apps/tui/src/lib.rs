// Library half of the admin dashboard: data sources, the controller and the
// render-agnostic view models. The binary adds the terminal front end.
pub mod activity;
pub mod api;
pub mod config;
pub mod controller;
pub mod filter;
pub mod logging;
pub mod view;

pub use worklog_core::domain;
pub use worklog_core::DashboardSnapshot;

pub use controller::DashboardController;
pub use view::{DashboardView, ViewState};
