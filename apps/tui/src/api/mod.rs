//! Data sources the dashboard controller can be bound to.

pub mod client;
pub mod error;
pub mod models;
pub mod sample;

pub use client::ApiClient;
pub use error::ApiError;
pub use sample::{sample_records, sample_stats, sample_users, SampleSource};

use crate::config::AppConfig;
use crate::domain::{DataOperation, MaintenanceReport, Statistics, UserSummary, WorkRecordGroup};

/// Remote operations the controller depends on.
///
/// All calls are awaited on the UI task, so implementations need not be `Send`.
#[allow(async_fn_in_trait)]
pub trait DataSource {
    /// Whether successful fetches return live data rather than samples.
    fn is_live(&self) -> bool {
        true
    }

    async fn fetch_stats(&self) -> Result<Statistics, ApiError>;

    async fn fetch_users(&self) -> Result<Vec<UserSummary>, ApiError>;

    async fn fetch_records(&self) -> Result<Vec<WorkRecordGroup>, ApiError>;

    async fn run_maintenance(
        &self,
        operation: &DataOperation,
    ) -> Result<MaintenanceReport, ApiError>;
}

/// The live API or the sample dataset, picked from configuration.
#[derive(Debug, Clone)]
pub enum Binding {
    Live(ApiClient),
    Sample(SampleSource),
}

impl Binding {
    pub fn from_config(config: &AppConfig) -> Result<Self, ApiError> {
        match config.api_url.as_deref() {
            Some(url) if !config.offline => Ok(Self::Live(ApiClient::new(
                url,
                config.timeout,
                config.page_size,
            )?)),
            _ => Ok(Self::Sample(SampleSource::new(config.maintenance_delay))),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Live(client) => format!("live API at {}", client.url()),
            Self::Sample(_) => "sample dataset (offline)".to_string(),
        }
    }
}

impl DataSource for Binding {
    fn is_live(&self) -> bool {
        matches!(self, Self::Live(_))
    }

    async fn fetch_stats(&self) -> Result<Statistics, ApiError> {
        match self {
            Self::Live(client) => client.fetch_stats().await,
            Self::Sample(sample) => sample.fetch_stats().await,
        }
    }

    async fn fetch_users(&self) -> Result<Vec<UserSummary>, ApiError> {
        match self {
            Self::Live(client) => client.fetch_users().await,
            Self::Sample(sample) => sample.fetch_users().await,
        }
    }

    async fn fetch_records(&self) -> Result<Vec<WorkRecordGroup>, ApiError> {
        match self {
            Self::Live(client) => client.fetch_records().await,
            Self::Sample(sample) => sample.fetch_records().await,
        }
    }

    async fn run_maintenance(
        &self,
        operation: &DataOperation,
    ) -> Result<MaintenanceReport, ApiError> {
        match self {
            Self::Live(client) => client.run_maintenance(operation).await,
            Self::Sample(sample) => sample.run_maintenance(operation).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;

    fn config(api_url: Option<&str>, offline: bool) -> AppConfig {
        AppConfig {
            api_url: api_url.map(str::to_string),
            offline,
            timeout: Duration::from_secs(1),
            page_size: 10,
            log_file: PathBuf::from("test.log"),
            maintenance_delay: Duration::ZERO,
            debug: false,
        }
    }

    #[test]
    fn binding_follows_configuration() -> Result<(), ApiError> {
        assert!(Binding::from_config(&config(Some("http://localhost:9000/adminWeb"), false))?.is_live());
        assert!(!Binding::from_config(&config(Some("http://localhost:9000/adminWeb"), true))?.is_live());
        assert!(!Binding::from_config(&config(None, false))?.is_live());
        Ok(())
    }
}
