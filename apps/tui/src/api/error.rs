use thiserror::Error;

/// Every way a call to the statistics API can fail.
///
/// The dashboard treats all of them the same (log, then use sample data);
/// the variants exist so the log says which one happened.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection refused, DNS failure, timeout.
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API returned HTTP {status}")]
    Status { status: u16 },

    /// The envelope came back with `success: false` or without `data`.
    #[error("API rejected {action}: {message}")]
    Rejected { action: String, message: String },

    #[error("Could not decode {action} response: {source}")]
    Decode {
        action: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    pub fn rejected(action: &str, message: impl Into<String>) -> Self {
        Self::Rejected {
            action: action.to_string(),
            message: message.into(),
        }
    }
}
