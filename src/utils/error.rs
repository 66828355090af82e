use thiserror::Error;

#[derive(Error, Debug)]
pub enum IntakeError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid configuration value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("{message}")]
    StoreError { message: String },

    #[error("Email provider rejected message (status {status}): {body}")]
    DeliveryError { status: u16, body: String },
}

impl IntakeError {
    /// Text reported to the caller for a failed email: the provider's own
    /// response body when there is one.
    pub fn delivery_detail(self) -> String {
        match self {
            IntakeError::DeliveryError { body, .. } => body,
            other => other.to_string(),
        }
    }

    /// Secrets never end up in logs or replies.
    pub fn redacted_value(field: &str, value: &str) -> String {
        if field.contains("key") && !value.is_empty() {
            "<redacted>".to_string()
        } else {
            value.to_string()
        }
    }
}

pub type Result<T> = std::result::Result<T, IntakeError>;
