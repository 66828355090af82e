use crate::domain::model::{EmailMessage, ProspectSubmission};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Append-only sink for prospect records.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn insert(&self, prospect: &ProspectSubmission) -> Result<()>;
}

/// Single-attempt transport to a transactional email provider.
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<()>;
}
