// Adapters layer: HTTP clients for the hosted record store and the email provider.

pub mod sendgrid;
pub mod supabase;

pub use sendgrid::SendGridSender;
pub use supabase::SupabaseStore;

use crate::utils::error::{IntakeError, Result};
use reqwest::header::HeaderValue;

/// Credential header; a key with control characters or newlines is a config error.
pub(crate) fn secret_header(field: &str, value: &str) -> Result<HeaderValue> {
    let mut header =
        HeaderValue::from_str(value).map_err(|e| IntakeError::InvalidConfigValueError {
            field: field.to_string(),
            value: IntakeError::redacted_value(field, value),
            reason: format!("Not usable as an HTTP header: {}", e),
        })?;
    header.set_sensitive(true);
    Ok(header)
}
