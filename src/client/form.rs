use crate::core::admission::AdmissionGuard;
use crate::domain::model::{ProspectSubmission, SubmitReply, BUSY_MESSAGE, PROCESSING_FAILED_MESSAGE};
use reqwest::Client;

pub const SUCCESS_STATUS: &str =
    "Success! Your information has been submitted. We’ll be in touch shortly.";

/// Editable form state; cleared after a successful submit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl FormFields {
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// The status line shown under the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormStatus {
    Submitted(String),
    Failed(String),
}

impl FormStatus {
    pub fn is_error(&self) -> bool {
        matches!(self, FormStatus::Failed(_))
    }

    pub fn text(&self) -> &str {
        match self {
            FormStatus::Submitted(text) | FormStatus::Failed(text) => text,
        }
    }
}

impl std::fmt::Display for FormStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.text())
    }
}

pub struct ContactForm {
    client: Client,
    endpoint: String,
    contact: String,
    submitting: AdmissionGuard,
}

impl ContactForm {
    pub fn new(endpoint: impl Into<String>, contact: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            contact: contact.into(),
            submitting: AdmissionGuard::new(),
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.is_busy()
    }

    /// Posts the fields. Returns `None` without sending anything while an
    /// earlier submit is still in flight.
    pub async fn submit(&self, fields: &mut FormFields) -> Option<FormStatus> {
        let _permit = self.submitting.try_acquire()?;

        let submission = ProspectSubmission {
            name: fields.name.clone(),
            email: fields.email.clone(),
            phone: fields.phone.clone(),
        };
        tracing::debug!("Submitting form: {:?}", submission);

        match self.post(&submission).await {
            Ok(()) => {
                fields.clear();
                Some(FormStatus::Submitted(SUCCESS_STATUS.to_string()))
            }
            Err(reason) => {
                tracing::warn!("Form submission error: {}", reason);
                Some(FormStatus::Failed(format!(
                    "Oops! {}. Please try again or contact {}.",
                    reason, self.contact
                )))
            }
        }
    }

    async fn post(&self, submission: &ProspectSubmission) -> Result<(), String> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(submission)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let ok = response.status().is_success();
        let reply: SubmitReply = response.json().await.map_err(|e| e.to_string())?;
        tracing::debug!("API response: {:?}", reply);

        if ok {
            return Ok(());
        }
        Err(failure_reason(&reply))
    }
}

/// Human-readable reason for a non-2xx reply.
pub fn failure_reason(reply: &SubmitReply) -> String {
    if reply.error.as_deref() == Some(BUSY_MESSAGE) {
        return "Please wait a few seconds before resubmitting".to_string();
    }

    if let Some(errors) = &reply.errors {
        let failed: Vec<&str> = errors
            .failed_channels()
            .iter()
            .map(|channel| channel.as_str())
            .collect();
        return format!("Failed to send {} email(s)", failed.join(" and "));
    }

    reply
        .error
        .clone()
        .unwrap_or_else(|| PROCESSING_FAILED_MESSAGE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::DeliveryErrors;

    #[test]
    fn test_busy_reply_reason() {
        let reply = SubmitReply::error(BUSY_MESSAGE);
        assert_eq!(
            failure_reason(&reply),
            "Please wait a few seconds before resubmitting"
        );
    }

    #[test]
    fn test_partial_delivery_reason_lists_failed_channels() {
        let reply = SubmitReply {
            errors: Some(DeliveryErrors {
                autoresponder: "status 403".to_string(),
                notification: "status 403".to_string(),
            }),
            ..SubmitReply::message("Prospect saved, but some emails failed")
        };
        assert_eq!(
            failure_reason(&reply),
            "Failed to send autoresponder and notification email(s)"
        );
    }

    #[test]
    fn test_plain_error_reason_and_fallback() {
        assert_eq!(
            failure_reason(&SubmitReply::error("Missing required fields")),
            "Missing required fields"
        );
        assert_eq!(failure_reason(&SubmitReply::default()), "Failed to process request");
    }

    #[test]
    fn test_clear_resets_fields() {
        let mut fields = FormFields {
            name: "Jane".to_string(),
            email: "jane@x.com".to_string(),
            phone: "555-1111".to_string(),
        };
        fields.clear();
        assert_eq!(fields, FormFields::default());
    }
}
