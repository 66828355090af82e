use crate::core::admission::AdmissionGuard;
use crate::core::dispatcher::{RetryPolicy, RetryingDispatcher};
use crate::core::templates::EmailTemplates;
use crate::domain::model::{
    DeliveryErrors, EmailChannel, EmailMessage, ProspectSubmission, SubmitReply, BUSY_MESSAGE,
    MISSING_FIELDS_MESSAGE, PARTIAL_DELIVERY_MESSAGE, PROCESSING_FAILED_MESSAGE, SENT,
    STORE_FAILED_MESSAGE, SUCCESS_MESSAGE,
};
use crate::domain::ports::{EmailSender, RecordStore};
use crate::utils::error::{IntakeError, Result};

/// Terminal state of one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// Another submission holds the admission guard.
    Busy,
    MissingFields,
    /// Nothing was emailed.
    StoreFailed { details: String },
    /// The record is stored; at least one email failed after retries.
    PartialDelivery(DeliveryErrors),
    Delivered,
    ProcessingFailed { details: String },
}

impl SubmissionOutcome {
    pub fn http_status(&self) -> u16 {
        match self {
            SubmissionOutcome::Busy => 429,
            SubmissionOutcome::MissingFields => 400,
            SubmissionOutcome::StoreFailed { .. } => 500,
            SubmissionOutcome::PartialDelivery(_) => 500,
            SubmissionOutcome::Delivered => 200,
            SubmissionOutcome::ProcessingFailed { .. } => 500,
        }
    }

    pub fn reply(&self) -> SubmitReply {
        match self {
            SubmissionOutcome::Busy => SubmitReply::error(BUSY_MESSAGE),
            SubmissionOutcome::MissingFields => SubmitReply::error(MISSING_FIELDS_MESSAGE),
            SubmissionOutcome::StoreFailed { details } => {
                SubmitReply::error_with_details(STORE_FAILED_MESSAGE, details.clone())
            }
            SubmissionOutcome::PartialDelivery(errors) => SubmitReply {
                errors: Some(errors.clone()),
                ..SubmitReply::message(PARTIAL_DELIVERY_MESSAGE)
            },
            SubmissionOutcome::Delivered => SubmitReply::message(SUCCESS_MESSAGE),
            SubmissionOutcome::ProcessingFailed { details } => {
                SubmitReply::error_with_details(PROCESSING_FAILED_MESSAGE, details.clone())
            }
        }
    }
}

/// Validates, stores and acknowledges contact-form submissions, one at a time.
pub struct SubmissionHandler<S: RecordStore, E: EmailSender> {
    store: S,
    dispatcher: RetryingDispatcher<E>,
    templates: EmailTemplates,
    admission: AdmissionGuard,
}

impl<S: RecordStore, E: EmailSender> SubmissionHandler<S, E> {
    pub fn new(store: S, sender: E, policy: RetryPolicy, templates: EmailTemplates) -> Self {
        Self {
            store,
            dispatcher: RetryingDispatcher::new(sender, policy),
            templates,
            admission: AdmissionGuard::new(),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.admission.is_busy()
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.dispatcher.policy()
    }

    /// Runs one submission from a raw JSON request body.
    pub async fn handle(&self, body: &[u8]) -> SubmissionOutcome {
        let Some(_permit) = self.admission.try_acquire() else {
            tracing::info!("Submission blocked: previous request still processing");
            return SubmissionOutcome::Busy;
        };

        tracing::info!("Submission received ({} bytes)", body.len());

        let payload: serde_json::Value = match serde_json::from_slice(body) {
            Ok(payload) => payload,
            Err(e) => {
                let e = IntakeError::from(e);
                tracing::error!("Error processing submission: {}", e);
                return SubmissionOutcome::ProcessingFailed {
                    details: e.to_string(),
                };
            }
        };

        self.process(&payload).await
    }

    async fn process(&self, payload: &serde_json::Value) -> SubmissionOutcome {
        let Some(prospect) = ProspectSubmission::from_json(payload) else {
            tracing::info!("Missing required fields");
            return SubmissionOutcome::MissingFields;
        };
        tracing::debug!("Form data: {:?}", prospect);

        if let Err(e) = self.store.insert(&prospect).await {
            tracing::error!("Prospect insert failed: {}", e);
            return SubmissionOutcome::StoreFailed {
                details: e.to_string(),
            };
        }
        tracing::info!("Prospect saved: {} <{}>", prospect.name, prospect.email);

        // Each channel is attempted regardless of how the other one went.
        let autoresponder = self
            .deliver(
                EmailChannel::Autoresponder,
                self.templates.autoresponder(&prospect),
            )
            .await;
        let notification = self
            .deliver(
                EmailChannel::Notification,
                self.templates.notification(&prospect),
            )
            .await;

        match (autoresponder, notification) {
            (None, None) => SubmissionOutcome::Delivered,
            (autoresponder, notification) => {
                SubmissionOutcome::PartialDelivery(DeliveryErrors {
                    autoresponder: autoresponder.unwrap_or_else(|| SENT.to_string()),
                    notification: notification.unwrap_or_else(|| SENT.to_string()),
                })
            }
        }
    }

    /// `None` when sent, otherwise the final error detail.
    async fn deliver(
        &self,
        channel: EmailChannel,
        message: Result<EmailMessage>,
    ) -> Option<String> {
        let message = match message {
            Ok(message) => message,
            Err(e) => {
                tracing::error!("Failed to render {}: {}", channel, e);
                return Some(e.to_string());
            }
        };

        match self.dispatcher.dispatch(&message).await {
            Ok(()) => {
                tracing::info!("{} sent to: {}", channel, message.to);
                None
            }
            Err(e) => {
                tracing::error!("Failed to send {}: {}", channel, e);
                Some(e.delivery_detail())
            }
        }
    }
}
