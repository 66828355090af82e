use serde::{Deserialize, Serialize};

pub const BUSY_MESSAGE: &str = "Please wait before submitting again";
pub const MISSING_FIELDS_MESSAGE: &str = "Missing required fields";
pub const STORE_FAILED_MESSAGE: &str = "Failed to save prospect data";
pub const PARTIAL_DELIVERY_MESSAGE: &str = "Prospect saved, but some emails failed";
pub const SUCCESS_MESSAGE: &str = "Prospect saved and emails sent successfully";
pub const PROCESSING_FAILED_MESSAGE: &str = "Failed to process request";
pub const NOT_CONFIGURED_MESSAGE: &str = "Service is not configured";

/// Per-channel value in a partial-delivery reply when that email went out.
pub const SENT: &str = "Sent";

/// One contact-form submission, as written to the prospects table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProspectSubmission {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl ProspectSubmission {
    /// Pulls the three fields out of a request body. A field counts as present
    /// when it is a non-empty string; the content itself is not checked.
    pub fn from_json(body: &serde_json::Value) -> Option<Self> {
        let field = |key: &str| {
            body.get(key)
                .and_then(|v| v.as_str())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        Some(Self {
            name: field("name")?,
            email: field("email")?,
            phone: field("phone")?,
        })
    }
}

/// A fully formed outbound email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailChannel {
    Autoresponder,
    Notification,
}

impl EmailChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmailChannel::Autoresponder => "autoresponder",
            EmailChannel::Notification => "notification",
        }
    }
}

impl std::fmt::Display for EmailChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-channel delivery result: `"Sent"` or the provider error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryErrors {
    pub autoresponder: String,
    pub notification: String,
}

impl DeliveryErrors {
    pub fn failed_channels(&self) -> Vec<EmailChannel> {
        let mut failed = Vec::new();
        if self.autoresponder != SENT {
            failed.push(EmailChannel::Autoresponder);
        }
        if self.notification != SENT {
            failed.push(EmailChannel::Notification);
        }
        failed
    }
}

/// JSON reply of the submit endpoint. Which fields are set depends on the outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitReply {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<DeliveryErrors>,
}

impl SubmitReply {
    pub fn message(message: &str) -> Self {
        Self {
            message: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn error(error: &str) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Self::default()
        }
    }

    pub fn error_with_details(error: &str, details: impl Into<String>) -> Self {
        Self {
            error: Some(error.to_string()),
            details: Some(details.into()),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_with_all_fields() {
        let body = json!({"name": "Jane", "email": "jane@x.com", "phone": "555-1111"});
        let prospect = ProspectSubmission::from_json(&body).unwrap();
        assert_eq!(prospect.name, "Jane");
        assert_eq!(prospect.email, "jane@x.com");
        assert_eq!(prospect.phone, "555-1111");
    }

    #[test]
    fn test_from_json_keeps_whitespace_only_values() {
        let body = json!({"name": "   ", "email": "jane@x.com", "phone": "555-1111"});
        let prospect = ProspectSubmission::from_json(&body).unwrap();
        assert_eq!(prospect.name, "   ");
    }

    #[test]
    fn test_from_json_treats_empty_null_and_non_string_as_missing() {
        let cases = [
            json!({"email": "jane@x.com", "phone": "555-1111"}),
            json!({"name": "", "email": "jane@x.com", "phone": "555-1111"}),
            json!({"name": "Jane", "email": "jane@x.com", "phone": null}),
            json!({"name": "Jane", "email": "jane@x.com", "phone": 5551111}),
            json!(["Jane", "jane@x.com", "555-1111"]),
        ];

        for body in cases {
            assert!(ProspectSubmission::from_json(&body).is_none(), "{body}");
        }
    }

    #[test]
    fn test_reply_serialization_omits_unset_fields() {
        let reply = SubmitReply::message(SUCCESS_MESSAGE);
        assert_eq!(
            serde_json::to_value(&reply).unwrap(),
            json!({"message": "Prospect saved and emails sent successfully"})
        );

        let reply = SubmitReply::error_with_details(STORE_FAILED_MESSAGE, "relation does not exist");
        assert_eq!(
            serde_json::to_value(&reply).unwrap(),
            json!({"error": "Failed to save prospect data", "details": "relation does not exist"})
        );
    }

    #[test]
    fn test_failed_channels() {
        let errors = DeliveryErrors {
            autoresponder: SENT.to_string(),
            notification: "status 401".to_string(),
        };
        assert_eq!(errors.failed_channels(), vec![EmailChannel::Notification]);
    }
}
