use crate::adapters::secret_header;
use crate::config::intake::EmailConfig;
use crate::core::{EmailMessage, EmailSender};
use crate::utils::error::{IntakeError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, AUTHORIZATION};
use reqwest::Client;
use serde::Serialize;

/// One attempt per call against the SendGrid v3 mail-send API.
#[derive(Debug, Clone)]
pub struct SendGridSender {
    client: Client,
    endpoint: String,
}

#[derive(Serialize)]
struct MailSend<'a> {
    personalizations: [Personalization<'a>; 1],
    from: Address<'a>,
    subject: &'a str,
    content: [Content<'a>; 2],
}

#[derive(Serialize)]
struct Personalization<'a> {
    to: [Address<'a>; 1],
}

#[derive(Serialize)]
struct Address<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    value: &'a str,
}

impl<'a> From<&'a EmailMessage> for MailSend<'a> {
    fn from(message: &'a EmailMessage) -> Self {
        // text/plain has to come before text/html
        Self {
            personalizations: [Personalization {
                to: [Address { email: &message.to }],
            }],
            from: Address {
                email: &message.from,
            },
            subject: &message.subject,
            content: [
                Content {
                    kind: "text/plain",
                    value: &message.text,
                },
                Content {
                    kind: "text/html",
                    value: &message.html,
                },
            ],
        }
    }
}

impl SendGridSender {
    pub fn new(config: &EmailConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            secret_header("email.api_key", &format!("Bearer {}", config.api_key))?,
        );

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            endpoint: format!("{}/v3/mail/send", config.api_base.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl EmailSender for SendGridSender {
    async fn send(&self, message: &EmailMessage) -> Result<()> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&MailSend::from(message))
            .send()
            .await?;

        let status = response.status();
        tracing::debug!(
            "SendGrid response: {} (message id {:?})",
            status,
            response.headers().get("x-message-id")
        );
        if status.is_success() {
            return Ok(());
        }

        let raw = response.text().await?;
        let body = match serde_json::from_str::<serde_json::Value>(&raw) {
            Ok(json) => serde_json::to_string_pretty(&json)?,
            Err(_) => raw,
        };

        Err(IntakeError::DeliveryError {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn config(api_base: String) -> EmailConfig {
        EmailConfig {
            api_key: "SG.test".to_string(),
            api_base,
            sender: "russ@instantask.co".to_string(),
            owner: "russ@instantask.co".to_string(),
            company: "Instantask".to_string(),
            pricing_url: "https://instantask.co/pricing".to_string(),
            contact_phone: "(123) 456-7890".to_string(),
            max_retries: 2,
            retry_delay_seconds: 10,
        }
    }

    fn message() -> EmailMessage {
        EmailMessage {
            from: "russ@instantask.co".to_string(),
            to: "jane@x.com".to_string(),
            subject: "Thank You for Reaching Out to Instantask!".to_string(),
            text: "Hello Jane,".to_string(),
            html: "<h2>Hello Jane,</h2>".to_string(),
        }
    }

    #[tokio::test]
    async fn test_send_posts_v3_payload() {
        let server = MockServer::start_async().await;
        let send_mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v3/mail/send")
                    .header("authorization", "Bearer SG.test")
                    .json_body(json!({
                        "personalizations": [{"to": [{"email": "jane@x.com"}]}],
                        "from": {"email": "russ@instantask.co"},
                        "subject": "Thank You for Reaching Out to Instantask!",
                        "content": [
                            {"type": "text/plain", "value": "Hello Jane,"},
                            {"type": "text/html", "value": "<h2>Hello Jane,</h2>"}
                        ]
                    }));
                then.status(202);
            })
            .await;

        let sender = SendGridSender::new(&config(server.base_url())).unwrap();
        sender.send(&message()).await.unwrap();

        send_mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_rejection_carries_status_and_pretty_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v3/mail/send");
                then.status(403).json_body(json!({
                    "errors": [{
                        "message": "The from address does not match a verified Sender Identity.",
                        "field": "from",
                        "help": null
                    }]
                }));
            })
            .await;

        let sender = SendGridSender::new(&config(server.base_url())).unwrap();
        let err = sender.send(&message()).await.unwrap_err();

        match err {
            IntakeError::DeliveryError { status, body } => {
                assert_eq!(status, 403);
                assert!(body.contains("verified Sender Identity"));
                assert!(body.contains('\n'));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_malformed_api_key_is_config_error() {
        let mut config = config("https://api.sendgrid.com".to_string());
        config.api_key = "SG.\u{7f}bad".to_string();
        assert!(matches!(
            SendGridSender::new(&config),
            Err(IntakeError::InvalidConfigValueError { .. })
        ));
    }
}
