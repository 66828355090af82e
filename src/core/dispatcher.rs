use crate::domain::model::EmailMessage;
use crate::domain::ports::EmailSender;
use crate::utils::error::Result;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts after the first one.
    pub max_retries: u32,
    /// Fixed pause between attempts.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            delay: Duration::from_secs(10),
        }
    }
}

/// Wraps an [`EmailSender`] with a flat retry loop: no backoff, no jitter.
pub struct RetryingDispatcher<E: EmailSender> {
    sender: E,
    policy: RetryPolicy,
}

impl<E: EmailSender> RetryingDispatcher<E> {
    pub fn new(sender: E, policy: RetryPolicy) -> Self {
        Self { sender, policy }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Sends `message`, returning the error of the final attempt if all fail.
    pub async fn dispatch(&self, message: &EmailMessage) -> Result<()> {
        let mut attempt = 0;
        loop {
            match self.sender.send(message).await {
                Ok(()) => {
                    tracing::debug!("Email '{}' accepted for {}", message.subject, message.to);
                    return Ok(());
                }
                Err(e) if attempt >= self.policy.max_retries => return Err(e),
                Err(e) => {
                    attempt += 1;
                    tracing::warn!("Email send to {} failed: {}", message.to, e);
                    tracing::info!(
                        "Retrying email send ({}/{})...",
                        attempt,
                        self.policy.max_retries
                    );
                    tokio::time::sleep(self.policy.delay).await;
                }
            }
        }
    }
}
