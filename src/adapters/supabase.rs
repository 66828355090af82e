use crate::adapters::secret_header;
use crate::config::intake::StoreConfig;
use crate::core::{ProspectSubmission, RecordStore};
use crate::utils::error::{IntakeError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Client;
use serde::Deserialize;

/// Inserts prospects through the PostgREST endpoint of a hosted Supabase project.
#[derive(Debug, Clone)]
pub struct SupabaseStore {
    client: Client,
    endpoint: String,
}

/// Error body PostgREST returns on a rejected write.
#[derive(Debug, Deserialize)]
struct PostgrestError {
    message: String,
    #[serde(default)]
    code: Option<String>,
}

impl SupabaseStore {
    pub fn new(config: &StoreConfig) -> Result<Self> {
        let key = &config.service_role_key;

        let mut headers = HeaderMap::new();
        headers.insert("apikey", secret_header("store.service_role_key", key)?);
        headers.insert(
            AUTHORIZATION,
            secret_header("store.service_role_key", &format!("Bearer {}", key))?,
        );
        headers.insert("prefer", HeaderValue::from_static("return=minimal"));

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}/rest/v1/{}",
                config.url.trim_end_matches('/'),
                config.table
            ),
        })
    }
}

#[async_trait]
impl RecordStore for SupabaseStore {
    async fn insert(&self, prospect: &ProspectSubmission) -> Result<()> {
        tracing::debug!("Inserting prospect via {}", self.endpoint);
        let response = self
            .client
            .post(&self.endpoint)
            .json(&[prospect])
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Store response status: {}", status);
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await?;
        let message = match serde_json::from_str::<PostgrestError>(&body) {
            Ok(err) => {
                tracing::error!(
                    "Store insert error (code {}): {}",
                    err.code.as_deref().unwrap_or("none"),
                    err.message
                );
                err.message
            }
            Err(_) => format!("{}: {}", status, body),
        };

        Err(IntakeError::StoreError { message })
    }
}
