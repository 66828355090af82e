use crate::core::dispatcher::RetryPolicy;
use crate::core::templates::{BusinessProfile, EmailTemplates};
use crate::utils::error::{IntakeError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntakeConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub email: EmailConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub route: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            route: "/api/submit".to_string(),
        }
    }
}

impl ServerConfig {
    /// 只讀取 `HOST` / `PORT`，憑證缺失時仍可決定監聽位址
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_or("PORT", &lookup, defaults.port)?,
            route: defaults.route,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub url: String,
    pub service_role_key: String,
    #[serde(default = "default_table")]
    pub table: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    pub api_key: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_address")]
    pub sender: String,
    #[serde(default = "default_address")]
    pub owner: String,
    #[serde(default = "default_company")]
    pub company: String,
    #[serde(default = "default_pricing_url")]
    pub pricing_url: String,
    #[serde(default = "default_contact_phone")]
    pub contact_phone: String,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_retry_delay_seconds")]
    pub retry_delay_seconds: u64,
}

fn default_table() -> String {
    "prospects".to_string()
}

fn default_api_base() -> String {
    "https://api.sendgrid.com".to_string()
}

fn default_address() -> String {
    BusinessProfile::default().sender
}

fn default_company() -> String {
    BusinessProfile::default().company
}

fn default_pricing_url() -> String {
    BusinessProfile::default().pricing_url
}

fn default_contact_phone() -> String {
    BusinessProfile::default().contact_phone
}

fn default_max_retries() -> u32 {
    RetryPolicy::default().max_retries
}

fn default_retry_delay_seconds() -> u64 {
    RetryPolicy::default().delay.as_secs()
}

impl IntakeConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(IntakeError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置，`${VAR}` 以環境變數替換
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Self::from_toml_str_with(content, |key| std::env::var(key).ok())
    }

    pub fn from_toml_str_with<F>(content: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let processed_content = substitute_vars(content, &lookup)?;

        toml::from_str(&processed_content).map_err(|e| IntakeError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 從環境變數載入配置
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store = StoreConfig {
            url: validation::validate_required_field("SUPABASE_URL", &lookup("SUPABASE_URL"))?
                .clone(),
            service_role_key: validation::validate_required_field(
                "SUPABASE_SERVICE_ROLE_KEY",
                &lookup("SUPABASE_SERVICE_ROLE_KEY"),
            )?
            .clone(),
            table: lookup("PROSPECT_TABLE").unwrap_or_else(default_table),
        };

        let email = EmailConfig {
            api_key: validation::validate_required_field(
                "SENDGRID_API_KEY",
                &lookup("SENDGRID_API_KEY"),
            )?
            .clone(),
            api_base: lookup("SENDGRID_API_BASE").unwrap_or_else(default_api_base),
            sender: lookup("EMAIL_SENDER").unwrap_or_else(default_address),
            owner: lookup("EMAIL_OWNER").unwrap_or_else(default_address),
            company: default_company(),
            pricing_url: default_pricing_url(),
            contact_phone: default_contact_phone(),
            max_retries: parse_or("EMAIL_MAX_RETRIES", &lookup, default_max_retries())?,
            retry_delay_seconds: parse_or(
                "EMAIL_RETRY_DELAY_SECONDS",
                &lookup,
                default_retry_delay_seconds(),
            )?,
        };

        let server = ServerConfig::from_lookup(&lookup)?;

        Ok(Self {
            server,
            store,
            email,
        })
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.email.max_retries,
            delay: Duration::from_secs(self.email.retry_delay_seconds),
        }
    }

    pub fn profile(&self) -> BusinessProfile {
        BusinessProfile {
            sender: self.email.sender.clone(),
            owner: self.email.owner.clone(),
            company: self.email.company.clone(),
            pricing_url: self.email.pricing_url.clone(),
            contact_phone: self.email.contact_phone.clone(),
        }
    }

    pub fn templates(&self) -> Result<EmailTemplates> {
        EmailTemplates::new(self.profile())
    }
}

impl Validate for IntakeConfig {
    fn validate(&self) -> Result<()> {
        use crate::utils::validation::*;

        // 先確認所有 ${VAR} 都已替換
        for (field, value) in [
            ("store.url", &self.store.url),
            ("store.service_role_key", &self.store.service_role_key),
            ("email.api_key", &self.email.api_key),
            ("email.api_base", &self.email.api_base),
        ] {
            validate_resolved(field, value)?;
        }

        validate_url("store.url", &self.store.url)?;
        validate_non_empty_string("store.service_role_key", &self.store.service_role_key)?;
        validate_non_empty_string("store.table", &self.store.table)?;

        validate_non_empty_string("email.api_key", &self.email.api_key)?;
        validate_url("email.api_base", &self.email.api_base)?;
        validate_email_address("email.sender", &self.email.sender)?;
        validate_email_address("email.owner", &self.email.owner)?;
        validate_range("email.max_retries", self.email.max_retries, 0, 10)?;

        if !self.server.route.starts_with('/') {
            return Err(IntakeError::InvalidConfigValueError {
                field: "server.route".to_string(),
                value: self.server.route.clone(),
                reason: "Route must start with '/'".to_string(),
            });
        }

        tracing::info!("✅ Intake configuration validation passed");
        Ok(())
    }
}

fn parse_or<T, F>(key: &str, lookup: &F, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| IntakeError::InvalidConfigValueError {
                field: key.to_string(),
                value: raw.clone(),
                reason: e.to_string(),
            }),
    }
}

/// 替換 `${VAR}`，未設定的變數保留原樣交給驗證處理
fn substitute_vars<F>(content: &str, lookup: &F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| IntakeError::ConfigError {
        message: format!("Invalid placeholder pattern: {}", e),
    })?;

    let result = re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        lookup(var_name).unwrap_or_else(|| format!("${{{}}}", var_name))
    });

    Ok(result.to_string())
}
