pub mod adapters;
pub mod client;
pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{SendGridSender, SupabaseStore};
pub use client::{ContactForm, FormFields, FormStatus};
pub use config::IntakeConfig;
pub use crate::core::{
    dispatcher::RetryPolicy,
    handler::{SubmissionHandler, SubmissionOutcome},
    templates::{BusinessProfile, EmailTemplates},
};
pub use utils::error::{IntakeError, Result};
