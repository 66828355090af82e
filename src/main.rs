use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use clap::Parser;
use prospect_intake::config::cli::Command;
use prospect_intake::config::intake::ServerConfig;
use prospect_intake::server;
use prospect_intake::utils::{logger, validation::Validate};
use prospect_intake::{
    CliConfig, ContactForm, FormFields, IntakeConfig, SendGridSender, SubmissionHandler,
    SupabaseStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_logger(cli.verbose, logger::LogFormat::from_flag(cli.json_logs));

    match cli.command {
        Command::Serve { config, host, port } => run_server(config, host, port).await,
        Command::Submit {
            endpoint,
            name,
            email,
            phone,
            contact,
        } => run_submit(endpoint, FormFields { name, email, phone }, contact).await,
    }
}

async fn run_server(
    config_path: Option<PathBuf>,
    host: Option<String>,
    port: Option<u16>,
) -> anyhow::Result<()> {
    tracing::info!("Starting prospect-intake server");

    let loaded = match &config_path {
        Some(path) => {
            tracing::info!("Loading configuration from {}", path.display());
            IntakeConfig::from_file(path)
        }
        None => IntakeConfig::from_env(),
    }
    .and_then(|config| config.validate().map(|_| config));

    let mut settings = loaded
        .as_ref()
        .map(|config| config.server.clone())
        .unwrap_or_else(|_| {
            ServerConfig::from_env().unwrap_or_else(|e| {
                tracing::warn!("{}; using default listen address", e);
                ServerConfig::default()
            })
        });
    if let Some(host) = host {
        settings.host = host;
    }
    if let Some(port) = port {
        settings.port = port;
    }

    // 配置錯誤時不退出，改為對每個請求回應 503
    let app = match loaded.and_then(|config| build_app(&config, &settings.route)) {
        Ok(app) => app,
        Err(e) => {
            tracing::error!("❌ Configuration error: {}", e);
            tracing::warn!("Submissions will be rejected until the configuration is fixed");
            server::not_configured_router(&settings.route, e.to_string())
        }
    };

    let listener = server::bind(&settings.bind_address()).await?;
    server::serve(listener, app, server::shutdown_signal()).await?;

    Ok(())
}

fn build_app(config: &IntakeConfig, route: &str) -> prospect_intake::Result<Router> {
    let store = SupabaseStore::new(&config.store)?;
    let sender = SendGridSender::new(&config.email)?;

    let handler = SubmissionHandler::new(store, sender, config.retry_policy(), config.templates()?);
    let policy = handler.retry_policy();
    tracing::info!(
        "Email retries: {} (every {:?}), prospects table: {}",
        policy.max_retries,
        policy.delay,
        config.store.table
    );

    Ok(server::router(Arc::new(handler), route))
}

async fn run_submit(endpoint: String, mut fields: FormFields, contact: String) -> anyhow::Result<()> {
    let form = ContactForm::new(endpoint, contact);

    match form.submit(&mut fields).await {
        Some(status) if status.is_error() => {
            eprintln!("❌ {}", status);
            std::process::exit(1);
        }
        Some(status) => println!("✅ {}", status),
        None => tracing::warn!("A submission is already in progress"),
    }

    Ok(())
}
