use std::{future::Future, sync::Arc, time::Duration};

use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::post,
    Router,
};
use tokio::{net::TcpListener, signal};
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer};
use tracing::{error, info};

pub mod routes;

use crate::core::handler::SubmissionHandler;
use crate::core::{EmailSender, RecordStore};
use crate::utils::error::Result;
use routes::{not_configured_handler, panic_response, submit_handler};

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60))
}

/// Router serving the submission endpoint at `route`.
pub fn router<S, E>(handler: Arc<SubmissionHandler<S, E>>, route: &str) -> Router
where
    S: RecordStore + 'static,
    E: EmailSender + 'static,
{
    Router::new()
        .route(route, post(submit_handler::<S, E>))
        .layer(cors_layer())
        .layer(CatchPanicLayer::custom(panic_response))
        .with_state(handler)
}

/// Stand-in router used when credentials are missing or malformed: the process
/// stays up and every submission gets a 503 naming the problem.
pub fn not_configured_router(route: &str, reason: impl Into<String>) -> Router {
    let reason: Arc<str> = Arc::from(reason.into());

    Router::new()
        .route(route, post(not_configured_handler))
        .layer(cors_layer())
        .with_state(reason)
}

pub async fn bind(address: &str) -> Result<TcpListener> {
    info!("Binding to {address}");
    let listener = TcpListener::bind(address).await?;
    Ok(listener)
}

pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(address) = listener.local_addr() {
        info!("Server running on {address}");
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Server shut down");
    Ok(())
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
