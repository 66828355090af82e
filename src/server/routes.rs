use std::any::Any;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::core::handler::{SubmissionHandler, SubmissionOutcome};
use crate::core::{EmailSender, RecordStore, SubmitReply};
use crate::domain::model::{NOT_CONFIGURED_MESSAGE, PROCESSING_FAILED_MESSAGE};

impl IntoResponse for SubmissionOutcome {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (status, Json(self.reply())).into_response()
    }
}

pub async fn submit_handler<S, E>(
    State(handler): State<Arc<SubmissionHandler<S, E>>>,
    body: Bytes,
) -> SubmissionOutcome
where
    S: RecordStore + 'static,
    E: EmailSender + 'static,
{
    handler.handle(&body).await
}

pub async fn not_configured_handler(State(reason): State<Arc<str>>) -> Response {
    tracing::error!("Submission rejected: service is not configured ({})", reason);
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(SubmitReply::error_with_details(
            NOT_CONFIGURED_MESSAGE,
            reason.to_string(),
        )),
    )
        .into_response()
}

/// Turns a panic anywhere below the router into the generic processing failure.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic".to_string()
    };
    tracing::error!("Error processing submission: panic: {}", details);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(SubmitReply::error_with_details(
            PROCESSING_FAILED_MESSAGE,
            details,
        )),
    )
        .into_response()
}
