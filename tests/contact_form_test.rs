use httpmock::prelude::*;
use prospect_intake::{ContactForm, FormFields, FormStatus};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn jane() -> FormFields {
    FormFields {
        name: "Jane".to_string(),
        email: "jane@x.com".to_string(),
        phone: "555-1111".to_string(),
    }
}

#[tokio::test]
async fn test_successful_submit_clears_fields() {
    let server = MockServer::start_async().await;
    let submit_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/submit")
                .json_body(json!({"name": "Jane", "email": "jane@x.com", "phone": "555-1111"}));
            then.status(200)
                .json_body(json!({"message": "Prospect saved and emails sent successfully"}));
        })
        .await;

    let form = ContactForm::new(server.url("/api/submit"), "russ@instantask.co");
    let mut fields = jane();

    let status = form.submit(&mut fields).await.unwrap();

    submit_mock.assert_async().await;
    assert!(!status.is_error());
    assert_eq!(
        status.text(),
        "Success! Your information has been submitted. We’ll be in touch shortly."
    );
    assert_eq!(fields, FormFields::default());
}

#[tokio::test]
async fn test_partial_delivery_renders_failed_channels_and_keeps_fields() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/submit");
            then.status(500).json_body(json!({
                "message": "Prospect saved, but some emails failed",
                "errors": {"autoresponder": "Sent", "notification": "status 400"}
            }));
        })
        .await;

    let form = ContactForm::new(server.url("/api/submit"), "russ@instantask.co");
    let mut fields = jane();

    let status = form.submit(&mut fields).await.unwrap();

    assert_eq!(
        status,
        FormStatus::Failed(
            "Oops! Failed to send notification email(s). Please try again or contact russ@instantask.co."
                .to_string()
        )
    );
    assert_eq!(fields, jane());
}

#[tokio::test]
async fn test_busy_reply_asks_to_wait() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/submit");
            then.status(429)
                .json_body(json!({"error": "Please wait before submitting again"}));
        })
        .await;

    let form = ContactForm::new(server.url("/api/submit"), "hello@example.com");
    let status = form.submit(&mut jane()).await.unwrap();

    assert!(status.is_error());
    assert_eq!(
        status.to_string(),
        "Oops! Please wait a few seconds before resubmitting. Please try again or contact hello@example.com."
    );
}

#[tokio::test]
async fn test_second_submit_while_in_flight_sends_nothing() {
    let server = MockServer::start_async().await;
    let submit_mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/submit");
            then.status(200)
                .delay(Duration::from_secs(2))
                .json_body(json!({"message": "Prospect saved and emails sent successfully"}));
        })
        .await;

    let form = Arc::new(ContactForm::new(server.url("/api/submit"), "russ@instantask.co"));

    let in_flight = form.clone();
    let first = tokio::spawn(async move { in_flight.submit(&mut jane()).await });
    while !form.is_submitting() {
        tokio::task::yield_now().await;
    }

    assert!(form.submit(&mut jane()).await.is_none());

    let first_status = first.await.unwrap().unwrap();
    assert!(!first_status.is_error());
    submit_mock.assert_hits_async(1).await;
}

#[tokio::test]
async fn test_unreachable_endpoint_is_reported() {
    let form = ContactForm::new("http://127.0.0.1:9/api/submit", "russ@instantask.co");
    let status = form.submit(&mut jane()).await.unwrap();

    assert!(status.is_error());
    assert!(status.text().starts_with("Oops! "));
    assert!(status.text().ends_with("Please try again or contact russ@instantask.co."));
}
