use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::Router;
use snapshooting_notify::{Notifier, NotifyError, Severity, SlackNotifier};

type Captured = Arc<Mutex<Vec<String>>>;

/// Helper: serve a fake webhook that records payloads and answers `status`.
async fn spawn_webhook(status: StatusCode) -> (String, Captured) {
    let captured: Captured = Arc::new(Mutex::new(Vec::new()));

    let app = Router::new()
        .route(
            "/hook",
            post(
                move |State(captured): State<Captured>,
                      Form(form): Form<HashMap<String, String>>| async move {
                    if let Some(payload) = form.get("payload") {
                        captured.lock().unwrap().push(payload.clone());
                    }
                    (status, "invalid_payload")
                },
            ),
        )
        .with_state(captured.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/hook", addr), captured)
}

#[tokio::test]
async fn test_notify_posts_payload_form() {
    let (url, captured) = spawn_webhook(StatusCode::OK).await;
    let notifier = SlackNotifier::new(url).unwrap();

    notifier
        .notify(Severity::Good, "[notes] Snapshot executed", "looks good :)")
        .await
        .unwrap();

    let payloads = captured.lock().unwrap();
    assert_eq!(payloads.len(), 1);
    let value: serde_json::Value = serde_json::from_str(&payloads[0]).unwrap();
    assert_eq!(value["attachments"][0]["color"], "good");
    assert_eq!(
        value["attachments"][0]["text"],
        "*[notes] Snapshot executed* \n looks good :)"
    );
}

#[tokio::test]
async fn test_notify_non_200_is_error() {
    let (url, _captured) = spawn_webhook(StatusCode::BAD_REQUEST).await;
    let notifier = SlackNotifier::new(url).unwrap();

    let result = notifier.notify(Severity::Danger, "title", "body").await;

    match result {
        Err(NotifyError::Rejected { status, body }) => {
            assert_eq!(status, 400);
            assert_eq!(body, "invalid_payload");
        }
        other => panic!("expected Rejected, got {:?}", other),
    }
}

#[tokio::test]
async fn test_notify_unreachable_is_http_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let notifier = SlackNotifier::new(format!("http://{}/hook", addr)).unwrap();
    let result = notifier.notify(Severity::Warning, "title", "body").await;

    assert!(matches!(result, Err(NotifyError::Http(_))));
}
