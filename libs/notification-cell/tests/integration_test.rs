use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt;

use notification_cell::router::notification_routes;
use notification_cell::services::dispatcher::NotificationDispatcher;
use shared_models::records::NotificationKind;
use shared_utils::test_utils::{JwtTestUtils, TestConfig, TestUser};

struct TestApp {
    config: TestConfig,
    ctx: std::sync::Arc<shared_store::AppContext>,
    app: axum::Router,
}

fn setup() -> TestApp {
    let config = TestConfig::default();
    let ctx = config.to_context();
    let app = notification_routes(ctx.clone());
    TestApp { config, ctx, app }
}

fn bearer(config: &TestConfig, user: &TestUser) -> String {
    format!(
        "Bearer {}",
        JwtTestUtils::create_test_token(user, &config.jwt_secret, Some(1))
    )
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn admin_and_user_feeds_are_separate() {
    let t = setup();
    let admin = TestUser::admin("admin@example.com");
    let patient = TestUser::patient("maria@example.com");

    let dispatcher = NotificationDispatcher::new(t.ctx.clone());
    dispatcher
        .notify_admins("New appointment request", NotificationKind::Appointment)
        .await;
    dispatcher
        .notify_user(patient.id, "Your appointment has been approved", NotificationKind::Appointment)
        .await;

    let admin_feed = Request::builder()
        .method("GET")
        .uri("/")
        .header("Authorization", bearer(&t.config, &admin))
        .body(Body::empty())
        .unwrap();
    let json = body_json(t.app.clone().oneshot(admin_feed).await.unwrap()).await;
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["message"], "New appointment request");

    let patient_feed = Request::builder()
        .method("GET")
        .uri("/")
        .header("Authorization", bearer(&t.config, &patient))
        .body(Body::empty())
        .unwrap();
    let json = body_json(t.app.oneshot(patient_feed).await.unwrap()).await;
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["message"], "Your appointment has been approved");
}

#[tokio::test]
async fn unread_count_drops_after_marking_read() {
    let t = setup();
    let patient = TestUser::patient("maria@example.com");

    let dispatcher = NotificationDispatcher::new(t.ctx.clone());
    dispatcher
        .notify_user(patient.id, "First", NotificationKind::System)
        .await;
    dispatcher
        .notify_user(patient.id, "Second", NotificationKind::System)
        .await;

    let count = Request::builder()
        .method("GET")
        .uri("/unread-count")
        .header("Authorization", bearer(&t.config, &patient))
        .body(Body::empty())
        .unwrap();
    let json = body_json(t.app.clone().oneshot(count).await.unwrap()).await;
    assert_eq!(json["unread_count"], 2);

    let feed = Request::builder()
        .method("GET")
        .uri("/")
        .header("Authorization", bearer(&t.config, &patient))
        .body(Body::empty())
        .unwrap();
    let feed = body_json(t.app.clone().oneshot(feed).await.unwrap()).await;
    let first_id = feed[0]["id"].as_str().unwrap();

    let mark = Request::builder()
        .method("PATCH")
        .uri(format!("/{}/read", first_id))
        .header("Authorization", bearer(&t.config, &patient))
        .body(Body::empty())
        .unwrap();
    assert_eq!(
        t.app.clone().oneshot(mark).await.unwrap().status(),
        StatusCode::OK
    );

    let count = Request::builder()
        .method("GET")
        .uri("/unread-count")
        .header("Authorization", bearer(&t.config, &patient))
        .body(Body::empty())
        .unwrap();
    let json = body_json(t.app.clone().oneshot(count).await.unwrap()).await;
    assert_eq!(json["unread_count"], 1);

    let mark_all = Request::builder()
        .method("PATCH")
        .uri("/read-all")
        .header("Authorization", bearer(&t.config, &patient))
        .body(Body::empty())
        .unwrap();
    t.app.clone().oneshot(mark_all).await.unwrap();

    let count = Request::builder()
        .method("GET")
        .uri("/unread-count")
        .header("Authorization", bearer(&t.config, &patient))
        .body(Body::empty())
        .unwrap();
    let json = body_json(t.app.oneshot(count).await.unwrap()).await;
    assert_eq!(json["unread_count"], 0);
}

#[tokio::test]
async fn patients_cannot_publish_notifications() {
    let t = setup();
    let patient = TestUser::patient("maria@example.com");

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .header("Authorization", bearer(&t.config, &patient))
        .body(Body::from(
            json!({
                "user_id": null,
                "recipient": "admin",
                "message": "Should not land"
            })
            .to_string(),
        ))
        .unwrap();

    assert_eq!(
        t.app.oneshot(request).await.unwrap().status(),
        StatusCode::FORBIDDEN
    );
}

#[tokio::test]
async fn staff_can_publish_and_blank_messages_are_rejected() {
    let t = setup();
    let nurse = TestUser::nurse("nurse@example.com");

    let blank = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .header("Authorization", bearer(&t.config, &nurse))
        .body(Body::from(
            json!({
                "user_id": null,
                "recipient": "admin",
                "message": "   "
            })
            .to_string(),
        ))
        .unwrap();
    assert_eq!(
        t.app.clone().oneshot(blank).await.unwrap().status(),
        StatusCode::BAD_REQUEST
    );

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .header("Authorization", bearer(&t.config, &nurse))
        .body(Body::from(
            json!({
                "user_id": null,
                "recipient": "admin",
                "message": "Paracetamol stock is running low",
                "kind": "inventory"
            })
            .to_string(),
        ))
        .unwrap();
    let response = t.app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["notification"]["kind"], "inventory");
    assert_eq!(json["notification"]["read"], false);
}

#[tokio::test]
async fn requests_without_a_token_are_unauthorized() {
    let t = setup();

    let request = Request::builder()
        .method("GET")
        .uri("/")
        .body(Body::empty())
        .unwrap();
    assert_eq!(
        t.app.oneshot(request).await.unwrap().status(),
        StatusCode::UNAUTHORIZED
    );
}
