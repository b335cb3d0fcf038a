use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt;

use auth_cell::router::auth_routes;
use shared_utils::test_utils::{JwtTestUtils, TestConfig, TestUser};

fn signup_body(email: &str) -> Body {
    Body::from(
        json!({
            "first_name": "Juan",
            "last_name": "Dela Cruz",
            "email": email,
            "password": "a-long-enough-password"
        })
        .to_string(),
    )
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn signup_returns_created_with_token_and_no_password_hash() {
    let ctx = TestConfig::default().to_context();
    let app = auth_routes(ctx);

    let request = Request::builder()
        .method("POST")
        .uri("/signup")
        .header("content-type", "application/json")
        .body(signup_body("juan@example.com"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert!(json.get("token").is_some());
    assert_eq!(json["user"]["email"], "juan@example.com");
    assert_eq!(json["user"]["role"], "patient");
    assert!(json["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn login_round_trip_through_the_router() {
    let ctx = TestConfig::default().to_context();
    let app = auth_routes(ctx);

    let signup = Request::builder()
        .method("POST")
        .uri("/signup")
        .header("content-type", "application/json")
        .body(signup_body("maria@example.com"))
        .unwrap();
    assert_eq!(
        app.clone().oneshot(signup).await.unwrap().status(),
        StatusCode::CREATED
    );

    let login = Request::builder()
        .method("POST")
        .uri("/login")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "email": "maria@example.com",
                "password": "a-long-enough-password"
            })
            .to_string(),
        ))
        .unwrap();

    let response = app.oneshot(login).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["user"]["email"], "maria@example.com");
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let ctx = TestConfig::default().to_context();
    let app = auth_routes(ctx);

    let signup = Request::builder()
        .method("POST")
        .uri("/signup")
        .header("content-type", "application/json")
        .body(signup_body("maria@example.com"))
        .unwrap();
    app.clone().oneshot(signup).await.unwrap();

    let login = Request::builder()
        .method("POST")
        .uri("/login")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "email": "maria@example.com",
                "password": "not the password"
            })
            .to_string(),
        ))
        .unwrap();

    let response = app.oneshot(login).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn validate_echoes_claims_for_a_good_token() {
    let config = TestConfig::default();
    let ctx = config.to_context();
    let app = auth_routes(ctx);

    let user = TestUser::nurse("nurse@example.com");
    let token = JwtTestUtils::create_test_token(&user, &config.jwt_secret, Some(1));

    let request = Request::builder()
        .method("GET")
        .uri("/validate")
        .header("Authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["valid"], true);
    assert_eq!(json["user_id"], user.id.to_string());
    assert_eq!(json["role"], "nurse");
}

#[tokio::test]
async fn validate_rejects_missing_and_bad_tokens() {
    let config = TestConfig::default();
    let ctx = config.to_context();
    let app = auth_routes(ctx);

    let missing = Request::builder()
        .method("GET")
        .uri("/validate")
        .body(Body::empty())
        .unwrap();
    assert_eq!(
        app.clone().oneshot(missing).await.unwrap().status(),
        StatusCode::UNAUTHORIZED
    );

    let user = TestUser::default();
    let forged = JwtTestUtils::create_invalid_signature_token(&user);
    let bad = Request::builder()
        .method("GET")
        .uri("/validate")
        .header("Authorization", format!("Bearer {}", forged))
        .body(Body::empty())
        .unwrap();
    assert_eq!(
        app.oneshot(bad).await.unwrap().status(),
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn duplicate_signup_is_a_validation_error() {
    let ctx = TestConfig::default().to_context();
    let app = auth_routes(ctx);

    let first = Request::builder()
        .method("POST")
        .uri("/signup")
        .header("content-type", "application/json")
        .body(signup_body("juan@example.com"))
        .unwrap();
    app.clone().oneshot(first).await.unwrap();

    let second = Request::builder()
        .method("POST")
        .uri("/signup")
        .header("content-type", "application/json")
        .body(signup_body("juan@example.com"))
        .unwrap();

    let response = app.oneshot(second).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "An account with this email already exists");
}
