//! Sign-in flow and session handling.

use crate::mock_server::{task_json, MockServerFixture};
use mockito::Matcher;
use serde_json::json;
use taskboard_client::types::{Credentials, SignupRequest};

fn signin_body(token: Option<&str>) -> String {
    json!({
        "token": token,
        "username": "ada",
        "email": "ada@example.com",
        "roles": ["ROLE_USER"]
    })
    .to_string()
}

#[tokio::test]
async fn test_login_stores_token_for_later_requests() {
    let mut fixture = MockServerFixture::new().await;
    let signin = fixture
        .server
        .mock("POST", "/auth/signin")
        .match_body(Matcher::Json(json!({
            "email": "ada@example.com",
            "password": "hunter2"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(signin_body(Some("jwt-1")))
        .create_async()
        .await;
    let task = fixture
        .server
        .mock("GET", "/tasks/9")
        .match_header("authorization", "Bearer jwt-1")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(task_json(9, "Mine").to_string())
        .create_async()
        .await;

    let client = fixture.client();
    let resp = client
        .auth()
        .login(&Credentials::new("ada@example.com", "hunter2"))
        .await
        .unwrap();
    assert_eq!(resp.token.as_deref(), Some("jwt-1"));
    assert_eq!(client.session().token().as_deref(), Some("jwt-1"));
    assert_eq!(client.auth().current_user().unwrap().username, "ada");

    client.tasks().get(9).await.unwrap();
    signin.assert_async().await;
    task.assert_async().await;
}

#[tokio::test]
async fn test_login_without_token_keeps_user_only() {
    let mut fixture = MockServerFixture::new().await;
    let _signin = fixture
        .mock_json("POST", "/auth/signin", 200, &signin_body(None))
        .await;

    let client = fixture.client();
    client
        .auth()
        .login(&Credentials::new("ada@example.com", "pw"))
        .await
        .unwrap();

    assert!(client.session().token().is_none());
    assert_eq!(client.session().user().unwrap().email, "ada@example.com");
}

#[tokio::test]
async fn test_rejected_login_is_remote_error() {
    let mut fixture = MockServerFixture::new().await;
    let _signin = fixture
        .mock_error("POST", "/auth/signin", 401, r#"{"message":"Bad credentials"}"#)
        .await;

    let client = fixture.client();
    let err = client
        .auth()
        .login(&Credentials::new("ada@example.com", "wrong"))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert_eq!(err.server_message(), Some("Bad credentials"));
    assert!(client.session().user().is_none());
}

#[tokio::test]
async fn test_register_returns_message() {
    let mut fixture = MockServerFixture::new().await;
    let signup = fixture
        .server
        .mock("POST", "/auth/signup")
        .match_body(Matcher::PartialJson(json!({ "username": "ada" })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message":"User registered successfully!"}"#)
        .create_async()
        .await;

    let resp = fixture
        .client()
        .auth()
        .register(&SignupRequest {
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "hunter2".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(resp.message, "User registered successfully!");
    signup.assert_async().await;
}

#[tokio::test]
async fn test_logout_clears_session() {
    let fixture = MockServerFixture::new().await;
    let client = fixture.builder().token("jwt-2").build().unwrap();
    assert!(client.auth().token().is_some());

    client.auth().logout();
    assert!(client.auth().token().is_none());
    assert!(client.auth().current_user().is_none());
}

#[tokio::test]
async fn test_verify_token() {
    let mut fixture = MockServerFixture::new().await;
    let valid = fixture
        .server
        .mock("GET", "/auth/verify")
        .match_header("authorization", "Bearer good")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message":"Token is valid"}"#)
        .create_async()
        .await;
    let odd = fixture
        .server
        .mock("GET", "/auth/verify")
        .match_header("authorization", "Bearer odd")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message":"Token expires soon"}"#)
        .create_async()
        .await;
    let expired = fixture
        .server
        .mock("GET", "/auth/verify")
        .match_header("authorization", "Bearer expired")
        .with_status(401)
        .create_async()
        .await;

    let auth = fixture.client().auth();
    assert!(auth.verify_token("good").await);
    assert!(!auth.verify_token("odd").await);
    assert!(!auth.verify_token("expired").await);

    valid.assert_async().await;
    odd.assert_async().await;
    expired.assert_async().await;
}
