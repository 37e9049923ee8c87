//! State containers driven by real service calls.

use crate::mock_server::{task_json, MockServerFixture};
use serde_json::json;
use std::sync::Arc;
use taskboard_client::session::{MemorySessionStore, SessionStore};
use taskboard_client::types::UserProfile;
use taskboard_client::{PageRequest, TaskDraft};

#[tokio::test]
async fn test_task_store_tracks_list_and_create() {
    let mut fixture = MockServerFixture::new().await;
    let body = json!({
        "content": [task_json(1, "First")],
        "totalPages": 1,
        "totalElements": 1,
        "pageable": { "pageNumber": 0, "pageSize": 10 }
    });
    let _list = fixture.mock_page("/tasks", 0, 10, &body.to_string()).await;
    let _create = fixture
        .mock_json("POST", "/tasks", 201, &task_json(2, "Second").to_string())
        .await;

    let store = fixture.client().task_store();
    store.fetch_tasks(PageRequest::default()).await.unwrap();
    store.create_task(&TaskDraft::new("Second")).await.unwrap();

    let state = store.state();
    assert!(!state.loading);
    assert!(state.error.is_none());
    let ids: Vec<_> = state.tasks.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![2, 1]);
    assert_eq!(state.page_info.total_elements, 1);
}

#[tokio::test]
async fn test_task_store_records_server_message() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_error("GET", "/tasks/77", 404, r#"{"message":"Task not found with id: 77"}"#)
        .await;

    let store = fixture.client().task_store();
    assert!(store.fetch_task(77).await.is_err());

    let state = store.state();
    assert!(!state.loading);
    assert_eq!(state.error.as_deref(), Some("Task not found with id: 77"));

    store.clear_error();
    assert!(store.state().error.is_none());
}

#[tokio::test]
async fn test_task_store_uses_fallback_when_circuit_open() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture.mock_error("DELETE", "/tasks/5", 500, "").await;

    let store = fixture.client().task_store();
    for _ in 0..3 {
        store.delete_task(5).await.unwrap_err();
        assert_eq!(store.state().error.as_deref(), Some("Failed to delete task"));
    }

    let err = store.delete_task(5).await.unwrap_err();
    assert!(err.is_circuit_open());
    assert_eq!(store.state().error.as_deref(), Some("Failed to delete task"));
}

#[tokio::test]
async fn test_project_store_fallback_names_id() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture.mock_error("GET", "/projects/12", 500, "").await;

    let store = fixture.client().project_store();
    store.fetch_project(12).await.unwrap_err();

    assert_eq!(
        store.state().error.as_deref(),
        Some("Failed to fetch project with ID: 12")
    );
}

#[tokio::test]
async fn test_auth_store_restore() {
    let mut fixture = MockServerFixture::new().await;
    let _verify = fixture
        .mock_json("GET", "/auth/verify", 200, r#"{"message":"Token is valid"}"#)
        .await;

    let session = Arc::new(MemorySessionStore::with_token("saved"));
    session.set_user(&UserProfile {
        username: "ada".to_string(),
        email: "ada@example.com".to_string(),
        roles: vec![],
    });
    let client = fixture
        .builder()
        .session_store(session.clone())
        .build()
        .unwrap();

    let store = client.auth_store();
    assert!(store.restore().await);
    let state = store.state();
    assert!(state.is_authenticated);
    assert_eq!(state.user.unwrap().username, "ada");
}

#[tokio::test]
async fn test_auth_store_restore_signs_out_on_rejection() {
    let mut fixture = MockServerFixture::new().await;
    let _verify = fixture.mock_error("GET", "/auth/verify", 401, "").await;

    let client = fixture.builder().token("stale").build().unwrap();
    let store = client.auth_store();
    assert!(store.state().is_authenticated);

    assert!(!store.restore().await);
    assert!(!store.state().is_authenticated);
    assert!(client.session().token().is_none());
}
