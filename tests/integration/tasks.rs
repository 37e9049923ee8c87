//! Task service requests and response handling.

use crate::mock_server::{task_json, MockServerFixture};
use mockito::Matcher;
use serde_json::json;
use taskboard_client::{Error, PageRequest, TaskDraft, TaskPriority, TaskStatus};

#[tokio::test]
async fn test_list_tasks_uses_default_paging() {
    let mut fixture = MockServerFixture::new().await;
    let body = json!({
        "content": [task_json(1, "Task 1"), task_json(2, "Task 2")],
        "totalPages": 3,
        "totalElements": 25,
        "pageable": { "pageNumber": 0, "pageSize": 10 }
    });
    let mock = fixture.mock_page("/tasks", 0, 10, &body.to_string()).await;

    let page = fixture.client().tasks().list(PageRequest::default()).await.unwrap();

    mock.assert_async().await;
    assert_eq!(page.len(), 2);
    assert_eq!(page.items[1].title, "Task 2");
    assert_eq!(page.info.total_pages, 3);
    assert_eq!(page.info.total_elements, 25);
}

#[tokio::test]
async fn test_list_tasks_custom_paging_plain_array() {
    let mut fixture = MockServerFixture::new().await;
    let body = json!([task_json(7, "Only")]);
    let mock = fixture.mock_page("/tasks", 2, 20, &body.to_string()).await;

    let page = fixture
        .client()
        .tasks()
        .list(PageRequest::new(2, 20))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(page.items[0].id, 7);
    assert_eq!(page.info.total_pages, 1);
    assert_eq!(page.info.total_elements, 1);
}

#[tokio::test]
async fn test_get_task_by_id() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_json("GET", "/tasks/1", 200, &task_json(1, "Task 1").to_string())
        .await;

    let task = fixture.client().tasks().get(1).await.unwrap();

    mock.assert_async().await;
    assert_eq!(task.id, 1);
    assert_eq!(task.status, TaskStatus::Todo);
}

#[tokio::test]
async fn test_filtered_listings() {
    let mut fixture = MockServerFixture::new().await;
    let by_project = fixture.mock_page("/tasks/project/4", 0, 10, "[]").await;
    let by_status = fixture
        .mock_page("/tasks/status/IN_PROGRESS", 1, 5, "[]")
        .await;

    let tasks = fixture.client().tasks();
    let page = tasks
        .list_by_project(4, PageRequest::default())
        .await
        .unwrap();
    assert!(page.is_empty());
    tasks
        .list_by_status(TaskStatus::InProgress, PageRequest::new(1, 5))
        .await
        .unwrap();

    by_project.assert_async().await;
    by_status.assert_async().await;
}

#[tokio::test]
async fn test_create_and_update_send_draft() {
    let mut fixture = MockServerFixture::new().await;
    let draft = TaskDraft::new("New Task")
        .with_description("Description")
        .with_priority(TaskPriority::High);

    let mut created = task_json(11, "New Task");
    created["priority"] = json!("HIGH");
    let create = fixture
        .server
        .mock("POST", "/tasks")
        .match_body(Matcher::Json(json!({
            "title": "New Task",
            "description": "Description",
            "status": "TODO",
            "priority": "HIGH",
            "dueDate": null,
            "projectId": null
        })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(created.to_string())
        .create_async()
        .await;

    let update = fixture
        .server
        .mock("PUT", "/tasks/11")
        .match_body(Matcher::PartialJson(json!({ "status": "IN_PROGRESS" })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({ "id": 11, "title": "New Task", "status": "IN_PROGRESS", "priority": "HIGH" })
                .to_string(),
        )
        .create_async()
        .await;

    let tasks = fixture.client().tasks();
    let task = tasks.create(&draft).await.unwrap();
    assert_eq!(task.id, 11);
    assert_eq!(task.priority, TaskPriority::High);

    let updated = tasks
        .update(11, &TaskDraft::from(&task).with_status(TaskStatus::InProgress))
        .await
        .unwrap();
    assert_eq!(updated.status, TaskStatus::InProgress);

    create.assert_async().await;
    update.assert_async().await;
}

#[tokio::test]
async fn test_delete_accepts_empty_body() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("DELETE", "/tasks/3")
        .with_status(204)
        .create_async()
        .await;

    fixture.client().tasks().delete(3).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_bearer_token_is_attached() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("GET", "/tasks/5")
        .match_header("authorization", "Bearer t0k")
        .match_header("x-request-id", Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(task_json(5, "Secured").to_string())
        .create_async()
        .await;

    let client = fixture.builder().token("t0k").build().unwrap();
    client.tasks().get(5).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_remote_error_carries_server_message() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_error("GET", "/tasks/404", 404, r#"{"message":"Task not found with id: 404"}"#)
        .await;

    let err = fixture.client().tasks().get(404).await.unwrap_err();
    assert!(matches!(err, Error::Remote { status: 404, .. }));
    assert_eq!(err.server_message(), Some("Task not found with id: 404"));
    assert!(!err.is_circuit_open());
}

#[tokio::test]
async fn test_malformed_body_is_serialization_error() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_json("GET", "/tasks/8", 200, r#"{"id":"eight"}"#)
        .await;

    let err = fixture.client().tasks().get(8).await.unwrap_err();
    assert!(matches!(err, Error::Serialization(_)));
}
