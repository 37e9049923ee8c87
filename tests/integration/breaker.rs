//! Circuit breaking on the task endpoints, end to end.

use crate::mock_server::{task_json, MockServerFixture};
use std::time::Duration;
use taskboard_client::api::service_ids;
use taskboard_client::{CircuitState, Error, PageRequest, TaskDraft};

const BOOM: &str = r#"{"message":"boom"}"#;

#[tokio::test]
async fn test_fourth_call_short_circuits_without_reaching_server() {
    let mut fixture = MockServerFixture::new().await;
    let failing = fixture
        .mock_error_times("GET", "/tasks", 500, BOOM, 3)
        .await;

    let client = fixture.client();
    let tasks = client.tasks();

    for _ in 0..3 {
        let err = tasks.list(PageRequest::default()).await.unwrap_err();
        assert_eq!(err.server_message(), Some("boom"));
        assert_eq!(err.status(), Some(500));
    }

    let err = tasks.list(PageRequest::default()).await.unwrap_err();
    assert!(err.is_circuit_open());
    assert_eq!(
        err.to_string(),
        "Service task-list-fetch is unavailable - circuit breaker is open"
    );

    failing.assert_async().await;
    assert_eq!(
        client.breaker().state(service_ids::TASK_LIST_FETCH),
        CircuitState::Open
    );
}

#[tokio::test]
async fn test_operations_are_isolated() {
    let mut fixture = MockServerFixture::new().await;
    let _failing = fixture.mock_error("GET", "/tasks", 503, BOOM).await;
    let single = fixture
        .mock_json("GET", "/tasks/1", 200, &task_json(1, "Still here").to_string())
        .await;

    let tasks = fixture.client().tasks();
    for _ in 0..3 {
        tasks.list(PageRequest::default()).await.unwrap_err();
    }
    assert!(tasks
        .list(PageRequest::default())
        .await
        .unwrap_err()
        .is_circuit_open());

    let task = tasks.get(1).await.unwrap();
    assert_eq!(task.title, "Still here");
    single.assert_async().await;

    let snapshots = tasks.breaker().snapshots();
    let ids: Vec<_> = snapshots.iter().map(|s| s.service_id.as_str()).collect();
    assert_eq!(ids, vec![service_ids::TASK_FETCH, service_ids::TASK_LIST_FETCH]);
    assert_eq!(snapshots[0].state, CircuitState::Closed);
    assert_eq!(snapshots[1].state, CircuitState::Open);
}

#[tokio::test]
async fn test_probe_after_reset_timeout_closes_circuit() {
    let mut fixture = MockServerFixture::new().await;
    let failing = fixture.mock_error("POST", "/tasks", 500, BOOM).await;

    let client = fixture.client_with_reset(Duration::from_millis(100));
    let tasks = client.tasks();
    let draft = TaskDraft::new("Retry me");
    for _ in 0..3 {
        tasks.create(&draft).await.unwrap_err();
    }
    assert!(matches!(
        tasks.create(&draft).await,
        Err(Error::CircuitOpen(_))
    ));

    failing.remove_async().await;
    let healthy = fixture
        .mock_json("POST", "/tasks", 201, &task_json(2, "Retry me").to_string())
        .await;

    tokio::time::sleep(Duration::from_millis(150)).await;
    let task = tasks.create(&draft).await.unwrap();
    assert_eq!(task.id, 2);
    healthy.assert_async().await;

    let breaker = client.breaker();
    assert_eq!(breaker.state(service_ids::TASK_CREATE), CircuitState::Closed);
    assert_eq!(breaker.failure_count(service_ids::TASK_CREATE), 0);
}

#[tokio::test]
async fn test_projects_bypass_breaker() {
    let mut fixture = MockServerFixture::new().await;
    let failing = fixture
        .mock_error_times("GET", "/projects", 500, BOOM, 5)
        .await;

    let client = fixture.client();
    for _ in 0..5 {
        let err = client
            .projects()
            .list(PageRequest::default())
            .await
            .unwrap_err();
        assert!(!err.is_circuit_open());
    }
    failing.assert_async().await;
    assert!(client.breaker().is_empty());
}
