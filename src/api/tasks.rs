use crate::resilience::circuit_breaker::CircuitBreakerRegistry;
use crate::transport::HttpTransport;
use crate::types::{Page, PageRequest, Task, TaskDraft, TaskStatus};
use crate::Result;
use std::sync::Arc;

/// Breaker keys used by [`TaskService`], one per logical operation.
pub mod service_ids {
    pub const TASK_LIST_FETCH: &str = "task-list-fetch";
    pub const TASK_FETCH: &str = "task-fetch";
    pub const TASK_PROJECT_FETCH: &str = "task-project-fetch";
    pub const TASK_STATUS_FETCH: &str = "task-status-fetch";
    pub const TASK_CREATE: &str = "task-create";
    pub const TASK_UPDATE: &str = "task-update";
    pub const TASK_DELETE: &str = "task-delete";
}

use service_ids::*;

/// Task endpoints, each call gated by the shared circuit breaker registry.
///
/// A breaker rejection surfaces as [`crate::Error::CircuitOpen`]; every other error is
/// the transport's own, unchanged.
#[derive(Clone)]
pub struct TaskService {
    transport: Arc<HttpTransport>,
    breaker: Arc<CircuitBreakerRegistry>,
}

impl TaskService {
    pub fn new(transport: Arc<HttpTransport>, breaker: Arc<CircuitBreakerRegistry>) -> Self {
        Self { transport, breaker }
    }

    pub fn breaker(&self) -> &Arc<CircuitBreakerRegistry> {
        &self.breaker
    }

    pub async fn list(&self, page: PageRequest) -> Result<Page<Task>> {
        let query = page.query();
        self.breaker
            .call(TASK_LIST_FETCH, || {
                self.transport.get_json_query("/tasks", &query)
            })
            .await
    }

    pub async fn get(&self, id: i64) -> Result<Task> {
        let path = format!("/tasks/{}", id);
        self.breaker
            .call(TASK_FETCH, || self.transport.get_json(&path))
            .await
    }

    pub async fn list_by_project(&self, project_id: i64, page: PageRequest) -> Result<Page<Task>> {
        let path = format!("/tasks/project/{}", project_id);
        let query = page.query();
        self.breaker
            .call(TASK_PROJECT_FETCH, || {
                self.transport.get_json_query(&path, &query)
            })
            .await
    }

    pub async fn list_by_status(&self, status: TaskStatus, page: PageRequest) -> Result<Page<Task>> {
        let path = format!("/tasks/status/{}", status.as_str());
        let query = page.query();
        self.breaker
            .call(TASK_STATUS_FETCH, || {
                self.transport.get_json_query(&path, &query)
            })
            .await
    }

    pub async fn create(&self, draft: &TaskDraft) -> Result<Task> {
        self.breaker
            .call(TASK_CREATE, || self.transport.post_json("/tasks", draft))
            .await
    }

    pub async fn update(&self, id: i64, draft: &TaskDraft) -> Result<Task> {
        let path = format!("/tasks/{}", id);
        self.breaker
            .call(TASK_UPDATE, || self.transport.put_json(&path, draft))
            .await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let path = format!("/tasks/{}", id);
        self.breaker
            .call(TASK_DELETE, || self.transport.delete(&path))
            .await
    }
}
