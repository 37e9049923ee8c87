use crate::transport::HttpTransport;
use crate::types::{Page, PageRequest, Project, ProjectDraft};
use crate::Result;
use std::sync::Arc;

/// Project endpoints. These go straight to the transport without a breaker.
#[derive(Clone)]
pub struct ProjectService {
    transport: Arc<HttpTransport>,
}

impl ProjectService {
    pub fn new(transport: Arc<HttpTransport>) -> Self {
        Self { transport }
    }

    pub async fn list(&self, page: PageRequest) -> Result<Page<Project>> {
        self.transport
            .get_json_query("/projects", &page.query())
            .await
    }

    pub async fn get(&self, id: i64) -> Result<Project> {
        self.transport.get_json(&format!("/projects/{}", id)).await
    }

    pub async fn create(&self, draft: &ProjectDraft) -> Result<Project> {
        self.transport.post_json("/projects", draft).await
    }

    pub async fn update(&self, id: i64, draft: &ProjectDraft) -> Result<Project> {
        self.transport
            .put_json(&format!("/projects/{}", id), draft)
            .await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.transport.delete(&format!("/projects/{}", id)).await
    }
}
