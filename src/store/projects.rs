use super::failure_message;
use crate::api::ProjectService;
use crate::types::{Page, PageInfo, PageRequest, Project, ProjectDraft};
use crate::Result;
use std::future::Future;
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectState {
    pub projects: Vec<Project>,
    pub project: Option<Project>,
    pub loading: bool,
    pub error: Option<String>,
    pub page_info: PageInfo,
}

impl Default for ProjectState {
    fn default() -> Self {
        Self {
            projects: Vec::new(),
            project: None,
            loading: false,
            error: None,
            page_info: PageInfo {
                page_size: 10,
                ..PageInfo::default()
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProjectAction {
    Request,
    FetchListSuccess(Page<Project>),
    FetchOneSuccess(Project),
    CreateSuccess(Project),
    UpdateSuccess(Project),
    DeleteSuccess(i64),
    Failure(String),
    ClearError,
    ClearCurrent,
}

impl ProjectState {
    pub fn apply(&mut self, action: ProjectAction) {
        match action {
            ProjectAction::Request => {
                self.loading = true;
                self.error = None;
            }
            ProjectAction::FetchListSuccess(page) => {
                self.projects = page.items;
                self.page_info = page.info;
                self.settle();
            }
            ProjectAction::FetchOneSuccess(project) => {
                self.project = Some(project);
                self.settle();
            }
            ProjectAction::CreateSuccess(project) => {
                self.projects.insert(0, project);
                self.settle();
            }
            ProjectAction::UpdateSuccess(project) => {
                if let Some(slot) = self.projects.iter_mut().find(|p| p.id == project.id) {
                    *slot = project.clone();
                }
                if self.project.as_ref().is_some_and(|p| p.id == project.id) {
                    self.project = Some(project);
                }
                self.settle();
            }
            ProjectAction::DeleteSuccess(id) => {
                self.projects.retain(|p| p.id != id);
                if self.project.as_ref().is_some_and(|p| p.id == id) {
                    self.project = None;
                }
                self.settle();
            }
            ProjectAction::Failure(message) => {
                self.loading = false;
                self.error = Some(message);
            }
            ProjectAction::ClearError => self.error = None,
            ProjectAction::ClearCurrent => self.project = None,
        }
    }

    fn settle(&mut self) {
        self.loading = false;
        self.error = None;
    }
}

/// Project list/detail state driven by [`ProjectService`] calls.
pub struct ProjectStore {
    service: ProjectService,
    state: Mutex<ProjectState>,
}

impl ProjectStore {
    pub fn new(service: ProjectService) -> Self {
        Self {
            service,
            state: Mutex::new(ProjectState::default()),
        }
    }

    pub fn state(&self) -> ProjectState {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn dispatch(&self, action: ProjectAction) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .apply(action);
    }

    async fn run<T, Fut>(
        &self,
        call: Fut,
        fallback: &str,
        on_success: impl FnOnce(&T) -> ProjectAction,
    ) -> Result<T>
    where
        Fut: Future<Output = Result<T>>,
    {
        self.dispatch(ProjectAction::Request);
        match call.await {
            Ok(value) => {
                self.dispatch(on_success(&value));
                Ok(value)
            }
            Err(err) => {
                self.dispatch(ProjectAction::Failure(failure_message(&err, fallback)));
                Err(err)
            }
        }
    }

    pub async fn fetch_projects(&self, page: PageRequest) -> Result<Page<Project>> {
        self.run(self.service.list(page), "Failed to fetch projects", |p| {
            ProjectAction::FetchListSuccess(p.clone())
        })
        .await
    }

    pub async fn fetch_project(&self, id: i64) -> Result<Project> {
        let fallback = format!("Failed to fetch project with ID: {}", id);
        self.run(self.service.get(id), &fallback, |p| {
            ProjectAction::FetchOneSuccess(p.clone())
        })
        .await
    }

    pub async fn create_project(&self, draft: &ProjectDraft) -> Result<Project> {
        self.run(self.service.create(draft), "Failed to create project", |p| {
            ProjectAction::CreateSuccess(p.clone())
        })
        .await
    }

    pub async fn update_project(&self, id: i64, draft: &ProjectDraft) -> Result<Project> {
        self.run(self.service.update(id, draft), "Failed to update project", |p| {
            ProjectAction::UpdateSuccess(p.clone())
        })
        .await
    }

    pub async fn delete_project(&self, id: i64) -> Result<()> {
        self.run(self.service.delete(id), "Failed to delete project", |_| {
            ProjectAction::DeleteSuccess(id)
        })
        .await
    }

    pub fn clear_error(&self) {
        self.dispatch(ProjectAction::ClearError);
    }

    pub fn clear_current_project(&self) {
        self.dispatch(ProjectAction::ClearCurrent);
    }
}
