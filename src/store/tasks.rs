use super::failure_message;
use crate::api::TaskService;
use crate::types::{Page, PageInfo, PageRequest, Task, TaskDraft, TaskStatus};
use crate::Result;
use std::future::Future;
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Clone, PartialEq)]
pub struct TaskState {
    pub tasks: Vec<Task>,
    /// Task currently opened in a detail or edit view.
    pub task: Option<Task>,
    pub loading: bool,
    pub error: Option<String>,
    pub page_info: PageInfo,
}

impl Default for TaskState {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            task: None,
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
pub enum TaskAction {
    Request,
    FetchListSuccess(Page<Task>),
    FetchOneSuccess(Task),
    CreateSuccess(Task),
    UpdateSuccess(Task),
    DeleteSuccess(i64),
    Failure(String),
    ClearError,
    ClearCurrent,
}

impl TaskState {
    pub fn apply(&mut self, action: TaskAction) {
        match action {
            TaskAction::Request => {
                self.loading = true;
                self.error = None;
            }
            TaskAction::FetchListSuccess(page) => {
                self.tasks = page.items;
                self.page_info = page.info;
                self.settle();
            }
            TaskAction::FetchOneSuccess(task) => {
                self.task = Some(task);
                self.settle();
            }
            TaskAction::CreateSuccess(task) => {
                self.tasks.insert(0, task);
                self.settle();
            }
            TaskAction::UpdateSuccess(task) => {
                if let Some(slot) = self.tasks.iter_mut().find(|t| t.id == task.id) {
                    *slot = task.clone();
                }
                if self.task.as_ref().is_some_and(|t| t.id == task.id) {
                    self.task = Some(task);
                }
                self.settle();
            }
            TaskAction::DeleteSuccess(id) => {
                self.tasks.retain(|t| t.id != id);
                if self.task.as_ref().is_some_and(|t| t.id == id) {
                    self.task = None;
                }
                self.settle();
            }
            TaskAction::Failure(message) => {
                self.loading = false;
                self.error = Some(message);
            }
            TaskAction::ClearError => self.error = None,
            TaskAction::ClearCurrent => self.task = None,
        }
    }

    fn settle(&mut self) {
        self.loading = false;
        self.error = None;
    }
}

/// Task list/detail state driven by [`TaskService`] calls.
pub struct TaskStore {
    service: TaskService,
    state: Mutex<TaskState>,
}

impl TaskStore {
    pub fn new(service: TaskService) -> Self {
        Self {
            service,
            state: Mutex::new(TaskState::default()),
        }
    }

    pub fn state(&self) -> TaskState {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn dispatch(&self, action: TaskAction) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .apply(action);
    }

    async fn run<T, Fut>(
        &self,
        call: Fut,
        fallback: &str,
        on_success: impl FnOnce(&T) -> TaskAction,
    ) -> Result<T>
    where
        Fut: Future<Output = Result<T>>,
    {
        self.dispatch(TaskAction::Request);
        match call.await {
            Ok(value) => {
                self.dispatch(on_success(&value));
                Ok(value)
            }
            Err(err) => {
                self.dispatch(TaskAction::Failure(failure_message(&err, fallback)));
                Err(err)
            }
        }
    }

    pub async fn fetch_tasks(&self, page: PageRequest) -> Result<Page<Task>> {
        self.run(self.service.list(page), "Failed to fetch tasks", |p| {
            TaskAction::FetchListSuccess(p.clone())
        })
        .await
    }

    pub async fn fetch_tasks_by_project(
        &self,
        project_id: i64,
        page: PageRequest,
    ) -> Result<Page<Task>> {
        self.run(
            self.service.list_by_project(project_id, page),
            "Failed to fetch tasks",
            |p| TaskAction::FetchListSuccess(p.clone()),
        )
        .await
    }

    pub async fn fetch_tasks_by_status(
        &self,
        status: TaskStatus,
        page: PageRequest,
    ) -> Result<Page<Task>> {
        self.run(
            self.service.list_by_status(status, page),
            "Failed to fetch tasks",
            |p| TaskAction::FetchListSuccess(p.clone()),
        )
        .await
    }

    pub async fn fetch_task(&self, id: i64) -> Result<Task> {
        self.run(self.service.get(id), "Failed to fetch task", |t| {
            TaskAction::FetchOneSuccess(t.clone())
        })
        .await
    }

    pub async fn create_task(&self, draft: &TaskDraft) -> Result<Task> {
        self.run(self.service.create(draft), "Failed to create task", |t| {
            TaskAction::CreateSuccess(t.clone())
        })
        .await
    }

    pub async fn update_task(&self, id: i64, draft: &TaskDraft) -> Result<Task> {
        self.run(self.service.update(id, draft), "Failed to update task", |t| {
            TaskAction::UpdateSuccess(t.clone())
        })
        .await
    }

    pub async fn delete_task(&self, id: i64) -> Result<()> {
        self.run(self.service.delete(id), "Failed to delete task", |_| {
            TaskAction::DeleteSuccess(id)
        })
        .await
    }

    pub fn clear_error(&self) {
        self.dispatch(TaskAction::ClearError);
    }

    pub fn clear_current_task(&self) {
        self.dispatch(TaskAction::ClearCurrent);
    }
}
