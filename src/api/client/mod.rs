//! Tasks API client orchestration.
//!
//! - bearer resolution is delegated to `auth`.
//! - URL building and dispatch are delegated to `transport`.
//!
//! Requests are not retried, except once after a 401 with a refreshed token.

mod auth;
mod transport;

use super::types::{Page, Task, TaskList, TaskListPatch, TaskPatch, TaskStatus};
use super::TasksApi;
use crate::auth::CredentialProvider;
use crate::config::ApiConfig;
use crate::error::ApiError;
use async_trait::async_trait;
use reqwest::Method;
use std::sync::Arc;
use std::time::Duration;
use transport::{parse_body, ApiRequest};

/// Largest page the tasks endpoint serves in one response.
const TASKS_PAGE_SIZE: u32 = 100;

/// Client for the Google Tasks REST API.
pub struct TasksClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Arc<dyn CredentialProvider>,
}

impl TasksClient {
    /// Build a client from resolved API configuration.
    pub fn new(config: &ApiConfig, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self {
            http: transport::build_http_client(Duration::from_secs(config.timeout_secs)),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            credentials,
        }
    }

    /// Send `request`, refreshing the token once if the server answers 401.
    async fn send(&self, request: ApiRequest) -> Result<String, ApiError> {
        let bearer = auth::resolve_bearer_token(self.credentials.as_ref(), false).await?;
        let response =
            transport::dispatch_request(&self.http, &self.base_url, &request, &bearer).await;

        // Tokens may be revoked before local expiry; refresh once on 401.
        if response.as_ref().err().and_then(ApiError::status_code) == Some(401) {
            let bearer = auth::resolve_bearer_token(self.credentials.as_ref(), true).await?;
            return transport::dispatch_request(&self.http, &self.base_url, &request, &bearer).await;
        }
        response
    }
}

#[async_trait]
impl TasksApi for TasksClient {
    async fn list_task_lists(&self, page_size: u32) -> Result<Vec<TaskList>, ApiError> {
        let request =
            ApiRequest::new(Method::GET, &["users", "@me", "lists"]).query("maxResults", page_size);
        let page: Page<TaskList> = parse_body("list task lists", &self.send(request).await?)?;
        if page.next_page_token.is_some() {
            tracing::debug!(page_size, "more task lists exist beyond the first page");
        }
        Ok(page.items)
    }

    async fn list_tasks(
        &self,
        list_id: &str,
        include_completed: bool,
    ) -> Result<Vec<Task>, ApiError> {
        // Completed tasks cleared in other clients are "hidden"; they still
        // count as completed here.
        let request = ApiRequest::new(Method::GET, &["lists", list_id, "tasks"])
            .query("maxResults", TASKS_PAGE_SIZE)
            .query("showCompleted", include_completed)
            .query("showHidden", include_completed);
        let page: Page<Task> = parse_body("list tasks", &self.send(request).await?)?;
        Ok(page.items)
    }

    async fn insert_task(&self, list_id: &str, title: &str) -> Result<Task, ApiError> {
        let request = ApiRequest::new(Method::POST, &["lists", list_id, "tasks"])
            .json(serde_json::json!({ "title": title }));
        parse_body("insert task", &self.send(request).await?)
    }

    async fn delete_task(&self, list_id: &str, task_id: &str) -> Result<(), ApiError> {
        let request = ApiRequest::new(Method::DELETE, &["lists", list_id, "tasks", task_id]);
        self.send(request).await.map(drop)
    }

    async fn update_task_status(
        &self,
        list_id: &str,
        task_id: &str,
        status: TaskStatus,
    ) -> Result<(), ApiError> {
        let body = match status {
            TaskStatus::Completed => serde_json::json!({ "status": status }),
            // Reopening must also clear the completion timestamp.
            TaskStatus::NeedsAction => serde_json::json!({ "status": status, "completed": null }),
        };
        let request =
            ApiRequest::new(Method::PATCH, &["lists", list_id, "tasks", task_id]).json(body);
        self.send(request).await.map(drop)
    }

    async fn patch_task(
        &self,
        list_id: &str,
        task_id: &str,
        patch: &TaskPatch,
    ) -> Result<(), ApiError> {
        let body = serde_json::to_value(patch)
            .map_err(|err| ApiError::InvalidRequest(format!("task patch: {err}")))?;
        let request =
            ApiRequest::new(Method::PATCH, &["lists", list_id, "tasks", task_id]).json(body);
        self.send(request).await.map(drop)
    }

    async fn patch_list(&self, list_id: &str, patch: &TaskListPatch) -> Result<(), ApiError> {
        let body = serde_json::to_value(patch)
            .map_err(|err| ApiError::InvalidRequest(format!("task list patch: {err}")))?;
        let request =
            ApiRequest::new(Method::PATCH, &["users", "@me", "lists", list_id]).json(body);
        self.send(request).await.map(drop)
    }
}
