//! Remote client for the Google Tasks API.
//!
//! - `types`: wire structs shared with the resolver and the TUI.
//! - `client`: HTTP dispatch, bearer resolution, and the 401 refresh retry.

use crate::error::ApiError;
use async_trait::async_trait;

mod client;
mod types;

pub use client::TasksClient;
pub use types::{Task, TaskList, TaskListPatch, TaskPatch, TaskStatus};

/// Remote operations consumed by the command resolver and interactive view.
///
/// Each method is exactly one request. Tests substitute a recording mock.
#[async_trait]
pub trait TasksApi: Send + Sync {
    /// One page of task lists, at most `page_size` entries.
    async fn list_task_lists(&self, page_size: u32) -> Result<Vec<TaskList>, ApiError>;

    async fn list_tasks(
        &self,
        list_id: &str,
        include_completed: bool,
    ) -> Result<Vec<Task>, ApiError>;

    async fn insert_task(&self, list_id: &str, title: &str) -> Result<Task, ApiError>;

    async fn delete_task(&self, list_id: &str, task_id: &str) -> Result<(), ApiError>;

    async fn update_task_status(
        &self,
        list_id: &str,
        task_id: &str,
        status: TaskStatus,
    ) -> Result<(), ApiError>;

    async fn patch_task(
        &self,
        list_id: &str,
        task_id: &str,
        patch: &TaskPatch,
    ) -> Result<(), ApiError>;

    async fn patch_list(&self, list_id: &str, patch: &TaskListPatch) -> Result<(), ApiError>;
}
