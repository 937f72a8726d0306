//! Shared test fixtures: temp dirs, a recording Tasks API mock, and an
//! in-memory preference store.

use crate::api::{Task, TaskList, TaskListPatch, TaskPatch, TaskStatus, TasksApi};
use crate::error::{ApiError, StoreError};
use crate::prefs::{PreferenceStore, Preferences};
use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

static TEST_DIR_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Temporary directory fixture with best-effort cleanup.
#[derive(Debug)]
pub struct TestTempDir {
    path: PathBuf,
}

impl TestTempDir {
    /// Create a unique temporary directory with a readable prefix.
    pub fn new(prefix: &str) -> Self {
        let suffix = TEST_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        let dir = std::env::temp_dir().join(format!(
            "gtasks-{prefix}-{}-{millis}-{suffix}",
            std::process::id()
        ));
        fs::create_dir_all(&dir).expect("failed to create temporary fixture directory");
        Self { path: dir }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Build a child path under the fixture root.
    pub fn child(&self, relative: &str) -> PathBuf {
        self.path.join(relative)
    }

    /// Write UTF-8 text to a child path, creating parent directories as needed.
    pub fn write_text(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.child(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create parent directories for fixture");
        }
        fs::write(&path, content).expect("failed to write fixture file");
        path
    }
}

impl Drop for TestTempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

pub fn task_list(id: &str, title: &str) -> TaskList {
    TaskList {
        id: id.to_string(),
        title: title.to_string(),
    }
}

pub fn task(id: &str, title: &str, status: TaskStatus) -> Task {
    Task {
        id: id.to_string(),
        title: title.to_string(),
        status,
        notes: None,
    }
}

/// One recorded remote call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    ListTaskLists { page_size: u32 },
    ListTasks {
        list_id: String,
        include_completed: bool,
    },
    InsertTask { list_id: String, title: String },
    DeleteTask { list_id: String, task_id: String },
    UpdateTaskStatus {
        list_id: String,
        task_id: String,
        status: TaskStatus,
    },
    PatchTask {
        list_id: String,
        task_id: String,
        patch: TaskPatch,
    },
    PatchList {
        list_id: String,
        patch: TaskListPatch,
    },
}

/// Scripted `TasksApi` that records every call it receives.
///
/// `tasks` is returned verbatim from `list_tasks`, regardless of the
/// `include_completed` flag, so callers' local filtering is exercised.
#[derive(Debug, Default)]
pub struct MockTasksApi {
    pub lists: Vec<TaskList>,
    pub tasks: Vec<Task>,
    /// When set, every call fails with this status and message.
    pub fail_with: Option<(u16, String)>,
    calls: Mutex<Vec<ApiCall>>,
}

impl MockTasksApi {
    pub fn with_lists(lists: Vec<TaskList>) -> Self {
        Self {
            lists,
            ..Self::default()
        }
    }

    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks,
            ..Self::default()
        }
    }

    pub fn failing(code: u16, message: &str) -> Self {
        Self {
            fail_with: Some((code, message.to_string())),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().expect("mock call log").clone()
    }

    fn record(&self, call: ApiCall) -> Result<(), ApiError> {
        self.calls.lock().expect("mock call log").push(call);
        match &self.fail_with {
            Some((code, message)) => Err(ApiError::Status {
                code: *code,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl TasksApi for MockTasksApi {
    async fn list_task_lists(&self, page_size: u32) -> Result<Vec<TaskList>, ApiError> {
        self.record(ApiCall::ListTaskLists { page_size })?;
        Ok(self.lists.iter().take(page_size as usize).cloned().collect())
    }

    async fn list_tasks(
        &self,
        list_id: &str,
        include_completed: bool,
    ) -> Result<Vec<Task>, ApiError> {
        self.record(ApiCall::ListTasks {
            list_id: list_id.to_string(),
            include_completed,
        })?;
        Ok(self.tasks.clone())
    }

    async fn insert_task(&self, list_id: &str, title: &str) -> Result<Task, ApiError> {
        self.record(ApiCall::InsertTask {
            list_id: list_id.to_string(),
            title: title.to_string(),
        })?;
        Ok(task("new-task", title, TaskStatus::NeedsAction))
    }

    async fn delete_task(&self, list_id: &str, task_id: &str) -> Result<(), ApiError> {
        self.record(ApiCall::DeleteTask {
            list_id: list_id.to_string(),
            task_id: task_id.to_string(),
        })
    }

    async fn update_task_status(
        &self,
        list_id: &str,
        task_id: &str,
        status: TaskStatus,
    ) -> Result<(), ApiError> {
        self.record(ApiCall::UpdateTaskStatus {
            list_id: list_id.to_string(),
            task_id: task_id.to_string(),
            status,
        })
    }

    async fn patch_task(
        &self,
        list_id: &str,
        task_id: &str,
        patch: &TaskPatch,
    ) -> Result<(), ApiError> {
        self.record(ApiCall::PatchTask {
            list_id: list_id.to_string(),
            task_id: task_id.to_string(),
            patch: patch.clone(),
        })
    }

    async fn patch_list(&self, list_id: &str, patch: &TaskListPatch) -> Result<(), ApiError> {
        self.record(ApiCall::PatchList {
            list_id: list_id.to_string(),
            patch: patch.clone(),
        })
    }
}

/// In-memory preference store that counts writes.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    record: Mutex<Preferences>,
    writes: AtomicU64,
}

impl MemoryPreferenceStore {
    pub fn with_current(list_id: &str) -> Self {
        Self {
            record: Mutex::new(Preferences {
                current_task_list: Some(list_id.to_string()),
                ..Preferences::default()
            }),
            writes: AtomicU64::new(0),
        }
    }

    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn read(&self) -> Result<Preferences, StoreError> {
        Ok(self.record.lock().expect("prefs lock").clone())
    }

    fn write(&self, prefs: &Preferences) -> Result<(), StoreError> {
        *self.record.lock().expect("prefs lock") = prefs.clone();
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_dir_fixture_writes_and_resolves_paths() {
        let fixture = TestTempDir::new("fixture");
        let file = fixture.write_text("nested/file.txt", "hello");
        assert_eq!(fs::read_to_string(file).unwrap(), "hello");
        assert!(fixture.path().is_dir());
    }

    #[tokio::test]
    async fn mock_api_records_calls_and_fails_on_demand() {
        let api = MockTasksApi::failing(500, "backend error");
        let err = api.delete_task("L", "T").await.expect_err("fails");
        assert_eq!(err.to_string(), "backend error (HTTP 500)");
        assert_eq!(
            api.calls(),
            vec![ApiCall::DeleteTask {
                list_id: "L".into(),
                task_id: "T".into()
            }]
        );
    }
}
