//! Wire types for the Google Tasks v1 API.

use serde::{Deserialize, Serialize};

/// A named container of tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskList {
    pub id: String,
    #[serde(default)]
    pub title: String,
}

/// Completion state as the API spells it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskStatus {
    #[default]
    NeedsAction,
    Completed,
}

impl TaskStatus {
    pub fn is_completed(self) -> bool {
        self == Self::Completed
    }
}

/// One task. Fields the client never reads are dropped on deserialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Sparse task update; absent fields are left untouched server-side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.notes.is_none()
    }
}

/// Sparse task-list update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaskListPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl TaskListPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
    }
}

/// Collection envelope (`{"items": [...], "nextPageToken": ...}`).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Page<T> {
    #[serde(default = "Vec::new")]
    pub(crate) items: Vec<T>,
    #[serde(default)]
    pub(crate) next_page_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_status_uses_api_spelling() {
        let task: Task =
            serde_json::from_str(r#"{"id":"t1","title":"Milk","status":"needsAction","etag":"x"}"#)
                .expect("parse");
        assert_eq!(task.status, TaskStatus::NeedsAction);
        assert_eq!(
            serde_json::to_string(&TaskStatus::Completed).expect("ser"),
            "\"completed\""
        );
    }

    #[test]
    fn missing_items_is_an_empty_page() {
        let page: Page<TaskList> =
            serde_json::from_str(r#"{"kind":"tasks#taskLists"}"#).expect("parse");
        assert!(page.items.is_empty());
        assert!(page.next_page_token.is_none());
    }

    #[test]
    fn patches_serialize_only_supplied_fields() {
        let patch = TaskPatch {
            title: None,
            notes: Some("call back".into()),
        };
        assert_eq!(
            serde_json::to_value(&patch).expect("ser"),
            serde_json::json!({"notes": "call back"})
        );
        assert!(TaskPatch::default().is_empty());
        assert!(TaskListPatch::default().is_empty());
    }
}
