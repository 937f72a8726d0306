//! Command resolution: which list a command targets, which tasks a listing
//! shows, and which fields an edit sends.
//!
//! Every operation validates its arguments before touching the network and
//! then issues exactly one remote call. Nothing is cached between calls and
//! nothing is retried here; remote failures surface as
//! [`CommandError::Remote`] with the server's message intact.

use crate::api::{Task, TaskList, TaskListPatch, TaskPatch, TaskStatus, TasksApi};
use crate::error::CommandError;
use crate::prefs::PreferenceStore;

/// Tri-state status selector for task listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum StatusFilter {
    All,
    Completed,
    #[default]
    Incomplete,
}

impl StatusFilter {
    /// Whether the remote request should include completed tasks at all.
    pub fn include_completed(self) -> bool {
        !matches!(self, Self::Incomplete)
    }

    /// Whether a task passes the local re-check.
    pub fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Completed => task.status.is_completed(),
            Self::Incomplete => !task.status.is_completed(),
        }
    }

    /// Local post-filter. The remote flag is coarser than this selector and
    /// is not trusted to have been honored.
    pub fn apply(self, tasks: Vec<Task>) -> Vec<Task> {
        if self == Self::All {
            return tasks;
        }
        tasks
            .into_iter()
            .filter(|task| self.matches(task))
            .collect()
    }
}

/// Result of an edit operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Updated,
    /// No editable field was supplied; no remote call was made.
    NothingToUpdate,
}

/// Resolves and executes one command against injected collaborators.
pub struct CommandResolver<'a> {
    api: &'a dyn TasksApi,
    prefs: &'a dyn PreferenceStore,
    page_size: u32,
}

impl<'a> CommandResolver<'a> {
    /// `page_size` caps the single task-list page used by listings and
    /// name lookups.
    pub fn new(api: &'a dyn TasksApi, prefs: &'a dyn PreferenceStore, page_size: u32) -> Self {
        Self {
            api,
            prefs,
            page_size,
        }
    }

    /// Explicit list id, else the persisted current list.
    pub fn resolve_list(&self, explicit: Option<&str>) -> Result<String, CommandError> {
        if let Some(id) = non_empty(explicit) {
            return Ok(id.to_string());
        }
        self.prefs
            .get_current_list()?
            .filter(|id| !id.trim().is_empty())
            .ok_or(CommandError::NoCurrentList)
    }

    pub async fn list_lists(&self) -> Result<Vec<TaskList>, CommandError> {
        Ok(self.api.list_task_lists(self.page_size).await?)
    }

    pub async fn list_tasks(
        &self,
        list: Option<&str>,
        filter: StatusFilter,
    ) -> Result<Vec<Task>, CommandError> {
        let list_id = self.resolve_list(list)?;
        let tasks = self
            .api
            .list_tasks(&list_id, filter.include_completed())
            .await?;
        Ok(filter.apply(tasks))
    }

    /// First list whose title equals `name` exactly. Ties go to whichever
    /// the server returned first.
    pub async fn find_list_by_name(&self, name: &str) -> Result<TaskList, CommandError> {
        self.api
            .list_task_lists(self.page_size)
            .await?
            .into_iter()
            .find(|list| list.title == name)
            .ok_or_else(|| CommandError::NotFound(name.to_string()))
    }

    /// Select the current list by id or by exact title and persist it.
    /// Returns the persisted id.
    pub async fn use_list(
        &self,
        id: Option<&str>,
        name: Option<&str>,
    ) -> Result<String, CommandError> {
        let list_id = match (non_empty(id), non_empty(name)) {
            (Some(_), Some(_)) => {
                return Err(CommandError::ConflictingArguments(
                    "You can only provide either --id or --name, not both.".to_string(),
                ))
            }
            (None, None) => {
                return Err(CommandError::MissingArgument(
                    "You must provide either --id or --name.".to_string(),
                ))
            }
            (Some(id), None) => id.to_string(),
            (None, Some(name)) => self.find_list_by_name(name).await?.id,
        };
        self.prefs.set_current_list(&list_id)?;
        tracing::debug!(list_id = %list_id, "current task list updated");
        Ok(list_id)
    }

    pub async fn add_task(&self, title: &str, list: Option<&str>) -> Result<Task, CommandError> {
        let title = non_empty(Some(title)).ok_or_else(|| {
            CommandError::MissingArgument("A task title is required (--title).".to_string())
        })?;
        let list_id = self.resolve_list(list)?;
        Ok(self.api.insert_task(&list_id, title).await?)
    }

    pub async fn delete_task(&self, task_id: &str, list: Option<&str>) -> Result<(), CommandError> {
        let task_id = require_task_id(task_id)?;
        let list_id = self.resolve_list(list)?;
        Ok(self.api.delete_task(&list_id, task_id).await?)
    }

    pub async fn complete_task(
        &self,
        task_id: &str,
        list: Option<&str>,
    ) -> Result<(), CommandError> {
        let task_id = require_task_id(task_id)?;
        let list_id = self.resolve_list(list)?;
        Ok(self
            .api
            .update_task_status(&list_id, task_id, TaskStatus::Completed)
            .await?)
    }

    /// Sparse task edit. `description` maps to the task's notes.
    pub async fn edit_task(
        &self,
        task_id: &str,
        title: Option<&str>,
        description: Option<&str>,
        list: Option<&str>,
    ) -> Result<EditOutcome, CommandError> {
        let task_id = require_task_id(task_id)?;
        let list_id = self.resolve_list(list)?;
        let patch = TaskPatch {
            title: non_empty(title).map(str::to_string),
            notes: non_empty(description).map(str::to_string),
        };
        if patch.is_empty() {
            return Ok(EditOutcome::NothingToUpdate);
        }
        self.api.patch_task(&list_id, task_id, &patch).await?;
        Ok(EditOutcome::Updated)
    }

    /// Sparse task-list edit (rename).
    pub async fn edit_list(
        &self,
        list_id: &str,
        name: Option<&str>,
    ) -> Result<EditOutcome, CommandError> {
        let list_id = non_empty(Some(list_id)).ok_or_else(|| {
            CommandError::MissingArgument("A task list id is required (--id).".to_string())
        })?;
        let patch = TaskListPatch {
            title: non_empty(name).map(str::to_string),
        };
        if patch.is_empty() {
            return Ok(EditOutcome::NothingToUpdate);
        }
        self.api.patch_list(list_id, &patch).await?;
        Ok(EditOutcome::Updated)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn require_task_id(task_id: &str) -> Result<&str, CommandError> {
    non_empty(Some(task_id)).ok_or_else(|| {
        CommandError::MissingArgument("A task id is required (--task-id).".to_string())
    })
}
