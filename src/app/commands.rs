//! Task and task-list command handlers.
//!
//! Each handler runs one resolver operation and renders its outcome. Errors
//! are returned untouched so the entrypoint decides how to report them.

use gtasks::error::CommandError;
use gtasks::render::RenderSink;
use gtasks::resolver::{CommandResolver, EditOutcome, StatusFilter};

pub(crate) async fn list_lists(
    resolver: &CommandResolver<'_>,
    renderer: &dyn RenderSink,
) -> Result<(), CommandError> {
    let lists = resolver.list_lists().await?;
    if lists.is_empty() {
        renderer.note("No task lists found.");
        return Ok(());
    }
    // The marker is optional; an unreadable preference file is only a warning.
    let current = match resolver.resolve_list(None) {
        Ok(id) => Some(id),
        Err(CommandError::NoCurrentList) => None,
        Err(err) => {
            renderer.warn(&format!("could not read the current task list: {err}"));
            None
        }
    };
    renderer.section("Task lists:");
    for list in &lists {
        renderer.list_entry(list, current.as_deref() == Some(list.id.as_str()));
    }
    Ok(())
}

pub(crate) async fn list_tasks(
    resolver: &CommandResolver<'_>,
    renderer: &dyn RenderSink,
    list: Option<&str>,
    status: StatusFilter,
) -> Result<(), CommandError> {
    let tasks = resolver.list_tasks(list, status).await?;
    if tasks.is_empty() {
        renderer.note("No tasks found.");
        return Ok(());
    }
    renderer.section("Tasks:");
    for task in &tasks {
        renderer.task_entry(task);
    }
    Ok(())
}

pub(crate) async fn use_list(
    resolver: &CommandResolver<'_>,
    renderer: &dyn RenderSink,
    id: Option<&str>,
    name: Option<&str>,
) -> Result<(), CommandError> {
    let list_id = resolver.use_list(id, name).await?;
    renderer.success(&format!("Current task list set to '{list_id}'."));
    Ok(())
}

pub(crate) async fn add_task(
    resolver: &CommandResolver<'_>,
    renderer: &dyn RenderSink,
    title: &str,
    list: Option<&str>,
) -> Result<(), CommandError> {
    let task = resolver.add_task(title, list).await?;
    renderer.success(&format!("Task '{}' created.", task.title));
    Ok(())
}

pub(crate) async fn delete_task(
    resolver: &CommandResolver<'_>,
    renderer: &dyn RenderSink,
    task_id: &str,
    list: Option<&str>,
) -> Result<(), CommandError> {
    resolver.delete_task(task_id, list).await?;
    renderer.success("Task deleted.");
    Ok(())
}

pub(crate) async fn complete_task(
    resolver: &CommandResolver<'_>,
    renderer: &dyn RenderSink,
    task_id: &str,
    list: Option<&str>,
) -> Result<(), CommandError> {
    resolver.complete_task(task_id, list).await?;
    renderer.success("Task marked as complete.");
    Ok(())
}

pub(crate) async fn edit_task(
    resolver: &CommandResolver<'_>,
    renderer: &dyn RenderSink,
    task_id: &str,
    title: Option<&str>,
    description: Option<&str>,
    list: Option<&str>,
) -> Result<(), CommandError> {
    match resolver.edit_task(task_id, title, description, list).await? {
        EditOutcome::Updated => renderer.success("Task updated."),
        EditOutcome::NothingToUpdate => renderer.note("Nothing to update."),
    }
    Ok(())
}

pub(crate) async fn edit_list(
    resolver: &CommandResolver<'_>,
    renderer: &dyn RenderSink,
    list_id: &str,
    name: Option<&str>,
) -> Result<(), CommandError> {
    match resolver.edit_list(list_id, name).await? {
        EditOutcome::Updated => renderer.success("Task list updated."),
        EditOutcome::NothingToUpdate => renderer.note("Nothing to update."),
    }
    Ok(())
}
