//! CLI argument parsing via clap.

use clap::{Parser, Subcommand};
use gtasks::config::AuthFlow;
use gtasks::resolver::StatusFilter;

/// Manage Google Tasks from the terminal.
#[derive(Debug, Parser)]
#[command(name = "gtasks", version)]
pub struct Args {
    /// Path to config file (default: ./gtasks.toml or ~/.config/gtasks/gtasks.toml).
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<String>,

    /// Override the authorization flow used when a login is needed.
    #[arg(long = "auth-flow", value_enum, global = true)]
    pub auth_flow: Option<AuthFlow>,

    /// Disable color output.
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Log remote calls and store writes to stderr.
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Task list selector shared by task-level commands.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ListArg {
    /// Task list id (defaults to the current list).
    #[arg(long = "list", alias = "tasklist-id", value_name = "ID")]
    pub list: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show task lists or the tasks in one list.
    List {
        #[command(subcommand)]
        target: ListTarget,
    },
    /// Choose the current task list.
    Use {
        #[command(subcommand)]
        target: UseTarget,
    },
    /// Add a task.
    Add {
        /// Task title.
        #[arg(long)]
        title: String,
        #[command(flatten)]
        list: ListArg,
    },
    /// Delete a task.
    Delete {
        #[arg(long = "task-id", value_name = "ID")]
        task_id: String,
        #[command(flatten)]
        list: ListArg,
    },
    /// Mark a task as complete.
    Complete {
        #[arg(long = "task-id", value_name = "ID")]
        task_id: String,
        #[command(flatten)]
        list: ListArg,
    },
    /// Edit a task or a task list.
    Edit {
        #[command(subcommand)]
        target: EditTarget,
    },
    /// Log in with Google, or inspect/reset the saved login.
    Login {
        /// Only print the saved login status.
        #[arg(long)]
        check: bool,
        /// Remove the saved login before logging in again.
        #[arg(long)]
        reset: bool,
    },
    /// Write the default settings file to ~/.config/gtasks/gtasks.toml.
    Init {
        /// Overwrite an existing file (a backup is kept).
        #[arg(long)]
        force: bool,
    },
    /// Browse and complete tasks interactively.
    Tui,
}

#[derive(Debug, Subcommand)]
pub enum ListTarget {
    /// Show all task lists.
    #[command(alias = "task-lists")]
    Lists,
    /// Show tasks in a list.
    Tasks {
        #[command(flatten)]
        list: ListArg,
        /// Which tasks to show.
        #[arg(long, value_enum, default_value_t = StatusFilter::Incomplete)]
        status: StatusFilter,
    },
}

#[derive(Debug, Subcommand)]
pub enum UseTarget {
    /// Select the current task list by id or by exact name.
    List {
        #[arg(long)]
        id: Option<String>,
        #[arg(long)]
        name: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum EditTarget {
    /// Change a task's title or description.
    Task {
        #[arg(long)]
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[command(flatten)]
        list: ListArg,
    },
    /// Rename a task list.
    #[command(alias = "task-lists")]
    List {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: Option<String>,
    },
}
