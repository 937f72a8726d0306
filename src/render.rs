//! Terminal output for command results and status messages.
//!
//! Listings and command results go to stdout so they can be piped; status,
//! warnings, and errors go to stderr.

use crate::api::{Task, TaskList};
use crossterm::style::{Color, Stylize};

const LABEL_WARNING: &str = "warning:";
const LABEL_ERROR: &str = "error:";
const GLYPH_BULLET: &str = "•";
const INDENT: &str = "  ";

/// Injectable rendering interface used by command handlers.
///
/// `Renderer` is the terminal implementation; tests substitute a recording
/// sink to assert on output without touching stdout.
pub trait RenderSink: Send + Sync {
    /// Heading printed before a listing, e.g. "Tasks:".
    fn section(&self, title: &str);
    /// One task list row; `current` marks the persisted selection.
    fn list_entry(&self, list: &TaskList, current: bool);
    /// One task row.
    fn task_entry(&self, task: &Task);
    /// Outcome line of a command ("Task deleted.").
    fn success(&self, msg: &str);
    /// Neutral result line on stdout ("No tasks found.").
    fn note(&self, msg: &str);
    /// Status/lifecycle text on stderr.
    fn activity(&self, text: &str);
    /// One key/value status row on stderr.
    fn field(&self, key: &str, value: &str);
    fn warn(&self, msg: &str);
    fn error(&self, msg: &str);
}

/// Plain-text row for a task list: `- Title (id)`.
pub fn format_list_line(list: &TaskList, current: bool) -> String {
    let marker = if current { " [current]" } else { "" };
    format!("- {} ({}){marker}", list.title, list.id)
}

/// Plain-text row for a task: `- Title (id)`, flagged when completed.
pub fn format_task_line(task: &Task) -> String {
    let marker = if task.status.is_completed() {
        " [completed]"
    } else {
        ""
    };
    format!("- {} ({}){marker}", task.title, task.id)
}

/// Handles all terminal output formatting.
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    /// Whether ANSI color/style output is enabled.
    color: bool,
}

impl Renderer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    pub fn color_enabled(&self) -> bool {
        self.color
    }
}

impl RenderSink for Renderer {
    fn section(&self, title: &str) {
        if self.color {
            println!("{}", title.with(Color::Cyan).bold());
        } else {
            println!("{title}");
        }
    }

    fn list_entry(&self, list: &TaskList, current: bool) {
        if !self.color {
            println!("{}", format_list_line(list, current));
            return;
        }
        let id = format!("({})", list.id).with(Color::DarkGrey);
        if current {
            println!(
                "- {} {id} {}",
                list.title.as_str().bold(),
                "[current]".with(Color::Green)
            );
        } else {
            println!("- {} {id}", list.title);
        }
    }

    fn task_entry(&self, task: &Task) {
        if !self.color {
            println!("{}", format_task_line(task));
            return;
        }
        let id = format!("({})", task.id).with(Color::DarkGrey);
        if task.status.is_completed() {
            println!(
                "- {} {id}",
                task.title.as_str().with(Color::DarkGrey).crossed_out()
            );
        } else {
            println!("- {} {id}", task.title);
        }
    }

    fn success(&self, msg: &str) {
        if self.color {
            println!("{}", msg.with(Color::Green));
        } else {
            println!("{msg}");
        }
    }

    fn note(&self, msg: &str) {
        println!("{msg}");
    }

    fn activity(&self, text: &str) {
        if self.color {
            eprintln!(
                "{} {}",
                GLYPH_BULLET.with(Color::DarkGrey),
                text.with(Color::Grey).bold()
            );
        } else {
            eprintln!("{text}");
        }
    }

    fn field(&self, key: &str, value: &str) {
        if self.color {
            eprintln!(
                "{INDENT}{} {}",
                format!("{key}:").with(Color::DarkGrey),
                value.with(Color::White),
            );
        } else {
            eprintln!("{INDENT}{key}: {value}");
        }
    }

    fn warn(&self, msg: &str) {
        if self.color {
            eprintln!("{} {msg}", LABEL_WARNING.with(Color::Yellow).bold());
        } else {
            eprintln!("{LABEL_WARNING} {msg}");
        }
    }

    fn error(&self, msg: &str) {
        if self.color {
            eprintln!("{} {msg}", LABEL_ERROR.with(Color::Red).bold());
        } else {
            eprintln!("{LABEL_ERROR} {msg}");
        }
    }
}
