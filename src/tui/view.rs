//! Frame layout and drawing for the interactive view.

use super::state::{Mode, Tab, ViewState};
use crossterm::cursor::MoveTo;
use crossterm::style::{Color, Print, PrintStyledContent, Stylize};
use crossterm::terminal::{Clear, ClearType};
use crossterm::QueueableCommand;
use std::io::{self, Write};

const HELP: &str = "Tab tabs  ←/→ lists  ↑/↓ move  Space complete  / search  r reload  q quit";
/// Header, tab bar, and search rows above the task rows; status row below.
const CHROME_ROWS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LineStyle {
    Header,
    Tabs,
    Search,
    Normal,
    Selected,
    Muted,
    Status,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FrameLine {
    pub(crate) text: String,
    pub(crate) style: LineStyle,
}

impl FrameLine {
    fn new(text: impl Into<String>, style: LineStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// Lay out one frame as plain rows, each clipped to `cols`.
pub(crate) fn compose_frame(state: &ViewState, cols: usize, rows: usize) -> Vec<FrameLine> {
    let mut lines = Vec::with_capacity(rows);

    let header = match state.selected_list() {
        Some(list) => {
            let position = state
                .lists()
                .iter()
                .position(|candidate| candidate.id == list.id)
                .map(|idx| idx + 1)
                .unwrap_or(0);
            format!(
                "gtasks  ‹ {} ›  ({position}/{})",
                list.title,
                state.lists().len()
            )
        }
        None => "gtasks".to_string(),
    };
    lines.push(FrameLine::new(header, LineStyle::Header));

    let tabs = [Tab::Tasks, Tab::Completed]
        .iter()
        .map(|tab| {
            if *tab == state.tab() {
                format!("[{}]", tab.title())
            } else {
                format!(" {} ", tab.title())
            }
        })
        .collect::<Vec<_>>()
        .join("  ");
    lines.push(FrameLine::new(tabs, LineStyle::Tabs));

    let search = if state.mode() == Mode::Search {
        format!("/{}_", state.search())
    } else if !state.search().is_empty() {
        format!("/{}", state.search())
    } else {
        String::new()
    };
    lines.push(FrameLine::new(search, LineStyle::Search));

    let body_rows = rows.saturating_sub(CHROME_ROWS);
    let tasks = state.visible_tasks();
    if tasks.is_empty() && body_rows > 0 {
        let text = if state.is_loading() {
            "Loading…"
        } else {
            "No tasks found."
        };
        lines.push(FrameLine::new(format!("  {text}"), LineStyle::Muted));
    } else {
        // Keep the cursor row on screen.
        let first = state.cursor().saturating_sub(body_rows.saturating_sub(1));
        for (idx, task) in tasks.iter().enumerate().skip(first).take(body_rows) {
            let selected = idx == state.cursor();
            let marker = if selected { ">" } else { " " };
            let check = if task.status.is_completed() { "[x]" } else { "[ ]" };
            let style = if selected {
                LineStyle::Selected
            } else if task.status.is_completed() {
                LineStyle::Muted
            } else {
                LineStyle::Normal
            };
            lines.push(FrameLine::new(
                format!("{marker} {check} {}", task.title),
                style,
            ));
        }
    }

    while lines.len() + 1 < rows {
        lines.push(FrameLine::new(String::new(), LineStyle::Normal));
    }
    let status = match state.status() {
        Some(status) => status.to_string(),
        None if state.is_loading() => "Loading…".to_string(),
        None => HELP.to_string(),
    };
    lines.push(FrameLine::new(status, LineStyle::Status));

    lines.truncate(rows);
    for line in &mut lines {
        line.text = clip(&line.text, cols);
    }
    lines
}

fn clip(text: &str, cols: usize) -> String {
    text.chars().take(cols).collect()
}

/// Paint a composed frame over the whole screen.
pub(crate) fn draw(out: &mut impl Write, lines: &[FrameLine], color: bool) -> io::Result<()> {
    for (row, line) in lines.iter().enumerate() {
        out.queue(MoveTo(0, row as u16))?;
        out.queue(Clear(ClearType::CurrentLine))?;
        if !color {
            out.queue(Print(&line.text))?;
            continue;
        }
        let text = line.text.as_str();
        match line.style {
            LineStyle::Header => out.queue(PrintStyledContent(text.with(Color::Cyan).bold()))?,
            LineStyle::Tabs => out.queue(PrintStyledContent(text.bold()))?,
            LineStyle::Search => out.queue(PrintStyledContent(text.with(Color::Yellow)))?,
            LineStyle::Normal => out.queue(Print(text))?,
            LineStyle::Selected => out.queue(PrintStyledContent(text.reverse()))?,
            LineStyle::Muted => out.queue(PrintStyledContent(text.with(Color::DarkGrey)))?,
            LineStyle::Status => out.queue(PrintStyledContent(text.with(Color::DarkGrey)))?,
        };
    }
    out.flush()
}
