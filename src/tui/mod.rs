//! Interactive terminal view (`gtasks tui`).
//!
//! One loop owns the [`state::ViewState`]. Key presses arrive from a
//! dedicated input thread and remote results from [`worker::Worker`] tasks,
//! both over the same channel, so state is only ever touched here.

mod input;
mod state;
mod view;
mod worker;

use crate::api::TasksApi;
use crate::prefs::PreferenceStore;
use crossterm::event::{self, Event, KeyEvent};
use crossterm::{cursor, execute, terminal};
use state::{ViewState, WorkerMessage};
use std::io::{self, IsTerminal};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedSender};
use worker::Worker;

const INPUT_POLL: Duration = Duration::from_millis(100);

/// Everything the UI loop reacts to.
#[derive(Debug)]
pub(crate) enum LoopEvent {
    Key(KeyEvent),
    Resize,
    Worker(WorkerMessage),
    InputClosed(io::Error),
}

/// Run the interactive view until the user quits.
///
/// Remote failures are shown in the status row rather than returned; only
/// terminal I/O errors end the view with an error.
pub async fn run_interactive(
    api: Arc<dyn TasksApi>,
    prefs: Arc<dyn PreferenceStore>,
    page_size: u32,
    color: bool,
) -> io::Result<()> {
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        return Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "the interactive view needs a terminal on stdin and stdout",
        ));
    }

    let preferred = match prefs.get_current_list() {
        Ok(current) => current,
        Err(err) => {
            tracing::warn!(error = %err, "could not read current task list");
            None
        }
    };

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut worker = Worker::new(api, prefs, page_size, tx.clone());
    let (mut state, effects) = ViewState::new(preferred);
    for effect in effects {
        worker.run(effect);
    }

    let _screen = ScreenGuard::enter()?;
    spawn_input_thread(tx);
    let mut stdout = io::stdout();

    loop {
        let (cols, rows) = terminal::size().unwrap_or((80, 24));
        let frame = view::compose_frame(&state, cols as usize, rows as usize);
        view::draw(&mut stdout, &frame, color)?;

        let Some(event) = rx.recv().await else {
            break;
        };
        let effects = match event {
            LoopEvent::Key(key) => match input::action_for_key(key, state.mode()) {
                Some(action) => state.handle_action(action),
                None => Vec::new(),
            },
            LoopEvent::Resize => Vec::new(),
            LoopEvent::Worker(message) => state.apply_message(message),
            LoopEvent::InputClosed(err) => return Err(err),
        };
        for effect in effects {
            worker.run(effect);
        }
        if state.should_quit() {
            break;
        }
    }
    Ok(())
}

/// Forward terminal input into the loop until the loop goes away.
fn spawn_input_thread(tx: UnboundedSender<LoopEvent>) {
    std::thread::spawn(move || loop {
        if tx.is_closed() {
            return;
        }
        let ready = match event::poll(INPUT_POLL) {
            Ok(ready) => ready,
            Err(err) => {
                let _ = tx.send(LoopEvent::InputClosed(err));
                return;
            }
        };
        if !ready {
            continue;
        }
        let forwarded = match event::read() {
            Ok(Event::Key(key)) => tx.send(LoopEvent::Key(key)),
            Ok(Event::Resize(..)) => tx.send(LoopEvent::Resize),
            Ok(_) => Ok(()),
            Err(err) => {
                let _ = tx.send(LoopEvent::InputClosed(err));
                return;
            }
        };
        if forwarded.is_err() {
            return;
        }
    });
}

/// Raw mode plus alternate screen, restored on any return path.
struct ScreenGuard;

impl ScreenGuard {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        if let Err(err) = execute!(io::stdout(), terminal::EnterAlternateScreen, cursor::Hide) {
            let _ = terminal::disable_raw_mode();
            return Err(err);
        }
        Ok(Self)
    }
}

impl Drop for ScreenGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}
