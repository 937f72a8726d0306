//! Key bindings for the interactive view.

use super::state::{Action, Mode};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Decode one key event for the current mode. `None` means "ignore".
pub fn action_for_key(key: KeyEvent, mode: Mode) -> Option<Action> {
    if key.kind != KeyEventKind::Press && key.kind != KeyEventKind::Repeat {
        return None;
    }
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(Action::Quit);
    }
    match mode {
        Mode::Search => match key.code {
            KeyCode::Esc | KeyCode::Enter => Some(Action::EndSearch),
            KeyCode::Backspace => Some(Action::SearchBackspace),
            KeyCode::Up => Some(Action::Up),
            KeyCode::Down => Some(Action::Down),
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::SearchInput(ch))
            }
            _ => None,
        },
        Mode::Browse => match key.code {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Tab | KeyCode::BackTab => Some(Action::SwitchTab),
            KeyCode::Left | KeyCode::Char('[') => Some(Action::PrevList),
            KeyCode::Right | KeyCode::Char(']') => Some(Action::NextList),
            KeyCode::Up | KeyCode::Char('k') => Some(Action::Up),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::Down),
            KeyCode::Char(' ') | KeyCode::Enter => Some(Action::Complete),
            KeyCode::Char('/') => Some(Action::StartSearch),
            KeyCode::Char('r') => Some(Action::Reload),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn browse_bindings() {
        assert_eq!(
            action_for_key(press(KeyCode::Char('q')), Mode::Browse),
            Some(Action::Quit)
        );
        assert_eq!(
            action_for_key(press(KeyCode::Tab), Mode::Browse),
            Some(Action::SwitchTab)
        );
        assert_eq!(
            action_for_key(press(KeyCode::Char('[')), Mode::Browse),
            Some(Action::PrevList)
        );
        assert_eq!(
            action_for_key(press(KeyCode::Right), Mode::Browse),
            Some(Action::NextList)
        );
        assert_eq!(
            action_for_key(press(KeyCode::Char(' ')), Mode::Browse),
            Some(Action::Complete)
        );
        assert_eq!(
            action_for_key(press(KeyCode::Char('/')), Mode::Browse),
            Some(Action::StartSearch)
        );
        assert_eq!(
            action_for_key(press(KeyCode::Char('x')), Mode::Browse),
            None
        );
    }

    #[test]
    fn search_mode_captures_letters() {
        assert_eq!(
            action_for_key(press(KeyCode::Char('q')), Mode::Search),
            Some(Action::SearchInput('q'))
        );
        assert_eq!(
            action_for_key(press(KeyCode::Esc), Mode::Search),
            Some(Action::EndSearch)
        );
        assert_eq!(
            action_for_key(press(KeyCode::Backspace), Mode::Search),
            Some(Action::SearchBackspace)
        );
    }

    #[test]
    fn ctrl_c_quits_in_any_mode_and_releases_are_ignored() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(action_for_key(ctrl_c, Mode::Search), Some(Action::Quit));
        assert_eq!(action_for_key(ctrl_c, Mode::Browse), Some(Action::Quit));

        let mut release = press(KeyCode::Char('q'));
        release.kind = KeyEventKind::Release;
        assert_eq!(action_for_key(release, Mode::Browse), None);
    }
}
