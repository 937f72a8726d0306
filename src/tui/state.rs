//! View state for the interactive task browser.
//!
//! All mutation happens here, on the single UI loop. Inputs are user
//! [`Action`]s and [`WorkerMessage`]s; outputs are [`Effect`]s the loop hands
//! to the worker. Task fetches carry a generation number so a result for a
//! superseded selection is dropped on arrival.

use crate::api::{Task, TaskList, TaskStatus};

/// Which half of the task list is shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Tasks,
    Completed,
}

impl Tab {
    pub fn title(self) -> &'static str {
        match self {
            Self::Tasks => "Tasks",
            Self::Completed => "Completed",
        }
    }

    fn toggled(self) -> Self {
        match self {
            Self::Tasks => Self::Completed,
            Self::Completed => Self::Tasks,
        }
    }
}

/// Whether keystrokes edit the search query or drive navigation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Browse,
    Search,
}

/// User intent decoded from a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    SwitchTab,
    PrevList,
    NextList,
    Up,
    Down,
    Complete,
    StartSearch,
    EndSearch,
    SearchInput(char),
    SearchBackspace,
    Reload,
}

/// Results marshalled back from background work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerMessage {
    ListsLoaded(Result<Vec<TaskList>, String>),
    TasksLoaded {
        generation: u64,
        list_id: String,
        result: Result<Vec<Task>, String>,
    },
    TaskCompleted {
        list_id: String,
        task_id: String,
        result: Result<(), String>,
    },
    CurrentListSaved(Result<String, String>),
}

/// Background work requested by a state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchLists,
    /// Supersedes any in-flight fetch.
    FetchTasks { generation: u64, list_id: String },
    CompleteTask { list_id: String, task_id: String },
    SaveCurrentList { list_id: String },
}

#[derive(Debug, Default)]
pub struct ViewState {
    lists: Vec<TaskList>,
    selected_list: Option<usize>,
    /// Preferred initial list, consumed when lists first arrive.
    preferred_list: Option<String>,
    tasks: Vec<Task>,
    generation: u64,
    loading_lists: bool,
    loading_tasks: bool,
    tab: Tab,
    mode: Mode,
    search: String,
    cursor: usize,
    status: Option<String>,
    should_quit: bool,
}

impl ViewState {
    /// Fresh state plus the effects needed to populate it.
    pub fn new(preferred_list: Option<String>) -> (Self, Vec<Effect>) {
        let state = Self {
            preferred_list,
            loading_lists: true,
            ..Self::default()
        };
        (state, vec![Effect::FetchLists])
    }

    pub fn lists(&self) -> &[TaskList] {
        &self.lists
    }

    pub fn selected_list(&self) -> Option<&TaskList> {
        self.selected_list.and_then(|idx| self.lists.get(idx))
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading_lists || self.loading_tasks
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Tasks shown on the active tab, in server order.
    pub fn visible_tasks(&self) -> Vec<&Task> {
        let needle = self.search.to_lowercase();
        self.tasks
            .iter()
            .filter(|task| match self.tab {
                Tab::Tasks => {
                    !task.status.is_completed()
                        && (needle.is_empty() || task.title.to_lowercase().contains(&needle))
                }
                Tab::Completed => task.status.is_completed(),
            })
            .collect()
    }

    pub fn handle_action(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::Quit => {
                self.should_quit = true;
                Vec::new()
            }
            Action::SwitchTab => {
                self.tab = self.tab.toggled();
                self.cursor = 0;
                Vec::new()
            }
            Action::PrevList => self.step_list(-1),
            Action::NextList => self.step_list(1),
            Action::Up => {
                self.cursor = self.cursor.saturating_sub(1);
                Vec::new()
            }
            Action::Down => {
                let last = self.visible_tasks().len().saturating_sub(1);
                self.cursor = (self.cursor + 1).min(last);
                Vec::new()
            }
            Action::Complete => self.complete_selected(),
            Action::StartSearch => {
                self.mode = Mode::Search;
                self.tab = Tab::Tasks;
                self.cursor = 0;
                Vec::new()
            }
            Action::EndSearch => {
                self.mode = Mode::Browse;
                Vec::new()
            }
            Action::SearchInput(ch) => {
                self.search.push(ch);
                self.cursor = 0;
                Vec::new()
            }
            Action::SearchBackspace => {
                self.search.pop();
                self.cursor = 0;
                Vec::new()
            }
            Action::Reload => {
                self.status = None;
                match self.selected_list().map(|list| list.id.clone()) {
                    Some(list_id) => self.begin_fetch(list_id),
                    None => {
                        self.loading_lists = true;
                        vec![Effect::FetchLists]
                    }
                }
            }
        }
    }

    pub fn apply_message(&mut self, message: WorkerMessage) -> Vec<Effect> {
        match message {
            WorkerMessage::ListsLoaded(Ok(lists)) => {
                self.loading_lists = false;
                self.lists = lists;
                if self.lists.is_empty() {
                    self.selected_list = None;
                    self.status = Some("No task lists found.".to_string());
                    return Vec::new();
                }
                let preferred = self.preferred_list.take();
                let idx = preferred
                    .and_then(|id| self.lists.iter().position(|list| list.id == id))
                    .unwrap_or(0);
                self.select_list(idx)
            }
            WorkerMessage::ListsLoaded(Err(err)) => {
                self.loading_lists = false;
                self.status = Some(format!("Failed to load task lists: {err}"));
                Vec::new()
            }
            WorkerMessage::TasksLoaded {
                generation,
                list_id,
                result,
            } => {
                if generation != self.generation {
                    tracing::debug!(
                        generation,
                        current = self.generation,
                        %list_id,
                        "dropping stale task fetch"
                    );
                    return Vec::new();
                }
                self.loading_tasks = false;
                match result {
                    Ok(tasks) => {
                        self.tasks = tasks;
                        self.clamp_cursor();
                    }
                    Err(err) => self.status = Some(format!("Failed to load tasks: {err}")),
                }
                Vec::new()
            }
            WorkerMessage::TaskCompleted {
                list_id,
                task_id,
                result,
            } => {
                match result {
                    Ok(()) => self.status = Some("Task marked as complete.".to_string()),
                    Err(err) => {
                        // Undo the optimistic move if that list is still shown.
                        if self.selected_list().is_some_and(|list| list.id == list_id) {
                            if let Some(task) = self.tasks.iter_mut().find(|t| t.id == task_id) {
                                task.status = TaskStatus::NeedsAction;
                            }
                        }
                        self.status = Some(format!("Failed to complete task: {err}"));
                    }
                }
                Vec::new()
            }
            WorkerMessage::CurrentListSaved(Ok(_)) => Vec::new(),
            WorkerMessage::CurrentListSaved(Err(err)) => {
                self.status = Some(format!("Failed to save current list: {err}"));
                Vec::new()
            }
        }
    }

    fn step_list(&mut self, delta: isize) -> Vec<Effect> {
        let len = self.lists.len();
        let Some(current) = self.selected_list else {
            return Vec::new();
        };
        if len < 2 {
            return Vec::new();
        }
        let next = (current as isize + delta).rem_euclid(len as isize) as usize;
        let mut effects = self.select_list(next);
        if let Some(list) = self.selected_list() {
            effects.push(Effect::SaveCurrentList {
                list_id: list.id.clone(),
            });
        }
        effects
    }

    fn select_list(&mut self, idx: usize) -> Vec<Effect> {
        self.selected_list = Some(idx);
        self.tasks.clear();
        self.cursor = 0;
        self.status = None;
        match self.lists.get(idx).map(|list| list.id.clone()) {
            Some(list_id) => self.begin_fetch(list_id),
            None => Vec::new(),
        }
    }

    fn begin_fetch(&mut self, list_id: String) -> Vec<Effect> {
        self.generation += 1;
        self.loading_tasks = true;
        vec![Effect::FetchTasks {
            generation: self.generation,
            list_id,
        }]
    }

    fn complete_selected(&mut self) -> Vec<Effect> {
        if self.tab != Tab::Tasks {
            return Vec::new();
        }
        let Some(list_id) = self.selected_list().map(|list| list.id.clone()) else {
            return Vec::new();
        };
        let Some(task_id) = self
            .visible_tasks()
            .get(self.cursor)
            .map(|task| task.id.clone())
        else {
            return Vec::new();
        };
        if let Some(task) = self.tasks.iter_mut().find(|t| t.id == task_id) {
            task.status = TaskStatus::Completed;
        }
        self.clamp_cursor();
        vec![Effect::CompleteTask { list_id, task_id }]
    }

    fn clamp_cursor(&mut self) {
        let len = self.visible_tasks().len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::TaskStatus::{Completed, NeedsAction};
    use crate::testsupport::{task, task_list};

    fn loaded_state(preferred: Option<&str>) -> (ViewState, Vec<Effect>) {
        let (mut state, effects) = ViewState::new(preferred.map(str::to_string));
        assert_eq!(effects, vec![Effect::FetchLists]);
        let effects = state.apply_message(WorkerMessage::ListsLoaded(Ok(vec![
            task_list("L1", "Work"),
            task_list("L2", "Groceries"),
            task_list("L3", "Home"),
        ])));
        (state, effects)
    }

    fn deliver_tasks(state: &mut ViewState, tasks: Vec<Task>) {
        let list_id = state.selected_list().expect("list").id.clone();
        state.apply_message(WorkerMessage::TasksLoaded {
            generation: state.generation(),
            list_id,
            result: Ok(tasks),
        });
    }

    #[test]
    fn initial_list_prefers_persisted_selection() {
        let (state, effects) = loaded_state(Some("L2"));
        assert_eq!(state.selected_list().expect("selected").id, "L2");
        assert_eq!(
            effects,
            vec![Effect::FetchTasks {
                generation: 1,
                list_id: "L2".into()
            }]
        );
    }

    #[test]
    fn unknown_persisted_selection_falls_back_to_first_list() {
        let (state, _) = loaded_state(Some("gone"));
        assert_eq!(state.selected_list().expect("selected").id, "L1");
    }

    #[test]
    fn switching_lists_persists_and_supersedes_fetch() {
        let (mut state, _) = loaded_state(None);
        let effects = state.handle_action(Action::NextList);
        assert_eq!(
            effects,
            vec![
                Effect::FetchTasks {
                    generation: 2,
                    list_id: "L2".into()
                },
                Effect::SaveCurrentList {
                    list_id: "L2".into()
                },
            ]
        );
        let effects = state.handle_action(Action::PrevList);
        assert_eq!(
            effects[0],
            Effect::FetchTasks {
                generation: 3,
                list_id: "L1".into(),
            }
        );
        state.handle_action(Action::PrevList);
        assert_eq!(state.selected_list().expect("wrap").id, "L3");
    }

    #[test]
    fn stale_task_results_are_discarded() {
        let (mut state, _) = loaded_state(None);
        state.handle_action(Action::NextList);
        state.apply_message(WorkerMessage::TasksLoaded {
            generation: 1,
            list_id: "L1".into(),
            result: Ok(vec![task("old", "From L1", NeedsAction)]),
        });
        assert!(state.visible_tasks().is_empty());
        assert!(state.is_loading());

        deliver_tasks(&mut state, vec![task("new", "From L2", NeedsAction)]);
        assert_eq!(state.visible_tasks()[0].id, "new");
        assert!(!state.is_loading());
    }

    #[test]
    fn tabs_split_open_and_completed_tasks() {
        let (mut state, _) = loaded_state(None);
        deliver_tasks(
            &mut state,
            vec![
                task("a", "Milk", NeedsAction),
                task("b", "Eggs", Completed),
                task("c", "Bread", NeedsAction),
            ],
        );
        let open: Vec<_> = state.visible_tasks().iter().map(|t| t.id.clone()).collect();
        assert_eq!(open, vec!["a", "c"]);
        state.handle_action(Action::SwitchTab);
        assert_eq!(state.tab(), Tab::Completed);
        let done: Vec<_> = state.visible_tasks().iter().map(|t| t.id.clone()).collect();
        assert_eq!(done, vec!["b"]);
    }

    #[test]
    fn search_filters_open_tasks_case_insensitively() {
        let (mut state, _) = loaded_state(None);
        deliver_tasks(
            &mut state,
            vec![
                task("a", "Buy MILK", NeedsAction),
                task("b", "Call plumber", NeedsAction),
                task("c", "milk the cat", Completed),
            ],
        );
        state.handle_action(Action::StartSearch);
        assert_eq!(state.mode(), Mode::Search);
        for ch in "milk".chars() {
            state.handle_action(Action::SearchInput(ch));
        }
        let ids: Vec<_> = state.visible_tasks().iter().map(|t| t.id.clone()).collect();
        assert_eq!(ids, vec!["a"]);
        state.handle_action(Action::SearchBackspace);
        assert_eq!(state.search(), "mil");
        state.handle_action(Action::EndSearch);
        assert_eq!(state.mode(), Mode::Browse);
    }

    #[test]
    fn completing_moves_task_locally_and_requests_update() {
        let (mut state, _) = loaded_state(None);
        deliver_tasks(
            &mut state,
            vec![
                task("a", "Milk", NeedsAction),
                task("b", "Eggs", NeedsAction),
            ],
        );
        state.handle_action(Action::Down);
        let effects = state.handle_action(Action::Complete);
        assert_eq!(
            effects,
            vec![Effect::CompleteTask {
                list_id: "L1".into(),
                task_id: "b".into()
            }]
        );
        assert_eq!(state.visible_tasks().len(), 1);
        assert_eq!(state.cursor(), 0);
        state.handle_action(Action::SwitchTab);
        assert_eq!(state.visible_tasks()[0].id, "b");
    }

    #[test]
    fn failed_completion_restores_task() {
        let (mut state, _) = loaded_state(None);
        deliver_tasks(&mut state, vec![task("a", "Milk", NeedsAction)]);
        state.handle_action(Action::Complete);
        assert!(state.visible_tasks().is_empty());
        state.apply_message(WorkerMessage::TaskCompleted {
            list_id: "L1".into(),
            task_id: "a".into(),
            result: Err("boom (HTTP 500)".into()),
        });
        assert_eq!(state.visible_tasks().len(), 1);
        assert!(state.status().expect("status").contains("boom"));
    }

    #[test]
    fn complete_is_ignored_on_completed_tab() {
        let (mut state, _) = loaded_state(None);
        deliver_tasks(&mut state, vec![task("b", "Eggs", Completed)]);
        state.handle_action(Action::SwitchTab);
        assert!(state.handle_action(Action::Complete).is_empty());
    }

    #[test]
    fn empty_or_failed_list_load_reports_status() {
        let (mut state, _) = ViewState::new(None);
        assert!(state
            .apply_message(WorkerMessage::ListsLoaded(Ok(Vec::new())))
            .is_empty());
        assert_eq!(state.status(), Some("No task lists found."));

        let (mut state, _) = ViewState::new(None);
        state.apply_message(WorkerMessage::ListsLoaded(Err("offline".into())));
        assert!(state.status().expect("status").contains("offline"));
        assert_eq!(
            state.handle_action(Action::Reload),
            vec![Effect::FetchLists]
        );
    }

    #[test]
    fn quit_sets_flag() {
        let (mut state, _) = ViewState::new(None);
        state.handle_action(Action::Quit);
        assert!(state.should_quit());
    }
}
