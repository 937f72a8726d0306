//! Background execution of view effects.
//!
//! Each effect runs on its own tokio task and reports back through the UI
//! loop's channel. A new task fetch aborts the previous one; the generation
//! check in the view state covers results that were already in flight.
//! Current-list saves go through one long-lived task so they land in
//! selection order, and a save still queued behind a newer one is skipped.

use super::state::{Effect, WorkerMessage};
use super::LoopEvent;
use crate::api::TasksApi;
use crate::prefs::PreferenceStore;
use crate::resolver::{CommandResolver, StatusFilter};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::task::JoinHandle;

pub(crate) struct Worker {
    api: Arc<dyn TasksApi>,
    prefs: Arc<dyn PreferenceStore>,
    page_size: u32,
    tx: UnboundedSender<LoopEvent>,
    task_fetch: Option<JoinHandle<()>>,
    saves: Option<UnboundedSender<String>>,
}

impl Worker {
    pub(crate) fn new(
        api: Arc<dyn TasksApi>,
        prefs: Arc<dyn PreferenceStore>,
        page_size: u32,
        tx: UnboundedSender<LoopEvent>,
    ) -> Self {
        Self {
            api,
            prefs,
            page_size,
            tx,
            task_fetch: None,
            saves: None,
        }
    }

    pub(crate) fn run(&mut self, effect: Effect) {
        let api = self.api.clone();
        let prefs = self.prefs.clone();
        let page_size = self.page_size;
        let tx = self.tx.clone();
        let send = move |message| {
            // The loop has exited; nobody is left to show this.
            let _ = tx.send(LoopEvent::Worker(message));
        };

        match effect {
            Effect::FetchLists => {
                tokio::spawn(async move {
                    let resolver = CommandResolver::new(api.as_ref(), prefs.as_ref(), page_size);
                    let result = resolver.list_lists().await.map_err(|err| err.to_string());
                    send(WorkerMessage::ListsLoaded(result));
                });
            }
            Effect::FetchTasks {
                generation,
                list_id,
            } => {
                if let Some(previous) = self.task_fetch.take() {
                    previous.abort();
                }
                self.task_fetch = Some(tokio::spawn(async move {
                    let resolver = CommandResolver::new(api.as_ref(), prefs.as_ref(), page_size);
                    let result = resolver
                        .list_tasks(Some(&list_id), StatusFilter::All)
                        .await
                        .map_err(|err| err.to_string());
                    send(WorkerMessage::TasksLoaded {
                        generation,
                        list_id,
                        result,
                    });
                }));
            }
            Effect::CompleteTask { list_id, task_id } => {
                tokio::spawn(async move {
                    let resolver = CommandResolver::new(api.as_ref(), prefs.as_ref(), page_size);
                    let result = resolver
                        .complete_task(&task_id, Some(&list_id))
                        .await
                        .map_err(|err| err.to_string());
                    send(WorkerMessage::TaskCompleted {
                        list_id,
                        task_id,
                        result,
                    });
                });
            }
            Effect::SaveCurrentList { list_id } => self.queue_save(list_id),
        }
    }

    fn queue_save(&mut self, list_id: String) {
        let saves = match self.saves.take() {
            Some(saves) if !saves.is_closed() => saves,
            _ => self.spawn_saver(),
        };
        if saves.send(list_id).is_err() {
            tracing::warn!("current-list saver stopped; selection not saved");
        }
        self.saves = Some(saves);
    }

    /// Single writer for the current list. Stops when the worker is dropped.
    fn spawn_saver(&self) -> UnboundedSender<String> {
        let (saves, mut queued) = mpsc::unbounded_channel::<String>();
        let api = self.api.clone();
        let prefs = self.prefs.clone();
        let page_size = self.page_size;
        let tx = self.tx.clone();
        tokio::spawn(async move {
            while let Some(mut list_id) = queued.recv().await {
                // Only the newest selection is worth writing.
                while let Ok(newer) = queued.try_recv() {
                    list_id = newer;
                }
                let resolver = CommandResolver::new(api.as_ref(), prefs.as_ref(), page_size);
                let result = resolver
                    .use_list(Some(&list_id), None)
                    .await
                    .map_err(|err| err.to_string());
                let _ = tx.send(LoopEvent::Worker(WorkerMessage::CurrentListSaved(result)));
            }
        });
        saves
    }
}
