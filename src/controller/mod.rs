mod view;

use tokio::sync::{mpsc, watch};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::config::CHANNEL_SIZE;
use crate::enrich::Enricher;
use crate::model::{NewTask, Priority, Task, TaskUpdate};
use crate::store::TaskStore;

pub use view::{Stats, View, ViewFilter};

/// One user action, queued to the controller in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Load,
    Add { title: String, priority: Priority },
    Toggle(Uuid),
    Delete(Uuid),
    SetFilter(ViewFilter),
}

/// Out-of-band event for the presentation, next to the view stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Added,
    AddFailed(String),
    DeleteFailed(String),
}

/// The presentation's side of the controller channels.
pub struct ControllerHandle {
    pub intents: mpsc::Sender<Intent>,
    pub view: watch::Receiver<View>,
    pub notices: mpsc::Receiver<Notice>,
}

/// Owns the task list and serializes every mutation. Intents come in over
/// one channel, each finished state is published as a whole new `View`,
/// so the presentation never observes a half-applied change.
pub struct TaskController<S, E>
where
    S: TaskStore,
    E: Enricher,
{
    store: S,
    enricher: E,
    tasks: Vec<Task>,
    filter: ViewFilter,
    loading: bool,
    busy: bool,
    intents: mpsc::Receiver<Intent>,
    view: watch::Sender<View>,
    notices: mpsc::Sender<Notice>,
}

impl<S, E> TaskController<S, E>
where
    S: TaskStore + Send + Sync + 'static,
    E: Enricher + Send + Sync + 'static,
{
    #[instrument(skip(store, enricher))]
    pub fn start(store: S, enricher: E) -> ControllerHandle {
        let (controller, handle) = Self::new(store, enricher);
        tokio::spawn(controller.run());
        handle
    }

    /// The view starts in the loading state so the presentation has
    /// something sensible to draw before the first fetch lands.
    pub fn new(store: S, enricher: E) -> (Self, ControllerHandle) {
        let (tx_intent, rx_intent) = mpsc::channel::<Intent>(CHANNEL_SIZE);
        let (tx_notice, rx_notice) = mpsc::channel::<Notice>(CHANNEL_SIZE);
        let (tx_view, rx_view) =
            watch::channel(View::assemble(&[], ViewFilter::default(), true, false));

        let controller = Self {
            store,
            enricher,
            tasks: Vec::new(),
            filter: ViewFilter::default(),
            loading: true,
            busy: false,
            intents: rx_intent,
            view: tx_view,
            notices: tx_notice,
        };
        let handle = ControllerHandle {
            intents: tx_intent,
            view: rx_view,
            notices: rx_notice,
        };
        (controller, handle)
    }

    async fn run(mut self) {
        info!("Starting intent loop.");
        while let Some(intent) = self.intents.recv().await {
            self.handle(intent).await;
        }
        info!("Finishing intent loop.");
    }

    async fn handle(&mut self, intent: Intent) {
        match intent {
            Intent::Load => self.load().await,
            Intent::Add { title, priority } => self.add(title, priority).await,
            Intent::Toggle(id) => self.toggle(id).await,
            Intent::Delete(id) => self.delete(id).await,
            Intent::SetFilter(filter) => self.set_filter(filter),
        }
    }

    async fn load(&mut self) {
        self.loading = true;
        self.publish();

        match self.store.list().await {
            Ok(tasks) => self.tasks = tasks,
            // keep whatever we had, the presentation shows stale rows
            // over no rows
            Err(err) => error!(reason = %err, "Unable to load tasks."),
        }

        self.loading = false;
        self.publish();
    }

    async fn add(&mut self, title: String, priority: Priority) {
        if title.trim().is_empty() || self.busy {
            return;
        }
        self.busy = true;
        self.publish();

        let description = match self.enricher.refine_description(&title).await {
            Ok(text) => text,
            Err(err) => {
                warn!(reason = %err, "Unable to refine the description.");
                String::new()
            }
        };
        let description = if description.is_empty() {
            None
        } else {
            Some(description)
        };

        match self
            .store
            .create(NewTask::new(title, priority, description))
            .await
        {
            Ok(task) => {
                self.tasks.insert(0, task);
                self.filter = ViewFilter::Active;
                self.notify(Notice::Added).await;
            }
            Err(err) => {
                error!(reason = %err, "Unable to add the task.");
                self.notify(Notice::AddFailed(err.to_string())).await;
            }
        }

        self.busy = false;
        self.publish();
    }

    async fn toggle(&mut self, id: Uuid) {
        // the row may have been deleted under us
        let is_completed = match self.tasks.iter().find(|task| task.id == id) {
            Some(task) => task.is_completed,
            None => return,
        };

        match self
            .store
            .update(id, TaskUpdate::completion(!is_completed))
            .await
        {
            Ok(updated) => {
                if let Some(slot) = self.tasks.iter_mut().find(|task| task.id == id) {
                    *slot = updated;
                }
                self.publish();
            }
            Err(err) => error!(reason = %err, "Unable to toggle the task."),
        }
    }

    async fn delete(&mut self, id: Uuid) {
        match self.store.delete(id).await {
            Ok(()) => {
                self.tasks.retain(|task| task.id != id);
                self.publish();
            }
            Err(err) => {
                error!(reason = %err, "Unable to delete the task.");
                self.notify(Notice::DeleteFailed(err.to_string())).await;
            }
        }
    }

    fn set_filter(&mut self, filter: ViewFilter) {
        self.filter = filter;
        self.publish();
    }

    fn publish(&self) {
        let _ = self
            .view
            .send(View::assemble(&self.tasks, self.filter, self.loading, self.busy));
    }

    async fn notify(&self, notice: Notice) {
        let _ = self.notices.send(notice).await;
    }
}
