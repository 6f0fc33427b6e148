use std::sync::Arc;

use tidy_api::v1::{Filter, Task, TaskDraft, TaskPatch};
use tidy_back::TaskService;
use tokio::sync::watch;
use tracing::{debug, error, warn};

use crate::State;

pub mod messages {
    pub const FETCH: &str = "Failed to load tasks.";
    pub const ADD: &str = "Failed to add task.";
    pub const TOGGLE: &str = "Failed to change task status.";
    pub const DELETE: &str = "Failed to delete task.";
    pub const UPDATE: &str = "Failed to update task.";
}

pub struct TaskStore {
    service: Arc<dyn TaskService>,
    state: State,
    generation: watch::Sender<u64>,
}

impl TaskStore {
    pub fn new(service: impl TaskService + 'static) -> Self {
        Self::from_arc(Arc::new(service))
    }

    pub fn from_arc(service: Arc<dyn TaskService>) -> Self {
        let (generation, _) = watch::channel(0);

        Self {
            service,
            state: State::default(),
            generation,
        }
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn tasks(&self) -> &[Task] {
        &self.state.tasks
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.generation.subscribe()
    }

    pub fn generation(&self) -> u64 {
        *self.generation.borrow()
    }

    fn changed(&self) {
        self.generation.send_modify(|generation| *generation += 1);
    }

    fn fail(&mut self, message: &str, err: eyre::Report) {
        error!("{}: {:?}", message, err);
        self.state.error = Some(String::from(message));
    }

    fn begin(&mut self) {
        self.state.loading = true;
        self.state.error = None;
        self.changed();
    }

    pub async fn fetch(&mut self) {
        self.begin();

        match self.service.list().await {
            Ok(tasks) => self.state.tasks = tasks,
            Err(err) => self.fail(messages::FETCH, err),
        }

        self.state.loading = false;
        self.changed();
    }

    pub async fn add(&mut self, draft: TaskDraft) {
        self.begin();

        match self.service.add(draft).await {
            Ok(task) => self.state.tasks.push(task),
            Err(err) => self.fail(messages::ADD, err),
        }

        self.state.loading = false;
        self.changed();
    }

    /// Flips `completed` locally before the service confirms.
    ///
    /// The task returned by the service replaces the local copy. If the
    /// service call fails the local flip is kept, so memory and storage
    /// disagree until the next [`TaskStore::fetch`].
    pub async fn toggle(&mut self, id: u64) {
        if id == 0 {
            warn!(id, "invalid task id");
            return;
        }

        let Some(index) = self.state.position(id) else {
            warn!(id, "task not found");
            return;
        };

        let completed = !self.state.tasks[index].completed;
        self.state.tasks[index].completed = completed;
        self.changed();

        let patch = TaskPatch::default().completed(completed);
        match self.service.update(id, patch).await {
            Ok(Some(task)) => self.state.tasks[index] = task,
            Ok(None) => debug!(id, "task missing from storage, keeping local copy"),
            Err(err) => self.fail(messages::TOGGLE, err),
        }

        self.changed();
    }

    pub async fn delete(&mut self, id: u64) {
        match self.service.delete(id).await {
            Ok(true) => self.state.tasks.retain(|task| task.id != id),
            Ok(false) => debug!(id, "nothing deleted"),
            Err(err) => self.fail(messages::DELETE, err),
        }

        self.changed();
    }

    pub async fn update(&mut self, id: u64, patch: TaskPatch) {
        match self.service.update(id, patch).await {
            Ok(Some(task)) => {
                if let Some(index) = self.state.position(id) {
                    self.state.tasks[index] = task;
                }
            }
            Ok(None) => debug!(id, "nothing updated"),
            Err(err) => self.fail(messages::UPDATE, err),
        }

        self.changed();
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.state.filter = filter;
        self.changed();
    }

    pub fn set_category(&mut self, category: impl Into<String>) {
        self.state.selected_category = category.into();
        self.changed();
    }

    /// Deletes completed tasks one at a time, then drops every completed
    /// task from memory whether or not its delete went through.
    pub async fn clear_completed(&mut self) {
        let completed: Vec<u64> = (self.state.tasks.iter())
            .filter(|task| task.completed)
            .map(|task| task.id)
            .collect();

        for id in completed {
            match self.service.delete(id).await {
                Ok(true) => {}
                Ok(false) => warn!(id, "completed task was not in storage"),
                Err(err) => error!(id, "failed to delete completed task: {:?}", err),
            }
        }

        self.state.tasks.retain(|task| !task.completed);
        self.changed();
    }

    pub fn filtered_tasks(&self) -> Vec<&Task> {
        self.state.filtered_tasks()
    }

    pub fn total_count(&self) -> usize {
        self.state.total_count()
    }

    pub fn completed_count(&self) -> usize {
        self.state.completed_count()
    }

    pub fn active_count(&self) -> usize {
        self.state.active_count()
    }
}
