use std::sync::Arc;

use async_trait::async_trait;
use tidy_api::v1::{Task, TaskDraft, TaskPatch};
use tracing::{debug, error, info};

use crate::{config::DEFAULT_STORAGE_KEY, Clock, Config, Storage, StorageError, SystemClock};

#[async_trait]
pub trait TaskService: Send + Sync {
    async fn list(&self) -> eyre::Result<Vec<Task>>;

    async fn add(&self, draft: TaskDraft) -> eyre::Result<Task>;

    async fn update(&self, id: u64, patch: TaskPatch) -> eyre::Result<Option<Task>>;

    async fn delete(&self, id: u64) -> eyre::Result<bool>;

    async fn get_by_id(&self, id: u64) -> eyre::Result<Option<Task>> {
        let tasks = self.list().await?;
        Ok(tasks.into_iter().find(|task| task.id == id))
    }

    async fn toggle_complete(&self, id: u64) -> eyre::Result<Option<Task>> {
        let Some(task) = self.get_by_id(id).await? else {
            debug!(id, "toggle of unknown task");
            return Ok(None);
        };

        let patch = TaskPatch::default().completed(!task.completed);
        self.update(id, patch).await
    }
}

#[derive(Clone)]
pub struct LocalTaskService {
    storage: Arc<dyn Storage>,
    key: String,
    clock: Arc<dyn Clock>,
}

impl LocalTaskService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            key: String::from(DEFAULT_STORAGE_KEY),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn from_config(config: &Config) -> eyre::Result<Self> {
        let storage = config.open_storage()?;
        Ok(Self::new(Arc::new(storage)).with_key(config.storage_key.clone()))
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn try_list(&self) -> Result<Vec<Task>, StorageError> {
        let Some(stored) = self.storage.get_item(&self.key)? else {
            return Ok(Vec::new());
        };

        if stored.is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&stored).map_err(StorageError::Corrupt)
    }

    pub fn try_save(&self, tasks: &[Task]) -> Result<(), StorageError> {
        let json = serde_json::to_string(tasks).map_err(StorageError::Serialize)?;
        self.storage.set_item(&self.key, &json)
    }

    fn load(&self) -> Vec<Task> {
        match self.try_list() {
            Ok(tasks) => tasks,
            Err(err) => {
                error!(key = %self.key, "failed to read tasks from storage: {}", err);
                Vec::new()
            }
        }
    }

    fn save(&self, tasks: &[Task]) {
        if let Err(err) = self.try_save(tasks) {
            error!(key = %self.key, "failed to save tasks to storage: {}", err);
        }
    }
}

#[async_trait]
impl TaskService for LocalTaskService {
    async fn list(&self) -> eyre::Result<Vec<Task>> {
        Ok(self.load())
    }

    async fn add(&self, draft: TaskDraft) -> eyre::Result<Task> {
        let mut tasks = self.load();
        let id = tasks.iter().map(|task| task.id).max().unwrap_or(0) + 1;

        let task = Task::from_draft(id, draft, self.clock.now());
        tasks.push(task.clone());
        self.save(&tasks);

        info!(
            id = task.id,
            title = %task.title,
            "created task"
        );

        Ok(task)
    }

    async fn update(&self, id: u64, patch: TaskPatch) -> eyre::Result<Option<Task>> {
        let mut tasks = self.load();

        let Some(task) = tasks.iter_mut().find(|task| task.id == id) else {
            debug!(id, "update of unknown task");
            return Ok(None);
        };

        task.apply(patch);
        let task = task.clone();
        self.save(&tasks);

        info!(
            id = task.id,
            completed = task.completed,
            "updated task"
        );

        Ok(Some(task))
    }

    async fn delete(&self, id: u64) -> eyre::Result<bool> {
        let mut tasks = self.load();

        let Some(index) = tasks.iter().position(|task| task.id == id) else {
            debug!(id, "delete of unknown task");
            return Ok(false);
        };

        tasks.remove(index);
        self.save(&tasks);

        info!(id, "deleted task");

        Ok(true)
    }
}
