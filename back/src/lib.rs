mod clock;
mod config;
mod file;
mod service;
mod storage;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::Config;
pub use file::FileStorage;
pub use service::{LocalTaskService, TaskService};
pub use storage::{MemoryStorage, Storage, StorageError};
