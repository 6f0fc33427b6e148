use std::{env, path::PathBuf};

use crate::FileStorage;

pub const DEFAULT_STORAGE_KEY: &str = "todos";
pub const DEFAULT_DATA_FILE: &str = "data.ron";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub storage_key: String,
    pub data_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_key: String::from(DEFAULT_STORAGE_KEY),
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let storage_key =
            env::var("TIDY_STORAGE_KEY").unwrap_or_else(|_| String::from(DEFAULT_STORAGE_KEY));
        let data_file =
            env::var("TIDY_DATA_FILE").unwrap_or_else(|_| String::from(DEFAULT_DATA_FILE));

        Self {
            storage_key,
            data_file: PathBuf::from(data_file),
        }
    }

    pub fn open_storage(&self) -> eyre::Result<FileStorage> {
        Ok(FileStorage::open(&self.data_file)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_uses_todos_key() {
        let config = Config::default();
        assert_eq!(config.storage_key, "todos");
        assert_eq!(config.data_file, PathBuf::from("data.ron"));
    }

    #[test]
    fn open_storage_creates_nothing_until_written() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            data_file: dir.path().join("tasks.ron"),
            ..Config::default()
        };

        config.open_storage().unwrap();
        assert!(!config.data_file.exists());
    }

    // one test, since the variables are process-wide
    #[test]
    fn from_env_reads_variables_and_falls_back() {
        env::set_var("TIDY_STORAGE_KEY", "tasks");
        env::set_var("TIDY_DATA_FILE", "/tmp/tidy/tasks.ron");

        let config = Config::from_env();
        assert_eq!(config.storage_key, "tasks");
        assert_eq!(config.data_file, PathBuf::from("/tmp/tidy/tasks.ron"));

        env::remove_var("TIDY_STORAGE_KEY");
        env::remove_var("TIDY_DATA_FILE");

        assert_eq!(Config::from_env(), Config::default());
    }
}
