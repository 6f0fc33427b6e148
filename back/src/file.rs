use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, error};

use crate::{Storage, StorageError};

#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    items: Mutex<HashMap<String, String>>,
}

impl FileStorage {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();

        let file = match fs::File::open(&path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no data file, starting empty");
                return Ok(Self {
                    path,
                    items: Mutex::default(),
                });
            }
            Err(err) => return Err(err.into()),
        };
        let items = match ron::de::from_reader(file) {
            Ok(DataOwned::V1 { items }) => items,
            Err(err) => {
                error!(path = %path.display(), "unreadable data file, starting empty: {}", err);
                HashMap::new()
            }
        };

        Ok(Self {
            path,
            items: Mutex::new(items),
        })
    }

    fn store(&self, items: &HashMap<String, String>) -> Result<(), StorageError> {
        let data = DataBorrowed::V1 { items };

        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };

        // the data file is only ever replaced whole
        let mut file = NamedTempFile::new_in(dir)?;
        {
            let mut ron = ron::Serializer::new(file.as_file_mut(), Some(Default::default()))?;
            data.serialize(&mut ron)?;
        }
        file.as_file().sync_all()?;
        file.persist(&self.path).map_err(|err| err.error)?;

        Ok(())
    }

    fn modify(&self, f: impl FnOnce(&mut HashMap<String, String>)) -> Result<(), StorageError> {
        let mut items = self.items.lock();

        // only keep the change in memory once it reached the disk
        let mut next = items.clone();
        f(&mut next);
        self.store(&next)?;
        *items = next;

        Ok(())
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.lock().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.modify(|items| {
            items.insert(key.to_owned(), value.to_owned());
        })
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.modify(|items| {
            items.remove(key);
        })
    }
}

#[derive(Serialize)]
enum DataBorrowed<'a> {
    V1 { items: &'a HashMap<String, String> },
}

#[derive(Deserialize)]
enum DataOwned {
    V1 { items: HashMap<String, String> },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.ron");

        let storage = FileStorage::open(&path).unwrap();
        storage.set_item("todos", r#"[{"id":1}]"#).unwrap();
        storage.set_item("theme", "dark").unwrap();
        storage.remove_item("theme").unwrap();
        drop(storage);

        let storage = FileStorage::open(&path).unwrap();
        assert_eq!(
            storage.get_item("todos").unwrap().as_deref(),
            Some(r#"[{"id":1}]"#)
        );
        assert_eq!(storage.get_item("theme").unwrap(), None);
    }

    #[test]
    fn unreadable_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.ron");

        for contents in ["", "not ron at all {", "V1(items: {\"todos\": "] {
            fs::write(&path, contents).unwrap();

            let storage = FileStorage::open(&path).unwrap();
            assert_eq!(storage.get_item("todos").unwrap(), None);

            storage.set_item("todos", "[]").unwrap();
            let storage = FileStorage::open(&path).unwrap();
            assert_eq!(storage.get_item("todos").unwrap().as_deref(), Some("[]"));
        }
    }

    #[test]
    fn writes_leave_only_the_data_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.ron");

        let storage = FileStorage::open(&path).unwrap();
        storage.set_item("todos", "[]").unwrap();
        storage.set_item("todos", r#"[{"id":1}]"#).unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, ["data.ron"]);
    }

    #[test]
    fn failed_write_leaves_memory_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("data.ron");

        let storage = FileStorage::open(&path).unwrap();
        let err = storage.set_item("todos", "[]").unwrap_err();

        assert!(matches!(err, StorageError::Io(_)));
        assert_eq!(storage.get_item("todos").unwrap(), None);
    }
}
