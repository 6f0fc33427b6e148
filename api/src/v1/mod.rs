use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const CATEGORIES: [&str; 4] = ["Work", "School", "Personal", "Other"];

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: u64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Task {
    pub fn from_draft(id: u64, draft: TaskDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            completed: draft.completed,
            category: draft.category,
            created_at,
        }
    }

    pub fn apply(&mut self, patch: TaskPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }

        if let Some(description) = patch.description {
            self.description = description;
        }

        if let Some(completed) = patch.completed {
            self.completed = completed;
        }

        if let Some(category) = patch.category {
            self.category = category;
        }
    }

    pub fn in_category(&self, category: &str) -> bool {
        self.category.as_deref() == Some(category)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub category: Option<String>,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }
}

/// Partial update of a task. `None` leaves a field untouched, while
/// `Some(None)` clears an optional field.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub completed: Option<bool>,
    pub category: Option<Option<String>>,
}

impl TaskPatch {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    pub fn category(mut self, category: Option<String>) -> Self {
        self.category = Some(category);
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

impl Filter {
    pub fn matches(self, task: &Task) -> bool {
        match self {
            Filter::All => true,
            Filter::Active => !task.completed,
            Filter::Completed => task.completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn task() -> Task {
        let created = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        let draft = TaskDraft::new("write report").category("Work");
        Task::from_draft(7, draft, created)
    }

    #[test]
    fn patch_only_touches_supplied_fields() {
        let mut task = task();
        let before = task.clone();

        task.apply(TaskPatch::default().title("write summary"));

        assert_eq!(task.title, "write summary");
        assert_eq!(task.id, before.id);
        assert_eq!(task.completed, before.completed);
        assert_eq!(task.category, before.category);
        assert_eq!(task.created_at, before.created_at);
    }

    #[test]
    fn patch_can_clear_category() {
        let mut task = task();
        task.apply(TaskPatch::default().category(None));
        assert_eq!(task.category, None);
    }

    #[test]
    fn empty_patch_is_a_no_op() {
        let mut task = task();
        let before = task.clone();
        let patch = TaskPatch::default();

        assert!(patch.is_empty());
        task.apply(patch);
        assert_eq!(task, before);
    }

    #[test]
    fn serializes_created_at_in_camel_case() {
        let json = serde_json::to_value(task()).unwrap();
        assert_eq!(json["createdAt"], "2024-03-01T09:30:00Z");
        assert!(json.get("description").is_none());
    }

    #[test]
    fn filter_matches_completion() {
        let mut task = task();
        assert!(Filter::All.matches(&task));
        assert!(Filter::Active.matches(&task));
        assert!(!Filter::Completed.matches(&task));

        task.completed = true;
        assert!(!Filter::Active.matches(&task));
        assert!(Filter::Completed.matches(&task));
    }
}
