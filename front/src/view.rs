use tidy_api::v1::{Filter, Task, CATEGORIES};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct State {
    pub tasks: Vec<Task>,
    pub loading: bool,
    pub error: Option<String>,
    pub filter: Filter,
    pub selected_category: String,
    pub categories: Vec<String>,
}

impl Default for State {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            loading: false,
            error: None,
            filter: Filter::All,
            selected_category: String::new(),
            categories: CATEGORIES.iter().map(|&c| String::from(c)).collect(),
        }
    }
}

impl State {
    pub fn filtered_tasks(&self) -> Vec<&Task> {
        let category = self.selected_category.as_str();

        (self.tasks.iter())
            .filter(|task| category.is_empty() || task.in_category(category))
            .filter(|task| self.filter.matches(task))
            .collect()
    }

    pub fn total_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn completed_count(&self) -> usize {
        (self.tasks.iter()).filter(|task| task.completed).count()
    }

    pub fn active_count(&self) -> usize {
        (self.tasks.iter()).filter(|task| !task.completed).count()
    }

    pub(crate) fn position(&self, id: u64) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == id)
    }
}
