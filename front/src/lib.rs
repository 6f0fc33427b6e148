mod store;
mod view;

pub use store::{messages, TaskStore};
pub use view::State;
