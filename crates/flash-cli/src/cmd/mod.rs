pub mod completions;
pub mod compose;
pub mod draft;
pub mod extract;
