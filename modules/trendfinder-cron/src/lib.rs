pub mod draft;
pub mod notify;
pub mod pipeline;
pub mod sources;
pub mod summarize;
