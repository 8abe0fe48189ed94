pub mod backend;
pub mod stdout;
pub mod telegram;
