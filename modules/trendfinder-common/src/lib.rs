pub mod config;
pub mod file_config;
pub mod links;
pub mod types;

pub use config::Config;
pub use file_config::{load_config, DigestConfig, FileConfig};
pub use links::resolve_link;
pub use types::{serialize_stories, SourceDescriptor, SourceKind, Story, StoryRejection};
