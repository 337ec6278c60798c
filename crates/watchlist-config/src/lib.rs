pub mod config;
pub mod paths;

pub use config::{Config, MessagesConfig, StorageConfig, TmdbConfig, API_KEY_ENV, DEFAULT_BASE_URL, DEFAULT_IMAGE_BASE_URL};
pub use paths::{PathManager, container_base_path};
