use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use watchlist_models::Notice;

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// Environment variable that overrides `tmdb.api_key`
pub const API_KEY_ENV: &str = "WATCHLIST_TMDB_API_KEY";

const API_KEY_PLACEHOLDER: &str = "YOUR_API_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tmdb: TmdbConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub messages: MessagesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Defaults to `<data_dir>/watchlist.db`
    #[serde(default)]
    pub database_path: Option<PathBuf>,
}

/// User-visible strings, one per `Notice`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagesConfig {
    #[serde(default = "default_general_error")]
    pub general_error: String,
    #[serde(default = "default_movie_added")]
    pub movie_added: String,
    #[serde(default = "default_movie_deleted")]
    pub movie_deleted: String,
    #[serde(default = "default_movies_deleted")]
    pub movies_deleted: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_image_base_url() -> String {
    DEFAULT_IMAGE_BASE_URL.to_string()
}

fn default_general_error() -> String {
    "Something went wrong, please try again".to_string()
}

fn default_movie_added() -> String {
    "Movie was added to watchlist".to_string()
}

fn default_movie_deleted() -> String {
    "Movie was deleted from watchlist".to_string()
}

fn default_movies_deleted() -> String {
    "Movies were deleted from watchlist".to_string()
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            image_base_url: default_image_base_url(),
            language: None,
        }
    }
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            general_error: default_general_error(),
            movie_added: default_movie_added(),
            movie_deleted: default_movie_deleted(),
            movies_deleted: default_movies_deleted(),
        }
    }
}

impl MessagesConfig {
    pub fn text(&self, notice: Notice) -> &str {
        match notice {
            Notice::GeneralError => &self.general_error,
            Notice::MovieAdded => &self.movie_added,
            Notice::MovieDeleted => &self.movie_deleted,
            Notice::MoviesDeleted => &self.movies_deleted,
        }
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the config file if it exists, otherwise start from defaults.
    /// The API key environment override is applied either way.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        let config = if path.exists() {
            Self::load_from_file(path)?
        } else {
            Self::default()
        };
        Ok(config.with_api_key_override(std::env::var(API_KEY_ENV).ok()))
    }

    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Replace the API key when an override is present and non-empty
    pub fn with_api_key_override(mut self, api_key: Option<String>) -> Self {
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            self.tmdb.api_key = key.trim().to_string();
        }
        self
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.is_api_key_configured() {
            return Err(anyhow::anyhow!(
                "tmdb.api_key is not configured (set it in config.toml or {})",
                API_KEY_ENV
            ));
        }

        for (name, url) in [
            ("tmdb.base_url", &self.tmdb.base_url),
            ("tmdb.image_base_url", &self.tmdb.image_base_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(anyhow::anyhow!("{} must be an http(s) URL: {}", name, url));
            }
        }

        Ok(())
    }

    pub fn is_api_key_configured(&self) -> bool {
        let key = self.tmdb.api_key.trim();
        !key.is_empty() && key != API_KEY_PLACEHOLDER
    }

    /// Database location, falling back to the platform data directory
    pub fn database_path(&self, default: PathBuf) -> PathBuf {
        self.storage.database_path.clone().unwrap_or(default)
    }

    /// Template written by `config init`
    pub fn template() -> Self {
        let mut config = Self::default();
        config.tmdb.api_key = API_KEY_PLACEHOLDER.to_string();
        config
    }
}
