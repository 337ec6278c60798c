use color_eyre::eyre::{eyre, Context};
use color_eyre::Result;
use std::sync::Arc;
use tracing::debug;
use watchlist_config::{Config, PathManager, API_KEY_ENV};
use watchlist_core::Navigator;
use watchlist_sources::tmdb::create_http_client;
use watchlist_sources::{MovieRepository, TmdbClient, WatchlistStore};

/// Everything a command needs, built once at startup and passed down
/// explicitly.
pub struct AppContext {
    pub config: Config,
    pub navigator: Navigator,
}

impl AppContext {
    pub async fn load(paths: &PathManager) -> Result<Self> {
        let config_file = paths.config_file();
        let config = Config::load_or_default(&config_file)
            .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?;

        if !config.is_api_key_configured() {
            return Err(eyre!(
                "No TMDB API key configured. Run 'watchlist config init --api-key <KEY>' or set {}",
                API_KEY_ENV
            ));
        }
        config.validate().map_err(|e| eyre!("Invalid configuration: {}", e))?;

        let catalog = TmdbClient::from_config(create_http_client(), &config.tmdb)?;

        let database = config.database_path(paths.database_file());
        debug!(path = %database.display(), "Opening watchlist database");
        let store = WatchlistStore::open(&database)
            .await
            .wrap_err_with(|| format!("Failed to open watchlist database at {}", database.display()))?;

        let repository = Arc::new(MovieRepository::new(catalog, store));
        let navigator = Navigator::new(repository);

        Ok(Self {
            config,
            navigator,
        })
    }

    pub fn image_base_url(&self) -> &str {
        &self.config.tmdb.image_base_url
    }
}
