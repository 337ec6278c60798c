use thiserror::Error;

/// Failure of a single data-source call.
///
/// The screen state machine does not classify these; they are logged and
/// collapsed into one generic user-visible message.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Catalog API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Failed to decode catalog response at {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Watchlist storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("Invalid data source configuration: {0}")]
    Config(String),
}
