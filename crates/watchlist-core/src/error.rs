use thiserror::Error;
use watchlist_sources::SourceError;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("Background task panicked: {0}")]
    TaskPanicked(String),

    #[error("Screen has been disposed")]
    ScreenClosed,

    #[error("Screen task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
