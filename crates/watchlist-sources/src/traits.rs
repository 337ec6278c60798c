use async_trait::async_trait;
use watchlist_models::{CatalogPage, Movie};
use crate::error::SourceError;

/// Boundary over remote catalog reads and local watchlist persistence.
///
/// Every call completes exactly once with a value or a `SourceError`.
/// Implementations must be safe to call concurrently from several screens.
#[async_trait]
pub trait MovieDataSource: Send + Sync {
    // Remote catalog
    async fn fetch_popular(&self, page: u32) -> Result<CatalogPage, SourceError>;
    async fn fetch_upcoming(&self, page: u32) -> Result<CatalogPage, SourceError>;
    async fn search(&self, query: &str, page: u32) -> Result<CatalogPage, SourceError>;

    // Local watchlist
    async fn list_saved(&self) -> Result<Vec<Movie>, SourceError>;
    async fn save(&self, movie: &Movie) -> Result<(), SourceError>;
    async fn delete_many(&self, movies: &[Movie]) -> Result<(), SourceError>;
}
