use async_trait::async_trait;
use tracing::{debug, info};
use watchlist_models::{CatalogPage, Movie};
use crate::error::SourceError;
use crate::storage::WatchlistStore;
use crate::tmdb::TmdbClient;
use crate::traits::MovieDataSource;

/// Remote catalog plus local watchlist behind one data source.
///
/// Both handles are cheap to clone and are created once at startup.
#[derive(Clone)]
pub struct MovieRepository {
    catalog: TmdbClient,
    store: WatchlistStore,
}

impl MovieRepository {
    pub fn new(catalog: TmdbClient, store: WatchlistStore) -> Self {
        Self { catalog, store }
    }
}

#[async_trait]
impl MovieDataSource for MovieRepository {
    async fn fetch_popular(&self, page: u32) -> Result<CatalogPage, SourceError> {
        self.catalog.popular(page).await
    }

    async fn fetch_upcoming(&self, page: u32) -> Result<CatalogPage, SourceError> {
        self.catalog.upcoming(page).await
    }

    async fn search(&self, query: &str, page: u32) -> Result<CatalogPage, SourceError> {
        self.catalog.search(query, page).await
    }

    async fn list_saved(&self) -> Result<Vec<Movie>, SourceError> {
        Ok(self.store.list().await?)
    }

    async fn save(&self, movie: &Movie) -> Result<(), SourceError> {
        let id = self.store.upsert(movie).await?;
        info!("Added {:?} to watchlist (id {})", movie.display_title(), id);
        Ok(())
    }

    async fn delete_many(&self, movies: &[Movie]) -> Result<(), SourceError> {
        let deleted = self.store.delete_by_ids(movies).await?;
        debug!("Removed {} movies from watchlist", deleted);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use reqwest::Client;

    #[tokio::test]
    async fn test_saved_catalog_movie_lists_unchanged() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/movie/popular")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                r#"{"page":1,"results":[{
                    "id": 597,
                    "title": "Titanic",
                    "original_title": "Titanic",
                    "overview": "101-year-old Rose tells her story.",
                    "poster_path": "/9xjZS2rlVxm8SFx8kPC3aIGCOYQ.jpg",
                    "release_date": "1997-11-18"
                }],"total_pages":1,"total_results":1}"#,
            )
            .create_async()
            .await;

        let catalog = TmdbClient::new(Client::new(), "K", server.url());
        let store = WatchlistStore::in_memory().await.unwrap();
        let repository = MovieRepository::new(catalog, store);

        let page = repository.fetch_popular(1).await.unwrap();
        let titanic = page.results[0].clone();
        repository.save(&titanic).await.unwrap();

        let saved = repository.list_saved().await.unwrap();
        assert_eq!(saved, vec![titanic.clone()]);

        repository.delete_many(&[titanic]).await.unwrap();
        assert!(repository.list_saved().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remote_failure_is_reported() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/search/movie")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let catalog = TmdbClient::new(Client::new(), "K", server.url());
        let repository = MovieRepository::new(catalog, WatchlistStore::in_memory().await.unwrap());

        assert!(matches!(
            repository.search("Titanic", 1).await,
            Err(SourceError::Api { status: 500, .. })
        ));
    }
}
