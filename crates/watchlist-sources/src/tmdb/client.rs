use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use watchlist_config::TmdbConfig;
use watchlist_models::{CatalogPage, MovieCategory};
use crate::error::SourceError;

const USER_AGENT: &str = concat!("watchlist/", env!("CARGO_PKG_VERSION"));

/// Create the shared reqwest Client used for catalog calls
pub fn create_http_client() -> Client {
    Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Client for the three catalog endpoints the app reads.
#[derive(Clone)]
pub struct TmdbClient {
    client: Client,
    api_key: String,
    base_url: String,
    language: Option<String>,
}

impl TmdbClient {
    pub fn new(client: Client, api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into(),
            language: None,
        }
    }

    pub fn from_config(client: Client, config: &TmdbConfig) -> Result<Self, SourceError> {
        if config.api_key.trim().is_empty() {
            return Err(SourceError::Config("TMDB API key is empty".to_string()));
        }
        Ok(Self::new(client, config.api_key.clone(), config.base_url.clone())
            .with_language(config.language.clone()))
    }

    pub fn with_language(mut self, language: Option<String>) -> Self {
        self.language = language;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    /// GET /movie/popular or /movie/upcoming
    #[instrument(skip(self))]
    pub async fn list(&self, category: MovieCategory, page: u32) -> Result<CatalogPage, SourceError> {
        let path = match category {
            MovieCategory::Popular => "movie/popular",
            MovieCategory::Upcoming => "movie/upcoming",
        };
        self.get_page(path, None, page).await
    }

    pub async fn popular(&self, page: u32) -> Result<CatalogPage, SourceError> {
        self.list(MovieCategory::Popular, page).await
    }

    pub async fn upcoming(&self, page: u32) -> Result<CatalogPage, SourceError> {
        self.list(MovieCategory::Upcoming, page).await
    }

    /// GET /search/movie
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str, page: u32) -> Result<CatalogPage, SourceError> {
        self.get_page("search/movie", Some(query), page).await
    }

    async fn get_page(&self, path: &str, query: Option<&str>, page: u32) -> Result<CatalogPage, SourceError> {
        let page = page.to_string();
        let mut params: Vec<(&str, &str)> = vec![("api_key", self.api_key.as_str()), ("page", page.as_str())];
        if let Some(query) = query {
            params.push(("query", query));
        }
        if let Some(language) = self.language.as_deref() {
            params.push(("language", language));
        }

        debug!("GET {} (page {})", path, page);
        let response = self.client.get(self.url(path)).query(&params).send().await?;
        let catalog_page: CatalogPage = handle_response(response).await?;
        debug!(
            "{} returned {} of {} results",
            path,
            catalog_page.results.len(),
            catalog_page.total_results
        );
        Ok(catalog_page)
    }
}

async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, SourceError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(SourceError::Api {
            status: status.as_u16(),
            message: body,
        });
    }
    let deserializer = &mut serde_json::Deserializer::from_str(&body);
    serde_path_to_error::deserialize(deserializer).map_err(|e| SourceError::Json {
        path: e.path().to_string(),
        source: e.into_inner(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    const TITANIC_PAGE: &str = r#"{
        "page": 1,
        "results": [{"id": 1, "title": "Titanic", "original_title": "Titanic", "release_date": "1997-11-18"}],
        "total_pages": 1,
        "total_results": 1
    }"#;

    #[tokio::test]
    async fn test_popular_sends_key_and_page() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/movie/popular")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("api_key".into(), "K".into()),
                Matcher::UrlEncoded("page".into(), "1".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(TITANIC_PAGE)
            .create_async()
            .await;

        let client = TmdbClient::new(Client::new(), "K", server.url());
        let page = client.popular(1).await.unwrap();

        mock.assert_async().await;
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.results[0].id, Some(1));
        assert_eq!(page.results[0].title.as_deref(), Some("Titanic"));
    }

    #[tokio::test]
    async fn test_search_sends_query_and_language() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/search/movie")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("api_key".into(), "K".into()),
                Matcher::UrlEncoded("query".into(), "finding nemo".into()),
                Matcher::UrlEncoded("page".into(), "1".into()),
                Matcher::UrlEncoded("language".into(), "en-US".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"page":1,"results":[],"total_pages":0,"total_results":0}"#)
            .create_async()
            .await;

        let client = TmdbClient::new(Client::new(), "K", format!("{}/", server.url()))
            .with_language(Some("en-US".to_string()));
        let page = client.search("finding nemo", 1).await.unwrap();

        mock.assert_async().await;
        assert!(page.is_empty());
    }

    #[tokio::test]
    async fn test_upcoming_tolerates_missing_ids() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/movie/upcoming")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"page":1,"results":[{"id":null,"title":"Untitled"}]}"#)
            .create_async()
            .await;

        let client = TmdbClient::new(Client::new(), "K", server.url());
        let page = client.upcoming(1).await.unwrap();
        assert_eq!(page.results[0].id, None);
        assert_eq!(page.total_results, 0);
    }

    #[tokio::test]
    async fn test_api_error_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/movie/popular")
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body(r#"{"status_message":"Invalid API key"}"#)
            .create_async()
            .await;

        let client = TmdbClient::new(Client::new(), "bad", server.url());
        match client.popular(1).await {
            Err(SourceError::Api { status, message }) => {
                assert_eq!(status, 401);
                assert!(message.contains("Invalid API key"));
            }
            other => panic!("expected API error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_reports_path() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/movie/popular")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"page":1,"results":[{"id":"one"}]}"#)
            .create_async()
            .await;

        let client = TmdbClient::new(Client::new(), "K", server.url());
        match client.popular(1).await {
            Err(SourceError::Json { path, .. }) => assert_eq!(path, "results[0].id"),
            other => panic!("expected JSON error, got {:?}", other),
        }
    }

    #[test]
    fn test_from_config_requires_key() {
        let config = TmdbConfig::default();
        assert!(TmdbClient::from_config(Client::new(), &config).is_err());
    }
}
