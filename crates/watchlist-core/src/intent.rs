use std::fmt;
use watchlist_models::{Movie, MovieCategory};
use watchlist_sources::MovieDataSource;
use crate::error::CoreError;

/// User interaction delivered to a screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// (Re)load whatever the screen shows. Also used to refresh structural
    /// state after re-attaching.
    Load,
    /// Load a specific catalog page (movies screens).
    LoadPage(u32),
    /// Run a search; a blank query clears the results.
    Search(String),
    AddToWatchlist(Movie),
    CheckItem { movie: Movie, checked: bool },
    FloatingActionButtonClick,
    /// The user accepted the delete confirmation prompt.
    ConfirmDelete,
    /// The view's list changed out of band and selection must be reset.
    ReconcileList(Vec<Movie>),
}

/// Identifies one outstanding request. Tokens are unique per screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestToken(pub u64);

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Data source call a screen wants performed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    FetchCatalog { category: MovieCategory, page: u32 },
    Search { query: String, page: u32 },
    ListSaved,
    Save(Movie),
    DeleteMany(Vec<Movie>),
}

/// Successful result of a `Request`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Movies(Vec<Movie>),
    Saved,
    Deleted,
}

/// A request together with the token its outcome will carry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    pub token: RequestToken,
    pub request: Request,
}

/// Completion of a dispatched request
#[derive(Debug)]
pub struct Outcome {
    pub token: RequestToken,
    pub result: Result<Response, CoreError>,
}

impl Request {
    pub async fn execute(self, source: &dyn MovieDataSource) -> Result<Response, CoreError> {
        let response = match self {
            Request::FetchCatalog { category: MovieCategory::Popular, page } => {
                Response::Movies(source.fetch_popular(page).await?.results)
            }
            Request::FetchCatalog { category: MovieCategory::Upcoming, page } => {
                Response::Movies(source.fetch_upcoming(page).await?.results)
            }
            Request::Search { query, page } => {
                Response::Movies(source.search(&query, page).await?.results)
            }
            Request::ListSaved => Response::Movies(source.list_saved().await?),
            Request::Save(movie) => {
                source.save(&movie).await?;
                Response::Saved
            }
            Request::DeleteMany(movies) => {
                source.delete_many(&movies).await?;
                Response::Deleted
            }
        };
        Ok(response)
    }
}
