pub mod traits;
pub mod tmdb;
pub mod storage;
pub mod repository;
pub mod error;

pub use traits::MovieDataSource;
pub use tmdb::TmdbClient;
pub use storage::WatchlistStore;
pub use repository::MovieRepository;
pub use error::SourceError;
