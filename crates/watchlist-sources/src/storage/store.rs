use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{FromRow, SqlitePool};
use std::path::Path;
use tracing::{debug, info, warn};
use watchlist_models::Movie;

const SELECT_MOVIES: &str = r#"
    SELECT id, original_title, overview, poster_path, release_date, title
    FROM movies
"#;

/// One row of the `movies` table
#[derive(Debug, FromRow)]
struct MovieRow {
    id: i64,
    original_title: Option<String>,
    overview: Option<String>,
    poster_path: Option<String>,
    release_date: Option<String>,
    title: Option<String>,
}

impl From<MovieRow> for Movie {
    fn from(row: MovieRow) -> Self {
        Movie {
            id: Some(row.id),
            original_title: row.original_title,
            overview: row.overview,
            poster_path: row.poster_path,
            release_date: row.release_date,
            title: row.title,
        }
    }
}

/// The local watchlist: a single SQLite table of movies keyed by id.
#[derive(Clone)]
pub struct WatchlistStore {
    pool: SqlitePool,
}

impl WatchlistStore {
    /// Open (or create) the database file and make sure the table exists
    pub async fn open(path: &Path) -> Result<Self, sqlx::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;
        info!("Opened watchlist database at {}", path.display());
        Self::from_pool(pool).await
    }

    /// Private in-memory database; contents are gone when the store is dropped
    pub async fn in_memory() -> Result<Self, sqlx::Error> {
        // A single connection that never expires keeps the memory database alive
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        Self::from_pool(pool).await
    }

    pub async fn from_pool(pool: SqlitePool) -> Result<Self, sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS movies (
                id INTEGER PRIMARY KEY,
                original_title TEXT,
                overview TEXT,
                poster_path TEXT,
                release_date TEXT,
                title TEXT
            )
            "#,
        )
        .execute(&pool)
        .await?;
        Ok(Self { pool })
    }

    /// All saved movies, ordered by id
    pub async fn list(&self) -> Result<Vec<Movie>, sqlx::Error> {
        let query = format!("{} ORDER BY id", SELECT_MOVIES);
        let rows = sqlx::query_as::<_, MovieRow>(&query)
            .fetch_all(&self.pool)
            .await?;
        debug!("Loaded {} saved movies", rows.len());
        Ok(rows.into_iter().map(Movie::from).collect())
    }

    /// Insert or replace a movie by id. A movie without an id gets a new one.
    pub async fn upsert(&self, movie: &Movie) -> Result<i64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT OR REPLACE INTO movies (id, original_title, overview, poster_path, release_date, title)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(movie.id)
        .bind(&movie.original_title)
        .bind(&movie.overview)
        .bind(&movie.poster_path)
        .bind(&movie.release_date)
        .bind(&movie.title)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        debug!("Saved movie {:?} as row {}", movie.display_title(), id);
        Ok(id)
    }

    /// Delete the given movies by id in one transaction; returns rows removed
    pub async fn delete_by_ids(&self, movies: &[Movie]) -> Result<u64, sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        let mut deleted = 0;

        for movie in movies {
            let Some(id) = movie.id else {
                warn!("Skipping delete of movie without id: {:?}", movie.display_title());
                continue;
            };
            let result = sqlx::query("DELETE FROM movies WHERE id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            deleted += result.rows_affected();
        }

        tx.commit().await?;
        debug!("Deleted {} of {} requested movies", deleted, movies.len());
        Ok(deleted)
    }

    pub async fn count(&self) -> Result<i64, sqlx::Error> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM movies")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0)
    }
}
