use serde::{Deserialize, Serialize};

/// A catalog item, either decoded from a remote catalog page or read back
/// from the local watchlist table.
///
/// Every field is optional because catalog responses are not always complete.
/// Equality covers all fields, so two movies with the same `id` but different
/// titles are different values.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Movie {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

impl Movie {
    /// Title to show, falling back to the original title.
    pub fn display_title(&self) -> Option<&str> {
        self.title.as_deref().or(self.original_title.as_deref())
    }

    /// First hyphen-delimited segment of the release date.
    ///
    /// `"2003-05-30"` and `"2003"` both give `"2003"`; an empty date gives an
    /// empty year; a missing date gives `None`.
    pub fn release_year(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .and_then(|date| date.split('-').next())
    }

    /// Full poster URL under `image_base_url`, or `None` when the movie has no
    /// poster (callers show a placeholder instead).
    pub fn poster_url(&self, image_base_url: &str) -> Option<String> {
        self.poster_path.as_deref().map(|path| {
            format!(
                "{}/{}",
                image_base_url.trim_end_matches('/'),
                path.trim_start_matches('/')
            )
        })
    }
}
