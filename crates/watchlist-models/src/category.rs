use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Remote list a movies screen shows.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MovieCategory {
    Popular,
    Upcoming,
}

impl MovieCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovieCategory::Popular => "popular",
            MovieCategory::Upcoming => "upcoming",
        }
    }
}

impl fmt::Display for MovieCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCategoryError(pub String);

impl fmt::Display for ParseCategoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown movie category: {}", self.0)
    }
}

impl std::error::Error for ParseCategoryError {}

impl FromStr for MovieCategory {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "popular" => Ok(MovieCategory::Popular),
            "upcoming" => Ok(MovieCategory::Upcoming),
            other => Err(ParseCategoryError(other.to_string())),
        }
    }
}
