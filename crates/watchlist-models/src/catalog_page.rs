use serde::{Deserialize, Serialize};
use crate::movie::Movie;

/// One page of a remote list or search call.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CatalogPage {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub results: Vec<Movie>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

impl CatalogPage {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_page() {
        let json = r#"{
            "page": 1,
            "results": [{"id": 1, "title": "Titanic", "release_date": "1997-11-18"}],
            "total_pages": 3,
            "total_results": 55
        }"#;
        let page: CatalogPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_results, 55);
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.results[0].id, Some(1));
        assert!(!page.is_empty());
    }

    #[test]
    fn test_deserialize_page_without_results() {
        let page: CatalogPage = serde_json::from_str("{}").unwrap();
        assert!(page.is_empty());
        assert_eq!(page.page, 0);
    }
}
