use watchlist_models::{Movie, Notice};
use crate::state::{FabIcon, ScreenState};

/// Movies currently checked on the watchlist screen, in check order.
///
/// Membership is by value: two structurally identical movies are the same
/// entry.
#[derive(Debug, Clone, Default)]
pub struct SelectionTracker {
    selected: Vec<Movie>,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a movie (no duplicates) and return the derived icon
    pub fn check(&mut self, movie: Movie) -> FabIcon {
        if !self.selected.contains(&movie) {
            self.selected.push(movie);
        }
        self.fab_icon()
    }

    /// Remove a movie and return the derived icon
    pub fn uncheck(&mut self, movie: &Movie) -> FabIcon {
        self.selected.retain(|m| m != movie);
        self.fab_icon()
    }

    pub fn fab_icon(&self) -> FabIcon {
        FabIcon::for_selection_len(self.selected.len())
    }

    /// What a floating action button click leads to
    pub fn fab_action(&self) -> ScreenState {
        if self.selected.is_empty() {
            ScreenState::NavigateToSearch
        } else {
            ScreenState::ShowDeleteConfirmation
        }
    }

    pub fn deletion_notice(count: usize) -> Notice {
        Notice::for_deleted_count(count)
    }

    /// Drop selected movies that are no longer in `displayed`
    pub fn retain_displayed(&mut self, displayed: &[Movie]) {
        self.selected.retain(|m| displayed.contains(m));
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn snapshot(&self) -> Vec<Movie> {
        self.selected.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(title: &str) -> Movie {
        Movie {
            title: Some(title.to_string()),
            ..Movie::default()
        }
    }

    #[test]
    fn test_icon_transitions() {
        let mut selection = SelectionTracker::new();
        let a = movie("A");
        let b = movie("B");

        // 0 -> 1 -> 0
        assert_eq!(selection.check(a.clone()), FabIcon::Delete);
        assert_eq!(selection.uncheck(&a), FabIcon::Add);

        // 1 -> 2 -> 1 -> 0
        selection.check(a.clone());
        assert_eq!(selection.check(b.clone()), FabIcon::Delete);
        assert_eq!(selection.uncheck(&a), FabIcon::Delete);
        assert_eq!(selection.uncheck(&b), FabIcon::Add);
    }

    #[test]
    fn test_check_is_by_value_without_duplicates() {
        let mut selection = SelectionTracker::new();
        selection.check(movie("A"));
        selection.check(movie("A"));
        assert_eq!(selection.len(), 1);

        selection.uncheck(&movie("A"));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_keeps_check_order() {
        let mut selection = SelectionTracker::new();
        selection.check(movie("B"));
        selection.check(movie("A"));
        assert_eq!(selection.snapshot(), vec![movie("B"), movie("A")]);
    }

    #[test]
    fn test_fab_action() {
        let mut selection = SelectionTracker::new();
        assert_eq!(selection.fab_action(), ScreenState::NavigateToSearch);
        selection.check(movie("A"));
        assert_eq!(selection.fab_action(), ScreenState::ShowDeleteConfirmation);
    }

    #[test]
    fn test_retain_displayed() {
        let mut selection = SelectionTracker::new();
        selection.check(movie("A"));
        selection.check(movie("B"));
        selection.retain_displayed(&[movie("B"), movie("C")]);
        assert_eq!(selection.snapshot(), vec![movie("B")]);
    }

    #[test]
    fn test_deletion_notice() {
        assert_eq!(SelectionTracker::deletion_notice(1), Notice::MovieDeleted);
        assert_eq!(SelectionTracker::deletion_notice(2), Notice::MoviesDeleted);
    }
}
