//! Viewer state

use serde::Serialize;

use flipview_common::ZoomLevel;

/// Mutable state owned by the viewer controller
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewerState {
    /// Current page, 1-based; 0 only for an empty deck
    pub current: u32,
    pub total: u32,
    pub zoom: ZoomLevel,
    pub thumbnails_open: bool,
    pub fullscreen: bool,
}

impl ViewerState {
    pub fn new(total: u32) -> Self {
        Self {
            current: total.min(1),
            total,
            zoom: ZoomLevel::default(),
            thumbnails_open: false,
            fullscreen: false,
        }
    }

    /// Whether `ordinal` names a page of the deck.
    pub fn contains(&self, ordinal: u32) -> bool {
        (1..=self.total).contains(&ordinal)
    }

    pub fn at_first(&self) -> bool {
        self.current <= 1
    }

    pub fn at_last(&self) -> bool {
        self.current >= self.total
    }

    pub fn counter_text(&self) -> String {
        counter_text(self.current, self.total)
    }

    /// The current page and its neighbours that exist.
    pub fn window(&self) -> Vec<u32> {
        neighborhood(self.current, self.total)
    }
}

/// Page-counter text: the single ordinal on the first and last page, the
/// spread as a hyphenated range otherwise.
pub fn counter_text(current: u32, total: u32) -> String {
    if current <= 1 || current >= total {
        current.to_string()
    } else {
        format!("{}-{}", current, current + 1)
    }
}

/// `page - 1`, `page` and `page + 1`, limited to `1..=total`.
pub fn neighborhood(page: u32, total: u32) -> Vec<u32> {
    [page.saturating_sub(1), page, page.saturating_add(1)]
        .into_iter()
        .filter(|p| (1..=total).contains(p))
        .fold(Vec::with_capacity(3), |mut pages, p| {
            if !pages.contains(&p) {
                pages.push(p);
            }
            pages
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_text_every_page() {
        let total = 12;
        for current in 1..=total {
            let text = counter_text(current, total);
            if current == 1 || current == total {
                assert_eq!(text, current.to_string());
            } else {
                assert_eq!(text, format!("{}-{}", current, current + 1));
            }
        }
    }

    #[test]
    fn test_counter_text_small_decks() {
        assert_eq!(counter_text(1, 1), "1");
        assert_eq!(counter_text(2, 2), "2");
        assert_eq!(counter_text(2, 3), "2-3");
    }

    #[test]
    fn test_boundaries() {
        let mut state = ViewerState::new(12);
        assert_eq!(state.current, 1);
        assert!(state.at_first());
        assert!(!state.at_last());
        assert!(!state.contains(0));
        assert!(!state.contains(13));

        state.current = 12;
        assert!(state.at_last());
        assert!(!state.at_first());
    }

    #[test]
    fn test_window() {
        let mut state = ViewerState::new(12);
        assert_eq!(state.window(), vec![1, 2]);
        state.current = 6;
        assert_eq!(state.window(), vec![5, 6, 7]);
        state.current = 12;
        assert_eq!(state.window(), vec![11, 12]);
        assert!(neighborhood(0, 0).is_empty());
    }

    #[test]
    fn test_empty_deck() {
        let state = ViewerState::new(0);
        assert_eq!(state.current, 0);
        assert!(state.window().is_empty());
    }
}
