//! View state and its transitions.

/// Sort direction for the active sort column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    /// Returns the opposite direction.
    pub fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    /// Header indicator for this direction.
    pub fn indicator(self) -> &'static str {
        match self {
            Self::Ascending => "▲",
            Self::Descending => "▼",
        }
    }
}

/// The active sort: which field and which way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub key: String,
    pub direction: SortDirection,
}

/// Search, sort and pagination state of one table instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    /// Free-text search query
    pub query: String,
    /// Active sort, if any
    pub sort: Option<SortKey>,
    /// 1-based current page
    pub current_page: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            query: String::new(),
            sort: None,
            current_page: 1,
        }
    }
}

/// A user-triggered change to the view state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewAction {
    /// The search box changed.
    Search(String),
    /// A column header was activated.
    ActivateHeader { key: String, sortable: bool },
    /// A page was requested.
    GoToPage(usize),
    /// The underlying records were replaced.
    ReplaceData,
}

impl ViewState {
    /// Applies an action and returns the next state.
    ///
    /// Page requests are not clamped here since the bound depends on the
    /// data; [`ViewState::clamp_page`] runs on every render.
    pub fn apply(&self, action: ViewAction) -> ViewState {
        let mut next = self.clone();
        match action {
            ViewAction::Search(query) => {
                next.query = query;
                next.current_page = 1;
            }
            ViewAction::ActivateHeader { key, sortable } => {
                if !sortable {
                    return next;
                }
                next.sort = Some(match self.sort.as_ref() {
                    Some(current) if current.key == key => SortKey {
                        key,
                        direction: current.direction.toggled(),
                    },
                    _ => SortKey {
                        key,
                        direction: SortDirection::Ascending,
                    },
                });
            }
            ViewAction::GoToPage(page) => {
                next.current_page = page.max(1);
            }
            ViewAction::ReplaceData => {}
        }
        next
    }

    /// Clamps the current page into `[1, total_pages]`.
    pub fn clamp_page(&mut self, total_pages: usize) {
        self.current_page = self.current_page.clamp(1, total_pages.max(1));
    }

    /// Returns the trimmed query, or `None` when it is blank.
    pub fn active_query(&self) -> Option<&str> {
        let query = self.query.trim();
        (!query.is_empty()).then_some(query)
    }
}

/// Number of pages for `count` rows: `max(1, ceil(count / page_size))`.
///
/// A page size of zero counts as one.
pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1)).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(key: &str, sortable: bool) -> ViewAction {
        ViewAction::ActivateHeader {
            key: key.to_string(),
            sortable,
        }
    }

    #[test]
    fn test_search_resets_page() {
        let state = ViewState::default().apply(ViewAction::GoToPage(3));
        assert_eq!(state.current_page, 3);

        let state = state.apply(ViewAction::Search("asha".into()));
        assert_eq!(state.current_page, 1);
        assert_eq!(state.query, "asha");
    }

    #[test]
    fn test_same_header_toggles_direction() {
        let state = ViewState::default().apply(header("fare", true));
        assert_eq!(state.sort.as_ref().map(|s| s.direction), Some(SortDirection::Ascending));

        let state = state.apply(header("fare", true));
        assert_eq!(state.sort.as_ref().map(|s| s.direction), Some(SortDirection::Descending));

        let state = state.apply(header("fare", true));
        assert_eq!(state.sort.as_ref().map(|s| s.direction), Some(SortDirection::Ascending));
    }

    #[test]
    fn test_new_header_resets_to_ascending() {
        let state = ViewState::default()
            .apply(header("fare", true))
            .apply(header("fare", true))
            .apply(header("status", true));
        assert_eq!(
            state.sort,
            Some(SortKey {
                key: "status".into(),
                direction: SortDirection::Ascending
            })
        );
    }

    #[test]
    fn test_non_sortable_header_is_noop() {
        let state = ViewState::default().apply(header("fare", true));
        let next = state.apply(header("actions", false));
        assert_eq!(next, state);
    }

    #[test]
    fn test_page_zero_becomes_one() {
        let state = ViewState::default().apply(ViewAction::GoToPage(0));
        assert_eq!(state.current_page, 1);
    }

    #[test]
    fn test_clamp_and_total_pages() {
        assert_eq!(total_pages(0, 10), 1);
        assert_eq!(total_pages(30, 10), 3);
        assert_eq!(total_pages(31, 10), 4);
        assert_eq!(total_pages(5, 0), 5);

        let mut state = ViewState::default().apply(ViewAction::GoToPage(99));
        state.clamp_page(3);
        assert_eq!(state.current_page, 3);
    }

    #[test]
    fn test_blank_query_is_inactive() {
        let state = ViewState::default().apply(ViewAction::Search("   ".into()));
        assert_eq!(state.active_query(), None);
    }
}
