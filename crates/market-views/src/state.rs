//! Render state of a section.

use market_query::QueryResult;

/// What a section shows.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    /// Skeleton with the same shape as the loaded content.
    Loading,
    /// Zero-result message.
    Empty,
    /// Populated view.
    Ready(T),
}

impl<T> ViewState<Vec<T>> {
    /// State of a list: loading wins, then empty, then ready.
    pub fn from_items(loading: bool, items: Vec<T>) -> Self {
        if loading {
            Self::Loading
        } else if items.is_empty() {
            Self::Empty
        } else {
            Self::Ready(items)
        }
    }

    /// State of a list query.
    ///
    /// A query that has no data and no error yet is loading; a failed query
    /// without data shows as empty.
    pub fn from_query(result: &QueryResult<Vec<T>>) -> Self
    where
        T: Clone,
    {
        match &result.data {
            Some(items) => Self::from_items(false, items.clone()),
            None if result.is_error() => Self::Empty,
            None => Self::Loading,
        }
    }
}

impl<T> ViewState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// The loaded content, if any.
    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ViewState<U> {
        match self {
            Self::Loading => ViewState::Loading,
            Self::Empty => ViewState::Empty,
            Self::Ready(value) => ViewState::Ready(f(value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_items() {
        assert_eq!(ViewState::from_items(true, vec![1]), ViewState::Loading);
        assert_eq!(ViewState::<Vec<u8>>::from_items(false, vec![]), ViewState::Empty);
        assert_eq!(ViewState::from_items(false, vec![1]), ViewState::Ready(vec![1]));
    }

    #[test]
    fn test_from_query() {
        let mut pending = QueryResult::<Vec<u8>>::idle();
        pending.is_fetching = true;
        assert!(ViewState::from_query(&pending).is_loading());

        let failed = QueryResult::<Vec<u8>>::failure("down");
        assert!(ViewState::from_query(&failed).is_empty());

        let mut refetching = QueryResult::success(vec![3u8]);
        refetching.is_fetching = true;
        assert_eq!(ViewState::from_query(&refetching), ViewState::Ready(vec![3]));
    }
}
