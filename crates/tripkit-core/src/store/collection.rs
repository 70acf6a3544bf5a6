//! Per-resource collection state and its reducer

use crate::types::{Pagination, Record};

/// Request lifecycle bookkeeping shared by every slice.
///
/// `loading` is true while at least one dispatched operation is unsettled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Status {
    pub loading: bool,
    pub error: Option<String>,
    in_flight: usize,
}

impl Status {
    /// An operation was dispatched
    pub fn begin(&mut self) {
        self.in_flight += 1;
        self.loading = true;
        self.error = None;
    }

    /// An operation settled successfully
    pub fn succeed(&mut self) {
        self.settle();
    }

    /// An operation settled with a failure
    pub fn fail(&mut self, message: String) {
        self.settle();
        self.error = Some(message);
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    fn settle(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.loading = self.in_flight > 0;
    }
}

/// Local mirror of one server collection
#[derive(Debug, Clone, PartialEq)]
pub struct Collection<T> {
    pub items: Vec<T>,
    pub current: Option<T>,
    pub pagination: Option<Pagination>,
    pub status: Status,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            current: None,
            pagination: None,
            status: Status::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CollectionAction<T> {
    Pending,
    Rejected(String),
    ClearError,
    /// Fulfilled without touching the records
    Settled,
    Listed {
        items: Vec<T>,
        pagination: Option<Pagination>,
    },
    Fetched(T),
    Created(T),
    Updated(T),
    Removed(String),
}

impl<T: Record> Collection<T> {
    pub fn loading(&self) -> bool {
        self.status.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.status.error.as_deref()
    }

    pub fn find(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn apply(&mut self, action: CollectionAction<T>) {
        match action {
            CollectionAction::Pending => self.status.begin(),
            CollectionAction::Rejected(message) => self.status.fail(message),
            CollectionAction::ClearError => self.status.clear_error(),
            CollectionAction::Settled => self.status.succeed(),
            CollectionAction::Listed { items, pagination } => {
                self.status.succeed();
                self.items = items;
                self.pagination = pagination;
            }
            CollectionAction::Fetched(record) => {
                self.status.succeed();
                self.current = Some(record);
            }
            CollectionAction::Created(record) => {
                self.status.succeed();
                self.upsert_front(record);
            }
            CollectionAction::Updated(record) => {
                self.status.succeed();
                self.replace(record);
            }
            CollectionAction::Removed(id) => {
                self.status.succeed();
                self.remove(&id);
            }
        }
    }

    /// Insert at the head, dropping any older copy, and make it current
    fn upsert_front(&mut self, record: T) {
        self.items.retain(|item| item.id() != record.id());
        self.items.insert(0, record.clone());
        self.current = Some(record);
    }

    /// Replace in place; an id that is not held stays absent
    fn replace(&mut self, record: T) {
        if let Some(slot) = self.items.iter_mut().find(|item| item.id() == record.id()) {
            *slot = record.clone();
        }
        if self.current.as_ref().is_some_and(|current| current.id() == record.id()) {
            self.current = Some(record);
        }
    }

    fn remove(&mut self, id: &str) {
        self.items.retain(|item| item.id() != id);
        if self.current.as_ref().is_some_and(|current| current.id() == id) {
            self.current = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Guide;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn guide(id: &str, name: &str) -> Guide {
        Guide {
            id: id.to_string(),
            name: name.to_string(),
            bio: None,
            languages: Vec::new(),
            rating: None,
            hourly_rate: None,
        }
    }

    fn listed(ids: &[String]) -> Collection<Guide> {
        let mut collection = Collection::default();
        collection.apply(CollectionAction::Pending);
        collection.apply(CollectionAction::Listed {
            items: ids.iter().map(|id| guide(id, "listed")).collect(),
            pagination: None,
        });
        collection
    }

    fn ids(collection: &Collection<Guide>) -> Vec<&str> {
        collection.items.iter().map(|g| g.id.as_str()).collect()
    }

    #[test]
    fn test_pending_clears_error_and_sets_loading() {
        let mut collection: Collection<Guide> = Collection::default();
        collection.apply(CollectionAction::Pending);
        collection.apply(CollectionAction::Rejected("boom".to_string()));
        assert_eq!(collection.error(), Some("boom"));
        assert!(!collection.loading());

        collection.apply(CollectionAction::Pending);
        assert!(collection.loading());
        assert_eq!(collection.error(), None);
    }

    #[test]
    fn test_rejection_keeps_data() {
        let mut collection = listed(&["a".to_string(), "b".to_string()]);
        let before = collection.items.clone();

        collection.apply(CollectionAction::Pending);
        collection.apply(CollectionAction::Rejected("Network error. Please check your internet connection.".to_string()));

        assert_eq!(collection.items, before);
        assert_eq!(
            collection.error(),
            Some("Network error. Please check your internet connection.")
        );
    }

    #[test]
    fn test_overlapping_operations_keep_loading() {
        let mut collection: Collection<Guide> = Collection::default();
        collection.apply(CollectionAction::Pending);
        collection.apply(CollectionAction::Pending);

        collection.apply(CollectionAction::Fetched(guide("a", "A")));
        assert!(collection.loading());
        assert_eq!(collection.status.in_flight(), 1);

        collection.apply(CollectionAction::Settled);
        assert!(!collection.loading());
    }

    #[test]
    fn test_update_of_absent_id_is_ignored() {
        let mut collection = listed(&["a".to_string()]);
        collection.apply(CollectionAction::Pending);
        collection.apply(CollectionAction::Updated(guide("zombie", "deleted elsewhere")));
        assert_eq!(ids(&collection), vec!["a"]);
    }

    #[test]
    fn test_update_refreshes_current() {
        let mut collection = listed(&["a".to_string()]);
        collection.apply(CollectionAction::Pending);
        collection.apply(CollectionAction::Fetched(guide("a", "old")));
        collection.apply(CollectionAction::Pending);
        collection.apply(CollectionAction::Updated(guide("a", "new")));

        assert_eq!(collection.current, Some(guide("a", "new")));
        assert_eq!(collection.find("a"), Some(&guide("a", "new")));
    }

    #[test]
    fn test_settle_without_dispatch_does_not_underflow() {
        let mut collection: Collection<Guide> = Collection::default();
        collection.apply(CollectionAction::Settled);
        assert!(!collection.loading());
        assert_eq!(collection.status.in_flight(), 0);
    }

    fn id_list() -> impl Strategy<Value = Vec<String>> {
        proptest::collection::hash_set("[a-f]{1,3}", 0..12)
            .prop_map(|set| set.into_iter().collect::<Vec<_>>())
    }

    proptest! {
        #[test]
        fn create_puts_id_once_at_head(existing in id_list(), id in "[a-f]{1,3}") {
            let mut collection = listed(&existing);
            collection.apply(CollectionAction::Pending);
            collection.apply(CollectionAction::Created(guide(&id, "created")));

            prop_assert_eq!(collection.items[0].id.as_str(), id.as_str());
            prop_assert_eq!(collection.items.iter().filter(|g| g.id == id).count(), 1);
            prop_assert_eq!(collection.current.as_ref().map(|g| g.id.as_str()), Some(id.as_str()));
            prop_assert!(!collection.loading());
        }

        #[test]
        fn delete_removes_id_and_clears_current(existing in id_list(), pick in any::<prop::sample::Index>()) {
            prop_assume!(!existing.is_empty());
            let id = existing[pick.index(existing.len())].clone();

            let mut collection = listed(&existing);
            collection.apply(CollectionAction::Pending);
            collection.apply(CollectionAction::Fetched(guide(&id, "current")));
            collection.apply(CollectionAction::Pending);
            collection.apply(CollectionAction::Removed(id.clone()));

            prop_assert!(collection.find(&id).is_none());
            prop_assert_eq!(collection.items.len(), existing.len() - 1);
            prop_assert!(collection.current.is_none());
        }

        #[test]
        fn update_keeps_length_and_position(existing in id_list(), pick in any::<prop::sample::Index>()) {
            prop_assume!(!existing.is_empty());
            let position = pick.index(existing.len());
            let id = existing[position].clone();

            let mut collection = listed(&existing);
            collection.apply(CollectionAction::Pending);
            collection.apply(CollectionAction::Updated(guide(&id, "updated")));

            prop_assert_eq!(collection.items.len(), existing.len());
            prop_assert_eq!(&collection.items[position], &guide(&id, "updated"));
        }

        #[test]
        fn loading_tracks_unsettled_operations(dispatched in 1usize..8, settled in 0usize..8) {
            let settled = settled.min(dispatched);
            let mut collection: Collection<Guide> = Collection::default();
            for _ in 0..dispatched {
                collection.apply(CollectionAction::Pending);
            }
            for _ in 0..settled {
                collection.apply(CollectionAction::Settled);
            }

            prop_assert_eq!(collection.loading(), settled < dispatched);
        }
    }
}
