//! Reviews slice

use std::collections::BTreeSet;

use crate::api;
use crate::http::ApiError;
use crate::store::collection::{Collection, CollectionAction};
use crate::store::thunk::track;
use crate::store::{Action, Store};
use crate::types::{Page, PageQuery, Review, ReviewDraft};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewsState {
    pub list: Collection<Review>,
    /// Reviews this user marked helpful
    pub helpful: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReviewsAction {
    Collection(CollectionAction<Review>),
    MarkedHelpful(Review),
}

pub fn reduce(state: &mut ReviewsState, action: ReviewsAction) {
    match action {
        ReviewsAction::Collection(action) => {
            if let CollectionAction::Removed(id) = &action {
                state.helpful.remove(id);
            }
            state.list.apply(action);
        }
        ReviewsAction::MarkedHelpful(review) => {
            state.helpful.insert(review.id.clone());
            state.list.apply(CollectionAction::Updated(review));
        }
    }
}

fn collection(action: CollectionAction<Review>) -> Action {
    Action::Reviews(ReviewsAction::Collection(action))
}

fn pending() -> Action {
    collection(CollectionAction::Pending)
}

fn rejected(message: String) -> Action {
    collection(CollectionAction::Rejected(message))
}

pub struct ReviewOps<'a> {
    store: &'a Store,
}

impl<'a> ReviewOps<'a> {
    pub(crate) fn new(store: &'a Store) -> Self {
        Self { store }
    }

    pub async fn fetch_all(&self, target_id: Option<&str>, query: PageQuery) -> Result<Page<Review>, ApiError> {
        track(
            self.store,
            pending(),
            api::reviews::list(self.store.api(), target_id, query),
            |page: &Page<Review>| {
                collection(CollectionAction::Listed {
                    items: page.data.clone(),
                    pagination: page.pagination,
                })
            },
            rejected,
        )
        .await
    }

    pub async fn fetch(&self, id: &str) -> Result<Review, ApiError> {
        track(
            self.store,
            pending(),
            api::reviews::get(self.store.api(), id),
            |review: &Review| collection(CollectionAction::Fetched(review.clone())),
            rejected,
        )
        .await
    }

    pub async fn create(&self, draft: &ReviewDraft) -> Result<Review, ApiError> {
        track(
            self.store,
            pending(),
            api::reviews::create(self.store.api(), draft),
            |review: &Review| collection(CollectionAction::Created(review.clone())),
            rejected,
        )
        .await
    }

    pub async fn update(&self, id: &str, draft: &ReviewDraft) -> Result<Review, ApiError> {
        track(
            self.store,
            pending(),
            api::reviews::update(self.store.api(), id, draft),
            |review: &Review| collection(CollectionAction::Updated(review.clone())),
            rejected,
        )
        .await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        track(
            self.store,
            pending(),
            api::reviews::delete(self.store.api(), id),
            |_| collection(CollectionAction::Removed(id.to_string())),
            rejected,
        )
        .await
    }

    pub async fn mark_helpful(&self, id: &str) -> Result<Review, ApiError> {
        track(
            self.store,
            pending(),
            api::reviews::mark_helpful(self.store.api(), id),
            |review: &Review| Action::Reviews(ReviewsAction::MarkedHelpful(review.clone())),
            rejected,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::testing::FakeTransport;
    use crate::http::ApiResponse;
    use crate::store::test_support::store;
    use serde_json::json;

    #[tokio::test]
    async fn test_mark_helpful_updates_count_and_set() {
        let transport = FakeTransport::new(|request| {
            if request.path().ends_with("/helpful") {
                Ok(ApiResponse::json_body(200, &json!({ "id": "r1", "targetId": "g1", "rating": 5, "helpfulCount": 4 })))
            } else {
                Ok(ApiResponse::json_body(200, &json!([{ "id": "r1", "targetId": "g1", "rating": 5, "helpfulCount": 3 }])))
            }
        });
        let store = store(transport);
        let ops = store.reviews();

        ops.fetch_all(Some("g1"), PageQuery::default()).await.unwrap();
        ops.mark_helpful("r1").await.unwrap();

        let reviews = store.state().reviews;
        assert_eq!(reviews.list.items[0].helpful_count, 4);
        assert!(reviews.helpful.contains("r1"));
        assert!(!reviews.list.loading());
    }
}
