//! Payments slice

use crate::api;
use crate::http::ApiError;
use crate::store::collection::CollectionAction;
use crate::store::thunk::track;
use crate::store::{Action, Store};
use crate::types::{Page, PageQuery, Payment, PaymentDraft};

fn rejected(message: String) -> Action {
    Action::Payments(CollectionAction::Rejected(message))
}

pub struct PaymentOps<'a> {
    store: &'a Store,
}

impl<'a> PaymentOps<'a> {
    pub(crate) fn new(store: &'a Store) -> Self {
        Self { store }
    }

    pub async fn fetch_all(&self, query: PageQuery) -> Result<Page<Payment>, ApiError> {
        track(
            self.store,
            Action::Payments(CollectionAction::Pending),
            api::payments::list(self.store.api(), query),
            |page: &Page<Payment>| {
                Action::Payments(CollectionAction::Listed {
                    items: page.data.clone(),
                    pagination: page.pagination,
                })
            },
            rejected,
        )
        .await
    }

    pub async fn fetch(&self, id: &str) -> Result<Payment, ApiError> {
        track(
            self.store,
            Action::Payments(CollectionAction::Pending),
            api::payments::get(self.store.api(), id),
            |payment: &Payment| Action::Payments(CollectionAction::Fetched(payment.clone())),
            rejected,
        )
        .await
    }

    pub async fn create(&self, draft: &PaymentDraft) -> Result<Payment, ApiError> {
        track(
            self.store,
            Action::Payments(CollectionAction::Pending),
            api::payments::create(self.store.api(), draft),
            |payment: &Payment| Action::Payments(CollectionAction::Created(payment.clone())),
            rejected,
        )
        .await
    }
}
