//! Alerts slice

use crate::api;
use crate::http::ApiError;
use crate::store::collection::CollectionAction;
use crate::store::thunk::track;
use crate::store::{Action, Store};
use crate::types::{Alert, Page, PageQuery};

fn rejected(message: String) -> Action {
    Action::Alerts(CollectionAction::Rejected(message))
}

pub struct AlertOps<'a> {
    store: &'a Store,
}

impl<'a> AlertOps<'a> {
    pub(crate) fn new(store: &'a Store) -> Self {
        Self { store }
    }

    pub async fn fetch_all(&self, query: PageQuery) -> Result<Page<Alert>, ApiError> {
        track(
            self.store,
            Action::Alerts(CollectionAction::Pending),
            api::alerts::list(self.store.api(), query),
            |page: &Page<Alert>| {
                Action::Alerts(CollectionAction::Listed {
                    items: page.data.clone(),
                    pagination: page.pagination,
                })
            },
            rejected,
        )
        .await
    }

    pub async fn fetch(&self, id: &str) -> Result<Alert, ApiError> {
        track(
            self.store,
            Action::Alerts(CollectionAction::Pending),
            api::alerts::get(self.store.api(), id),
            |alert: &Alert| Action::Alerts(CollectionAction::Fetched(alert.clone())),
            rejected,
        )
        .await
    }

    /// Dismissed alerts leave the local list
    pub async fn dismiss(&self, id: &str) -> Result<(), ApiError> {
        track(
            self.store,
            Action::Alerts(CollectionAction::Pending),
            api::alerts::dismiss(self.store.api(), id),
            |_| Action::Alerts(CollectionAction::Removed(id.to_string())),
            rejected,
        )
        .await
    }
}
