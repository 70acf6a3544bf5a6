//! Notifications slice with an unread counter

use crate::api;
use crate::http::ApiError;
use crate::store::collection::{Collection, CollectionAction};
use crate::store::thunk::track;
use crate::store::{Action, Store};
use crate::types::{Notification, Page, PageQuery};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotificationsState {
    pub list: Collection<Notification>,
    pub unread_count: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NotificationsAction {
    Collection(CollectionAction<Notification>),
    /// A listed page; the server's unread count wins over a local tally
    Loaded(Page<Notification>),
    MarkedRead(Notification),
    AllRead,
}

pub fn reduce(state: &mut NotificationsState, action: NotificationsAction) {
    match action {
        NotificationsAction::Collection(action) => {
            if let CollectionAction::Removed(id) = &action {
                if state.list.find(id).is_some_and(|n| !n.read) {
                    state.unread_count = state.unread_count.saturating_sub(1);
                }
            }
            state.list.apply(action);
        }
        NotificationsAction::Loaded(page) => {
            state.unread_count = page
                .unread_count
                .unwrap_or_else(|| page.data.iter().filter(|n| !n.read).count() as u64);
            state.list.apply(CollectionAction::Listed {
                items: page.data,
                pagination: page.pagination,
            });
        }
        NotificationsAction::MarkedRead(notification) => {
            if state.list.find(&notification.id).is_some_and(|n| !n.read) && notification.read {
                state.unread_count = state.unread_count.saturating_sub(1);
            }
            state.list.apply(CollectionAction::Updated(notification));
        }
        NotificationsAction::AllRead => {
            for notification in &mut state.list.items {
                notification.read = true;
            }
            if let Some(current) = &mut state.list.current {
                current.read = true;
            }
            state.unread_count = 0;
            state.list.apply(CollectionAction::Settled);
        }
    }
}

fn pending() -> Action {
    Action::Notifications(NotificationsAction::Collection(CollectionAction::Pending))
}

fn rejected(message: String) -> Action {
    Action::Notifications(NotificationsAction::Collection(CollectionAction::Rejected(message)))
}

pub struct NotificationOps<'a> {
    store: &'a Store,
}

impl<'a> NotificationOps<'a> {
    pub(crate) fn new(store: &'a Store) -> Self {
        Self { store }
    }

    pub async fn fetch_all(&self, query: PageQuery) -> Result<Page<Notification>, ApiError> {
        track(
            self.store,
            pending(),
            api::notifications::list(self.store.api(), query),
            |page: &Page<Notification>| Action::Notifications(NotificationsAction::Loaded(page.clone())),
            rejected,
        )
        .await
    }

    pub async fn mark_read(&self, id: &str) -> Result<Notification, ApiError> {
        track(
            self.store,
            pending(),
            api::notifications::mark_read(self.store.api(), id),
            |notification: &Notification| {
                Action::Notifications(NotificationsAction::MarkedRead(notification.clone()))
            },
            rejected,
        )
        .await
    }

    pub async fn mark_all_read(&self) -> Result<(), ApiError> {
        track(
            self.store,
            pending(),
            api::notifications::mark_all_read(self.store.api()),
            |_| Action::Notifications(NotificationsAction::AllRead),
            rejected,
        )
        .await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        track(
            self.store,
            pending(),
            api::notifications::delete(self.store.api(), id),
            |_| {
                Action::Notifications(NotificationsAction::Collection(CollectionAction::Removed(
                    id.to_string(),
                )))
            },
            rejected,
        )
        .await
    }
}
