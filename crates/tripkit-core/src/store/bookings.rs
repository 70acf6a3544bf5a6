//! Bookings slice

use crate::api;
use crate::http::ApiError;
use crate::store::collection::CollectionAction;
use crate::store::thunk::track;
use crate::store::{Action, Store};
use crate::types::{Booking, BookingDraft, Page, PageQuery};

fn rejected(message: String) -> Action {
    Action::Bookings(CollectionAction::Rejected(message))
}

pub struct BookingOps<'a> {
    store: &'a Store,
}

impl<'a> BookingOps<'a> {
    pub(crate) fn new(store: &'a Store) -> Self {
        Self { store }
    }

    pub async fn fetch_all(&self, query: PageQuery) -> Result<Page<Booking>, ApiError> {
        track(
            self.store,
            Action::Bookings(CollectionAction::Pending),
            api::bookings::list(self.store.api(), query),
            |page: &Page<Booking>| {
                Action::Bookings(CollectionAction::Listed {
                    items: page.data.clone(),
                    pagination: page.pagination,
                })
            },
            rejected,
        )
        .await
    }

    pub async fn fetch(&self, id: &str) -> Result<Booking, ApiError> {
        track(
            self.store,
            Action::Bookings(CollectionAction::Pending),
            api::bookings::get(self.store.api(), id),
            |booking: &Booking| Action::Bookings(CollectionAction::Fetched(booking.clone())),
            rejected,
        )
        .await
    }

    pub async fn create(&self, draft: &BookingDraft) -> Result<Booking, ApiError> {
        track(
            self.store,
            Action::Bookings(CollectionAction::Pending),
            api::bookings::create(self.store.api(), draft),
            |booking: &Booking| Action::Bookings(CollectionAction::Created(booking.clone())),
            rejected,
        )
        .await
    }

    /// The cancelled booking stays listed with its new status
    pub async fn cancel(&self, id: &str) -> Result<Booking, ApiError> {
        track(
            self.store,
            Action::Bookings(CollectionAction::Pending),
            api::bookings::cancel(self.store.api(), id),
            |booking: &Booking| Action::Bookings(CollectionAction::Updated(booking.clone())),
            rejected,
        )
        .await
    }
}
