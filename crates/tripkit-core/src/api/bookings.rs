//! Guide and vehicle bookings

use crate::api::endpoints::paths;
use crate::api::resource::{Resource, Single};
use crate::http::{ApiClient, ApiError, RequestDescriptor};
use crate::types::{Booking, BookingDraft, Page, PageQuery};

pub fn resource(api: &ApiClient) -> Resource<'_, Booking> {
    Resource::new(api, paths::BOOKINGS)
}

pub async fn list(api: &ApiClient, query: PageQuery) -> Result<Page<Booking>, ApiError> {
    resource(api).list(query).await
}

pub async fn get(api: &ApiClient, id: &str) -> Result<Booking, ApiError> {
    resource(api).get(id).await
}

pub async fn create(api: &ApiClient, draft: &BookingDraft) -> Result<Booking, ApiError> {
    resource(api).create(draft).await
}

/// Returns the booking in its cancelled state
pub async fn cancel(api: &ApiClient, id: &str) -> Result<Booking, ApiError> {
    api.request::<Single<Booking>>(RequestDescriptor::patch(paths::booking_cancel(id)))
        .await
        .map(Single::into_inner)
}
