//! Payments against bookings

use crate::api::endpoints::paths;
use crate::api::resource::Resource;
use crate::http::{ApiClient, ApiError};
use crate::types::{Page, PageQuery, Payment, PaymentDraft};

pub fn resource(api: &ApiClient) -> Resource<'_, Payment> {
    Resource::new(api, paths::PAYMENTS)
}

pub async fn list(api: &ApiClient, query: PageQuery) -> Result<Page<Payment>, ApiError> {
    resource(api).list(query).await
}

pub async fn get(api: &ApiClient, id: &str) -> Result<Payment, ApiError> {
    resource(api).get(id).await
}

pub async fn create(api: &ApiClient, draft: &PaymentDraft) -> Result<Payment, ApiError> {
    resource(api).create(draft).await
}
