//! In-app notifications

use crate::api::endpoints::paths;
use crate::api::resource::{Resource, Single};
use crate::http::{ApiClient, ApiError, RequestDescriptor};
use crate::types::{Notification, Page, PageQuery};

pub fn resource(api: &ApiClient) -> Resource<'_, Notification> {
    Resource::new(api, paths::NOTIFICATIONS)
}

/// Page of notifications; the envelope may carry the unread count
pub async fn list(api: &ApiClient, query: PageQuery) -> Result<Page<Notification>, ApiError> {
    resource(api).list(query).await
}

pub async fn mark_read(api: &ApiClient, id: &str) -> Result<Notification, ApiError> {
    api.request::<Single<Notification>>(RequestDescriptor::patch(paths::notification_read(id)))
        .await
        .map(Single::into_inner)
}

pub async fn mark_all_read(api: &ApiClient) -> Result<(), ApiError> {
    api.send(RequestDescriptor::patch(paths::NOTIFICATIONS_READ_ALL))
        .await
        .map(|_| ())
}

pub async fn delete(api: &ApiClient, id: &str) -> Result<(), ApiError> {
    resource(api).delete(id).await
}
