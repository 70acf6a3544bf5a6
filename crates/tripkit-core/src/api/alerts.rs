//! Travel advisories

use crate::api::endpoints::paths;
use crate::api::resource::Resource;
use crate::http::{ApiClient, ApiError, RequestDescriptor};
use crate::types::{Alert, Page, PageQuery};

pub fn resource(api: &ApiClient) -> Resource<'_, Alert> {
    Resource::new(api, paths::ALERTS)
}

pub async fn list(api: &ApiClient, query: PageQuery) -> Result<Page<Alert>, ApiError> {
    resource(api).list(query).await
}

pub async fn get(api: &ApiClient, id: &str) -> Result<Alert, ApiError> {
    resource(api).get(id).await
}

/// Hide an alert for the current user
pub async fn dismiss(api: &ApiClient, id: &str) -> Result<(), ApiError> {
    api.send(RequestDescriptor::patch(paths::alert_dismiss(id)))
        .await
        .map(|_| ())
}
