//! Reviews of guides, vehicles and locations

use crate::api::endpoints::paths;
use crate::api::resource::{Resource, Single};
use crate::http::{ApiClient, ApiError};
use crate::types::{ListResponse, Page, PageQuery, Review, ReviewDraft};

pub fn resource(api: &ApiClient) -> Resource<'_, Review> {
    Resource::new(api, paths::REVIEWS)
}

/// List reviews, optionally only those about `target_id`
pub async fn list(api: &ApiClient, target_id: Option<&str>, query: PageQuery) -> Result<Page<Review>, ApiError> {
    let mut params = query.to_query();
    if let Some(target_id) = target_id {
        params.push(("targetId", target_id.to_string()));
    }

    let response: ListResponse<Review> = api.get_with_query(paths::REVIEWS, &params).await?;
    Ok(response.into_page())
}

pub async fn get(api: &ApiClient, id: &str) -> Result<Review, ApiError> {
    resource(api).get(id).await
}

pub async fn create(api: &ApiClient, draft: &ReviewDraft) -> Result<Review, ApiError> {
    resource(api).create(draft).await
}

pub async fn update(api: &ApiClient, id: &str, draft: &ReviewDraft) -> Result<Review, ApiError> {
    resource(api).update(id, draft).await
}

pub async fn delete(api: &ApiClient, id: &str) -> Result<(), ApiError> {
    resource(api).delete(id).await
}

/// Returns the review with its updated helpful count
pub async fn mark_helpful(api: &ApiClient, id: &str) -> Result<Review, ApiError> {
    api.post::<Single<Review>, _>(&paths::review_helpful(id), &serde_json::json!({}))
        .await
        .map(Single::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::testing::FakeTransport;
    use crate::http::{ApiResponse, MemoryCredentialStore, TimeoutConfig};
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_list_filters_by_target() {
        let transport = FakeTransport::new(|_| Ok(ApiResponse::json_body(200, &json!([]))));
        let api = ApiClient::with_timeouts(
            "https://api.test/api",
            transport.clone(),
            Arc::new(MemoryCredentialStore::new()),
            TimeoutConfig::fast(),
        );

        list(&api, Some("g1"), PageQuery::default()).await.unwrap();
        assert_eq!(
            transport.requests()[0].url.query(),
            Some("targetId=g1")
        );
    }
}
