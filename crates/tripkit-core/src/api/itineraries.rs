//! Itineraries, their items, and cover images

use serde_json::Value;

use crate::api::endpoints::paths;
use crate::api::resource::{Resource, Single};
use crate::api::FileUpload;
use crate::http::{ApiClient, ApiError};
use crate::types::{Itinerary, ItineraryDraft, ItineraryItem, ItineraryItemDraft, ListResponse, Page, PageQuery};

pub fn resource(api: &ApiClient) -> Resource<'_, Itinerary> {
    Resource::new(api, paths::ITINERARIES)
}

pub async fn list(api: &ApiClient, query: PageQuery) -> Result<Page<Itinerary>, ApiError> {
    resource(api).list(query).await
}

pub async fn get(api: &ApiClient, id: &str) -> Result<Itinerary, ApiError> {
    resource(api).get(id).await
}

pub async fn create(api: &ApiClient, draft: &ItineraryDraft) -> Result<Itinerary, ApiError> {
    resource(api).create(draft).await
}

pub async fn update(api: &ApiClient, id: &str, draft: &ItineraryDraft) -> Result<Itinerary, ApiError> {
    resource(api).update(id, draft).await
}

pub async fn delete(api: &ApiClient, id: &str) -> Result<(), ApiError> {
    resource(api).delete(id).await
}

pub async fn list_items(api: &ApiClient, itinerary_id: &str) -> Result<Vec<ItineraryItem>, ApiError> {
    let response: ListResponse<ItineraryItem> = api.get(&paths::itinerary_items(itinerary_id)).await?;
    Ok(response.into_page().data)
}

pub async fn add_item(
    api: &ApiClient,
    itinerary_id: &str,
    draft: &ItineraryItemDraft,
) -> Result<ItineraryItem, ApiError> {
    api.post::<Single<ItineraryItem>, _>(&paths::itinerary_items(itinerary_id), draft)
        .await
        .map(Single::into_inner)
}

pub async fn update_item(
    api: &ApiClient,
    itinerary_id: &str,
    item_id: &str,
    draft: &ItineraryItemDraft,
) -> Result<ItineraryItem, ApiError> {
    api.put::<Single<ItineraryItem>, _>(&paths::itinerary_item(itinerary_id, item_id), draft)
        .await
        .map(Single::into_inner)
}

pub async fn remove_item(api: &ApiClient, itinerary_id: &str, item_id: &str) -> Result<(), ApiError> {
    api.delete(&paths::itinerary_item(itinerary_id, item_id)).await
}

/// Multipart upload of a cover image; `fields` adds scalar text parts
pub async fn upload_cover(
    api: &ApiClient,
    itinerary_id: &str,
    file: FileUpload,
    fields: Option<&Value>,
) -> Result<Itinerary, ApiError> {
    let mut form = file.into_form();
    if let Some(fields) = fields {
        form = form.fields_from_json(fields);
    }

    api.upload::<Single<Itinerary>>(&paths::itinerary_cover(itinerary_id), form)
        .await
        .map(Single::into_inner)
}
