//! Generic CRUD over one REST collection

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::api::endpoints::paths;
use crate::http::{ApiClient, ApiError};
use crate::types::{ListResponse, Page, PageQuery};

/// Single-record responses come bare or wrapped in `{ "data": … }`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Single<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Single<T> {
    pub(crate) fn into_inner(self) -> T {
        match self {
            Single::Wrapped { data } => data,
            Single::Bare(value) => value,
        }
    }
}

/// Decode a single record through the pipeline
pub(crate) async fn fetch_one<T: DeserializeOwned>(api: &ApiClient, path: &str) -> Result<T, ApiError> {
    api.get::<Single<T>>(path).await.map(Single::into_inner)
}

/// Typed access to `<collection>` and `<collection>/<id>`
pub struct Resource<'a, T> {
    api: &'a ApiClient,
    collection: &'static str,
    _record: PhantomData<fn() -> T>,
}

impl<'a, T: DeserializeOwned> Resource<'a, T> {
    pub fn new(api: &'a ApiClient, collection: &'static str) -> Self {
        Self {
            api,
            collection,
            _record: PhantomData,
        }
    }

    pub fn collection(&self) -> &'static str {
        self.collection
    }

    /// `GET <collection>`, accepting bare arrays and paged envelopes
    pub async fn list(&self, query: PageQuery) -> Result<Page<T>, ApiError> {
        let response: ListResponse<T> = self
            .api
            .get_with_query(self.collection, &query.to_query())
            .await?;
        Ok(response.into_page())
    }

    pub async fn get(&self, id: &str) -> Result<T, ApiError> {
        fetch_one(self.api, &paths::record(self.collection, id)).await
    }

    pub async fn create<B: Serialize + ?Sized>(&self, body: &B) -> Result<T, ApiError> {
        self.api
            .post::<Single<T>, B>(self.collection, body)
            .await
            .map(Single::into_inner)
    }

    pub async fn update<B: Serialize + ?Sized>(&self, id: &str, body: &B) -> Result<T, ApiError> {
        self.api
            .put::<Single<T>, B>(&paths::record(self.collection, id), body)
            .await
            .map(Single::into_inner)
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.api.delete(&paths::record(self.collection, id)).await
    }
}
