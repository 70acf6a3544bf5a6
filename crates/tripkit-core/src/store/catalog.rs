//! Guides, vehicles and locations slices
//!
//! The three catalogue collections share one read-only operation set.

use crate::api::{self, Resource};
use crate::http::{ApiClient, ApiError};
use crate::store::collection::CollectionAction;
use crate::store::thunk::track;
use crate::store::{Action, Store};
use crate::types::{Guide, Location, Page, PageQuery, Record, Vehicle};

pub struct CatalogOps<'a, T> {
    store: &'a Store,
    resource: fn(&ApiClient) -> Resource<'_, T>,
    lift: fn(CollectionAction<T>) -> Action,
}

pub type GuideOps<'a> = CatalogOps<'a, Guide>;
pub type VehicleOps<'a> = CatalogOps<'a, Vehicle>;
pub type LocationOps<'a> = CatalogOps<'a, Location>;

impl<'a> CatalogOps<'a, Guide> {
    pub(crate) fn guides(store: &'a Store) -> Self {
        Self {
            store,
            resource: api::catalog::guides,
            lift: Action::Guides,
        }
    }
}

impl<'a> CatalogOps<'a, Vehicle> {
    pub(crate) fn vehicles(store: &'a Store) -> Self {
        Self {
            store,
            resource: api::catalog::vehicles,
            lift: Action::Vehicles,
        }
    }
}

impl<'a> CatalogOps<'a, Location> {
    pub(crate) fn locations(store: &'a Store) -> Self {
        Self {
            store,
            resource: api::catalog::locations,
            lift: Action::Locations,
        }
    }
}

impl<'a, T> CatalogOps<'a, T>
where
    T: Record + serde::de::DeserializeOwned,
{
    pub async fn fetch_all(&self, query: PageQuery) -> Result<Page<T>, ApiError> {
        let lift = self.lift;
        track(
            self.store,
            lift(CollectionAction::Pending),
            (self.resource)(self.store.api()).list(query),
            |page: &Page<T>| {
                lift(CollectionAction::Listed {
                    items: page.data.clone(),
                    pagination: page.pagination,
                })
            },
            |message| lift(CollectionAction::Rejected(message)),
        )
        .await
    }

    pub async fn fetch(&self, id: &str) -> Result<T, ApiError> {
        let lift = self.lift;
        track(
            self.store,
            lift(CollectionAction::Pending),
            (self.resource)(self.store.api()).get(id),
            |record: &T| lift(CollectionAction::Fetched(record.clone())),
            |message| lift(CollectionAction::Rejected(message)),
        )
        .await
    }
}
