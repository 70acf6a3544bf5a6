//! Itineraries slice, including items keyed by itinerary

use std::collections::BTreeMap;

use serde_json::Value;

use crate::api::{self, FileUpload};
use crate::http::ApiError;
use crate::store::collection::{Collection, CollectionAction};
use crate::store::thunk::track;
use crate::store::{Action, Store};
use crate::types::{Itinerary, ItineraryDraft, ItineraryItem, ItineraryItemDraft, Page, PageQuery};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItinerariesState {
    pub list: Collection<Itinerary>,
    /// Items per itinerary id, in itinerary order
    pub items: BTreeMap<String, Vec<ItineraryItem>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ItinerariesAction {
    Collection(CollectionAction<Itinerary>),
    ItemsLoaded {
        itinerary_id: String,
        items: Vec<ItineraryItem>,
    },
    ItemAdded {
        itinerary_id: String,
        item: ItineraryItem,
    },
    ItemUpdated {
        itinerary_id: String,
        item: ItineraryItem,
    },
    ItemRemoved {
        itinerary_id: String,
        item_id: String,
    },
}

pub fn reduce(state: &mut ItinerariesState, action: ItinerariesAction) {
    match action {
        ItinerariesAction::Collection(action) => {
            if let CollectionAction::Removed(id) = &action {
                state.items.remove(id);
            }
            state.list.apply(action);
        }
        ItinerariesAction::ItemsLoaded { itinerary_id, items } => {
            state.list.apply(CollectionAction::Settled);
            state.items.insert(itinerary_id, items);
        }
        ItinerariesAction::ItemAdded { itinerary_id, item } => {
            state.list.apply(CollectionAction::Settled);
            let items = state.items.entry(itinerary_id).or_default();
            items.retain(|existing| existing.id != item.id);
            items.push(item);
        }
        ItinerariesAction::ItemUpdated { itinerary_id, item } => {
            state.list.apply(CollectionAction::Settled);
            if let Some(slot) = state
                .items
                .get_mut(&itinerary_id)
                .and_then(|items| items.iter_mut().find(|existing| existing.id == item.id))
            {
                *slot = item;
            }
        }
        ItinerariesAction::ItemRemoved { itinerary_id, item_id } => {
            state.list.apply(CollectionAction::Settled);
            if let Some(items) = state.items.get_mut(&itinerary_id) {
                items.retain(|existing| existing.id != item_id);
            }
        }
    }
}

fn collection(action: CollectionAction<Itinerary>) -> Action {
    Action::Itineraries(ItinerariesAction::Collection(action))
}

fn pending() -> Action {
    collection(CollectionAction::Pending)
}

fn rejected(message: String) -> Action {
    collection(CollectionAction::Rejected(message))
}

pub struct ItineraryOps<'a> {
    store: &'a Store,
}

impl<'a> ItineraryOps<'a> {
    pub(crate) fn new(store: &'a Store) -> Self {
        Self { store }
    }

    pub async fn fetch_all(&self, query: PageQuery) -> Result<Page<Itinerary>, ApiError> {
        track(
            self.store,
            pending(),
            api::itineraries::list(self.store.api(), query),
            |page: &Page<Itinerary>| {
                collection(CollectionAction::Listed {
                    items: page.data.clone(),
                    pagination: page.pagination,
                })
            },
            rejected,
        )
        .await
    }

    pub async fn fetch(&self, id: &str) -> Result<Itinerary, ApiError> {
        track(
            self.store,
            pending(),
            api::itineraries::get(self.store.api(), id),
            |itinerary: &Itinerary| collection(CollectionAction::Fetched(itinerary.clone())),
            rejected,
        )
        .await
    }

    pub async fn create(&self, draft: &ItineraryDraft) -> Result<Itinerary, ApiError> {
        track(
            self.store,
            pending(),
            api::itineraries::create(self.store.api(), draft),
            |itinerary: &Itinerary| collection(CollectionAction::Created(itinerary.clone())),
            rejected,
        )
        .await
    }

    pub async fn update(&self, id: &str, draft: &ItineraryDraft) -> Result<Itinerary, ApiError> {
        track(
            self.store,
            pending(),
            api::itineraries::update(self.store.api(), id, draft),
            |itinerary: &Itinerary| collection(CollectionAction::Updated(itinerary.clone())),
            rejected,
        )
        .await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        track(
            self.store,
            pending(),
            api::itineraries::delete(self.store.api(), id),
            |_| collection(CollectionAction::Removed(id.to_string())),
            rejected,
        )
        .await
    }

    pub async fn fetch_items(&self, itinerary_id: &str) -> Result<Vec<ItineraryItem>, ApiError> {
        track(
            self.store,
            pending(),
            api::itineraries::list_items(self.store.api(), itinerary_id),
            |items: &Vec<ItineraryItem>| {
                Action::Itineraries(ItinerariesAction::ItemsLoaded {
                    itinerary_id: itinerary_id.to_string(),
                    items: items.clone(),
                })
            },
            rejected,
        )
        .await
    }

    pub async fn add_item(&self, itinerary_id: &str, draft: &ItineraryItemDraft) -> Result<ItineraryItem, ApiError> {
        track(
            self.store,
            pending(),
            api::itineraries::add_item(self.store.api(), itinerary_id, draft),
            |item: &ItineraryItem| {
                Action::Itineraries(ItinerariesAction::ItemAdded {
                    itinerary_id: itinerary_id.to_string(),
                    item: item.clone(),
                })
            },
            rejected,
        )
        .await
    }

    pub async fn update_item(
        &self,
        itinerary_id: &str,
        item_id: &str,
        draft: &ItineraryItemDraft,
    ) -> Result<ItineraryItem, ApiError> {
        track(
            self.store,
            pending(),
            api::itineraries::update_item(self.store.api(), itinerary_id, item_id, draft),
            |item: &ItineraryItem| {
                Action::Itineraries(ItinerariesAction::ItemUpdated {
                    itinerary_id: itinerary_id.to_string(),
                    item: item.clone(),
                })
            },
            rejected,
        )
        .await
    }

    pub async fn remove_item(&self, itinerary_id: &str, item_id: &str) -> Result<(), ApiError> {
        track(
            self.store,
            pending(),
            api::itineraries::remove_item(self.store.api(), itinerary_id, item_id),
            |_| {
                Action::Itineraries(ItinerariesAction::ItemRemoved {
                    itinerary_id: itinerary_id.to_string(),
                    item_id: item_id.to_string(),
                })
            },
            rejected,
        )
        .await
    }

    pub async fn upload_cover(
        &self,
        itinerary_id: &str,
        file: FileUpload,
        fields: Option<&Value>,
    ) -> Result<Itinerary, ApiError> {
        track(
            self.store,
            pending(),
            api::itineraries::upload_cover(self.store.api(), itinerary_id, file, fields),
            |itinerary: &Itinerary| collection(CollectionAction::Updated(itinerary.clone())),
            rejected,
        )
        .await
    }
}
