//! Read-mostly catalogue resources: guides, vehicles and locations

use crate::api::endpoints::paths;
use crate::api::resource::Resource;
use crate::http::ApiClient;
use crate::types::{Guide, Location, Vehicle};

pub fn guides(api: &ApiClient) -> Resource<'_, Guide> {
    Resource::new(api, paths::GUIDES)
}

pub fn vehicles(api: &ApiClient) -> Resource<'_, Vehicle> {
    Resource::new(api, paths::VEHICLES)
}

pub fn locations(api: &ApiClient) -> Resource<'_, Location> {
    Resource::new(api, paths::LOCATIONS)
}
