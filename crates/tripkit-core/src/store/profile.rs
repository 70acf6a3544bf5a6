//! Profile slice

use crate::api::{self, FileUpload};
use crate::http::ApiError;
use crate::store::collection::Status;
use crate::store::thunk::track;
use crate::store::{Action, Store};
use crate::types::{Profile, ProfileDraft};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileState {
    pub profile: Option<Profile>,
    pub status: Status,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProfileAction {
    Pending,
    Rejected(String),
    ClearError,
    Loaded(Profile),
}

pub fn reduce(state: &mut ProfileState, action: ProfileAction) {
    match action {
        ProfileAction::Pending => state.status.begin(),
        ProfileAction::Rejected(message) => state.status.fail(message),
        ProfileAction::ClearError => state.status.clear_error(),
        ProfileAction::Loaded(profile) => {
            state.status.succeed();
            state.profile = Some(profile);
        }
    }
}

fn loaded(profile: &Profile) -> Action {
    Action::Profile(ProfileAction::Loaded(profile.clone()))
}

fn rejected(message: String) -> Action {
    Action::Profile(ProfileAction::Rejected(message))
}

pub struct ProfileOps<'a> {
    store: &'a Store,
}

impl<'a> ProfileOps<'a> {
    pub(crate) fn new(store: &'a Store) -> Self {
        Self { store }
    }

    pub async fn fetch(&self) -> Result<Profile, ApiError> {
        track(
            self.store,
            Action::Profile(ProfileAction::Pending),
            api::profile::get(self.store.api()),
            loaded,
            rejected,
        )
        .await
    }

    pub async fn update(&self, draft: &ProfileDraft) -> Result<Profile, ApiError> {
        track(
            self.store,
            Action::Profile(ProfileAction::Pending),
            api::profile::update(self.store.api(), draft),
            loaded,
            rejected,
        )
        .await
    }

    pub async fn upload_avatar(&self, file: FileUpload) -> Result<Profile, ApiError> {
        track(
            self.store,
            Action::Profile(ProfileAction::Pending),
            api::profile::upload_avatar(self.store.api(), file),
            loaded,
            rejected,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::testing::FakeTransport;
    use crate::http::{ApiResponse, RequestBody};
    use crate::store::test_support::store;
    use serde_json::json;

    #[tokio::test]
    async fn test_avatar_upload_replaces_profile() {
        let transport = FakeTransport::new(|_| {
            Ok(ApiResponse::json_body(
                200,
                &json!({ "id": "u1", "name": "Zawadi", "email": "z@example.com", "avatar": "https://cdn/a.png" }),
            ))
        });
        let store = store(transport.clone());

        store
            .profile()
            .upload_avatar(FileUpload::new("a.png", "image/png", vec![7]))
            .await
            .unwrap();

        let profile = store.state().profile;
        assert_eq!(profile.profile.and_then(|p| p.avatar), Some("https://cdn/a.png".to_string()));
        assert!(matches!(transport.requests()[0].body, RequestBody::Multipart(_)));
    }
}
