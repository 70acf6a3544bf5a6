//! The signed-in user's profile

use crate::api::endpoints::paths;
use crate::api::resource::{fetch_one, Single};
use crate::api::FileUpload;
use crate::http::{ApiClient, ApiError};
use crate::types::{Profile, ProfileDraft};

pub async fn get(api: &ApiClient) -> Result<Profile, ApiError> {
    fetch_one(api, paths::PROFILE).await
}

pub async fn update(api: &ApiClient, draft: &ProfileDraft) -> Result<Profile, ApiError> {
    api.put::<Single<Profile>, _>(paths::PROFILE, draft)
        .await
        .map(Single::into_inner)
}

pub async fn upload_avatar(api: &ApiClient, file: FileUpload) -> Result<Profile, ApiError> {
    api.upload::<Single<Profile>>(paths::PROFILE_AVATAR, file.into_form())
        .await
        .map(Single::into_inner)
}
