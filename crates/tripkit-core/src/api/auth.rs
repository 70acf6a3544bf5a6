//! Session management
//!
//! Login and register persist the returned token pair before handing the
//! session back, so the next pipeline request is already authenticated.

use crate::api::endpoints::paths;
use crate::api::resource::fetch_one;
use crate::http::{ApiClient, ApiError, RequestDescriptor};
use crate::types::{AuthSession, LoginRequest, RegisterRequest, User};
use crate::Result;

pub async fn login(api: &ApiClient, request: &LoginRequest) -> Result<AuthSession> {
    let session: AuthSession = api.post(paths::LOGIN, request).await?;
    api.store_session(&session.token, &session.refresh_token)?;
    tracing::info!(user_id = %session.user.id, "Logged in");
    Ok(session)
}

pub async fn register(api: &ApiClient, request: &RegisterRequest) -> Result<AuthSession> {
    let session: AuthSession = api.post(paths::REGISTER, request).await?;
    api.store_session(&session.token, &session.refresh_token)?;
    tracing::info!(user_id = %session.user.id, "Registered");
    Ok(session)
}

/// Tell the backend, then drop local credentials whatever it answered
pub async fn logout(api: &ApiClient) -> Result<()> {
    if api.has_session() {
        if let Err(e) = api.send(RequestDescriptor::post(paths::LOGOUT)).await {
            tracing::warn!(error = %e, "Server-side logout failed, clearing local session anyway");
        }
    }

    api.clear_session()?;
    tracing::info!("Logged out");
    Ok(())
}

/// The account behind the stored access token
pub async fn current_user(api: &ApiClient) -> std::result::Result<User, ApiError> {
    fetch_one(api, paths::ME).await
}
