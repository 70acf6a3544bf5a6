//! The client pipeline
//!
//! [`ApiClient`] is built once at startup and shared by reference. Every API
//! call goes through [`ApiClient::send`], which injects the bearer token,
//! classifies failures, and on a first 401 runs the refresh-and-retry
//! protocol before reporting a final outcome.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::api::endpoints::paths;
use crate::config::Config;
use crate::http::credentials::{CredentialStore, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
use crate::http::error::ApiError;
use crate::http::refresh::TokenRefresher;
use crate::http::request::{bearer, MultipartForm, RequestDescriptor, AUTHORIZATION};
use crate::http::timeout::{with_timeout, TimeoutConfig};
use crate::http::transport::{ApiResponse, ReqwestTransport, Transport, TransportError};
use crate::Result;

/// Authenticating, refresh-aware request pipeline
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    credentials: Arc<dyn CredentialStore>,
    base_url: String,
    timeouts: TimeoutConfig,
    refresher: TokenRefresher,
}

impl ApiClient {
    /// Create a pipeline over an explicit transport
    pub fn new(
        base_url: impl Into<String>,
        transport: Arc<dyn Transport>,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        Self::with_timeouts(base_url, transport, credentials, TimeoutConfig::default())
    }

    pub fn with_timeouts(
        base_url: impl Into<String>,
        transport: Arc<dyn Transport>,
        credentials: Arc<dyn CredentialStore>,
        timeouts: TimeoutConfig,
    ) -> Self {
        let base_url = base_url.into();
        let refresher = TokenRefresher::new(
            transport.clone(),
            credentials.clone(),
            base_url.clone(),
            paths::REFRESH_TOKEN,
            timeouts.request_timeout,
        );

        Self {
            transport,
            credentials,
            base_url,
            timeouts,
            refresher,
        }
    }

    /// Create the production pipeline described by `config`
    pub fn from_config(config: &Config, credentials: Arc<dyn CredentialStore>) -> Result<Self> {
        let timeouts = config.timeout_config();
        timeouts
            .validate()
            .map_err(|message| crate::Error::Configuration {
                message,
                source: None,
            })?;

        let base_url = config.api_base_url();
        url::Url::parse(&base_url).map_err(|e| crate::Error::Configuration {
            message: format!("Invalid API base URL: {}", base_url),
            source: Some(Box::new(e)),
        })?;

        let transport = Arc::new(ReqwestTransport::new(&timeouts)?);
        tracing::info!(base_url = %base_url, environment = %config.environment, "API client configured");

        Ok(Self::with_timeouts(base_url, transport, credentials, timeouts))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn credentials(&self) -> &Arc<dyn CredentialStore> {
        &self.credentials
    }

    /// Whether an access token is currently stored
    pub fn has_session(&self) -> bool {
        self.access_token().is_some()
    }

    /// Persist a token pair obtained from login
    pub fn store_session(&self, access_token: &str, refresh_token: &str) -> Result<()> {
        self.credentials.set(ACCESS_TOKEN_KEY, access_token)?;
        self.credentials.set(REFRESH_TOKEN_KEY, refresh_token)?;
        Ok(())
    }

    /// Remove both stored tokens
    pub fn clear_session(&self) -> Result<()> {
        self.credentials.remove(ACCESS_TOKEN_KEY)?;
        self.credentials.remove(REFRESH_TOKEN_KEY)?;
        Ok(())
    }

    /// Send a request through the pipeline.
    ///
    /// Returns the response on 2xx. A first 401 triggers exactly one
    /// refresh-and-retry; the retried outcome is final.
    pub async fn send(&self, mut request: RequestDescriptor) -> std::result::Result<ApiResponse, ApiError> {
        loop {
            let token = self.access_token();
            let timeout = self.timeouts.for_body(&request.body);
            let prepared = request.prepare(&self.base_url, token.as_deref(), timeout)?;
            let deadline = prepared.timeout;

            tracing::debug!(
                method = %prepared.method,
                path = prepared.path(),
                retried = request.retried,
                authenticated = token.is_some(),
                "Sending request"
            );

            let response = match with_timeout(self.transport.send(prepared), deadline).await {
                Ok(Ok(response)) => response,
                Ok(Err(TransportError::Encode(message))) => {
                    tracing::warn!(path = %request.path, error = %message, "Request could not be encoded");
                    return Err(ApiError::invalid_request(message));
                }
                Ok(Err(e)) => {
                    tracing::warn!(path = %request.path, error = %e, "No response received");
                    return Err(ApiError::network());
                }
                Err(_) => {
                    tracing::warn!(path = %request.path, timeout = ?deadline, "Request timed out");
                    return Err(ApiError::network());
                }
            };

            tracing::debug!(path = %request.path, status = response.status, "Response received");

            if response.is_success() {
                return Ok(response);
            }

            if response.status == 401 && !request.retried {
                request.retried = true;
                let fresh = self.refresher.refresh(token.as_deref()).await?;
                request.set_header(AUTHORIZATION, bearer(&fresh));
                continue;
            }

            return Err(ApiError::from_response(&response));
        }
    }

    /// Send and decode a JSON response body
    pub async fn request<T: DeserializeOwned>(
        &self,
        request: RequestDescriptor,
    ) -> std::result::Result<T, ApiError> {
        let path = request.path.clone();
        let response = self.send(request).await?;
        response.json::<T>().map_err(|e| {
            tracing::warn!(path = %path, error = %e, "Failed to decode response body");
            ApiError::invalid_response(response.status)
        })
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> std::result::Result<T, ApiError> {
        self.request(RequestDescriptor::get(path)).await
    }

    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> std::result::Result<T, ApiError> {
        let request = query
            .iter()
            .fold(RequestDescriptor::get(path), |request, (key, value)| {
                request.query(*key, value)
            });
        self.request(request).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> std::result::Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(RequestDescriptor::post(path).json(encode(body)?)).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> std::result::Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(RequestDescriptor::put(path).json(encode(body)?)).await
    }

    pub async fn patch<T, B>(&self, path: &str, body: &B) -> std::result::Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(RequestDescriptor::patch(path).json(encode(body)?)).await
    }

    /// DELETE, ignoring any response body
    pub async fn delete(&self, path: &str) -> std::result::Result<(), ApiError> {
        self.send(RequestDescriptor::delete(path)).await.map(|_| ())
    }

    /// Multipart POST with the upload timeout
    pub async fn upload<T: DeserializeOwned>(
        &self,
        path: &str,
        form: MultipartForm,
    ) -> std::result::Result<T, ApiError> {
        self.request(RequestDescriptor::post(path).multipart(form)).await
    }

    fn access_token(&self) -> Option<String> {
        match self.credentials.get(ACCESS_TOKEN_KEY) {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read access token, sending unauthenticated");
                None
            }
        }
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("timeouts", &self.timeouts)
            .field("refresher", &self.refresher)
            .finish_non_exhaustive()
    }
}

fn encode<B: Serialize + ?Sized>(body: &B) -> std::result::Result<Value, ApiError> {
    serde_json::to_value(body)
        .map_err(|e| ApiError::invalid_request(format!("Invalid request body: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::credentials::MemoryCredentialStore;
    use crate::http::error::ErrorKind;
    use crate::http::request::{CONTENT_TYPE, JSON_CONTENT_TYPE};
    use crate::http::testing::FakeTransport;
    use serde_json::json;
    use std::time::Duration;
    use tokio::sync::Notify;

    const BASE: &str = "https://api.test/api";

    fn client(transport: Arc<FakeTransport>, store: Arc<MemoryCredentialStore>) -> ApiClient {
        ApiClient::with_timeouts(BASE, transport, store, TimeoutConfig::fast())
    }

    fn token_of(request: &crate::http::request::PreparedRequest) -> Option<String> {
        request.header(AUTHORIZATION).map(str::to_string)
    }

    /// Protected endpoints accept only `Bearer fresh`; refresh hands out `fresh`
    fn refreshing_backend(refresh_status: u16) -> impl Fn(&crate::http::request::PreparedRequest) -> std::result::Result<ApiResponse, TransportError> {
        move |request| {
            if request.path().ends_with(paths::REFRESH_TOKEN) {
                if refresh_status == 200 {
                    return Ok(ApiResponse::json_body(
                        200,
                        &json!({ "token": "fresh", "refreshToken": "fresh-refresh" }),
                    ));
                }
                return Ok(ApiResponse::json_body(refresh_status, &json!({ "message": "invalid refresh token" })));
            }
            match request.header(AUTHORIZATION) {
                Some("Bearer fresh") => Ok(ApiResponse::json_body(200, &json!([{ "id": "a" }]))),
                _ => Ok(ApiResponse::json_body(401, &json!({ "message": "jwt expired" }))),
            }
        }
    }

    #[tokio::test]
    async fn test_bearer_header_from_store() {
        let transport = FakeTransport::new(|_| Ok(ApiResponse::json_body(200, &json!({}))));
        let store = Arc::new(MemoryCredentialStore::with_tokens(Some("t0k3n"), None));
        let api = client(transport.clone(), store);

        api.send(RequestDescriptor::get("/profile")).await.unwrap();

        let sent = transport.requests();
        assert_eq!(token_of(&sent[0]).as_deref(), Some("Bearer t0k3n"));
        assert_eq!(sent[0].url.as_str(), "https://api.test/api/profile");
    }

    #[tokio::test]
    async fn test_unauthenticated_without_token() {
        let transport = FakeTransport::new(|_| Ok(ApiResponse::json_body(200, &json!([]))));
        let api = client(transport.clone(), Arc::new(MemoryCredentialStore::new()));

        let guides: Vec<Value> = api.get("/guides").await.unwrap();
        assert!(guides.is_empty());
        assert_eq!(token_of(&transport.requests()[0]), None);
    }

    #[tokio::test]
    async fn test_multipart_upload_keeps_its_content_type() {
        let transport = FakeTransport::new(|_| Ok(ApiResponse::json_body(200, &json!({ "url": "x" }))));
        let store = Arc::new(MemoryCredentialStore::with_tokens(Some("t"), None));
        let api = client(transport.clone(), store);

        let form = MultipartForm::new().file("file", "me.png", "image/png", vec![1, 2]);
        let _: Value = api.upload("/profile/avatar", form).await.unwrap();

        let sent = &transport.requests()[0];
        assert_ne!(sent.header(CONTENT_TYPE), Some(JSON_CONTENT_TYPE));
        assert_eq!(sent.timeout, TimeoutConfig::fast().upload_timeout);
    }

    #[tokio::test]
    async fn test_no_response_is_network_error() {
        let transport = FakeTransport::new(|_| Err(TransportError::NoResponse("connection refused".into())));
        let api = client(transport.clone(), Arc::new(MemoryCredentialStore::new()));

        let error = api.send(RequestDescriptor::get("/alerts")).await.unwrap_err();
        assert_eq!(error, ApiError::network());
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_encode_failure_is_not_network_error() {
        let transport = FakeTransport::new(|_| Err(TransportError::Encode("invalid mime".into())));
        let api = client(transport, Arc::new(MemoryCredentialStore::new()));

        let error = api.send(RequestDescriptor::get("/profile/avatar")).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Server);
        assert_eq!(error.status(), None);
        assert_eq!(error.message(), "invalid mime");
        assert!(!error.is_transient());
    }

    #[tokio::test]
    async fn test_timeout_is_network_error() {
        let gate = Arc::new(Notify::new());
        let transport = FakeTransport::gated("/slow", gate, |_| Ok(ApiResponse::json_body(200, &json!({}))));
        let api = client(transport, Arc::new(MemoryCredentialStore::new()));

        let request = RequestDescriptor::get("/slow").timeout(Duration::from_millis(20));
        let error = api.send(request).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Network);
    }

    #[tokio::test]
    async fn test_server_error_message_chain() {
        let transport = FakeTransport::new(|_| {
            Ok(ApiResponse::json_body(
                422,
                &json!({ "error": { "message": "Rating must be between 1 and 5" } }),
            ))
        });
        let api = client(transport, Arc::new(MemoryCredentialStore::new()));

        let error = api.send(RequestDescriptor::post("/reviews")).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Server);
        assert_eq!(error.status(), Some(422));
        assert_eq!(error.to_string(), "Rating must be between 1 and 5");
    }

    #[tokio::test]
    async fn test_refresh_then_single_resend() {
        let transport = FakeTransport::new(refreshing_backend(200));
        let store = Arc::new(MemoryCredentialStore::with_tokens(Some("stale"), Some("r0")));
        let api = client(transport.clone(), store.clone());

        let items: Vec<Value> = api.get("/itineraries").await.unwrap();
        assert_eq!(items, vec![json!({ "id": "a" })]);

        let sent = transport.requests();
        assert_eq!(sent.len(), 3);
        assert_eq!(token_of(&sent[0]).as_deref(), Some("Bearer stale"));
        assert!(sent[1].path().ends_with(paths::REFRESH_TOKEN));
        assert_eq!(token_of(&sent[1]), None);
        assert_eq!(
            sent[1].body,
            crate::http::request::RequestBody::Json(json!({ "refreshToken": "r0" }))
        );
        assert_eq!(token_of(&sent[2]).as_deref(), Some("Bearer fresh"));

        assert_eq!(store.get(ACCESS_TOKEN_KEY).unwrap().as_deref(), Some("fresh"));
        assert_eq!(store.get(REFRESH_TOKEN_KEY).unwrap().as_deref(), Some("fresh-refresh"));
    }

    #[tokio::test]
    async fn test_tokens_persisted_before_resend() {
        let store = Arc::new(MemoryCredentialStore::with_tokens(Some("stale"), Some("r0")));
        let observed = store.clone();
        let transport = FakeTransport::new(move |request| {
            if request.path().ends_with(paths::REFRESH_TOKEN) {
                return Ok(ApiResponse::json_body(200, &json!({ "token": "fresh", "refreshToken": "r1" })));
            }
            if request.header(AUTHORIZATION) == Some("Bearer fresh") {
                // the resend must find the new pair already stored
                assert_eq!(observed.get(ACCESS_TOKEN_KEY).unwrap().as_deref(), Some("fresh"));
                assert_eq!(observed.get(REFRESH_TOKEN_KEY).unwrap().as_deref(), Some("r1"));
                return Ok(ApiResponse::json_body(200, &json!({})));
            }
            Ok(ApiResponse::new(401, Vec::new()))
        });
        let api = client(transport.clone(), store);

        api.send(RequestDescriptor::get("/bookings")).await.unwrap();
        assert_eq!(transport.calls_to("/bookings"), 2);
    }

    #[tokio::test]
    async fn test_refresh_failure_purges_and_fails() {
        let transport = FakeTransport::new(refreshing_backend(403));
        let store = Arc::new(MemoryCredentialStore::with_tokens(Some("stale"), Some("r0")));
        let api = client(transport.clone(), store.clone());

        let error = api.send(RequestDescriptor::get("/itineraries")).await.unwrap_err();
        assert_eq!(error, ApiError::authentication_failed());
        assert_eq!(store.get(ACCESS_TOKEN_KEY).unwrap(), None);
        assert_eq!(store.get(REFRESH_TOKEN_KEY).unwrap(), None);
        assert_eq!(transport.calls_to("/itineraries"), 1);
    }

    #[tokio::test]
    async fn test_refresh_without_response_fails_authentication() {
        let transport = FakeTransport::new(|request| {
            if request.path().ends_with(paths::REFRESH_TOKEN) {
                return Err(TransportError::NoResponse("offline".into()));
            }
            Ok(ApiResponse::new(401, Vec::new()))
        });
        let store = Arc::new(MemoryCredentialStore::with_tokens(Some("stale"), Some("r0")));
        let api = client(transport, store.clone());

        let error = api.send(RequestDescriptor::get("/alerts")).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::AuthenticationFailed);
        assert_eq!(store.get(REFRESH_TOKEN_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn test_missing_refresh_token_expires_session() {
        let transport = FakeTransport::new(refreshing_backend(200));
        let store = Arc::new(MemoryCredentialStore::with_tokens(Some("stale"), None));
        let api = client(transport.clone(), store.clone());

        let error = api.send(RequestDescriptor::get("/itineraries")).await.unwrap_err();
        assert_eq!(error, ApiError::session_expired());
        assert_eq!(store.get(ACCESS_TOKEN_KEY).unwrap(), None);
        assert_eq!(transport.calls_to(paths::REFRESH_TOKEN), 0);
    }

    #[tokio::test]
    async fn test_retried_request_does_not_refresh_again() {
        let transport = FakeTransport::new(refreshing_backend(200));
        let store = Arc::new(MemoryCredentialStore::with_tokens(Some("stale"), Some("r0")));
        let api = client(transport.clone(), store);

        let mut request = RequestDescriptor::get("/itineraries");
        request.retried = true;

        let error = api.send(request).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Server);
        assert_eq!(error.status(), Some(401));
        assert_eq!(transport.calls_to(paths::REFRESH_TOKEN), 0);
    }

    #[tokio::test]
    async fn test_second_401_after_refresh_is_server_error() {
        let transport = FakeTransport::new(|request| {
            if request.path().ends_with(paths::REFRESH_TOKEN) {
                return Ok(ApiResponse::json_body(200, &json!({ "token": "fresh", "refreshToken": "r1" })));
            }
            Ok(ApiResponse::json_body(401, &json!({ "message": "Account suspended" })))
        });
        let store = Arc::new(MemoryCredentialStore::with_tokens(Some("stale"), Some("r0")));
        let api = client(transport.clone(), store);

        let error = api.send(RequestDescriptor::get("/profile")).await.unwrap_err();
        assert_eq!(error.to_string(), "Account suspended");
        assert_eq!(transport.calls_to(paths::REFRESH_TOKEN), 1);
        assert_eq!(transport.calls_to("/profile"), 2);
    }

    #[tokio::test]
    async fn test_concurrent_401s_share_one_refresh() {
        let gate = Arc::new(Notify::new());
        let transport = FakeTransport::gated(paths::REFRESH_TOKEN, gate.clone(), refreshing_backend(200));
        let store = Arc::new(MemoryCredentialStore::with_tokens(Some("stale"), Some("r0")));
        let api = client(transport.clone(), store);

        let (first, second, _) = tokio::join!(
            api.get::<Vec<Value>>("/itineraries"),
            api.get::<Vec<Value>>("/itineraries"),
            async {
                tokio::task::yield_now().await;
                gate.notify_one();
            }
        );

        assert!(first.is_ok());
        assert!(second.is_ok());
        assert_eq!(transport.calls_to(paths::REFRESH_TOKEN), 1);
    }

    #[tokio::test]
    async fn test_undecodable_success_body() {
        let transport = FakeTransport::new(|_| Ok(ApiResponse::new(200, b"<html>".to_vec())));
        let api = client(transport, Arc::new(MemoryCredentialStore::new()));

        let error = api.get::<Vec<Value>>("/guides").await.unwrap_err();
        assert_eq!(error, ApiError::invalid_response(200));
    }

    #[tokio::test]
    async fn test_session_helpers() {
        let transport = FakeTransport::new(|_| Ok(ApiResponse::json_body(200, &json!({}))));
        let store = Arc::new(MemoryCredentialStore::new());
        let api = client(transport, store.clone());

        assert!(!api.has_session());
        api.store_session("a", "r").unwrap();
        assert!(api.has_session());
        api.clear_session().unwrap();
        assert!(!api.has_session());
        assert_eq!(store.get(REFRESH_TOKEN_KEY).unwrap(), None);
    }
}
