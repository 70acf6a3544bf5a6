//! Weather lookup with retry and last-known-value fallback
//!
//! The forecast body is passed through untouched. Transient failures are
//! retried with exponential backoff; once retries are exhausted the last
//! forecast seen for the same coordinates is returned marked stale.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::Serialize;
use serde_json::Value;

use crate::api::endpoints::paths;
use crate::http::{execute_with_retry, ApiClient, ApiError, RetryPolicy};

/// A forecast document and whether it came from the fallback cache
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Forecast {
    pub data: Value,
    pub stale: bool,
}

pub struct WeatherService {
    api: Arc<ApiClient>,
    policy: RetryPolicy,
    last_known: Mutex<HashMap<String, Value>>,
}

impl WeatherService {
    pub fn new(api: Arc<ApiClient>, policy: RetryPolicy) -> Self {
        Self {
            api,
            policy,
            last_known: Mutex::new(HashMap::new()),
        }
    }

    pub async fn forecast(&self, lat: f64, lon: f64) -> Result<Forecast, ApiError> {
        let key = cache_key(lat, lon);
        let query = [("lat", lat.to_string()), ("lon", lon.to_string())];

        let result = execute_with_retry(
            || self.api.get_with_query::<Value>(paths::WEATHER, &query),
            self.policy.clone(),
        )
        .await;

        match result {
            Ok(data) => {
                if let Ok(mut cache) = self.last_known.lock() {
                    cache.insert(key, data.clone());
                }
                Ok(Forecast { data, stale: false })
            }
            // only an unreachable or failing service falls back; a rejected
            // request or a lost session surfaces as is
            Err(error) if !error.is_transient() => Err(error),
            Err(error) => {
                let cached = self
                    .last_known
                    .lock()
                    .ok()
                    .and_then(|cache| cache.get(&key).cloned());

                match cached {
                    Some(data) => {
                        tracing::warn!(error = %error, lat, lon, "Weather lookup failed, serving last known forecast");
                        Ok(Forecast { data, stale: true })
                    }
                    None => Err(error),
                }
            }
        }
    }
}

impl std::fmt::Debug for WeatherService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherService")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

/// Coordinates rounded to roughly 10 m so jittery GPS fixes share an entry
fn cache_key(lat: f64, lon: f64) -> String {
    format!("{:.4},{:.4}", lat, lon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::testing::FakeTransport;
    use crate::http::{ApiResponse, ErrorKind, MemoryCredentialStore, TimeoutConfig, TransportError};
    use serde_json::json;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn service(transport: Arc<FakeTransport>) -> WeatherService {
        let api = ApiClient::with_timeouts(
            "https://api.test/api",
            transport,
            Arc::new(MemoryCredentialStore::new()),
            TimeoutConfig::fast(),
        );
        WeatherService::new(Arc::new(api), RetryPolicy::new(3).with_base_delay(1).with_jitter(false))
    }

    #[tokio::test]
    async fn test_retries_transient_failures() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let transport = FakeTransport::new(move |_| {
            if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                Ok(ApiResponse::json_body(503, &json!({ "message": "upstream down" })))
            } else {
                Ok(ApiResponse::json_body(200, &json!({ "temp": 28 })))
            }
        });
        let weather = service(transport.clone());

        let forecast = weather.forecast(-4.05, 39.66).await.unwrap();
        assert_eq!(forecast, Forecast { data: json!({ "temp": 28 }), stale: false });
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(transport.requests()[0].url.query(), Some("lat=-4.05&lon=39.66"));
    }

    #[tokio::test]
    async fn test_falls_back_to_last_known() {
        let online = Arc::new(AtomicU32::new(1));
        let flag = online.clone();
        let transport = FakeTransport::new(move |_| {
            if flag.load(Ordering::SeqCst) == 1 {
                Ok(ApiResponse::json_body(200, &json!({ "temp": 31 })))
            } else {
                Err(TransportError::NoResponse("offline".into()))
            }
        });
        let weather = service(transport);

        weather.forecast(-1.29, 36.82).await.unwrap();
        online.store(0, Ordering::SeqCst);

        let forecast = weather.forecast(-1.29, 36.82).await.unwrap();
        assert!(forecast.stale);
        assert_eq!(forecast.data, json!({ "temp": 31 }));

        let error = weather.forecast(0.0, 0.0).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Network);
    }

    #[tokio::test]
    async fn test_lost_session_skips_fallback() {
        let online = Arc::new(AtomicU32::new(1));
        let flag = online.clone();
        let transport = FakeTransport::new(move |request| {
            if flag.load(Ordering::SeqCst) == 1 {
                Ok(ApiResponse::json_body(200, &json!({ "temp": 24 })))
            } else if request.path().ends_with("/auth/refresh-token") {
                Ok(ApiResponse::json_body(401, &json!({ "message": "revoked" })))
            } else {
                Ok(ApiResponse::json_body(401, &json!({ "message": "jwt expired" })))
            }
        });
        let api = ApiClient::with_timeouts(
            "https://api.test/api",
            transport,
            Arc::new(MemoryCredentialStore::with_tokens(Some("t"), Some("r"))),
            TimeoutConfig::fast(),
        );
        let weather = WeatherService::new(Arc::new(api), RetryPolicy::new(3).with_base_delay(1).with_jitter(false));

        weather.forecast(-3.37, 36.68).await.unwrap();
        online.store(0, Ordering::SeqCst);

        let error = weather.forecast(-3.37, 36.68).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::AuthenticationFailed);
    }

    #[tokio::test]
    async fn test_rejected_request_skips_fallback() {
        let online = Arc::new(AtomicU32::new(1));
        let flag = online.clone();
        let transport = FakeTransport::new(move |_| {
            if flag.load(Ordering::SeqCst) == 1 {
                Ok(ApiResponse::json_body(200, &json!({ "temp": 19 })))
            } else {
                Ok(ApiResponse::json_body(400, &json!({ "error": "lat out of range" })))
            }
        });
        let weather = service(transport);

        weather.forecast(10.0, 10.0).await.unwrap();
        online.store(0, Ordering::SeqCst);

        let error = weather.forecast(10.0, 10.0).await.unwrap_err();
        assert_eq!(error.status(), Some(400));
    }

    #[tokio::test]
    async fn test_client_errors_not_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let transport = FakeTransport::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(ApiResponse::json_body(400, &json!({ "error": "lat out of range" })))
        });

        let error = service(transport).forecast(123.0, 0.0).await.unwrap_err();
        assert_eq!(error.to_string(), "lat out of range");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
