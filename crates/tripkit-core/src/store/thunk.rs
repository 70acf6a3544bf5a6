//! Dispatch/settle wrapper for async store operations

use std::fmt::Display;
use std::future::Future;

use crate::http::ApiError;
use crate::store::auth::AuthAction;
use crate::store::{Action, Store};

/// Failures a store operation can settle with
pub(crate) trait Failure: Display {
    /// Whether the failure means the stored session is gone
    fn ends_session(&self) -> bool;
}

impl Failure for ApiError {
    fn ends_session(&self) -> bool {
        self.is_auth_failure()
    }
}

impl Failure for crate::Error {
    fn ends_session(&self) -> bool {
        self.as_api().is_some_and(ApiError::is_auth_failure)
    }
}

/// Dispatch `pending`, drive `operation`, then dispatch exactly one
/// settlement and hand the result back to the caller.
///
/// `pending` is reduced before `operation` is first polled.
pub(crate) async fn track<T, E, Fut>(
    store: &Store,
    pending: Action,
    operation: Fut,
    fulfilled: impl FnOnce(&T) -> Action,
    rejected: impl FnOnce(String) -> Action,
) -> Result<T, E>
where
    Fut: Future<Output = Result<T, E>>,
    E: Failure,
{
    store.dispatch(pending);

    match operation.await {
        Ok(value) => {
            store.dispatch(fulfilled(&value));
            Ok(value)
        }
        Err(error) => {
            store.dispatch(rejected(error.to_string()));
            if error.ends_session() {
                store.dispatch(Action::Auth(AuthAction::SessionEnded));
            }
            Err(error)
        }
    }
}
