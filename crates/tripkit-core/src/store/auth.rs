//! Authentication slice

use crate::api;
use crate::store::collection::Status;
use crate::store::thunk::track;
use crate::store::{Action, Store};
use crate::types::{AuthSession, LoginRequest, RegisterRequest, User};
use crate::Result;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub user: Option<User>,
    pub is_authenticated: bool,
    pub status: Status,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AuthAction {
    Pending,
    Rejected(String),
    ClearError,
    SignedIn(User),
    /// The stored session was revoked or could not be refreshed
    SessionEnded,
}

pub fn reduce(state: &mut AuthState, action: AuthAction) {
    match action {
        AuthAction::Pending => state.status.begin(),
        AuthAction::Rejected(message) => state.status.fail(message),
        AuthAction::ClearError => state.status.clear_error(),
        AuthAction::SignedIn(user) => {
            state.status.succeed();
            state.user = Some(user);
            state.is_authenticated = true;
        }
        AuthAction::SessionEnded => {
            state.user = None;
            state.is_authenticated = false;
        }
    }
}

pub struct AuthOps<'a> {
    store: &'a Store,
}

impl<'a> AuthOps<'a> {
    pub(crate) fn new(store: &'a Store) -> Self {
        Self { store }
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<AuthSession> {
        track(
            self.store,
            Action::Auth(AuthAction::Pending),
            api::auth::login(self.store.api(), request),
            |session: &AuthSession| Action::Auth(AuthAction::SignedIn(session.user.clone())),
            |message| Action::Auth(AuthAction::Rejected(message)),
        )
        .await
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthSession> {
        track(
            self.store,
            Action::Auth(AuthAction::Pending),
            api::auth::register(self.store.api(), request),
            |session: &AuthSession| Action::Auth(AuthAction::SignedIn(session.user.clone())),
            |message| Action::Auth(AuthAction::Rejected(message)),
        )
        .await
    }

    /// Load the user behind a previously stored session, if there is one
    pub async fn restore(&self) -> Result<Option<User>> {
        if !self.store.api().has_session() {
            return Ok(None);
        }

        let user = track(
            self.store,
            Action::Auth(AuthAction::Pending),
            api::auth::current_user(self.store.api()),
            |user: &User| Action::Auth(AuthAction::SignedIn(user.clone())),
            |message| Action::Auth(AuthAction::Rejected(message)),
        )
        .await?;

        Ok(Some(user))
    }

    /// Sign out and reset every slice
    pub async fn logout(&self) -> Result<()> {
        track(
            self.store,
            Action::Auth(AuthAction::Pending),
            api::auth::logout(self.store.api()),
            |_| Action::Reset,
            |message| Action::Auth(AuthAction::Rejected(message)),
        )
        .await
    }
}
