use super::failure_message;
use crate::api::AuthService;
use crate::types::{AuthResponse, Credentials, MessageResponse, SignupRequest, UserProfile};
use crate::Result;
use std::sync::{Mutex, PoisonError};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub is_authenticated: bool,
    pub user: Option<UserProfile>,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AuthAction {
    Request,
    LoginSuccess(UserProfile),
    RegisterSuccess,
    Failure(String),
    Logout,
    ClearError,
}

impl AuthState {
    pub fn apply(&mut self, action: AuthAction) {
        match action {
            AuthAction::Request => {
                self.loading = true;
                self.error = None;
            }
            AuthAction::LoginSuccess(user) => {
                self.is_authenticated = true;
                self.user = Some(user);
                self.loading = false;
                self.error = None;
            }
            AuthAction::RegisterSuccess => {
                self.loading = false;
                self.error = None;
            }
            AuthAction::Failure(message) => {
                self.loading = false;
                self.error = Some(message);
            }
            AuthAction::Logout => *self = AuthState::default(),
            AuthAction::ClearError => self.error = None,
        }
    }
}

/// Sign-in state. Starts from whatever the session store already holds.
pub struct AuthStore {
    auth: AuthService,
    state: Mutex<AuthState>,
}

impl AuthStore {
    pub fn new(auth: AuthService) -> Self {
        let state = AuthState {
            is_authenticated: auth.token().is_some(),
            user: auth.current_user(),
            ..AuthState::default()
        };
        Self {
            auth,
            state: Mutex::new(state),
        }
    }

    pub fn state(&self) -> AuthState {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn dispatch(&self, action: AuthAction) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .apply(action);
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<AuthResponse> {
        self.dispatch(AuthAction::Request);
        match self.auth.login(credentials).await {
            Ok(resp) => {
                self.dispatch(AuthAction::LoginSuccess(resp.profile()));
                Ok(resp)
            }
            Err(err) => {
                self.dispatch(AuthAction::Failure(failure_message(&err, "Login failed")));
                Err(err)
            }
        }
    }

    pub async fn register(&self, signup: &SignupRequest) -> Result<MessageResponse> {
        self.dispatch(AuthAction::Request);
        match self.auth.register(signup).await {
            Ok(resp) => {
                self.dispatch(AuthAction::RegisterSuccess);
                Ok(resp)
            }
            Err(err) => {
                self.dispatch(AuthAction::Failure(failure_message(
                    &err,
                    "Registration failed",
                )));
                Err(err)
            }
        }
    }

    pub fn logout(&self) {
        self.auth.logout();
        self.dispatch(AuthAction::Logout);
    }

    pub fn clear_error(&self) {
        self.dispatch(AuthAction::ClearError);
    }

    /// Re-validate a stored session on start-up.
    ///
    /// Signs out unless a stored token is accepted by the backend and a stored user exists.
    pub async fn restore(&self) -> bool {
        let Some(token) = self.auth.token() else {
            self.logout();
            return false;
        };
        if !self.auth.verify_token(&token).await {
            debug!("stored token rejected, signing out");
            self.logout();
            return false;
        }
        match self.auth.current_user() {
            Some(user) => {
                self.dispatch(AuthAction::LoginSuccess(user));
                true
            }
            None => {
                self.logout();
                false
            }
        }
    }
}
