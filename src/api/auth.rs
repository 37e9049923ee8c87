use crate::transport::HttpTransport;
use crate::types::{AuthResponse, Credentials, MessageResponse, SignupRequest, UserProfile};
use crate::Result;
use std::sync::Arc;
use tracing::warn;

const TOKEN_VALID_MESSAGE: &str = "Token is valid";

/// Sign-in, sign-up and token checks. Session state lives in the transport's
/// [`crate::session::SessionStore`].
#[derive(Clone)]
pub struct AuthService {
    transport: Arc<HttpTransport>,
}

impl AuthService {
    pub fn new(transport: Arc<HttpTransport>) -> Self {
        Self { transport }
    }

    /// Authenticate and remember the issued token and user profile.
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthResponse> {
        let resp: AuthResponse = self
            .transport
            .post_json("/auth/signin", credentials)
            .await?;
        let session = self.transport.session();
        if let Some(token) = resp.token.as_deref().filter(|t| !t.is_empty()) {
            session.set_token(token);
        }
        session.set_user(&resp.profile());
        Ok(resp)
    }

    pub async fn register(&self, signup: &SignupRequest) -> Result<MessageResponse> {
        self.transport.post_json("/auth/signup", signup).await
    }

    pub fn logout(&self) {
        self.transport.session().clear();
    }

    pub fn current_user(&self) -> Option<UserProfile> {
        self.transport.session().user()
    }

    pub fn token(&self) -> Option<String> {
        self.transport.session().token()
    }

    /// Ask the backend whether `token` is still accepted. Any failure counts as invalid.
    pub async fn verify_token(&self, token: &str) -> bool {
        match self
            .transport
            .get_json_with_token::<MessageResponse>("/auth/verify", token)
            .await
        {
            Ok(resp) => resp.message == TOKEN_VALID_MESSAGE,
            Err(e) => {
                warn!(error = %e, "token verification failed");
                false
            }
        }
    }
}
