use crate::session::SessionStore;
use crate::{Error, ErrorContext, Result};
use reqwest::{Method, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use url::Url;
use uuid::Uuid;

/// Thin wrapper over `reqwest` that resolves paths against the API base URL,
/// attaches the session's bearer token and turns non-2xx replies into [`Error::Remote`].
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    session: Arc<dyn SessionStore>,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Duration, session: Arc<dyn SessionStore>) -> Result<Self> {
        let parsed = Url::parse(base_url).map_err(|e| {
            Error::configuration_with_context(
                format!("invalid base URL '{}'", base_url),
                ErrorContext::new()
                    .with_field_path("base_url")
                    .with_details(e.to_string())
                    .with_source("transport"),
            )
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::configuration_with_context(
                format!("unsupported URL scheme '{}'", parsed.scheme()),
                ErrorContext::new()
                    .with_field_path("base_url")
                    .with_source("transport"),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .pool_idle_timeout(Some(Duration::from_secs(90)))
            .build()
            .map_err(|e| Error::Transport(TransportError::Other(e.to_string())))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<dyn SessionStore> {
        &self.session
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let resp = self
            .execute(Method::GET, path, &[], None::<&()>, None)
            .await?;
        Self::decode(resp).await
    }

    pub async fn get_json_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let resp = self
            .execute(Method::GET, path, query, None::<&()>, None)
            .await?;
        Self::decode(resp).await
    }

    /// GET with an explicit bearer token instead of the session's.
    pub async fn get_json_with_token<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &str,
    ) -> Result<T> {
        let resp = self
            .execute(Method::GET, path, &[], None::<&()>, Some(token))
            .await?;
        Self::decode(resp).await
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let resp = self
            .execute(Method::POST, path, &[], Some(body), None)
            .await?;
        Self::decode(resp).await
    }

    pub async fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let resp = self
            .execute(Method::PUT, path, &[], Some(body), None)
            .await?;
        Self::decode(resp).await
    }

    /// DELETE; any response body is ignored.
    pub async fn delete(&self, path: &str) -> Result<()> {
        self.execute(Method::DELETE, path, &[], None::<&()>, None)
            .await?;
        Ok(())
    }

    async fn execute<B>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
        token_override: Option<&str>,
    ) -> Result<Response>
    where
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        let request_id = Uuid::new_v4().to_string();

        let mut req = self
            .client
            .request(method.clone(), &url)
            .header("x-request-id", &request_id);
        if !query.is_empty() {
            req = req.query(query);
        }
        if let Some(body) = body {
            req = req.json(body);
        }
        if let Some(token) = token_override
            .map(str::to_string)
            .or_else(|| self.session.token())
        {
            req = req.bearer_auth(token);
        }

        debug!(method = %method, path, request_id = request_id.as_str(), "sending request");
        let start = Instant::now();
        let resp = req
            .send()
            .await
            .map_err(|e| Error::Transport(TransportError::Http(e)))?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        let message = Self::error_message(&body);
        info!(
            http_status = status.as_u16(),
            method = %method,
            path,
            request_id = request_id.as_str(),
            duration_ms = start.elapsed().as_millis() as u64,
            "taskboard request failed"
        );
        Err(Error::Remote {
            status: status.as_u16(),
            message,
        })
    }

    /// The backend reports failures as `{"message": "..."}`.
    fn error_message(body: &str) -> Option<String> {
        let json: serde_json::Value = serde_json::from_str(body).ok()?;
        json.get("message")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
    }

    async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T> {
        let text = resp
            .text()
            .await
            .map_err(|e| Error::Transport(TransportError::Http(e)))?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transport error: {0}")]
    Other(String),
}
