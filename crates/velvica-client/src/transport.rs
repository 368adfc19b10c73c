//! HTTP transport shared by every facade.
//!
//! Wraps a [`reqwest::Client`] and adds the pieces the Velvica backends
//! expect: an always-on `Accept: application/json` header, pluggable error
//! and connection-failure handlers, an optional OAuth client-credentials
//! bearer token (acquired once per transport and reused), and an optional
//! cancellation handle.
//!
//! Cloning a [`Transport`] is cheap and shares the underlying HTTP client
//! and the bearer-token cache; only the handlers are per-clone state. The
//! facades rely on this for their scoped error-handler copies.

use std::sync::Arc;

use reqwest::header::ACCEPT;
use reqwest::{Method, StatusCode};
use serde_json::Value;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::error::ApiClientError;

/// Called exactly once when the backend reports a non-success status, with
/// the status and the parsed body. Returning `Err` fails the call with a
/// caller-chosen error; returning `Ok(())` lets the body pass through.
pub type ErrorHandler =
    Arc<dyn Fn(StatusCode, &Value) -> Result<(), ApiClientError> + Send + Sync>;

/// Called when the HTTP call itself cannot be completed (DNS, connection,
/// unreadable body). Its return value becomes the call's error.
pub type ConnectionFailedHandler =
    Arc<dyn Fn(reqwest::Error) -> ApiClientError + Send + Sync>;

/// Parameters of the OAuth client-credentials exchange.
///
/// Custom `Debug` implementation redacts the secret to prevent credential
/// leakage in log output.
#[derive(Clone)]
pub struct OauthParams {
    /// Full token-endpoint URL.
    pub endpoint: String,
    pub client_id: String,
    pub client_secret: Zeroizing<String>,
}

impl std::fmt::Debug for OauthParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OauthParams")
            .field("endpoint", &self.endpoint)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

/// Body of an outgoing request.
#[derive(Debug, Clone)]
pub enum RequestBody {
    /// JSON-encoded, sent with `Content-type: application/json`.
    Json(Value),
    /// Key/value pairs, sent with
    /// `Content-type: application/x-www-form-urlencoded`.
    Form(Vec<(String, String)>),
}

/// Method, body, and extra headers of an outgoing request.
#[derive(Debug, Clone)]
pub struct RequestParams {
    method: Method,
    body: Option<RequestBody>,
    headers: Vec<(String, String)>,
}

impl RequestParams {
    fn new(method: Method) -> Self {
        Self { method, body: None, headers: Vec::new() }
    }

    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    pub fn post() -> Self {
        Self::new(Method::POST)
    }

    pub fn put() -> Self {
        Self::new(Method::PUT)
    }

    pub fn patch() -> Self {
        Self::new(Method::PATCH)
    }

    pub fn delete() -> Self {
        Self::new(Method::DELETE)
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(RequestBody::Json(body));
        self
    }

    pub fn form(mut self, pairs: Vec<(String, String)>) -> Self {
        self.body = Some(RequestBody::Form(pairs));
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// The HTTP call abstraction behind every facade method.
#[derive(Clone)]
pub struct Transport {
    http: reqwest::Client,
    error_handler: Option<ErrorHandler>,
    connection_failed_handler: Option<ConnectionFailedHandler>,
    oauth: Option<OauthParams>,
    token: Arc<Mutex<Option<String>>>,
    cancel: Option<CancellationToken>,
}

impl Transport {
    /// Create a transport with a default HTTP client.
    pub fn new() -> Result<Self, ApiClientError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            error_handler: None,
            connection_failed_handler: None,
            oauth: None,
            token: Arc::new(Mutex::new(None)),
            cancel: None,
        })
    }

    pub fn with_error_handler(mut self, handler: ErrorHandler) -> Self {
        self.error_handler = Some(handler);
        self
    }

    pub fn with_connection_failed_handler(mut self, handler: ConnectionFailedHandler) -> Self {
        self.connection_failed_handler = Some(handler);
        self
    }

    /// Enable the bearer-token exchange. The token is minted lazily on the
    /// first call and cached for the lifetime of this transport (and all of
    /// its clones). No refresh-on-expiry.
    pub fn with_oauth(mut self, params: OauthParams) -> Self {
        self.oauth = Some(params);
        self
    }

    /// Attach an externally controlled cancellation handle. A fired token
    /// aborts in-flight requests with [`ApiClientError::Cancelled`].
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Issue a request and parse the response body as JSON.
    ///
    /// A non-success status is routed through the registered error handler;
    /// with no handler registered the parsed error body is returned as if
    /// the call had succeeded, so callers that care must register one.
    pub async fn fetch(&self, url: &str, params: RequestParams) -> Result<Value, ApiClientError> {
        let RequestParams { method, body, headers } = params;
        debug!(%method, url, "dispatching request");

        let mut request = self
            .http
            .request(method, url)
            .header(ACCEPT, "application/json");

        if let Some(oauth) = &self.oauth {
            let token = self.bearer_token(oauth).await?;
            request = request.bearer_auth(token);
        }

        request = match body {
            None => request,
            Some(RequestBody::Json(value)) => request.json(&value),
            Some(RequestBody::Form(pairs)) => request.form(&pairs),
        };
        for (name, value) in headers {
            request = request.header(name, value);
        }

        let response = self.send(request).await?;
        let status = response.status();
        let body = self.read_json(response).await?;

        if !status.is_success() {
            warn!(%status, url, "backend reported a non-success status");
            if let Some(handler) = &self.error_handler {
                handler(status, &body)?;
            }
        }

        Ok(body)
    }

    /// Return the cached bearer token, minting it on first use. The cache
    /// lock is held across the exchange; a racing first call waits and then
    /// reuses the cached token instead of issuing a second request.
    async fn bearer_token(&self, oauth: &OauthParams) -> Result<String, ApiClientError> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            return Ok(token.clone());
        }

        debug!(endpoint = %oauth.endpoint, "acquiring OAuth bearer token");
        let grant = serde_json::json!({
            "client_id": oauth.client_id,
            "client_secret": oauth.client_secret.as_str(),
            "grant_type": "client_credentials",
        });
        let request = self
            .http
            .post(&oauth.endpoint)
            .header(ACCEPT, "application/json")
            .json(&grant);

        let response = self.send(request).await?;
        let status = response.status();
        let body = self.read_json(response).await?;

        if !status.is_success() {
            warn!(%status, "OAuth token exchange failed");
            if let Some(handler) = &self.error_handler {
                handler(status, &body)?;
            }
        }

        let token = body
            .get("access_token")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                ApiClientError::MalformedResponse(
                    "token response is missing access_token".into(),
                )
            })?
            .to_string();

        *cached = Some(token.clone());
        Ok(token)
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, ApiClientError> {
        let outcome = match &self.cancel {
            Some(cancel) => tokio::select! {
                _ = cancel.cancelled() => return Err(ApiClientError::Cancelled),
                outcome = request.send() => outcome,
            },
            None => request.send().await,
        };
        outcome.map_err(|e| self.connection_error(e))
    }

    async fn read_json(&self, response: reqwest::Response) -> Result<Value, ApiClientError> {
        response.json().await.map_err(|e| self.connection_error(e))
    }

    fn connection_error(&self, err: reqwest::Error) -> ApiClientError {
        match &self.connection_failed_handler {
            Some(handler) => handler(err),
            None => ApiClientError::Transport(err),
        }
    }
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("oauth", &self.oauth)
            .field("error_handler", &self.error_handler.is_some())
            .field(
                "connection_failed_handler",
                &self.connection_failed_handler.is_some(),
            )
            .field("cancellable", &self.cancel.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_params_builders_set_method_and_body() {
        let params = RequestParams::post().json(serde_json::json!({"a": 1}));
        assert_eq!(params.method, Method::POST);
        assert!(matches!(params.body, Some(RequestBody::Json(_))));

        let params = RequestParams::put()
            .form(vec![("name".into(), "key".into())])
            .header("X-Request-Id", "42");
        assert_eq!(params.method, Method::PUT);
        assert!(matches!(params.body, Some(RequestBody::Form(_))));
        assert_eq!(
            params.headers,
            vec![("X-Request-Id".to_string(), "42".to_string())]
        );
    }

    #[test]
    fn oauth_params_debug_redacts_secret() {
        let params = OauthParams {
            endpoint: "https://api.velvica.test/oauth".into(),
            client_id: "client-1".into(),
            client_secret: Zeroizing::new("super-secret".into()),
        };
        let rendered = format!("{params:?}");
        assert!(rendered.contains("client-1"));
        assert!(!rendered.contains("super-secret"));
    }

    #[test]
    fn transport_clones_share_the_token_cache() {
        let transport = Transport::new().unwrap();
        let clone = transport.clone();
        assert!(Arc::ptr_eq(&transport.token, &clone.token));
    }
}
