//! Typed client for the certificate activation service.
//!
//! Every request carries the sales-channel identifier as a fixed query
//! field; in development the `debug=1` marker is glued last. When client
//! credentials are configured, requests are authenticated with a bearer
//! token obtained once from `{endpoint}/oauth` and cached for the lifetime
//! of the client.
//!
//! ## Paths
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | POST   | `cert/info` | Look up a certificate |
//! | POST   | `cert/activate` | Activate a certificate |

use serde_json::{json, Value};

use crate::config::{require_endpoint, CertConfig};
use crate::error::ApiClientError;
use crate::request::{dispatch, RequestPathBuilder};
use crate::transport::{ErrorHandler, OauthParams, RequestParams, Transport};

/// Client for the certificate activation service.
#[derive(Debug, Clone)]
pub struct CertClient {
    config: CertConfig,
    transport: Transport,
}

impl CertClient {
    pub fn new(config: CertConfig) -> Result<Self, ApiClientError> {
        require_endpoint(&config.endpoint)?;
        let transport = Transport::new()?;
        Ok(Self::assemble(config, transport))
    }

    /// Construct with an injected transport. The bearer-token exchange is
    /// wired onto it when the config carries credentials.
    pub fn with_transport(
        config: CertConfig,
        transport: Transport,
    ) -> Result<Self, ApiClientError> {
        require_endpoint(&config.endpoint)?;
        Ok(Self::assemble(config, transport))
    }

    fn assemble(config: CertConfig, transport: Transport) -> Self {
        // An empty client id reads as "no OAuth", matching what embedding
        // applications pass when the channel is unauthenticated.
        let transport = match &config.oauth {
            Some(creds) if !creds.client_id.is_empty() => transport.with_oauth(OauthParams {
                endpoint: format!("{}/oauth", config.endpoint),
                client_id: creds.client_id.clone(),
                client_secret: creds.client_secret.clone(),
            }),
            _ => transport,
        };
        Self { config, transport }
    }

    /// A copy of this client whose transport carries its own error handler.
    /// The bearer-token cache is shared with the original.
    pub fn with_error_handler(&self, handler: ErrorHandler) -> Self {
        Self {
            config: self.config.clone(),
            transport: self.transport.clone().with_error_handler(handler),
        }
    }

    /// Look up a certificate. Calls `POST cert/info`.
    pub async fn cert_info(
        &self,
        cert: &str,
        email: &str,
        verification_code: &str,
    ) -> Result<Value, ApiClientError> {
        self.submit("cert/info", cert, email, verification_code).await
    }

    /// Activate a certificate. Calls `POST cert/activate`.
    pub async fn cert_activate(
        &self,
        cert: &str,
        email: &str,
        verification_code: &str,
    ) -> Result<Value, ApiClientError> {
        self.submit("cert/activate", cert, email, verification_code)
            .await
    }

    async fn submit(
        &self,
        action: &str,
        cert: &str,
        email: &str,
        verification_code: &str,
    ) -> Result<Value, ApiClientError> {
        let body = json!({
            "cert": cert,
            "email": email,
            "verificationCode": verification_code,
        });
        dispatch(self, action, RequestParams::post().json(body), &[]).await
    }
}

impl RequestPathBuilder for CertClient {
    fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    fn transport(&self) -> &Transport {
        &self.transport
    }

    fn request_path(&self, action: &str) -> String {
        format!(
            "{action}?sales_channel_id={}",
            self.config.sales_channel_id
        )
    }

    fn trailing_fragment(&self) -> Option<String> {
        self.config
            .environment
            .is_development()
            .then(|| "debug=1".to_string())
    }
}
