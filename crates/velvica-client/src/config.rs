//! Facade configuration.
//!
//! Each facade takes its own config struct; all fields are opaque strings
//! supplied by the embedding application and are interpolated into request
//! paths or headers without further parsing.
//!
//! The debug-flag behavior is driven by an explicit [`Environment`] value
//! instead of ambient process state; [`Environment::from_env`] exists as an
//! opt-in convenience for applications that want the old behavior.

use zeroize::Zeroizing;

/// Deployment environment of the embedding application.
///
/// Development mode appends the `debug=1` marker to requests of the
/// debug-flag facade families so a server-side middleware can relax CORS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    /// Read the environment from the `VELVICA_ENV` variable.
    ///
    /// Unset, empty, or `development` map to [`Environment::Development`];
    /// any other value is treated as production.
    pub fn from_env() -> Self {
        match std::env::var("VELVICA_ENV") {
            Ok(v) if v.is_empty() || v == "development" => Self::Development,
            Ok(_) => Self::Production,
            Err(_) => Self::Development,
        }
    }

    pub(crate) fn is_development(self) -> bool {
        matches!(self, Self::Development)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("endpoint must not be empty")]
    EmptyEndpoint,
}

pub(crate) fn require_endpoint(endpoint: &str) -> Result<(), ConfigError> {
    if endpoint.is_empty() {
        return Err(ConfigError::EmptyEndpoint);
    }
    Ok(())
}

/// Configuration for the back-office facade.
#[derive(Debug, Clone)]
pub struct BackOfficeConfig {
    /// Base URL of the back-office service.
    pub endpoint: String,
    /// Session-restore identifier, sent as the `SESSID` query field.
    pub session_restore: String,
    pub environment: Environment,
}

/// Configuration for the VPS control-panel facade.
#[derive(Debug, Clone)]
pub struct ControlPanelConfig {
    /// Base URL of the control-panel service.
    pub endpoint: String,
    /// Subscription whose VPS the facade operates on.
    pub subscription_id: String,
    /// Opaque pre-signed query fragment, appended verbatim as the last
    /// glue operation of every request.
    pub signature: String,
}

/// Configuration for the partner-portal facade.
#[derive(Debug, Clone)]
pub struct PartnerConfig {
    /// Base URL of the partner-portal service.
    pub endpoint: String,
    /// Portal user whose resources are addressed.
    pub br_agent_user_uuid: String,
    /// Sales-channel identifier, sent as the `sales_channel_id` query field.
    pub br_agent_id: String,
    /// Opaque pre-signed query fragment, appended verbatim as the last
    /// glue operation of every request.
    pub signature: String,
}

/// OAuth client credentials for the certificate facade.
///
/// Custom `Debug` implementation redacts the secret to prevent credential
/// leakage in log output.
#[derive(Clone)]
pub struct OauthCredentials {
    pub client_id: String,
    pub client_secret: Zeroizing<String>,
}

impl OauthCredentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: Zeroizing::new(client_secret.into()),
        }
    }
}

impl std::fmt::Debug for OauthCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OauthCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

/// Configuration for the certificate activation facade.
#[derive(Debug, Clone)]
pub struct CertConfig {
    /// Base URL of the certificate service. The OAuth token endpoint is
    /// derived from it as `{endpoint}/oauth`.
    pub endpoint: String,
    /// Sales-channel identifier, sent as the `sales_channel_id` query field.
    pub sales_channel_id: String,
    /// Client credentials for the bearer-token exchange. `None` (or an empty
    /// client id) disables OAuth entirely.
    pub oauth: Option<OauthCredentials>,
    pub environment: Environment,
}
