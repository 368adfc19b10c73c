//! # velvica-client — Typed Rust client for the Velvica backend services
//!
//! Provides ergonomic, typed access to the four Velvica API surfaces:
//! - **Back office** — catalog, discount, and personal-code administration,
//!   authenticated by a session-restore identifier.
//! - **Partner portal** — subscriptions and SSH keys of a portal user,
//!   authenticated by a pre-signed query suffix.
//! - **VPS control panel** — power, rescue, and console operations on a
//!   single subscription, authenticated by a pre-signed query suffix.
//! - **Certificate activation** — certificate lookup/activation,
//!   authenticated by an OAuth client-credentials bearer token.
//!
//! ## Architecture
//!
//! Each facade composes three pieces: the options codec ([`options`])
//! validates a caller-supplied options bag against per-field schemas and
//! renames its keys for the wire; the path builder ([`request`]) decorates
//! the action name with the facade family's fixed fields and glues query
//! fragments in a deterministic order; the transport ([`transport`]) issues
//! the HTTP call, applies the registered error/connection handlers, and
//! parses the JSON body. Facades are cheap to clone and safe to share; the
//! only cross-call state is the transport's bearer-token cache.
//!
//! ## Example
//!
//! ```no_run
//! use serde_json::json;
//! use velvica_client::{AgentType, BackOfficeClient, BackOfficeConfig, Environment};
//!
//! # async fn example() -> Result<(), velvica_client::ApiClientError> {
//! let client = BackOfficeClient::new(BackOfficeConfig {
//!     endpoint: "https://bo.velvica.example/api".into(),
//!     session_restore: "session-token".into(),
//!     environment: Environment::Production,
//! })?;
//!
//! let agents = client
//!     .fetch_br_agents(json!({ "search": "acme", "agentType": AgentType::Provider }))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod back_office;
pub mod cert;
pub mod config;
pub mod control_panel;
pub mod error;
pub mod options;
pub mod partner;
pub(crate) mod request;
pub mod transport;

pub use back_office::{
    AgentType, BackOfficeClient, DiscountStatus, DiscountStatusForUser, PersonalCodeStatus,
    ServiceStatus,
};
pub use cert::CertClient;
pub use config::{
    BackOfficeConfig, CertConfig, ConfigError, ControlPanelConfig, Environment, OauthCredentials,
    PartnerConfig,
};
pub use control_panel::{ControlPanelClient, RebuildOptions, VpsLogFilter, VpsStateChange};
pub use error::ApiClientError;
pub use options::{encode, Schema};
pub use partner::PartnerClient;
pub use transport::{
    ConnectionFailedHandler, ErrorHandler, OauthParams, RequestParams, Transport,
};
