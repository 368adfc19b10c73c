//! Typed client for the Velvica back-office service.
//!
//! Every request carries the session-restore identifier as the `SESSID`
//! query field; in development the `debug=1` marker is glued last.
//!
//! ## Paths
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | GET    | `br_agent/list` | List branded agents |
//! | GET    | `soft_group/list` | List software groups |
//! | GET    | `developer/list` | List developers |
//! | GET    | `br_soft/list` | List branded software |
//! | GET    | `soft/list` | List software |
//! | GET    | `service/list` | List services |
//! | GET    | `subscription/list` | List subscriptions |
//! | GET    | `discount/list` | List discounts |
//! | GET    | `discount/{id}` | Get a discount |
//! | POST   | `discount` | Create a discount |
//! | PATCH  | `discount/{id}` | Update a discount |
//! | GET    | `personal_code/list` | List personal codes |
//! | POST   | `personal_code` | Create a personal code |
//! | DELETE | `personal_code/{id}` | Delete a personal code |
//! | POST   | `personal_code/{id}/suspend` | Suspend a personal code |

use serde::Serialize;
use serde_json::Value;

use crate::config::{require_endpoint, BackOfficeConfig};
use crate::error::ApiClientError;
use crate::options::{encode, Schema};
use crate::request::{dispatch, RequestPathBuilder};
use crate::transport::{ErrorHandler, RequestParams, Transport};

/// Kind of a branded agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentType {
    Orchestrator,
    Reseller,
    Tenant,
    Partner,
    Provider,
}

impl AgentType {
    pub const WIRE_VALUES: &'static [&'static str] =
        &["orchestrator", "reseller", "tenant", "partner", "provider"];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Orchestrator => "orchestrator",
            Self::Reseller => "reseller",
            Self::Tenant => "tenant",
            Self::Partner => "partner",
            Self::Provider => "provider",
        }
    }
}

/// Lifecycle status of a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceStatus {
    Active,
    Archived,
    New,
    Deleted,
}

impl ServiceStatus {
    pub const WIRE_VALUES: &'static [&'static str] = &["active", "archived", "new", "deleted"];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Archived => "archived",
            Self::New => "new",
            Self::Deleted => "deleted",
        }
    }
}

/// Lifecycle status of a discount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountStatus {
    Active,
    Scheduled,
    Deleted,
}

impl DiscountStatus {
    pub const WIRE_VALUES: &'static [&'static str] = &["active", "scheduled", "deleted"];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Scheduled => "scheduled",
            Self::Deleted => "deleted",
        }
    }
}

/// Status of a discount from a single user's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountStatusForUser {
    Used,
    AvailablePersonal,
    AvailableGeneral,
}

impl DiscountStatusForUser {
    pub const WIRE_VALUES: &'static [&'static str] =
        &["used", "available_personal", "available_general"];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Used => "used",
            Self::AvailablePersonal => "available_personal",
            Self::AvailableGeneral => "available_general",
        }
    }
}

/// Lifecycle status of a personal discount code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonalCodeStatus {
    Active,
    Used,
    Suspended,
}

impl PersonalCodeStatus {
    pub const WIRE_VALUES: &'static [&'static str] = &["active", "used", "suspended"];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Used => "used",
            Self::Suspended => "suspended",
        }
    }
}

/// Client for the back-office service.
#[derive(Debug, Clone)]
pub struct BackOfficeClient {
    config: BackOfficeConfig,
    transport: Transport,
}

impl BackOfficeClient {
    pub fn new(config: BackOfficeConfig) -> Result<Self, ApiClientError> {
        require_endpoint(&config.endpoint)?;
        Ok(Self { transport: Transport::new()?, config })
    }

    /// Construct with an injected transport (custom handlers, OAuth,
    /// cancellation, or a stub in tests).
    pub fn with_transport(
        config: BackOfficeConfig,
        transport: Transport,
    ) -> Result<Self, ApiClientError> {
        require_endpoint(&config.endpoint)?;
        Ok(Self { config, transport })
    }

    /// A copy of this client whose transport carries its own error handler.
    /// The original client, its HTTP connection pool, and the bearer-token
    /// cache are shared and unaffected.
    pub fn with_error_handler(&self, handler: ErrorHandler) -> Self {
        Self {
            config: self.config.clone(),
            transport: self.transport.clone().with_error_handler(handler),
        }
    }

    async fn list(
        &self,
        action: &str,
        options: &Value,
        schema: &[(&str, Schema)],
    ) -> Result<Value, ApiClientError> {
        let params = encode(options, schema)?;
        dispatch(self, action, RequestParams::get(), &params).await
    }

    /// List branded agents. Calls `GET br_agent/list`.
    pub async fn fetch_br_agents(&self, options: Value) -> Result<Value, ApiClientError> {
        let schema = [
            ("search", Schema::text()),
            ("agentType", Schema::one_of(AgentType::WIRE_VALUES)),
            ("p", Schema::numeric()),
        ];
        self.list("br_agent/list", &options, &schema).await
    }

    /// List software groups. Calls `GET soft_group/list`.
    pub async fn fetch_soft_groups(&self, options: Value) -> Result<Value, ApiClientError> {
        let schema = [("search", Schema::text()), ("p", Schema::numeric())];
        self.list("soft_group/list", &options, &schema).await
    }

    /// List developers. Calls `GET developer/list`.
    pub async fn fetch_developers(&self, options: Value) -> Result<Value, ApiClientError> {
        let schema = [("search", Schema::text()), ("p", Schema::numeric())];
        self.list("developer/list", &options, &schema).await
    }

    /// List branded software. Calls `GET br_soft/list`.
    pub async fn fetch_br_softs(&self, options: Value) -> Result<Value, ApiClientError> {
        let schema = [
            ("search", Schema::text()),
            ("developerId", Schema::text()),
            ("p", Schema::numeric()),
        ];
        self.list("br_soft/list", &options, &schema).await
    }

    /// List software titles. Calls `GET soft/list`.
    pub async fn fetch_softs(&self, options: Value) -> Result<Value, ApiClientError> {
        let schema = [
            ("search", Schema::text()),
            ("brSoftId", Schema::text()),
            ("p", Schema::numeric()),
        ];
        self.list("soft/list", &options, &schema).await
    }

    /// List services. Calls `GET service/list`.
    pub async fn fetch_services(&self, options: Value) -> Result<Value, ApiClientError> {
        let schema = [
            ("search", Schema::text()),
            ("softId", Schema::text()),
            ("status", Schema::one_of(ServiceStatus::WIRE_VALUES)),
            ("p", Schema::numeric()),
        ];
        self.list("service/list", &options, &schema).await
    }

    /// List subscriptions. Calls `GET subscription/list`.
    pub async fn fetch_subscriptions(&self, options: Value) -> Result<Value, ApiClientError> {
        let schema = [("uuid", Schema::text()), ("p", Schema::numeric())];
        self.list("subscription/list", &options, &schema).await
    }

    /// List discounts. Calls `GET discount/list`.
    pub async fn fetch_discounts(&self, options: Value) -> Result<Value, ApiClientError> {
        let schema = [
            ("search", Schema::text()),
            ("uuidOrEmail", Schema::text()),
            ("status", Schema::one_of(DiscountStatus::WIRE_VALUES)),
            ("statusForUser", Schema::one_of(DiscountStatusForUser::WIRE_VALUES)),
            ("softGroup", Schema::text()),
            ("p", Schema::numeric()),
        ];
        self.list("discount/list", &options, &schema).await
    }

    /// List personal discount codes. Calls `GET personal_code/list`.
    pub async fn fetch_personal_codes(&self, options: Value) -> Result<Value, ApiClientError> {
        let schema = [
            ("discountId", Schema::text()),
            ("search", Schema::text()),
            ("status", Schema::one_of(PersonalCodeStatus::WIRE_VALUES)),
            ("p", Schema::numeric()),
        ];
        self.list("personal_code/list", &options, &schema).await
    }

    /// Get a discount by id. Calls `GET discount/{id}`.
    pub async fn get_discount(&self, id: &str) -> Result<Value, ApiClientError> {
        dispatch(self, &format!("discount/{id}"), RequestParams::get(), &[]).await
    }

    /// Create a discount from a free-form form body, passed through
    /// verbatim (no validation, no key renaming). Calls `POST discount`.
    pub async fn post_discount(
        &self,
        form: Vec<(String, String)>,
    ) -> Result<Value, ApiClientError> {
        dispatch(self, "discount", RequestParams::post().form(form), &[]).await
    }

    /// Update a discount from a free-form form body, passed through
    /// verbatim. Calls `PATCH discount/{id}`.
    pub async fn patch_discount(
        &self,
        id: &str,
        form: Vec<(String, String)>,
    ) -> Result<Value, ApiClientError> {
        dispatch(
            self,
            &format!("discount/{id}"),
            RequestParams::patch().form(form),
            &[],
        )
        .await
    }

    /// Create a personal code from a free-form form body, passed through
    /// verbatim. Calls `POST personal_code`.
    pub async fn post_personal_code(
        &self,
        form: Vec<(String, String)>,
    ) -> Result<Value, ApiClientError> {
        dispatch(self, "personal_code", RequestParams::post().form(form), &[]).await
    }

    /// Delete a personal code. Calls `DELETE personal_code/{id}`.
    pub async fn delete_personal_code(&self, id: &str) -> Result<Value, ApiClientError> {
        dispatch(
            self,
            &format!("personal_code/{id}"),
            RequestParams::delete(),
            &[],
        )
        .await
    }

    /// Suspend a personal code. Calls `POST personal_code/{id}/suspend`.
    pub async fn suspend_personal_code(&self, id: &str) -> Result<Value, ApiClientError> {
        dispatch(
            self,
            &format!("personal_code/{id}/suspend"),
            RequestParams::post(),
            &[],
        )
        .await
    }
}

impl RequestPathBuilder for BackOfficeClient {
    fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    fn transport(&self) -> &Transport {
        &self.transport
    }

    fn request_path(&self, action: &str) -> String {
        format!("{action}?SESSID={}", self.config.session_restore)
    }

    fn trailing_fragment(&self) -> Option<String> {
        self.config
            .environment
            .is_development()
            .then(|| "debug=1".to_string())
    }
}
