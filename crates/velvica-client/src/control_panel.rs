//! Typed client for the VPS control-panel service.
//!
//! Every action is nested under the configured subscription
//! (`subscription/{id}/{action}`) and the opaque signing suffix is glued
//! last, so it survives any preceding query parameters.
//!
//! ## Paths
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | GET    | `subscription/{id}/info` | VPS details |
//! | GET    | `subscription/{id}/image` | Available OS images |
//! | POST   | `subscription/{id}/rebuild` | Rebuild from an image |
//! | POST   | `subscription/{id}/start` … `rescue/leave` | State changes |
//! | POST   | `subscription/{id}/rescue/start` | Enter rescue mode |
//! | POST   | `subscription/{id}/rescue/leave` | Leave rescue mode |
//! | GET    | `subscription/{id}/console/url` | Console URL |
//! | GET    | `subscription/{id}/console/logs/{n}` | Console logs |

use std::str::FromStr;

use serde_json::Value;

use crate::config::{require_endpoint, ControlPanelConfig};
use crate::error::ApiClientError;
use crate::request::{dispatch, RequestPathBuilder};
use crate::transport::{ErrorHandler, RequestParams, Transport};

/// Power/rescue state transition of a VPS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VpsStateChange {
    TurnOn,
    Shutdown,
    SoftReboot,
    HardReboot,
    RescueLeave,
}

impl VpsStateChange {
    /// The backend action the transition maps to.
    pub const fn action_path(self) -> &'static str {
        match self {
            Self::TurnOn => "start",
            Self::Shutdown => "shutdown",
            Self::SoftReboot => "reboot/soft",
            Self::HardReboot => "reboot/hard",
            Self::RescueLeave => "rescue/leave",
        }
    }
}

impl FromStr for VpsStateChange {
    type Err = ApiClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "turnOn" => Ok(Self::TurnOn),
            "shutdown" => Ok(Self::Shutdown),
            "softReboot" => Ok(Self::SoftReboot),
            "hardReboot" => Ok(Self::HardReboot),
            "rescueLeave" => Ok(Self::RescueLeave),
            other => Err(ApiClientError::UnknownStateChange(other.to_string())),
        }
    }
}

/// How many console log lines to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VpsLogFilter {
    Count50,
    Count100,
    All,
}

impl VpsLogFilter {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Count50 => "50",
            Self::Count100 => "100",
            Self::All => "all",
        }
    }
}

impl FromStr for VpsLogFilter {
    type Err = ApiClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "50" => Ok(Self::Count50),
            "100" => Ok(Self::Count100),
            "all" => Ok(Self::All),
            other => Err(ApiClientError::UnknownLogFilter(other.to_string())),
        }
    }
}

/// Parameters of a VPS rebuild. The image is mandatory; the SSH key is
/// installed on the rebuilt system when given.
#[derive(Debug, Clone, Default)]
pub struct RebuildOptions {
    pub image_uuid: Option<String>,
    pub ssh_key: Option<String>,
}

/// Client for the VPS control-panel service.
#[derive(Debug, Clone)]
pub struct ControlPanelClient {
    config: ControlPanelConfig,
    transport: Transport,
}

impl ControlPanelClient {
    pub fn new(config: ControlPanelConfig) -> Result<Self, ApiClientError> {
        require_endpoint(&config.endpoint)?;
        Ok(Self { transport: Transport::new()?, config })
    }

    /// Construct with an injected transport.
    pub fn with_transport(
        config: ControlPanelConfig,
        transport: Transport,
    ) -> Result<Self, ApiClientError> {
        require_endpoint(&config.endpoint)?;
        Ok(Self { config, transport })
    }

    /// A copy of this client whose transport carries its own error handler.
    pub fn with_error_handler(&self, handler: ErrorHandler) -> Self {
        Self {
            config: self.config.clone(),
            transport: self.transport.clone().with_error_handler(handler),
        }
    }

    /// VPS details. Calls `GET info`.
    pub async fn fetch_info(&self) -> Result<Value, ApiClientError> {
        dispatch(self, "info", RequestParams::get(), &[]).await
    }

    /// Available OS images. Calls `GET image`.
    pub async fn fetch_images(&self) -> Result<Value, ApiClientError> {
        dispatch(self, "image", RequestParams::get(), &[]).await
    }

    /// Rebuild the VPS from an image. Calls `POST rebuild` with a form
    /// body of `image_uuid` and, when given, `ssh_key`.
    pub async fn rebuild(&self, options: RebuildOptions) -> Result<Value, ApiClientError> {
        let image_uuid = options.image_uuid.ok_or(ApiClientError::MissingImageUuid)?;

        let mut form = vec![("image_uuid".to_string(), image_uuid)];
        if let Some(ssh_key) = options.ssh_key {
            form.push(("ssh_key".to_string(), ssh_key));
        }

        dispatch(self, "rebuild", RequestParams::post().form(form), &[]).await
    }

    /// Apply a power/rescue state transition. Calls `POST` on the action
    /// the transition maps to.
    pub async fn change_state(&self, change: VpsStateChange) -> Result<Value, ApiClientError> {
        dispatch(self, change.action_path(), RequestParams::post(), &[]).await
    }

    /// Boot into rescue mode. Calls `POST rescue/start?image_id={id}`.
    pub async fn start_rescue(&self, image_id: &str) -> Result<Value, ApiClientError> {
        let encoded: String = url::form_urlencoded::byte_serialize(image_id.as_bytes()).collect();
        dispatch(
            self,
            &format!("rescue/start?image_id={encoded}"),
            RequestParams::post(),
            &[],
        )
        .await
    }

    /// Leave rescue mode. Calls `POST rescue/leave`.
    pub async fn leave_rescue(&self) -> Result<Value, ApiClientError> {
        dispatch(self, "rescue/leave", RequestParams::post(), &[]).await
    }

    /// URL of the out-of-band console. Calls `GET console/url`.
    pub async fn fetch_console_url(&self) -> Result<Value, ApiClientError> {
        dispatch(self, "console/url", RequestParams::get(), &[]).await
    }

    /// Console log lines. Calls `GET console/logs/{50|100|all}`.
    pub async fn fetch_logs(&self, filter: VpsLogFilter) -> Result<Value, ApiClientError> {
        dispatch(
            self,
            &format!("console/logs/{}", filter.as_str()),
            RequestParams::get(),
            &[],
        )
        .await
    }
}

impl RequestPathBuilder for ControlPanelClient {
    fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    fn transport(&self) -> &Transport {
        &self.transport
    }

    fn request_path(&self, action: &str) -> String {
        format!("subscription/{}/{action}", self.config.subscription_id)
    }

    fn trailing_fragment(&self) -> Option<String> {
        Some(self.config.signature.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::glue;

    fn client() -> ControlPanelClient {
        ControlPanelClient::new(ControlPanelConfig {
            endpoint: "ENDPOINT".into(),
            subscription_id: "SUBSCRIPTION_ID".into(),
            signature: "AG_SIGN".into(),
        })
        .unwrap()
    }

    #[test]
    fn actions_nest_under_the_subscription() {
        let client = client();
        assert_eq!(
            client.request_path("info"),
            "subscription/SUBSCRIPTION_ID/info"
        );
    }

    #[test]
    fn signature_is_glued_last() {
        let client = client();
        let base = format!("{}/{}", client.endpoint(), client.request_path("info"));
        let url = glue(&base, &client.trailing_fragment().unwrap());
        assert_eq!(url, "ENDPOINT/subscription/SUBSCRIPTION_ID/info?AG_SIGN");

        // With a preceding query the suffix still lands at the end.
        let base = format!(
            "{}/{}",
            client.endpoint(),
            client.request_path("rescue/start?image_id=abc")
        );
        let url = glue(&base, &client.trailing_fragment().unwrap());
        assert_eq!(
            url,
            "ENDPOINT/subscription/SUBSCRIPTION_ID/rescue/start?image_id=abc&AG_SIGN"
        );
    }

    #[test]
    fn state_changes_map_to_backend_actions() {
        assert_eq!(VpsStateChange::TurnOn.action_path(), "start");
        assert_eq!(VpsStateChange::Shutdown.action_path(), "shutdown");
        assert_eq!(VpsStateChange::SoftReboot.action_path(), "reboot/soft");
        assert_eq!(VpsStateChange::HardReboot.action_path(), "reboot/hard");
        assert_eq!(VpsStateChange::RescueLeave.action_path(), "rescue/leave");
    }

    #[test]
    fn unknown_state_change_literal_is_rejected() {
        let err = "UNKNOWN".parse::<VpsStateChange>().unwrap_err();
        assert_eq!(err.to_string(), "Action change UNKNOWN is not allowed!");
        assert_eq!("turnOn".parse::<VpsStateChange>().unwrap(), VpsStateChange::TurnOn);
    }

    #[test]
    fn unknown_log_filter_literal_is_rejected() {
        let err = "100500".parse::<VpsLogFilter>().unwrap_err();
        assert_eq!(err.to_string(), "Log count 100500 is not allowed!");
        assert_eq!("all".parse::<VpsLogFilter>().unwrap(), VpsLogFilter::All);
    }

    #[tokio::test]
    async fn rebuild_requires_an_image() {
        let err = client()
            .rebuild(RebuildOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Cannot rebuild without imageUUID specified.");
    }
}
