//! Typed client for the partner-portal service.
//!
//! Every action is nested under the portal user
//! (`users/{uuid}/{action}`), carries the sales-channel identifier as a
//! fixed query field, and ends with the opaque signing suffix.
//!
//! ## Paths
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | GET    | `users/{u}/subscriptions` | List subscriptions |
//! | GET    | `users/{u}/ssh_keys` | List SSH keys |
//! | POST   | `users/{u}/ssh_keys` | Create an SSH key |
//! | PUT    | `users/{u}/ssh_keys/{id}` | Rename an SSH key |
//! | DELETE | `users/{u}/ssh_keys/{id}` | Delete an SSH key |
//! | GET    | `users/{u}/subscriptions/{id}/vendor_logs` | Vendor logs |
//! | GET    | `users/{u}/subscriptions/{id}/billing_logs` | Billing logs |

use serde_json::{json, Value};

use crate::config::{require_endpoint, PartnerConfig};
use crate::error::ApiClientError;
use crate::request::{dispatch, RequestPathBuilder};
use crate::transport::{ErrorHandler, RequestParams, Transport};

/// Client for the partner-portal service.
#[derive(Debug, Clone)]
pub struct PartnerClient {
    config: PartnerConfig,
    transport: Transport,
}

impl PartnerClient {
    pub fn new(config: PartnerConfig) -> Result<Self, ApiClientError> {
        require_endpoint(&config.endpoint)?;
        Ok(Self { transport: Transport::new()?, config })
    }

    /// Construct with an injected transport.
    pub fn with_transport(
        config: PartnerConfig,
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

    /// List the user's subscriptions, optionally narrowed by filters. The
    /// filter pairs go onto the query string as-is — no validation, no key
    /// renaming. Calls `GET subscriptions`.
    pub async fn fetch_subscriptions(
        &self,
        filters: &[(&str, &str)],
    ) -> Result<Value, ApiClientError> {
        let url_params: Vec<(String, Value)> = filters
            .iter()
            .map(|(key, value)| ((*key).to_string(), Value::String((*value).to_string())))
            .collect();
        dispatch(self, "subscriptions", RequestParams::get(), &url_params).await
    }

    /// List the user's SSH keys. Calls `GET ssh_keys`.
    pub async fn fetch_ssh_keys(&self) -> Result<Value, ApiClientError> {
        dispatch(self, "ssh_keys", RequestParams::get(), &[]).await
    }

    /// Register an SSH public key. Calls `POST ssh_keys` with a form body.
    pub async fn create_ssh_key(
        &self,
        name: &str,
        public_key: &str,
    ) -> Result<Value, ApiClientError> {
        let form = vec![
            ("name".to_string(), name.to_string()),
            ("public_key".to_string(), public_key.to_string()),
        ];
        dispatch(self, "ssh_keys", RequestParams::post().form(form), &[]).await
    }

    /// Rename an SSH key. Calls `PUT ssh_keys/{id}` with a JSON body.
    pub async fn update_ssh_key(
        &self,
        ssh_key_id: &str,
        name: &str,
    ) -> Result<Value, ApiClientError> {
        dispatch(
            self,
            &format!("ssh_keys/{ssh_key_id}"),
            RequestParams::put().json(json!({ "name": name })),
            &[],
        )
        .await
    }

    /// Delete an SSH key. Calls `DELETE ssh_keys/{id}`.
    pub async fn delete_ssh_key(&self, ssh_key_id: &str) -> Result<Value, ApiClientError> {
        dispatch(
            self,
            &format!("ssh_keys/{ssh_key_id}"),
            RequestParams::delete(),
            &[],
        )
        .await
    }

    /// Vendor-side provisioning logs of a subscription.
    /// Calls `GET subscriptions/{id}/vendor_logs`.
    pub async fn fetch_vendor_logs(
        &self,
        subscription_id: &str,
    ) -> Result<Value, ApiClientError> {
        dispatch(
            self,
            &format!("subscriptions/{subscription_id}/vendor_logs"),
            RequestParams::get(),
            &[],
        )
        .await
    }

    /// Billing history of a subscription.
    /// Calls `GET subscriptions/{id}/billing_logs`.
    pub async fn fetch_billing_logs(
        &self,
        subscription_id: &str,
    ) -> Result<Value, ApiClientError> {
        dispatch(
            self,
            &format!("subscriptions/{subscription_id}/billing_logs"),
            RequestParams::get(),
            &[],
        )
        .await
    }
}

impl RequestPathBuilder for PartnerClient {
    fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    fn transport(&self) -> &Transport {
        &self.transport
    }

    fn request_path(&self, action: &str) -> String {
        format!(
            "users/{}/{action}?sales_channel_id={}",
            self.config.br_agent_user_uuid, self.config.br_agent_id
        )
    }

    fn trailing_fragment(&self) -> Option<String> {
        Some(self.config.signature.clone())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::request::{glue, render_query};

    fn client() -> PartnerClient {
        PartnerClient::new(PartnerConfig {
            endpoint: "ENDPOINT".into(),
            br_agent_user_uuid: "BR_AGENT_USER_ID".into(),
            br_agent_id: "BR_AGENT_ID".into(),
            signature: "AG_SIGN".into(),
        })
        .unwrap()
    }

    #[test]
    fn actions_nest_under_the_user_with_sales_channel() {
        assert_eq!(
            client().request_path("subscriptions"),
            "users/BR_AGENT_USER_ID/subscriptions?sales_channel_id=BR_AGENT_ID"
        );
    }

    #[test]
    fn filters_precede_the_signature() {
        let client = client();
        let base = format!(
            "{}/{}",
            client.endpoint(),
            client.request_path("subscriptions")
        );
        let url_params = vec![("product_type".to_string(), json!("vps"))];
        let url = glue(
            &glue(&base, &render_query(&url_params)),
            &client.trailing_fragment().unwrap(),
        );
        assert_eq!(
            url,
            "ENDPOINT/users/BR_AGENT_USER_ID/subscriptions?sales_channel_id=BR_AGENT_ID&product_type=vps&AG_SIGN"
        );
    }
}
