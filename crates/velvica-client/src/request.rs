//! Request path assembly.
//!
//! Every facade family decorates an action name differently (session query,
//! sales-channel query, nested user or subscription segments), but the final
//! assembly is the same three glue steps: decorated path, encoded option
//! params, then the family's trailing fragment (debug flag or signing
//! suffix). [`RequestPathBuilder`] captures the per-family part;
//! [`dispatch`] runs the shared part and hands the URL to the transport.

use serde_json::Value;

use crate::error::ApiClientError;
use crate::options::literal;
use crate::transport::{RequestParams, Transport};

/// Glue a path and a query fragment:
///
/// - `foo` + `bar=1` → `foo?bar=1`
/// - `foo?bar=1` + `abc=2` → `foo?bar=1&abc=2`
/// - anything + `` → unchanged
pub(crate) fn glue(path: &str, params: &str) -> String {
    if params.is_empty() {
        return path.to_string();
    }
    let sign = if path.contains('?') { '&' } else { '?' };
    format!("{path}{sign}{params}")
}

/// Render encoded option pairs as a percent-encoded query fragment.
pub(crate) fn render_query(pairs: &[(String, Value)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| {
            let key: String = url::form_urlencoded::byte_serialize(key.as_bytes()).collect();
            let value: String =
                url::form_urlencoded::byte_serialize(literal(value).as_bytes()).collect();
            format!("{key}={value}")
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// The per-family half of request assembly.
pub(crate) trait RequestPathBuilder {
    fn endpoint(&self) -> &str;

    fn transport(&self) -> &Transport;

    /// Decorate an action name with the family's nesting and fixed query
    /// fields, e.g. `br_agent/list` → `br_agent/list?SESSID=…`.
    fn request_path(&self, action: &str) -> String;

    /// The fragment glued last, surviving any number of preceding query
    /// params: `debug=1` in development, or the opaque signing suffix.
    /// `None` appends nothing.
    fn trailing_fragment(&self) -> Option<String>;
}

/// Assemble a final URL from the decorated path, the encoded option params,
/// and the family's trailing fragment.
///
/// A decorated path that already starts with `http` is absolute and is used
/// verbatim instead of being joined to the endpoint.
pub(crate) fn assemble_url(
    endpoint: &str,
    request_path: String,
    url_params: &[(String, Value)],
    trailing_fragment: Option<String>,
) -> String {
    let base = if request_path.starts_with("http") {
        request_path
    } else {
        format!("{endpoint}/{request_path}")
    };

    let mut url = glue(&base, &render_query(url_params));
    if let Some(fragment) = trailing_fragment {
        url = glue(&url, &fragment);
    }
    url
}

/// Assemble the final URL for an action and issue the request.
pub(crate) async fn dispatch<A: RequestPathBuilder>(
    api: &A,
    action: &str,
    params: RequestParams,
    url_params: &[(String, Value)],
) -> Result<Value, ApiClientError> {
    let url = assemble_url(
        api.endpoint(),
        api.request_path(action),
        url_params,
        api.trailing_fragment(),
    );
    api.transport().fetch(&url, params).await
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn glue_appends_with_question_mark_then_ampersand() {
        assert_eq!(glue("foo", ""), "foo");
        assert_eq!(glue("foo", "bar=1"), "foo?bar=1");
        assert_eq!(glue("foo?bar=1", "abc=2"), "foo?bar=1&abc=2");
    }

    #[test]
    fn render_query_joins_pairs_in_order() {
        let pairs = vec![
            ("search".to_string(), json!("123")),
            ("agent_type".to_string(), json!("provider")),
            ("p".to_string(), json!(5)),
        ];
        assert_eq!(render_query(&pairs), "search=123&agent_type=provider&p=5");
    }

    #[test]
    fn render_query_percent_encodes_keys_and_values() {
        let pairs = vec![("uuid_or_email".to_string(), json!("mail@velvica.com"))];
        assert_eq!(render_query(&pairs), "uuid_or_email=mail%40velvica.com");
    }

    #[test]
    fn render_query_of_nothing_is_empty() {
        assert_eq!(render_query(&[]), "");
    }

    #[test]
    fn assemble_url_joins_path_params_and_fragment_in_order() {
        let url = assemble_url(
            "ENDPOINT",
            "br_agent/list?SESSID=SESSION".to_string(),
            &[("search".to_string(), json!("123"))],
            Some("debug=1".to_string()),
        );
        assert_eq!(url, "ENDPOINT/br_agent/list?SESSID=SESSION&search=123&debug=1");
    }

    #[test]
    fn absolute_paths_bypass_the_endpoint() {
        let url = assemble_url(
            "ENDPOINT",
            "http://other.velvica.test/health".to_string(),
            &[],
            None,
        );
        assert_eq!(url, "http://other.velvica.test/health");
    }
}
