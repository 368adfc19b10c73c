//! Options codec: per-field schemas and camelCase→snake_case encoding.
//!
//! Every list-style facade method declares an ordered field→[`Schema`]
//! mapping and runs the caller's options bag through [`encode`]. The output
//! preserves schema declaration order (not caller order), drops option keys
//! the schema does not declare, and renames the surviving keys from
//! camelCase to snake_case for the wire.

use serde_json::Value;

use crate::error::ApiClientError;

/// Validation rule kind for a single option field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SchemaKind {
    /// Accepts anything.
    Any,
    /// Accepts JSON strings only.
    Text,
    /// Accepts any value whose string rendering contains an ASCII digit.
    /// Deliberately loose — `"v2"` passes — to stay compatible with what
    /// existing callers send.
    Numeric,
    /// Accepts strings from a fixed allowed set.
    OneOf(&'static [&'static str]),
}

/// Validation rule plus required flag for a single option field.
///
/// Fields are optional by default; chain [`Schema::required`] to make
/// absence a validation failure instead of an omission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    kind: SchemaKind,
    required: bool,
}

impl Schema {
    pub fn any() -> Self {
        Self { kind: SchemaKind::Any, required: false }
    }

    pub fn text() -> Self {
        Self { kind: SchemaKind::Text, required: false }
    }

    pub fn numeric() -> Self {
        Self { kind: SchemaKind::Numeric, required: false }
    }

    pub fn one_of(allowed: &'static [&'static str]) -> Self {
        Self { kind: SchemaKind::OneOf(allowed), required: false }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Check a candidate value against the rule. Pure: same value, same
    /// verdict, and the value is never mutated.
    pub fn validate(&self, value: &Value) -> bool {
        match self.kind {
            SchemaKind::Any => true,
            SchemaKind::Text => value.is_string(),
            SchemaKind::Numeric => literal(value).chars().any(|c| c.is_ascii_digit()),
            SchemaKind::OneOf(allowed) => {
                value.as_str().is_some_and(|s| allowed.contains(&s))
            }
        }
    }
}

/// Render a value the way it appears on the wire: strings unquoted,
/// everything else via its JSON rendering.
pub(crate) fn literal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Transliterate a camelCase key to snake_case: each ASCII uppercase letter
/// becomes `_` plus its lowercase form. No other character changes.
pub(crate) fn camel_to_snake(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 2);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push('_');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Validate and rename an options bag against an ordered schema.
///
/// `options` is expected to be a JSON object; `Value::Null` (or any
/// non-object) reads as an empty bag. For each declared field, in schema
/// order:
///
/// - absent or `null` → skipped, unless required, in which case the call
///   fails with `Failed to validate: {field} is required.`;
/// - present but rejected by [`Schema::validate`] → fails with
///   `Failed to validate: {field} is invalid.`.
///
/// Error messages carry the original camelCase field name; output keys are
/// the snake_case renames.
pub fn encode(
    options: &Value,
    schema: &[(&str, Schema)],
) -> Result<Vec<(String, Value)>, ApiClientError> {
    let bag = options.as_object();
    let mut result = Vec::with_capacity(schema.len());

    for (field, rule) in schema {
        let value = bag.and_then(|b| b.get(*field)).filter(|v| !v.is_null());

        let Some(value) = value else {
            if rule.is_required() {
                return Err(ApiClientError::MissingOption((*field).to_string()));
            }
            continue;
        };

        if !rule.validate(value) {
            return Err(ApiClientError::InvalidOption((*field).to_string()));
        }

        result.push((camel_to_snake(field), value.clone()));
    }

    Ok(result)
}
