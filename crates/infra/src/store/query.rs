//! Query builder for list endpoints.
//!
//! Each query is sent as its own `queries[]` parameter holding a JSON object
//! `{"method": ..., "attribute": ..., "values": [...]}`.

use serde::Serialize;
use serde_json::Value as JsonValue;

/// The backend rejects `equal` queries carrying more values than this.
pub const MAX_QUERY_VALUES: usize = 100;

#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    /// Attribute equals any of the values.
    Equal {
        attribute: String,
        values: Vec<JsonValue>,
    },
    Limit(usize),
    Offset(usize),
}

#[derive(Serialize)]
struct Wire<'a> {
    method: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    attribute: Option<&'a str>,
    values: Vec<JsonValue>,
}

impl Query {
    pub fn equal<V: Into<JsonValue>>(attribute: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
        Self::Equal {
            attribute: attribute.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn limit(n: usize) -> Self {
        Self::Limit(n)
    }

    pub fn offset(n: usize) -> Self {
        Self::Offset(n)
    }

    /// Wire form of the query.
    pub fn to_json(&self) -> String {
        let wire = match self {
            Self::Equal { attribute, values } => Wire {
                method: "equal",
                attribute: Some(attribute),
                values: values.clone(),
            },
            Self::Limit(n) => Wire {
                method: "limit",
                attribute: None,
                values: vec![JsonValue::from(*n)],
            },
            Self::Offset(n) => Wire {
                method: "offset",
                attribute: None,
                values: vec![JsonValue::from(*n)],
            },
        };
        // Serializing a struct of strings and JSON values cannot fail.
        serde_json::to_string(&wire).unwrap_or_default()
    }
}
