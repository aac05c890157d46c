//! Lenient decoding of metrics query responses
//!
//! The provider returns `{ series: [ { scope, pointlist: [[ts, value], ...] } ] }`.
//! Entries missing fields or carrying malformed points are absorbed as empty
//! data instead of failing the whole response.

use crate::models::{DataPoint, RawSeries};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// Raw body of a metrics query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub series: Vec<Value>,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default())
}

impl QueryResponse {
    /// Error message when the provider reported a failed query in a 2xx body
    pub fn failure(&self) -> Option<String> {
        match self.status.as_deref() {
            Some("error") => Some(
                self.error
                    .clone()
                    .unwrap_or_else(|| "query returned error status".to_string()),
            ),
            _ => None,
        }
    }

    /// Decode every series entry, stripping `<tag>:` from the scope
    pub fn into_series(self, tag: &str) -> Vec<RawSeries> {
        let prefix = format!("{}:", tag);
        self.series
            .iter()
            .map(|entry| decode_series(entry, &prefix))
            .collect()
    }
}

/// Strip the scope prefix; scopes without it are kept verbatim
///
/// Only a leading prefix is removed. Occurrences later in the scope are part
/// of the resource name, unlike a global substring replace.
pub fn strip_scope<'a>(scope: &'a str, prefix: &str) -> &'a str {
    scope.strip_prefix(prefix).unwrap_or(scope)
}

fn decode_series(entry: &Value, prefix: &str) -> RawSeries {
    let scope = match entry.get("scope").and_then(Value::as_str) {
        Some(scope) => scope,
        None => {
            warn!("Series entry without scope, treating as empty");
            ""
        }
    };
    let resource_key = strip_scope(scope, prefix).to_string();

    let points: Vec<DataPoint> = match entry.get("pointlist").and_then(Value::as_array) {
        Some(raw) => raw.iter().filter_map(decode_point).collect(),
        None => {
            warn!(resource = %resource_key, "Series entry without pointlist, treating as empty");
            Vec::new()
        }
    };

    debug!(resource = %resource_key, points = points.len(), "Decoded series");
    RawSeries::new(resource_key, points)
}

fn decode_point(raw: &Value) -> Option<DataPoint> {
    let pair = raw.as_array()?;
    let timestamp = pair.first()?.as_f64()?;
    let value = pair.get(1).and_then(Value::as_f64);
    Some(DataPoint::new(timestamp as i64, value))
}
