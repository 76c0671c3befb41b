use bson::Document;
use serde::{Deserialize, Deserializer};

use crate::error::BridgeError;
use crate::rewrite::{rewrite_document, rewrite_pipeline};

/// Applied to the find path when the request carries no `limit` key at all.
pub const DEFAULT_LIMIT: i64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Find,
    Aggregate,
}

/// One declarative read request, decoded from the stdin JSON object.
///
/// `filter`, `projection`, `sort` and `pipeline` stay as `bson::Document`s so
/// JSON key order survives — multi-key sorts and column derivation both
/// depend on insertion order.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryRequest {
    pub database: String,
    pub collection: String,
    #[serde(default)]
    pub mode: Mode,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub filter: Document,
    #[serde(default)]
    pub projection: Option<Document>,
    #[serde(default)]
    pub sort: Option<Document>,
    #[serde(default)]
    pub skip: Option<u64>,
    #[serde(default, deserialize_with = "present")]
    pub limit: Option<Option<i64>>,
    #[serde(default)]
    pub pipeline: Vec<Document>,
}

impl QueryRequest {
    /// Parse one request from raw JSON and validate the required fields.
    pub fn from_json(raw: &str) -> Result<Self, BridgeError> {
        let request: QueryRequest = serde_json::from_str(raw)?;
        if request.database.is_empty() {
            return Err(BridgeError::MalformedInput(
                "\"database\" must be a non-empty string".into(),
            ));
        }
        if request.collection.is_empty() {
            return Err(BridgeError::MalformedInput(
                "\"collection\" must be a non-empty string".into(),
            ));
        }
        Ok(request)
    }

    /// Rewrite ObjectId-shaped strings in whichever half of the request the
    /// active mode will consult. The inactive half is left untouched.
    pub fn rewrite_ids(mut self) -> Self {
        match self.mode {
            Mode::Find => self.filter = rewrite_document(self.filter),
            Mode::Aggregate => self.pipeline = rewrite_pipeline(self.pipeline),
        }
        self
    }

    /// Resolve the tri-state limit:
    /// - key absent entirely → the default of 100
    /// - explicit `null` or `0` → no limit (unbounded result set)
    /// - any other value → passed through as-is
    ///
    /// The falsy-disables-limiting rule is a compatibility contract with
    /// existing callers, risky as an unbounded fetch is.
    pub fn effective_limit(&self) -> Option<i64> {
        match self.limit {
            None => Some(DEFAULT_LIMIT),
            Some(Some(n)) if n != 0 => Some(n),
            _ => None,
        }
    }

    /// Skip is applied only when present and positive, matching the limit
    /// rule's treatment of falsy values.
    pub fn effective_skip(&self) -> Option<u64> {
        self.skip.filter(|&n| n > 0)
    }
}

/// `{"filter": null}` means the same as an absent filter.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Document, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Document>::deserialize(deserializer)?.unwrap_or_default())
}

/// Wraps the parsed value in `Some` so an absent key (field default, `None`)
/// is distinguishable from an explicit `null` (`Some(None)`).
fn present<'de, D>(deserializer: D) -> Result<Option<Option<i64>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<i64>::deserialize(deserializer).map(Some)
}
