//! Document-store REST wire types: serde shapes for the runQuery and document endpoints.
//! These map to the domain types in normalize.rs.
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Documents and values
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub fields: BTreeMap<String, Value>,
    pub create_time: Option<String>,
    pub update_time: Option<String>,
}

impl Document {
    /// Last path segment of the resource name: `.../documents/games/abc` → `abc`.
    pub fn id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or_default()
    }
}

/// A typed field value. Exactly one key is present on the wire, e.g. `{"stringValue": "Wolves"}`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum Value {
    NullValue(serde_json::Value),
    BooleanValue(bool),
    IntegerValue(String), // int64 travels as a decimal string
    DoubleValue(f64),
    TimestampValue(String),
    StringValue(String),
    BytesValue(String),
    ReferenceValue(String),
    GeoPointValue(serde_json::Value),
    MapValue(MapValue),
    ArrayValue(ArrayValue),
}

#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq)]
pub struct MapValue {
    #[serde(default)]
    pub fields: BTreeMap<String, Value>,
}

#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq)]
pub struct ArrayValue {
    #[serde(default)]
    pub values: Vec<Value>,
}

impl Value {
    pub fn string(s: impl Into<String>) -> Self {
        Value::StringValue(s.into())
    }

    pub fn array(values: Vec<Value>) -> Self {
        Value::ArrayValue(ArrayValue { values })
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::StringValue(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::MapValue(m) => Some(&m.fields),
            _ => None,
        }
    }

    /// Integer view of a numeric field. Seed scripts wrote scores as ints, doubles and strings.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::IntegerValue(s) => s.trim().parse().ok(),
            Value::DoubleValue(d) if d.is_finite() => Some(d.round() as i64),
            Value::StringValue(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().filter(|d| d.is_finite()).map(|d| d.round() as i64))
            }
            _ => None,
        }
    }

    /// Timestamp view; accepts native timestamps, RFC 3339 strings and bare `YYYY-MM-DD` dates.
    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        let raw = match self {
            Value::TimestampValue(s) | Value::StringValue(s) => s.trim(),
            _ => return None,
        };
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
    }
}

// ---------------------------------------------------------------------------
// runQuery  (POST .../documents:runQuery)
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RunQueryRequest {
    pub structured_query: StructuredQuery,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StructuredQuery {
    pub from: Vec<CollectionSelector>,
    #[serde(rename = "where", skip_serializing_if = "Option::is_none")]
    pub filter: Option<Filter>,
}

impl StructuredQuery {
    pub fn collection(id: &str) -> Self {
        Self {
            from: vec![CollectionSelector {
                collection_id: id.to_owned(),
            }],
            filter: None,
        }
    }

    /// AND a field filter onto the query. A lone filter is sent bare; the store
    /// rejects composite filters with fewer than two members.
    pub fn and(mut self, path: &str, op: FieldOp, value: Value) -> Self {
        let next = Filter::FieldFilter(FieldFilter {
            field: FieldReference::new(path),
            op,
            value,
        });
        self.filter = Some(match self.filter.take() {
            None => next,
            Some(Filter::CompositeFilter(mut c)) => {
                c.filters.push(next);
                Filter::CompositeFilter(c)
            }
            Some(single) => Filter::CompositeFilter(CompositeFilter {
                op: CompositeOp::And,
                filters: vec![single, next],
            }),
        });
        self
    }
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSelector {
    pub collection_id: String,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum Filter {
    CompositeFilter(CompositeFilter),
    FieldFilter(FieldFilter),
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct CompositeFilter {
    pub op: CompositeOp,
    pub filters: Vec<Filter>,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompositeOp {
    And,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct FieldFilter {
    pub field: FieldReference,
    pub op: FieldOp,
    pub value: Value,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldOp {
    Equal,
    In,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FieldReference {
    pub field_path: String,
}

impl FieldReference {
    pub fn new(path: &str) -> Self {
        Self {
            field_path: path.to_owned(),
        }
    }
}

/// One element of the streamed runQuery array. Items without a document only carry progress.
#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RunQueryResponseItem {
    pub document: Option<Document>,
    pub read_time: Option<String>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ErrorBody {
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: String, // "PERMISSION_DENIED", "NOT_FOUND", ...
}
