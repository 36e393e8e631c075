//! Request and response models for the public endpoints.

use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

/// A backend row or caller-supplied record. No fixed schema.
pub type Record = Map<String, Value>;

pub const DEFAULT_TABLE: &str = "usuarios";
pub const DEFAULT_ID_COLUMN: &str = "_id";

fn default_table() -> String {
    DEFAULT_TABLE.to_string()
}

fn default_id_column() -> String {
    DEFAULT_ID_COLUMN.to_string()
}

fn default_processing_type() -> String {
    "basic".to_string()
}

fn default_aggregation() -> String {
    "count".to_string()
}

fn default_group_field() -> String {
    DEFAULT_ID_COLUMN.to_string()
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

// Request bodies are not schema-validated: an optional field that is `null`
// or of an unexpected JSON type takes its default.

/// `Some` only when the field holds a value of the expected type
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

pub(crate) fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(lenient(deserializer)?.unwrap_or_default())
}

/// Discriminator text. Non-string values are kept as their JSON text so they
/// reach the dispatcher's unknown-value arm; `null` is absent.
fn discriminator<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

fn processing_type_or_basic<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(discriminator(d)?.unwrap_or_else(default_processing_type))
}

fn aggregation_or_count<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(discriminator(d)?.unwrap_or_else(default_aggregation))
}

fn table_or_default<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(lenient(d)?.unwrap_or_else(default_table))
}

fn id_column_or_default<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(lenient(d)?.unwrap_or_else(default_id_column))
}

fn group_field_or_default<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(lenient(d)?.unwrap_or_else(default_group_field))
}

/// Any JSON value except `null`, which becomes `{}`
fn updates_or_default<'de, D: Deserializer<'de>>(d: D) -> Result<Value, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Null => empty_object(),
        other => other,
    })
}

/// Discriminator of `POST /api/process`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingType {
    Filter,
    Aggregate,
    Analyze,
    /// Any other value: count and sample echo
    Basic,
}

impl ProcessingType {
    pub fn parse(value: &str) -> Self {
        match value {
            "filter" => Self::Filter,
            "aggregate" => Self::Aggregate,
            "analyze" => Self::Analyze,
            _ => Self::Basic,
        }
    }
}

/// Discriminator of `POST /api/data-aggregation`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregationType {
    Count,
    GroupBy,
    Summary,
    Unsupported,
}

impl AggregationType {
    pub fn parse(value: &str) -> Self {
        match value {
            "count" => Self::Count,
            "group_by" => Self::GroupBy,
            "summary" => Self::Summary,
            _ => Self::Unsupported,
        }
    }
}

/// Discriminator of `POST /api/crud`. Unknown values are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrudOperation {
    Create,
    Read,
    Update,
    Delete,
}

impl CrudOperation {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "create" => Some(Self::Create),
            "read" => Some(Self::Read),
            "update" => Some(Self::Update),
            "delete" => Some(Self::Delete),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

/// Response model for the health check endpoint
#[derive(Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct HealthResponse {
    pub service: String,
    pub status: String,
    pub timestamp: String,
    pub roble_connection: String,
}

/// Response model for the service information endpoint
#[derive(Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct InfoResponse {
    pub service_name: String,
    pub version: String,
    pub description: String,
    pub endpoints: Vec<String>,
    /// Email of the authenticated caller, or "unknown"
    pub user: String,
    pub roble_database: String,
}

/// Body of `POST /api/process`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessRequest {
    #[serde(
        rename = "type",
        default = "default_processing_type",
        deserialize_with = "processing_type_or_basic"
    )]
    pub processing_type: String,
    #[serde(default, deserialize_with = "or_default")]
    pub data: Vec<Value>,
    #[serde(default, deserialize_with = "or_default")]
    pub criteria: Record,
}

impl Default for ProcessRequest {
    fn default() -> Self {
        Self {
            processing_type: default_processing_type(),
            data: Vec::new(),
            criteria: Record::new(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct ProcessResponse {
    pub success: bool,
    pub service: String,
    pub processing_type: String,
    pub user: Option<String>,
    pub result: Value,
}

/// Body of `POST /api/data-filter`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataFilterRequest {
    #[serde(default = "default_table", deserialize_with = "table_or_default")]
    pub table: String,
    #[serde(default, deserialize_with = "or_default")]
    pub filters: Record,
    /// Accepted in any shape; not applied
    #[serde(default)]
    pub custom_filters: Value,
}

impl Default for DataFilterRequest {
    fn default() -> Self {
        Self {
            table: default_table(),
            filters: Record::new(),
            custom_filters: Value::Null,
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct DataFilterResponse {
    pub success: bool,
    pub service: String,
    pub table: String,
    pub total_records: u64,
    pub data: Vec<Value>,
    pub filters_applied: Value,
    pub timestamp: String,
}

/// Body of `POST /api/data-aggregation`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataAggregationRequest {
    #[serde(default = "default_table", deserialize_with = "table_or_default")]
    pub table: String,
    #[serde(default = "default_aggregation", deserialize_with = "aggregation_or_count")]
    pub aggregation: String,
    #[serde(default = "default_group_field", deserialize_with = "group_field_or_default")]
    pub group_field: String,
}

impl Default for DataAggregationRequest {
    fn default() -> Self {
        Self {
            table: default_table(),
            aggregation: default_aggregation(),
            group_field: default_group_field(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct DataAggregationResponse {
    pub success: bool,
    pub service: String,
    pub table: String,
    pub aggregation_type: String,
    pub result: Value,
    pub timestamp: String,
}

/// Body of `POST /api/crud`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrudRequest {
    #[serde(default, deserialize_with = "discriminator")]
    pub operation: Option<String>,
    #[serde(default = "default_table", deserialize_with = "table_or_default")]
    pub table: String,
    #[serde(default, deserialize_with = "or_default")]
    pub records: Vec<Value>,
    #[serde(default, deserialize_with = "or_default")]
    pub filters: Record,
    #[serde(
        rename = "idColumn",
        default = "default_id_column",
        deserialize_with = "id_column_or_default"
    )]
    pub id_column: String,
    /// Forwarded as-is; `null` when absent
    #[serde(rename = "idValue", default)]
    pub id_value: Value,
    #[serde(default = "empty_object", deserialize_with = "updates_or_default")]
    pub updates: Value,
}

impl Default for CrudRequest {
    fn default() -> Self {
        Self {
            operation: None,
            table: default_table(),
            records: Vec::new(),
            filters: Record::new(),
            id_column: default_id_column(),
            id_value: Value::Null,
            updates: empty_object(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct CrudResponse {
    pub success: bool,
    pub service: String,
    pub operation: String,
    pub table: String,
    pub result: Value,
    pub timestamp: String,
}
