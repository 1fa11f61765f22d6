//! The in-memory unit of normalization: one fetched title record.

use serde_json::{Map, Value};

use crate::error::NormalizeError;
use crate::schema;

/// One fetched content item. Wraps the raw JSON object and exposes field
/// access that treats absent fields as JSON null, so every downstream rule
/// sees one sentinel for "missing".
#[derive(Debug, Clone)]
pub struct ContentRecord {
    content_id: String,
    fields: Map<String, Value>,
}

impl ContentRecord {
    /// Builds a record from a raw fetch response.
    ///
    /// # Errors
    ///
    /// Returns [`NormalizeError::NotAnObject`] if the response is not a JSON
    /// object, or [`NormalizeError::MissingId`] if the `"id"` field is
    /// absent, non-string, or blank.
    pub fn from_value(value: Value) -> Result<Self, NormalizeError> {
        let Value::Object(fields) = value else {
            return Err(NormalizeError::NotAnObject);
        };
        let content_id = fields
            .get(schema::ID_COLUMN)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or(NormalizeError::MissingId)?
            .to_owned();
        Ok(Self { content_id, fields })
    }

    #[must_use]
    pub fn content_id(&self) -> &str {
        &self.content_id
    }

    /// Returns the raw value of a field, with `Null` for absent fields.
    #[must_use]
    pub fn field(&self, name: &str) -> &Value {
        self.fields.get(name).unwrap_or(&Value::Null)
    }

    /// Whether the field key is present at all (even with a null value).
    #[must_use]
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }
}

/// Schema-drift guard: over a non-empty batch, every required column must
/// appear in at least one record. Per-record absence is fine and flows as
/// null downstream; a column missing from the whole batch means the upstream
/// contract changed and the run must stop before writing anything.
///
/// # Errors
///
/// Returns [`NormalizeError::MissingColumn`] naming the first absent column.
pub fn ensure_required_columns(records: &[ContentRecord]) -> Result<(), NormalizeError> {
    if records.is_empty() {
        return Ok(());
    }
    for column in schema::required_columns() {
        if !records.iter().any(|r| r.has_field(column)) {
            return Err(NormalizeError::MissingColumn {
                column: column.to_owned(),
            });
        }
    }
    Ok(())
}
