//! Request validation against named schemas.
//!
//! [`validate`] is a pure function of its inputs: the schema table is
//! immutable and nothing is cached, so it can be called from any number of
//! request handlers at once.
pub mod schema;

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::error::ValidationError;
use schema::{FieldKind, FieldRule};

pub use schema::{lookup, Schema, PREDICT, SCHEMAS};

/// A field value after coercion.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Float(f64),
}

/// A record that passed validation, holding the coerced values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidatedRecord {
    #[serde(skip)]
    schema: &'static str,
    #[serde(flatten)]
    fields: BTreeMap<&'static str, FieldValue>,
}

impl ValidatedRecord {
    pub fn schema(&self) -> &'static str {
        self.schema
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    pub fn text(&self, field: &str) -> Option<&str> {
        match self.fields.get(field)? {
            FieldValue::Text(s) => Some(s),
            FieldValue::Float(_) => None,
        }
    }

    pub fn float(&self, field: &str) -> Option<f64> {
        match self.fields.get(field)? {
            FieldValue::Float(v) => Some(*v),
            FieldValue::Text(_) => None,
        }
    }
}

/// Check `record` against the schema called `schema_name`.
///
/// Returns the coerced record. An unknown schema name yields
/// [`ValidationError::SchemaNotFound`]; every other error concerns the record
/// itself and names the offending field.
pub fn validate(schema_name: &str, record: &Value) -> Result<ValidatedRecord, ValidationError> {
    let schema =
        lookup(schema_name).ok_or_else(|| ValidationError::SchemaNotFound(schema_name.to_string()))?;

    let object = record
        .as_object()
        .ok_or_else(|| ValidationError::NotAnObject(json_type(record).to_string()))?;

    let mut fields = BTreeMap::new();
    for rule in schema.fields {
        let value = object
            .get(rule.name)
            .ok_or_else(|| ValidationError::MissingField(rule.name.to_string()))?;
        fields.insert(rule.name, coerce(rule, value)?);
    }

    if let Some(extra) = object.keys().find(|key| schema.rule(key).is_none()) {
        return Err(ValidationError::UnexpectedField(extra.clone()));
    }

    Ok(ValidatedRecord {
        schema: schema.name,
        fields,
    })
}

fn coerce(rule: &FieldRule, value: &Value) -> Result<FieldValue, ValidationError> {
    let coerced = match (rule.kind, value) {
        (FieldKind::Text, Value::String(s)) => Some(FieldValue::Text(s.clone())),
        (FieldKind::Text, Value::Number(n)) => Some(FieldValue::Text(n.to_string())),
        (FieldKind::Text, Value::Bool(b)) => Some(FieldValue::Text(b.to_string())),
        (FieldKind::Float, Value::Number(n)) => n.as_f64().map(FieldValue::Float),
        (FieldKind::Float, Value::String(s)) => s.trim().parse::<f64>().ok().map(FieldValue::Float),
        (FieldKind::Float, Value::Bool(b)) => Some(FieldValue::Float(if *b { 1.0 } else { 0.0 })),
        _ => None,
    };

    coerced.ok_or_else(|| ValidationError::Coercion {
        field: rule.name.to_string(),
        value: value.to_string(),
        expected: rule.kind.describe(),
    })
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
