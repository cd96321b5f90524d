use super::record::{number_as_i64, EntityRecord};
use super::schema::{EntitySchema, FieldKind, FieldSpec};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DraftAction {
    Create,
    Update,
}

impl DraftAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Decimal(f64),
    Bool(bool),
}

impl FieldValue {
    fn default_for(field: &FieldSpec) -> Self {
        match field.kind {
            FieldKind::Text | FieldKind::Date => Self::Text(String::new()),
            FieldKind::Integer => Self::Integer(0),
            FieldKind::Decimal => Self::Decimal(0.0),
            FieldKind::Bool => Self::Bool(field.default_on),
        }
    }

    fn is_blank(&self) -> bool {
        match self {
            Self::Text(s) => s.is_empty(),
            Self::Integer(n) => *n == 0,
            Self::Decimal(n) => *n == 0.0,
            Self::Bool(b) => !b,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DraftError {
    #[error("unknown field: {0}")]
    UnknownField(String),
    #[error("field {field} expects {expected}")]
    InvalidValue {
        field: &'static str,
        expected: &'static str,
    },
}

/// Client-local edit state for one modal session.
#[derive(Debug, Clone, PartialEq)]
pub struct FormDraft {
    pub action: DraftAction,
    pub id: i64,
    values: BTreeMap<&'static str, FieldValue>,
    baseline: BTreeMap<&'static str, FieldValue>,
    /// Text fields the server sent as numbers; resent as-is while untouched.
    numeric_text: BTreeMap<&'static str, Value>,
}

impl FormDraft {
    pub fn empty(schema: &EntitySchema) -> Self {
        let values: BTreeMap<_, _> = schema
            .fields
            .iter()
            .map(|f| (f.draft, FieldValue::default_for(f)))
            .collect();
        Self {
            action: DraftAction::Create,
            id: 0,
            baseline: values.clone(),
            values,
            numeric_text: BTreeMap::new(),
        }
    }

    pub fn from_record(schema: &EntitySchema, record: &EntityRecord) -> Self {
        let values: BTreeMap<_, _> = schema
            .fields
            .iter()
            .map(|f| (f.draft, value_from_record(f, record)))
            .collect();
        let numeric_text = schema
            .fields
            .iter()
            .filter(|f| f.kind == FieldKind::Text)
            .filter_map(|f| match record.get(f.wire) {
                Some(v @ Value::Number(_)) => Some((f.draft, v.clone())),
                _ => None,
            })
            .collect();
        Self {
            action: DraftAction::Update,
            id: record.id(schema.id_wire),
            baseline: values.clone(),
            values,
            numeric_text,
        }
    }

    #[cfg(test)]
    pub fn get(&self, draft_name: &str) -> Option<&FieldValue> {
        self.values.get(draft_name)
    }

    pub fn set(
        &mut self,
        schema: &EntitySchema,
        draft_name: &str,
        raw: &Value,
    ) -> Result<(), DraftError> {
        let field = schema
            .field(draft_name)
            .ok_or_else(|| DraftError::UnknownField(draft_name.to_string()))?;
        let value = coerce(field, raw)?;
        self.values.insert(field.draft, value);
        Ok(())
    }

    pub fn missing_required(&self, schema: &EntitySchema) -> Vec<&'static str> {
        schema
            .fields
            .iter()
            .filter(|f| f.required)
            .filter(|f| self.values.get(f.draft).map_or(true, FieldValue::is_blank))
            .map(|f| f.draft)
            .collect()
    }

    pub fn is_dirty(&self) -> bool {
        self.values != self.baseline
    }

    /// Mutation envelope in wire casing: `Action`, primary key, then fields.
    pub fn to_wire(&self, schema: &EntitySchema) -> Map<String, Value> {
        let mut body = Map::new();
        body.insert("Action".into(), json!(self.action.as_str()));
        body.insert(schema.id_wire.into(), json!(self.id));
        for field in schema.fields {
            let value = self
                .values
                .get(field.draft)
                .cloned()
                .unwrap_or_else(|| FieldValue::default_for(field));
            let untouched = self.baseline.get(field.draft) == Some(&value);
            let wire = match self.numeric_text.get(field.draft) {
                Some(original) if untouched => original.clone(),
                _ => wire_value(field, &value),
            };
            body.insert(field.wire.into(), wire);
        }
        body
    }

    pub fn values_json(&self) -> Map<String, Value> {
        self.values
            .iter()
            .map(|(k, v)| {
                let v = serde_json::to_value(v).unwrap_or(Value::Null);
                ((*k).to_string(), v)
            })
            .collect()
    }
}

fn value_from_record(field: &FieldSpec, record: &EntityRecord) -> FieldValue {
    let raw = record.get(field.wire);
    match field.kind {
        FieldKind::Text => FieldValue::Text(record.text(field.wire)),
        FieldKind::Integer => FieldValue::Integer(raw.and_then(number_as_i64).unwrap_or(0)),
        FieldKind::Decimal => FieldValue::Decimal(raw.and_then(number_as_f64).unwrap_or(0.0)),
        FieldKind::Bool => FieldValue::Bool(raw.map(truthy).unwrap_or(false)),
        FieldKind::Date => {
            let text = record.text(field.wire);
            let date_only = text.split('T').next().unwrap_or_default();
            FieldValue::Text(date_only.to_string())
        }
    }
}

fn coerce(field: &FieldSpec, raw: &Value) -> Result<FieldValue, DraftError> {
    let invalid = |expected| DraftError::InvalidValue {
        field: field.draft,
        expected,
    };
    match field.kind {
        FieldKind::Text => match raw {
            Value::Null => Ok(FieldValue::Text(String::new())),
            Value::String(s) => Ok(FieldValue::Text(s.clone())),
            Value::Number(n) => Ok(FieldValue::Text(n.to_string())),
            _ => Err(invalid("text")),
        },
        // Select and number inputs: anything non-numeric collapses to 0.
        FieldKind::Integer => match raw {
            Value::Null | Value::Number(_) | Value::String(_) => Ok(FieldValue::Integer(
                number_as_f64(raw).map(|f| f.trunc() as i64).unwrap_or(0),
            )),
            _ => Err(invalid("a number")),
        },
        FieldKind::Decimal => match raw {
            Value::Null | Value::Number(_) | Value::String(_) => {
                Ok(FieldValue::Decimal(number_as_f64(raw).unwrap_or(0.0)))
            }
            _ => Err(invalid("a number")),
        },
        FieldKind::Bool => raw
            .as_bool()
            .map(FieldValue::Bool)
            .ok_or_else(|| invalid("a boolean")),
        FieldKind::Date => match raw {
            Value::Null => Ok(FieldValue::Text(String::new())),
            Value::String(s) => Ok(FieldValue::Text(
                s.split('T').next().unwrap_or_default().trim().to_string(),
            )),
            _ => Err(invalid("a YYYY-MM-DD date")),
        },
    }
}

fn wire_value(field: &FieldSpec, value: &FieldValue) -> Value {
    match (field.kind, value) {
        (FieldKind::Date, FieldValue::Text(s)) => iso_timestamp(s).map_or(Value::Null, Value::String),
        (_, FieldValue::Text(s)) => json!(s),
        (_, FieldValue::Integer(n)) => json!(n),
        (_, FieldValue::Decimal(n)) => json!(n),
        (_, FieldValue::Bool(b)) => json!(b),
    }
}

/// Full ISO-8601 UTC timestamp with millisecond precision, `None` when the
/// input is empty or not a date.
pub fn iso_timestamp(input: &str) -> Option<String> {
    const OUT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if let Ok(d) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc().format(OUT).to_string());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc).format(OUT).to_string());
    }
    NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| dt.and_utc().format(OUT).to_string())
}

fn number_as_f64(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

fn truthy(v: &Value) -> bool {
    match v {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Null => false,
        Value::Array(_) | Value::Object(_) => true,
    }
}
