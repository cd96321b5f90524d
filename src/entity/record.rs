use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One server-owned row as returned by a `read` action, PascalCase keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityRecord(Map<String, Value>);

impl EntityRecord {
    pub fn get(&self, wire: &str) -> Option<&Value> {
        self.0.get(wire).filter(|v| !v.is_null())
    }

    /// Primary key; 0 when the record carries none.
    pub fn id(&self, id_wire: &str) -> i64 {
        self.get(id_wire).and_then(number_as_i64).unwrap_or(0)
    }

    /// Display text of a field, empty for missing or null values.
    pub fn text(&self, wire: &str) -> String {
        match self.get(wire) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Bool(b)) => b.to_string(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        }
    }

    #[cfg(test)]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

pub(crate) fn number_as_i64(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(v: Value) -> EntityRecord {
        serde_json::from_value(v).expect("record")
    }

    #[test]
    fn missing_or_null_primary_key_reads_as_zero() {
        assert_eq!(record(json!({ "FeeId": 7 })).id("FeeId"), 7);
        assert_eq!(record(json!({ "FeeId": null })).id("FeeId"), 0);
        assert_eq!(record(json!({ "FeeName": "x" })).id("FeeId"), 0);
        assert_eq!(record(json!({ "FeeId": "12" })).id("FeeId"), 12);
    }

    #[test]
    fn text_renders_scalars_and_blanks_the_rest() {
        let r = record(json!({
            "Name": "Asha",
            "Amount": 1200.5,
            "IsActive": true,
            "Missing": null,
            "Nested": { "a": 1 }
        }));
        assert_eq!(r.text("Name"), "Asha");
        assert_eq!(r.text("Amount"), "1200.5");
        assert_eq!(r.text("IsActive"), "true");
        assert_eq!(r.text("Missing"), "");
        assert_eq!(r.text("Nested"), "");
        assert_eq!(r.text("Absent"), "");
    }
}
