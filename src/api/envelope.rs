//! Decoding of the backend's response envelopes.
//!
//! Mutations answer with an array whose first element carries
//! `SuccesCode` (sic, the backend spells it that way) and
//! `ValidationMessage`. Nothing outside this module sees those names.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

const SUCCESS_CODE_FIELD: &str = "SuccesCode";
const MESSAGE_FIELD: &str = "ValidationMessage";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    Ok { message: Option<String> },
    Rejected { message: Option<String> },
}

impl MutationOutcome {
    pub fn decode(body: &Value) -> Self {
        let Some(head) = body.as_array().and_then(|a| a.first()).and_then(Value::as_object)
        else {
            return Self::Rejected { message: None };
        };
        let message = head
            .get(MESSAGE_FIELD)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        let succeeded = head
            .get(SUCCESS_CODE_FIELD)
            .and_then(Value::as_f64)
            .is_some_and(|code| code == 1.0);
        if succeeded {
            Self::Ok { message }
        } else {
            Self::Rejected { message }
        }
    }
}

/// One row of lookup reference data. Some lookup endpoints name the
/// category `Name`, others `LookupName`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DropdownOption {
    #[serde(rename = "Name", alias = "LookupName")]
    pub category: String,
    #[serde(rename = "LookupId")]
    pub id: i64,
    #[serde(rename = "Meaning", default, deserialize_with = "null_as_empty")]
    pub meaning: String,
}

fn null_as_empty<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    Authenticated(Map<String, Value>),
    InvalidCredentials,
    ServerError(u16),
    Rejected(String),
}
