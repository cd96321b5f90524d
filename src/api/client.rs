use super::envelope::{DropdownOption, LoginOutcome, MutationOutcome};
use super::error::ApiError;
use super::transport::Transport;
use crate::entity::{Endpoint, EntityRecord, EntitySchema};
use serde_json::{json, Map, Value};
use std::sync::Arc;

/// Typed access to the School backend. Cloning shares the transport.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    base: Arc<str>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>, base: &str) -> Self {
        Self {
            transport,
            base: Arc::from(base.trim_end_matches('/')),
        }
    }

    pub fn url(&self, endpoint: Endpoint) -> String {
        format!("{}/{}", self.base, endpoint.path())
    }

    pub fn read_records(&self, schema: &EntitySchema) -> Result<Vec<EntityRecord>, ApiError> {
        let url = self.url(schema.endpoint);
        let body = self
            .transport
            .post_json(&url, &json!({ "action": "read" }))?
            .json(&url)?;
        let records: Vec<EntityRecord> = serde_json::from_value(body)
            .map_err(|e| ApiError::shape(&url, format!("expected an array of records: {e}")))?;
        tracing::debug!(screen = schema.screen, count = records.len(), "read records");
        Ok(records)
    }

    pub fn mutate(
        &self,
        schema: &EntitySchema,
        body: Map<String, Value>,
    ) -> Result<MutationOutcome, ApiError> {
        let url = self.url(schema.endpoint);
        let action = body
            .get("Action")
            .and_then(Value::as_str)
            .unwrap_or("?")
            .to_string();
        let reply = self.transport.post_json(&url, &Value::Object(body))?;
        let outcome = MutationOutcome::decode(&reply.json(&url)?);
        tracing::debug!(screen = schema.screen, action = %action, ?outcome, "mutation reply");
        Ok(outcome)
    }

    pub fn lookups(&self, endpoint: Endpoint) -> Result<Vec<DropdownOption>, ApiError> {
        let url = self.url(endpoint);
        let body = self.transport.get(&url)?.json(&url)?;
        let Value::Array(rows) = body else {
            return Err(ApiError::shape(&url, "expected an array of lookup rows"));
        };
        // One bad row must not empty every select on the screen.
        let options = rows
            .into_iter()
            .enumerate()
            .filter_map(|(i, row)| match serde_json::from_value(row) {
                Ok(option) => Some(option),
                Err(e) => {
                    tracing::warn!(url = %url, row = i, error = %e, "skipping lookup row");
                    None
                }
            })
            .collect();
        Ok(options)
    }

    pub fn login(&self, user_name: &str, password: &str) -> Result<LoginOutcome, ApiError> {
        let url = self.url(Endpoint::Login);
        let reply = self.transport.post_json(
            &url,
            &json!({ "userName": user_name, "password": password }),
        )?;
        if reply.status == 401 {
            return Ok(LoginOutcome::InvalidCredentials);
        }
        if !reply.is_success() {
            return Ok(LoginOutcome::ServerError(reply.status));
        }

        let body = reply.json(&url)?;
        let rows = body
            .as_array()
            .ok_or_else(|| ApiError::shape(&url, "expected an array"))?;
        let head = rows
            .first()
            .and_then(Value::as_object)
            .ok_or_else(|| ApiError::shape(&url, "empty login reply"))?;
        if rows.len() == 1 {
            if let Some(msg) = head
                .get("ErrorMessage")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
            {
                return Ok(LoginOutcome::Rejected(msg.to_string()));
            }
        }
        Ok(LoginOutcome::Authenticated(head.clone()))
    }
}
