//! Authenticated session context.
//!
//! A [`Session`] exists only between a successful login and logout. It owns
//! the controllers of every open admin screen, so ending the session is the
//! single place their timers get cancelled.

pub mod signup;

use crate::api::{ApiClient, LoginOutcome};
use crate::controller::EntityController;
use crate::entity::EntitySchema;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::time::Instant;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Portal {
    Admin,
    Student,
}

impl Portal {
    fn for_role(role: &str) -> Option<Self> {
        match role.trim().to_lowercase().as_str() {
            "student" => Some(Self::Student),
            "employee" | "faculty" => Some(Self::Admin),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LoginError {
    #[error("Invalid username or password.")]
    InvalidCredentials,
    #[error("Server error. Please try again later.")]
    Server,
    #[error("Network error occurred. Please try again.")]
    Network,
    #[error("{0}")]
    Rejected(String),
    #[error("Role not recognized. Please contact support.")]
    UnrecognizedRole,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("screen {0} is not available in the student portal")]
    Forbidden(&'static str),
    #[error("screen {0} is not open")]
    ScreenClosed(&'static str),
}

pub struct Session {
    id: Uuid,
    user: Map<String, Value>,
    portal: Portal,
    started_at: DateTime<Utc>,
    api: ApiClient,
    screens: BTreeMap<&'static str, EntityController>,
}

impl Session {
    pub fn login(api: &ApiClient, user_name: &str, password: &str) -> Result<Self, LoginError> {
        let user = match api.login(user_name, password) {
            Ok(LoginOutcome::Authenticated(user)) => user,
            Ok(LoginOutcome::InvalidCredentials) => return Err(LoginError::InvalidCredentials),
            Ok(LoginOutcome::ServerError(status)) => {
                tracing::warn!(status, "login endpoint returned an error status");
                return Err(LoginError::Server);
            }
            Ok(LoginOutcome::Rejected(message)) => return Err(LoginError::Rejected(message)),
            Err(e) => {
                tracing::warn!(error = %e, "login request failed");
                return Err(LoginError::Network);
            }
        };

        let role = user.get("Role").and_then(Value::as_str).unwrap_or_default();
        let portal = Portal::for_role(role).ok_or_else(|| {
            tracing::warn!(role, "login with unrecognized role");
            LoginError::UnrecognizedRole
        })?;

        let session = Self {
            id: Uuid::new_v4(),
            user,
            portal,
            started_at: Utc::now(),
            api: api.clone(),
            screens: BTreeMap::new(),
        };
        tracing::info!(session = %session.id, ?portal, "session started");
        Ok(session)
    }

    #[cfg(test)]
    pub fn portal(&self) -> Portal {
        self.portal
    }

    /// Opens (or returns the already open) controller for an admin screen.
    pub fn open_screen(
        &mut self,
        schema: &'static EntitySchema,
    ) -> Result<&mut EntityController, SessionError> {
        if self.portal != Portal::Admin {
            return Err(SessionError::Forbidden(schema.screen));
        }
        let api = &self.api;
        Ok(self.screens.entry(schema.screen).or_insert_with(|| {
            let mut controller = EntityController::new(schema, api.clone());
            controller.mount();
            controller
        }))
    }

    pub fn screen(
        &mut self,
        schema: &'static EntitySchema,
    ) -> Result<&mut EntityController, SessionError> {
        if self.portal != Portal::Admin {
            return Err(SessionError::Forbidden(schema.screen));
        }
        self.screens
            .get_mut(schema.screen)
            .ok_or(SessionError::ScreenClosed(schema.screen))
    }

    pub fn close_screen(&mut self, schema: &EntitySchema) -> bool {
        match self.screens.remove(schema.screen) {
            Some(mut controller) => {
                controller.teardown();
                true
            }
            None => false,
        }
    }

    pub fn open_screens(&self) -> Vec<&'static str> {
        self.screens.keys().copied().collect()
    }

    pub fn tick(&mut self, now: Instant) -> usize {
        self.screens.values_mut().map(|c| c.tick(now)).sum()
    }

    /// Explicit teardown; every screen's pending timers are cancelled.
    pub fn end(mut self) {
        for (_, mut controller) in std::mem::take(&mut self.screens) {
            controller.teardown();
        }
        tracing::info!(session = %self.id, "session ended");
    }

    pub fn view(&self) -> Value {
        json!({
            "sessionId": self.id.to_string(),
            "portal": self.portal,
            "startedAt": self.started_at.to_rfc3339(),
            "user": self.user,
            "openScreens": self.open_screens(),
        })
    }
}
