use std::time::Instant;

use serde::Deserialize;

use crate::api::ApiClient;
use crate::config::Config;
use crate::session::Session;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

pub struct AppState {
    pub config: Config,
    pub api: ApiClient,
    pub session: Option<Session>,
}

impl AppState {
    pub fn new(config: Config, api: ApiClient) -> Self {
        Self {
            config,
            api,
            session: None,
        }
    }

    /// Fires every due screen timer. Returns how many fired.
    pub fn tick(&mut self, now: Instant) -> usize {
        self.session.as_mut().map_or(0, |s| s.tick(now))
    }

    pub fn end_session(&mut self) -> bool {
        match self.session.take() {
            Some(session) => {
                session.end();
                true
            }
            None => false,
        }
    }
}
