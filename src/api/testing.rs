//! In-memory transport for unit tests.

use super::error::ApiError;
use super::transport::{Reply, Transport};
use serde_json::Value;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Read,
    Write,
    Get,
}

fn kind_of(body: Option<&Value>) -> Kind {
    match body {
        None => Kind::Get,
        Some(b) if b.get("action").and_then(Value::as_str) == Some("read") => Kind::Read,
        Some(_) => Kind::Write,
    }
}

#[derive(Default)]
pub struct FakeTransport {
    replies: Mutex<Vec<(String, Kind, Result<Reply, ApiError>)>>,
    sent: Mutex<Vec<(String, Option<Value>)>>,
}

impl FakeTransport {
    fn set(&self, path: &str, kinds: &[Kind], reply: Result<Reply, ApiError>) {
        let mut replies = self.replies.lock().expect("replies");
        for kind in kinds {
            replies.push((path.to_string(), *kind, reply.clone()));
        }
    }

    fn json_reply(status: u16, body: &Value) -> Result<Reply, ApiError> {
        Ok(Reply {
            status,
            body: serde_json::to_vec(body).expect("json"),
        })
    }

    pub fn respond(&self, path: &str, body: Value) {
        self.respond_status(path, 200, body);
    }

    pub fn respond_status(&self, path: &str, status: u16, body: Value) {
        self.set(
            path,
            &[Kind::Read, Kind::Write, Kind::Get],
            Self::json_reply(status, &body),
        );
    }

    pub fn respond_raw(&self, path: &str, status: u16, body: &[u8]) {
        let reply = Ok(Reply {
            status,
            body: body.to_vec(),
        });
        self.set(path, &[Kind::Read, Kind::Write, Kind::Get], reply);
    }

    pub fn on_read(&self, path: &str, body: Value) {
        self.set(path, &[Kind::Read], Self::json_reply(200, &body));
    }

    pub fn on_write(&self, path: &str, body: Value) {
        self.set(path, &[Kind::Write], Self::json_reply(200, &body));
    }

    pub fn fail(&self, path: &str) {
        let err = Err(ApiError::transport(path, "connection refused"));
        self.set(path, &[Kind::Read, Kind::Write, Kind::Get], err);
    }

    pub fn fail_writes(&self, path: &str) {
        self.set(
            path,
            &[Kind::Write],
            Err(ApiError::transport(path, "connection reset")),
        );
    }

    fn reply_for(&self, url: &str, body: Option<&Value>) -> Result<Reply, ApiError> {
        self.sent
            .lock()
            .expect("sent")
            .push((url.to_string(), body.cloned()));
        let kind = kind_of(body);
        self.replies
            .lock()
            .expect("replies")
            .iter()
            .rev()
            .find(|(path, k, _)| *k == kind && url.ends_with(path.as_str()))
            .map(|(_, _, r)| r.clone())
            .unwrap_or_else(|| Err(ApiError::transport(url, "no fake reply configured")))
    }

    pub fn urls(&self) -> Vec<String> {
        self.sent
            .lock()
            .expect("sent")
            .iter()
            .map(|(u, _)| u.clone())
            .collect()
    }

    pub fn posts_to(&self, path: &str) -> Vec<Value> {
        self.sent
            .lock()
            .expect("sent")
            .iter()
            .filter(|(u, _)| u.ends_with(path))
            .filter_map(|(_, b)| b.clone())
            .collect()
    }

    pub fn writes_to(&self, path: &str) -> Vec<Value> {
        self.posts_to(path)
            .into_iter()
            .filter(|b| kind_of(Some(b)) == Kind::Write)
            .collect()
    }

    pub fn reads_of(&self, path: &str) -> usize {
        self.posts_to(path)
            .iter()
            .filter(|b| kind_of(Some(b)) == Kind::Read)
            .count()
    }

    pub fn gets_of(&self, path: &str) -> usize {
        self.sent
            .lock()
            .expect("sent")
            .iter()
            .filter(|(u, b)| u.ends_with(path) && b.is_none())
            .count()
    }

    pub fn request_count(&self) -> usize {
        self.sent.lock().expect("sent").len()
    }
}

impl Transport for FakeTransport {
    fn post_json(&self, url: &str, body: &Value) -> Result<Reply, ApiError> {
        self.reply_for(url, Some(body))
    }

    fn get(&self, url: &str) -> Result<Reply, ApiError> {
        self.reply_for(url, None)
    }
}
