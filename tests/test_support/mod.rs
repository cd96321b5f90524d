#![allow(dead_code)]

use serde_json::{json, Value};
use std::io::{BufRead, BufReader, Read, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use tiny_http::{Header, Response, Server, StatusCode};

/// One request the mock backend saw: path below `/api/`, and the JSON body
/// (`Null` for GETs).
#[derive(Debug, Clone)]
pub struct Seen {
    pub path: String,
    pub body: Value,
}

type Handler = dyn Fn(&str, &Value) -> (u16, Value) + Send + Sync;

/// Stand-in for the School/Hostel API on an ephemeral port.
pub struct MockBackend {
    pub base: String,
    seen: Arc<Mutex<Vec<Seen>>>,
    stop: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl MockBackend {
    pub fn start<F>(handler: F) -> Self
    where
        F: Fn(&str, &Value) -> (u16, Value) + Send + Sync + 'static,
    {
        let server = Server::http("127.0.0.1:0").expect("http server");
        let base = format!("http://{}/api", server.server_addr());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let stop = Arc::new(AtomicBool::new(false));
        let handler: Arc<Handler> = Arc::new(handler);

        let seen_clone = Arc::clone(&seen);
        let stop_clone = Arc::clone(&stop);
        let handle = thread::spawn(move || {
            while !stop_clone.load(Ordering::Relaxed) {
                let mut req = match server.recv_timeout(Duration::from_millis(100)) {
                    Ok(Some(req)) => req,
                    Ok(None) => continue,
                    Err(_) => break,
                };
                let path = req
                    .url()
                    .trim_start_matches("/api/")
                    .trim_start_matches('/')
                    .to_string();
                let mut raw = String::new();
                let _ = req.as_reader().read_to_string(&mut raw);
                let body = serde_json::from_str(&raw).unwrap_or(Value::Null);
                let (status, reply) = handler(&path, &body);
                seen_clone.lock().expect("seen lock").push(Seen { path, body });
                let data = serde_json::to_vec(&reply).expect("reply json");
                let _ = req.respond(
                    Response::from_data(data)
                        .with_status_code(StatusCode(status))
                        .with_header(
                            Header::from_bytes("Content-Type", "application/json")
                                .expect("content type"),
                        ),
                );
            }
        });

        Self {
            base,
            seen,
            stop,
            handle: Some(handle),
        }
    }

    pub fn seen(&self) -> Vec<Seen> {
        self.seen.lock().expect("seen lock").clone()
    }

    /// Mutation bodies (`Action` key) posted to `path`.
    pub fn writes_to(&self, path: &str) -> Vec<Value> {
        self.seen()
            .into_iter()
            .filter(|s| s.path == path && s.body.get("Action").is_some())
            .map(|s| s.body)
            .collect()
    }

    /// Number of `{"action":"read"}` posts to `path`.
    pub fn reads_of(&self, path: &str) -> usize {
        self.seen()
            .iter()
            .filter(|s| s.path == path && s.body.get("action").and_then(|v| v.as_str()) == Some("read"))
            .count()
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(h) = self.handle.take() {
            let _ = h.join();
        }
    }
}

pub fn is_read(body: &Value) -> bool {
    body.get("action").and_then(|v| v.as_str()) == Some("read")
}

pub fn action(body: &Value) -> &str {
    body.get("Action").and_then(|v| v.as_str()).unwrap_or("")
}

pub fn spawn_sidecar(api_base: &str) -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_schoold");
    let mut child = Command::new(exe)
        .env("SCHOOLD_API_BASE", api_base)
        .env("RUST_LOG", "off")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn schoold");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

pub fn read_line(reader: &mut BufReader<ChildStdout>) -> Value {
    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    assert!(!line.trim().is_empty(), "empty response");
    serde_json::from_str(line.trim()).expect("parse response json")
}

pub fn request(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: Value,
) -> Value {
    let payload = json!({
        "id": id,
        "method": method,
        "params": params,
    });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");

    let value = read_line(reader);
    assert_eq!(value.get("id").and_then(|v| v.as_str()), Some(id));
    value
}

pub fn request_ok(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: Value,
) -> Value {
    let value = request(stdin, reader, id, method, params);
    assert_eq!(
        value.get("ok").and_then(|v| v.as_bool()),
        Some(true),
        "{} failed: {}",
        method,
        value
    );
    value.get("result").cloned().unwrap_or(Value::Null)
}

pub fn error_code(resp: &Value) -> &str {
    resp.get("error")
        .and_then(|e| e.get("code"))
        .and_then(|v| v.as_str())
        .unwrap_or("")
}

pub fn error_message(resp: &Value) -> &str {
    resp.get("error")
        .and_then(|e| e.get("message"))
        .and_then(|v| v.as_str())
        .unwrap_or("")
}

/// Answers every login with an admin user.
pub fn admin_login() -> (u16, Value) {
    (
        200,
        json!([{ "UserId": 1, "UserName": "admin", "Role": "Employee" }]),
    )
}
