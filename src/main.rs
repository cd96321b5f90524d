mod api;
mod config;
mod controller;
mod entity;
mod ipc;
mod session;

use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// stdout carries the protocol, so every log line goes to stderr.
fn init_tracing(log_json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init();
    }
}

fn build_state(cfg: config::Config) -> anyhow::Result<ipc::AppState> {
    let transport = api::HttpTransport::new(&cfg.http_options())
        .with_context(|| format!("build http client for {}", cfg.api_base))?;
    let client = api::ApiClient::new(Arc::new(transport), &cfg.api_base);
    Ok(ipc::AppState::new(cfg, client))
}

fn main() -> anyhow::Result<()> {
    let cfg = config::Config::from_env();
    init_tracing(cfg.log_json);
    tracing::info!(api_base = %cfg.api_base, timeout = ?cfg.http_timeout, "schoold starting");

    let mut state = build_state(cfg)?;

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(v) => v,
            Err(_) => break,
        };
        if line.trim().is_empty() {
            continue;
        }

        // Timers that came due while idle fire before the request sees state.
        state.tick(Instant::now());

        let req: ipc::Request = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                // No id to echo back.
                let resp = serde_json::json!({
                    "ok": false,
                    "error": { "code": "bad_json", "message": e.to_string() }
                });
                let _ = writeln!(stdout, "{resp}");
                let _ = stdout.flush();
                continue;
            }
        };

        let resp = ipc::handle_request(&mut state, req);
        let _ = writeln!(
            stdout,
            "{}",
            serde_json::to_string(&resp).unwrap_or_else(|_| "{\"ok\":false}".to_string())
        );
        let _ = stdout.flush();
    }

    state.end_session();
    Ok(())
}
