use crate::ipc::error::ok;
use crate::ipc::types::{AppState, Request};
use serde_json::json;
use std::time::Instant;

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "apiBase": state.config.api_base,
            "loggedIn": state.session.is_some(),
        }),
    )
}

// Due timers already fired in the main loop; this catches any that came due
// while the request was being parsed.
fn handle_ui_tick(state: &mut AppState, req: &Request) -> serde_json::Value {
    let fired = state.tick(Instant::now());
    ok(&req.id, json!({ "fired": fired }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        "ui.tick" => Some(handle_ui_tick(state, req)),
        _ => None,
    }
}
