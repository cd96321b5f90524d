use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use crate::session::signup::{self, SignupForm};
use crate::session::Session;
use serde_json::json;

fn handle_login(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(user_name) = req.params.get("userName").and_then(|v| v.as_str()) else {
        return err(&req.id, "bad_params", "missing userName", None);
    };
    let Some(password) = req.params.get("password").and_then(|v| v.as_str()) else {
        return err(&req.id, "bad_params", "missing password", None);
    };

    // A second login replaces the first; its screens must not keep firing.
    state.end_session();

    match Session::login(&state.api, user_name, password) {
        Ok(session) => {
            let view = session.view();
            state.session = Some(session);
            ok(&req.id, view)
        }
        Err(e) => err(&req.id, "login_failed", e.to_string(), None),
    }
}

fn handle_logout(state: &mut AppState, req: &Request) -> serde_json::Value {
    let ended = state.end_session();
    ok(&req.id, json!({ "loggedOut": ended }))
}

fn handle_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    let session = state.session.as_ref().map(Session::view);
    ok(&req.id, json!({ "session": session }))
}

fn handle_signup_validate(_state: &mut AppState, req: &Request) -> serde_json::Value {
    let form: SignupForm = match serde_json::from_value(req.params.clone()) {
        Ok(v) => v,
        Err(e) => return err(&req.id, "bad_params", e.to_string(), None),
    };
    match signup::validate(&form) {
        Ok(()) => ok(&req.id, json!({ "valid": true, "message": null })),
        Err(e) => ok(&req.id, json!({ "valid": false, "message": e.to_string() })),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "session.login" => Some(handle_login(state, req)),
        "session.logout" => Some(handle_logout(state, req)),
        "session.get" => Some(handle_get(state, req)),
        "signup.validate" => Some(handle_signup_validate(state, req)),
        _ => None,
    }
}
