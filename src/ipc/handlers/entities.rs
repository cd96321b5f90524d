//! `<screen>.<op>` methods for the four admin screens. Every op answers with
//! the screen view so the UI can re-render from a single snapshot.

use crate::controller::{ControllerError, DeleteOutcome, EntityController, SaveOutcome};
use crate::entity::{catalog, DraftError, EntitySchema};
use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use crate::session::SessionError;
use serde_json::{json, Value};
use std::time::Instant;

const OPS: &[&str] = &[
    "open",
    "close",
    "view",
    "refresh",
    "filter",
    "openCreate",
    "openEdit",
    "setField",
    "closeModal",
    "save",
    "deleteRequest",
    "deleteCancel",
    "deleteConfirm",
];

fn session_err(req: &Request, e: SessionError) -> Value {
    let code = match e {
        SessionError::Forbidden(_) => "forbidden",
        SessionError::ScreenClosed(_) => "screen_closed",
    };
    err(&req.id, code, e.to_string(), None)
}

fn controller_err(req: &Request, e: ControllerError) -> Value {
    let code = match &e {
        ControllerError::UnknownFilter(_)
        | ControllerError::NotFound { .. }
        | ControllerError::Draft(DraftError::UnknownField(_))
        | ControllerError::Draft(DraftError::InvalidValue { .. }) => "bad_params",
        ControllerError::NoModal
        | ControllerError::ModalOpen
        | ControllerError::DeletePending
        | ControllerError::NoDeleteTarget
        | ControllerError::Busy => "invalid_state",
    };
    err(&req.id, code, e.to_string(), None)
}

fn view_of(req: &Request, controller: &EntityController, outcome: Option<&str>) -> Value {
    let mut view = match serde_json::to_value(controller.view()) {
        Ok(v) => v,
        Err(e) => return err(&req.id, "invalid_state", e.to_string(), None),
    };
    if let Some(o) = outcome {
        view["outcome"] = json!(o);
    }
    ok(&req.id, view)
}

fn param_i64(req: &Request, key: &str) -> Option<i64> {
    let v = req.params.get(key)?;
    v.as_i64()
        .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
}

fn param_str<'a>(req: &'a Request, key: &str) -> Option<&'a str> {
    req.params.get(key).and_then(|v| v.as_str())
}

fn save_label(outcome: SaveOutcome) -> &'static str {
    match outcome {
        SaveOutcome::Invalid => "invalid",
        SaveOutcome::Saved => "saved",
        SaveOutcome::Rejected => "rejected",
        SaveOutcome::Failed => "failed",
    }
}

fn delete_label(outcome: DeleteOutcome) -> &'static str {
    match outcome {
        DeleteOutcome::Deleted => "deleted",
        DeleteOutcome::Rejected => "rejected",
        DeleteOutcome::Failed => "failed",
    }
}

fn handle_screen_op(
    state: &mut AppState,
    req: &Request,
    schema: &'static EntitySchema,
    op: &str,
) -> Value {
    let Some(session) = state.session.as_mut() else {
        return err(&req.id, "no_session", "log in first", None);
    };

    match op {
        "open" => {
            return match session.open_screen(schema) {
                Ok(c) => view_of(req, c, None),
                Err(e) => session_err(req, e),
            };
        }
        "close" => {
            let closed = session.close_screen(schema);
            return ok(&req.id, json!({ "screen": schema.screen, "closed": closed }));
        }
        _ => {}
    }

    let controller = match session.screen(schema) {
        Ok(c) => c,
        Err(e) => return session_err(req, e),
    };
    let now = Instant::now();

    let result: Result<Option<&str>, ControllerError> = match op {
        "view" => Ok(None),
        "refresh" => {
            controller.load_records();
            Ok(None)
        }
        "filter" => {
            let Some(key) = param_str(req, "key") else {
                return err(&req.id, "bad_params", "missing key", None);
            };
            let text = param_str(req, "text").unwrap_or_default();
            controller.set_filter(key, text).map(|_| None)
        }
        "openCreate" => controller.open_create().map(|_| None),
        "openEdit" => {
            let Some(id) = param_i64(req, "id") else {
                return err(&req.id, "bad_params", "missing id", None);
            };
            controller.open_edit(id).map(|_| None)
        }
        "setField" => {
            let Some(field) = param_str(req, "field") else {
                return err(&req.id, "bad_params", "missing field", None);
            };
            let value = req.params.get("value").cloned().unwrap_or(Value::Null);
            controller.set_field(field, &value).map(|_| None)
        }
        "closeModal" => {
            controller.close_modal();
            Ok(None)
        }
        "save" => controller.save_draft(now).map(|o| Some(save_label(o))),
        "deleteRequest" => {
            let Some(id) = param_i64(req, "id") else {
                return err(&req.id, "bad_params", "missing id", None);
            };
            controller.request_delete(id).map(|_| None)
        }
        "deleteCancel" => controller.cancel_delete().map(|_| None),
        "deleteConfirm" => controller.confirm_delete(now).map(|o| Some(delete_label(o))),
        _ => return err(&req.id, "not_implemented", format!("unknown method: {}", req.method), None),
    };

    match result {
        Ok(outcome) => view_of(req, controller, outcome),
        Err(e) => controller_err(req, e),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let (screen, op) = req.method.split_once('.')?;
    let schema = catalog::by_screen(screen)?;
    if !OPS.contains(&op) {
        return None;
    }
    Some(handle_screen_op(state, req, schema, op))
}
