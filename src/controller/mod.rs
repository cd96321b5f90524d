//! The list/edit controller shared by every admin screen.
//!
//! One instance owns a snapshot of the server's records, the filter terms,
//! at most one open draft and an independent delete confirmation. Every
//! successful mutation is followed by a full re-read; the controller never
//! patches its list locally.

pub mod filter;
pub mod timers;

use crate::api::{ApiClient, DropdownOption, MutationOutcome};
use crate::entity::{DraftAction, DraftError, EntityRecord, EntitySchema, FormDraft};
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use timers::{TimerAction, TimerId, Timers};

const SAVED_TOAST: &str = "Record successfully saved";
const DELETED_TOAST: &str = "Record successfully deleted";
const SAVED_FALLBACK: &str = "Success!";
const DELETED_MESSAGE: &str = "Deleted!";
const SAVE_REJECTED_FALLBACK: &str = "Database validation error";
const DELETE_REJECTED_FALLBACK: &str = "Delete failed";
const SERVER_ERROR: &str = "Server error!";
const DELETE_CLEAR_DELAY: Duration = Duration::from_millis(600);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub visible: bool,
    pub kind: Option<ToastKind>,
    pub text: String,
}

#[derive(Debug)]
enum Modal {
    Closed,
    Open(FormDraft),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ControllerError {
    #[error("no form is open")]
    NoModal,
    #[error("close the open form first")]
    ModalOpen,
    #[error("a delete confirmation is pending")]
    DeletePending,
    #[error("no delete is pending")]
    NoDeleteTarget,
    #[error("a request is already running")]
    Busy,
    #[error("no {label} with id {id} in the current list")]
    NotFound { label: &'static str, id: i64 },
    #[error("unknown filter: {0}")]
    UnknownFilter(String),
    #[error(transparent)]
    Draft(#[from] DraftError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Required fields missing; nothing was sent.
    Invalid,
    Saved,
    Rejected,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Rejected,
    Failed,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModalView {
    pub open: bool,
    pub action: Option<DraftAction>,
    pub id: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionView {
    pub lookup_id: i64,
    pub meaning: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenView {
    pub screen: &'static str,
    pub records: Vec<EntityRecord>,
    pub total_records: usize,
    pub list_loading: bool,
    pub filters: BTreeMap<&'static str, String>,
    pub modal: ModalView,
    pub draft: Option<Map<String, Value>>,
    pub draft_dirty: bool,
    pub dropdowns: BTreeMap<&'static str, Vec<OptionView>>,
    pub delete_target_id: Option<i64>,
    pub status_message: String,
    pub modal_busy: bool,
    pub toast: Toast,
    /// When to send `ui.tick` so pending toasts and closes fire on time.
    pub next_timer_in_ms: Option<u64>,
}

pub struct EntityController {
    schema: &'static EntitySchema,
    api: ApiClient,
    records: Vec<EntityRecord>,
    options: Vec<DropdownOption>,
    list_loading: bool,
    filters: BTreeMap<&'static str, String>,
    modal: Modal,
    delete_target: Option<i64>,
    status_message: String,
    modal_busy: bool,
    toast: Toast,
    toast_timer: Option<TimerId>,
    timers: Timers,
}

impl EntityController {
    pub fn new(schema: &'static EntitySchema, api: ApiClient) -> Self {
        Self {
            schema,
            api,
            records: Vec::new(),
            options: Vec::new(),
            list_loading: false,
            filters: schema.filters.iter().map(|f| (f.key, String::new())).collect(),
            modal: Modal::Closed,
            delete_target: None,
            status_message: String::new(),
            modal_busy: false,
            toast: Toast::default(),
            toast_timer: None,
            timers: Timers::default(),
        }
    }

    /// First load when the screen opens: reference data, then the list.
    pub fn mount(&mut self) {
        if self.schema.lookups.is_some() {
            self.load_dropdown_options();
        }
        self.load_records();
    }

    pub fn load_records(&mut self) -> bool {
        self.list_loading = true;
        let loaded = match self.api.read_records(self.schema) {
            Ok(records) => {
                tracing::info!(screen = self.schema.screen, count = records.len(), "list loaded");
                self.records = records;
                true
            }
            Err(e) => {
                tracing::warn!(screen = self.schema.screen, error = %e, "list load failed");
                self.records.clear();
                self.status_message = self.schema.fetch_error.to_string();
                false
            }
        };
        self.list_loading = false;
        loaded
    }

    pub fn load_dropdown_options(&mut self) {
        let Some(endpoint) = self.schema.lookups else {
            return;
        };
        match self.api.lookups(endpoint) {
            Ok(options) => self.options = options,
            Err(e) => {
                tracing::warn!(screen = self.schema.screen, error = %e, "lookup load failed");
                self.options.clear();
            }
        }
    }

    pub fn options_for(&self, category: &str) -> Vec<&DropdownOption> {
        let category = category.to_lowercase();
        self.options
            .iter()
            .filter(|o| o.category.to_lowercase() == category)
            .collect()
    }

    pub fn open_create(&mut self) -> Result<(), ControllerError> {
        self.ensure_can_open()?;
        self.open(FormDraft::empty(self.schema));
        Ok(())
    }

    pub fn open_edit(&mut self, id: i64) -> Result<(), ControllerError> {
        self.ensure_can_open()?;
        let record = self
            .records
            .iter()
            .find(|r| r.id(self.schema.id_wire) == id)
            .ok_or(ControllerError::NotFound {
                label: self.schema.label,
                id,
            })?;
        let draft = FormDraft::from_record(self.schema, record);
        self.open(draft);
        Ok(())
    }

    fn ensure_can_open(&self) -> Result<(), ControllerError> {
        if self.modal_busy {
            return Err(ControllerError::Busy);
        }
        if self.delete_target.is_some() {
            return Err(ControllerError::DeletePending);
        }
        Ok(())
    }

    fn open(&mut self, draft: FormDraft) {
        // A close scheduled by an earlier save must not dismiss this draft.
        self.timers.cancel_action(TimerAction::CloseModal);
        self.modal = Modal::Open(draft);
        self.status_message.clear();
    }

    pub fn set_field(&mut self, field: &str, value: &Value) -> Result<(), ControllerError> {
        let Modal::Open(draft) = &mut self.modal else {
            return Err(ControllerError::NoModal);
        };
        draft.set(self.schema, field, value)?;
        Ok(())
    }

    pub fn close_modal(&mut self) {
        self.timers.cancel_action(TimerAction::CloseModal);
        self.modal = Modal::Closed;
        self.status_message.clear();
        self.modal_busy = false;
    }

    pub fn save_draft(&mut self, now: Instant) -> Result<SaveOutcome, ControllerError> {
        let Modal::Open(draft) = &self.modal else {
            return Err(ControllerError::NoModal);
        };
        if self.modal_busy {
            return Err(ControllerError::Busy);
        }

        let missing = draft.missing_required(self.schema);
        if !missing.is_empty() {
            tracing::debug!(screen = self.schema.screen, ?missing, "required fields empty");
            self.status_message = self.schema.required_message.to_string();
            return Ok(SaveOutcome::Invalid);
        }

        let action = draft.action;
        let body = draft.to_wire(self.schema);
        self.modal_busy = true;
        self.status_message.clear();

        let outcome = match self.api.mutate(self.schema, body) {
            Ok(MutationOutcome::Ok { message }) => {
                tracing::info!(screen = self.schema.screen, action = action.as_str(), "record saved");
                self.notify(now, ToastKind::Success, SAVED_TOAST);
                self.status_message = message.unwrap_or_else(|| SAVED_FALLBACK.to_string());
                self.load_records();
                // Stays busy until the modal closes so the draft cannot be resent.
                self.timers
                    .schedule(now, self.schema.close_delay, TimerAction::CloseModal);
                return Ok(SaveOutcome::Saved);
            }
            Ok(MutationOutcome::Rejected { message }) => {
                let text = message.unwrap_or_else(|| SAVE_REJECTED_FALLBACK.to_string());
                tracing::info!(screen = self.schema.screen, reason = %text, "save rejected");
                self.notify(now, ToastKind::Error, &text);
                self.status_message = text;
                SaveOutcome::Rejected
            }
            Err(e) => {
                tracing::warn!(screen = self.schema.screen, error = %e, "save failed");
                self.notify(now, ToastKind::Error, SERVER_ERROR);
                self.status_message = SERVER_ERROR.to_string();
                SaveOutcome::Failed
            }
        };
        self.modal_busy = false;
        Ok(outcome)
    }

    pub fn request_delete(&mut self, id: i64) -> Result<(), ControllerError> {
        if self.modal_busy {
            return Err(ControllerError::Busy);
        }
        if matches!(self.modal, Modal::Open(_)) {
            return Err(ControllerError::ModalOpen);
        }
        self.timers.cancel_action(TimerAction::ClearDeleteTarget);
        self.delete_target = Some(id);
        self.status_message.clear();
        Ok(())
    }

    pub fn cancel_delete(&mut self) -> Result<(), ControllerError> {
        if self.modal_busy {
            return Err(ControllerError::Busy);
        }
        self.timers.cancel_action(TimerAction::ClearDeleteTarget);
        self.delete_target = None;
        self.status_message.clear();
        Ok(())
    }

    pub fn confirm_delete(&mut self, now: Instant) -> Result<DeleteOutcome, ControllerError> {
        let Some(id) = self.delete_target else {
            return Err(ControllerError::NoDeleteTarget);
        };
        if self.modal_busy {
            return Err(ControllerError::Busy);
        }
        self.modal_busy = true;
        self.status_message.clear();

        let mut body = Map::new();
        body.insert("Action".into(), json!("delete"));
        body.insert(self.schema.id_wire.into(), json!(id));

        match self.api.mutate(self.schema, body) {
            Ok(MutationOutcome::Ok { .. }) => {
                tracing::info!(screen = self.schema.screen, id, "record deleted");
                self.notify(now, ToastKind::Success, DELETED_TOAST);
                self.status_message = DELETED_MESSAGE.to_string();
                self.load_records();
                // Stays busy until the dialog clears so the same id cannot be confirmed twice.
                self.timers
                    .schedule(now, DELETE_CLEAR_DELAY, TimerAction::ClearDeleteTarget);
                Ok(DeleteOutcome::Deleted)
            }
            Ok(MutationOutcome::Rejected { message }) => {
                let text = message.unwrap_or_else(|| DELETE_REJECTED_FALLBACK.to_string());
                tracing::info!(screen = self.schema.screen, id, reason = %text, "delete rejected");
                self.notify(now, ToastKind::Error, &text);
                self.status_message = text;
                self.modal_busy = false;
                Ok(DeleteOutcome::Rejected)
            }
            Err(e) => {
                tracing::warn!(screen = self.schema.screen, id, error = %e, "delete failed");
                self.notify(now, ToastKind::Error, SERVER_ERROR);
                self.status_message = SERVER_ERROR.to_string();
                self.modal_busy = false;
                Ok(DeleteOutcome::Failed)
            }
        }
    }

    pub fn set_filter(&mut self, key: &str, text: &str) -> Result<(), ControllerError> {
        let spec = self
            .schema
            .filter(key)
            .ok_or_else(|| ControllerError::UnknownFilter(key.to_string()))?;
        self.filters.insert(spec.key, text.to_string());
        Ok(())
    }

    pub fn visible_records(&self) -> Vec<&EntityRecord> {
        let active: Vec<_> = self
            .schema
            .filters
            .iter()
            .map(|f| (f, self.filters.get(f.key).map(String::as_str).unwrap_or("")))
            .collect();
        filter::apply(&self.records, &active)
    }

    fn notify(&mut self, now: Instant, kind: ToastKind, text: &str) {
        if let Some(id) = self.toast_timer.take() {
            self.timers.cancel(id);
        }
        self.toast = Toast {
            visible: true,
            kind: Some(kind),
            text: text.to_string(),
        };
        self.toast_timer = Some(
            self.timers
                .schedule(now, self.schema.toast_ttl, TimerAction::DismissToast),
        );
    }

    /// Runs every timer due at `now`. Returns how many fired.
    pub fn tick(&mut self, now: Instant) -> usize {
        let due = self.timers.take_due(now);
        for action in &due {
            tracing::trace!(screen = self.schema.screen, ?action, "timer fired");
            match action {
                TimerAction::DismissToast => {
                    self.toast = Toast::default();
                    self.toast_timer = None;
                }
                TimerAction::CloseModal => self.close_modal(),
                TimerAction::ClearDeleteTarget => {
                    self.delete_target = None;
                    self.modal_busy = false;
                }
            }
        }
        due.len()
    }

    /// Cancels everything still scheduled; nothing fires after this.
    pub fn teardown(&mut self) {
        self.timers.cancel_all();
        self.toast_timer = None;
    }

    #[cfg(test)]
    pub fn records(&self) -> &[EntityRecord] {
        &self.records
    }

    #[cfg(test)]
    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    #[cfg(test)]
    pub fn delete_target(&self) -> Option<i64> {
        self.delete_target
    }

    #[cfg(test)]
    pub fn toast(&self) -> &Toast {
        &self.toast
    }

    pub fn draft(&self) -> Option<&FormDraft> {
        match &self.modal {
            Modal::Open(d) => Some(d),
            Modal::Closed => None,
        }
    }

    #[cfg(test)]
    pub fn is_busy(&self) -> bool {
        self.modal_busy
    }

    #[cfg(test)]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn view(&self) -> ScreenView {
        self.view_at(Instant::now())
    }

    pub fn view_at(&self, now: Instant) -> ScreenView {
        let draft = self.draft();
        let dropdowns = self
            .schema
            .lookup_fields()
            .map(|(field, category)| {
                let options = self
                    .options_for(category)
                    .into_iter()
                    .map(|o| OptionView {
                        lookup_id: o.id,
                        meaning: o.meaning.clone(),
                    })
                    .collect();
                (field.draft, options)
            })
            .collect();
        ScreenView {
            screen: self.schema.screen,
            records: self.visible_records().into_iter().cloned().collect(),
            total_records: self.records.len(),
            list_loading: self.list_loading,
            filters: self.filters.clone(),
            modal: ModalView {
                open: draft.is_some(),
                action: draft.map(|d| d.action),
                id: draft.map(|d| d.id),
            },
            draft: draft.map(FormDraft::values_json),
            draft_dirty: draft.is_some_and(FormDraft::is_dirty),
            dropdowns,
            delete_target_id: self.delete_target,
            status_message: self.status_message.clone(),
            modal_busy: self.modal_busy,
            toast: self.toast.clone(),
            next_timer_in_ms: self.timers.next_due().map(|due| {
                let wait = due.saturating_duration_since(now).as_millis();
                u64::try_from(wait).unwrap_or(u64::MAX)
            }),
        }
    }
}
