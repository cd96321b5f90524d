mod test_support;

use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use test_support::{action, admin_login, error_code, is_read, request, request_ok, spawn_sidecar, MockBackend};

/// Teacher 5 is referenced elsewhere until `release` flips.
fn teacher_backend(release: Arc<AtomicBool>) -> MockBackend {
    let deleted = Arc::new(AtomicBool::new(false));
    MockBackend::start(move |path, body| match path {
        "Hostel/login" => admin_login(),
        "School/StudentDropDowns" => (200, json!([])),
        "School/teacher" if is_read(body) => {
            let mut rows = vec![json!({ "TeacherId": 4, "FirstName": "Meera", "EmployeeNo": "E4" })];
            if !deleted.load(Ordering::SeqCst) {
                rows.push(json!({ "TeacherId": 5, "FirstName": "Arun", "EmployeeNo": "E5" }));
            }
            (200, Value::Array(rows))
        }
        "School/teacher" if action(body) == "delete" => {
            if release.load(Ordering::SeqCst) {
                deleted.store(true, Ordering::SeqCst);
                (200, json!([{ "SuccesCode": 1, "ValidationMessage": "Deleted" }]))
            } else {
                (200, json!([{ "SuccesCode": 0, "ValidationMessage": "In use" }]))
            }
        }
        _ => (500, json!({})),
    })
}

#[test]
fn rejected_delete_keeps_dialog_then_success_clears_it() {
    let release = Arc::new(AtomicBool::new(false));
    let backend = teacher_backend(Arc::clone(&release));
    let (mut child, mut stdin, mut reader) = spawn_sidecar(&backend.base);

    request_ok(&mut stdin, &mut reader, "1", "session.login", json!({ "userName": "a", "password": "b" }));
    let opened = request_ok(&mut stdin, &mut reader, "2", "teachers.open", json!({}));
    assert_eq!(opened["totalRecords"], json!(2));

    let asked = request_ok(&mut stdin, &mut reader, "3", "teachers.deleteRequest", json!({ "id": 5 }));
    assert_eq!(asked["deleteTargetId"], json!(5));

    let blocked = request(&mut stdin, &mut reader, "4", "teachers.openCreate", json!({}));
    assert_eq!(error_code(&blocked), "invalid_state");

    let rejected = request_ok(&mut stdin, &mut reader, "5", "teachers.deleteConfirm", json!({}));
    assert_eq!(rejected["outcome"], json!("rejected"));
    assert_eq!(rejected["deleteTargetId"], json!(5));
    assert_eq!(rejected["statusMessage"], json!("In use"));
    assert_eq!(rejected["modalBusy"], json!(false));
    assert_eq!(
        backend.writes_to("School/teacher"),
        vec![json!({ "Action": "delete", "TeacherId": 5 })]
    );

    release.store(true, Ordering::SeqCst);
    let deleted = request_ok(&mut stdin, &mut reader, "6", "teachers.deleteConfirm", json!({}));
    assert_eq!(deleted["outcome"], json!("deleted"));
    assert_eq!(deleted["statusMessage"], json!("Deleted!"));
    assert_eq!(deleted["toast"]["text"], json!("Record successfully deleted"));
    assert_eq!(deleted["totalRecords"], json!(1));
    assert_eq!(deleted["modalBusy"], json!(true));

    let again = request(&mut stdin, &mut reader, "7", "teachers.deleteConfirm", json!({}));
    assert_eq!(error_code(&again), "invalid_state");
    assert_eq!(backend.writes_to("School/teacher").len(), 2);

    thread::sleep(Duration::from_millis(700));
    let cleared = request_ok(&mut stdin, &mut reader, "8", "teachers.view", json!({}));
    assert_eq!(cleared["deleteTargetId"], json!(null));
    assert_eq!(cleared["modalBusy"], json!(false));

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn cancelling_a_delete_sends_nothing() {
    let backend = teacher_backend(Arc::new(AtomicBool::new(true)));
    let (mut child, mut stdin, mut reader) = spawn_sidecar(&backend.base);

    request_ok(&mut stdin, &mut reader, "1", "session.login", json!({ "userName": "a", "password": "b" }));
    request_ok(&mut stdin, &mut reader, "2", "teachers.open", json!({}));
    request_ok(&mut stdin, &mut reader, "3", "teachers.deleteRequest", json!({ "id": 4 }));
    let cancelled = request_ok(&mut stdin, &mut reader, "4", "teachers.deleteCancel", json!({}));
    assert_eq!(cancelled["deleteTargetId"], json!(null));

    let nothing = request(&mut stdin, &mut reader, "5", "teachers.deleteConfirm", json!({}));
    assert_eq!(error_code(&nothing), "invalid_state");
    assert!(backend.writes_to("School/teacher").is_empty());

    drop(stdin);
    let _ = child.wait();
}
