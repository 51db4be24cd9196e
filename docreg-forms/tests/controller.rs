//! Integration tests for FormController submission behavior.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use chrono::NaiveDate;
use docreg_forms::catalog::{self, EmployeeFormOptions};
use docreg_forms::validation::FieldSpec;
use docreg_forms::{
    FormController, FormSnapshot, Priority, Response, SubmissionState, SubmitError,
    TransportError,
};
use tokio::sync::oneshot;

fn employee_values() -> FormSnapshot {
    FormSnapshot::new()
        .with("cpf", "111.444.777-35")
        .with("employee_name", "Ana Souza")
        .with("company_name", "ACME Ltda")
        .with("documents[0].name", "ASO")
        .with("documents[0].expiration_date", "2025-06-30")
}

fn employee_form() -> FormController {
    let form = catalog::employee_form(EmployeeFormOptions::new().documents(1));
    form.pin_today(NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
    form
}

fn counting_send(
    calls: &Arc<AtomicUsize>,
    response: Response,
) -> impl FnOnce(FormSnapshot) -> std::future::Ready<Result<Response, TransportError>> {
    let calls = Arc::clone(calls);
    move |_payload| {
        calls.fetch_add(1, Ordering::SeqCst);
        std::future::ready(Ok(response))
    }
}

#[tokio::test]
async fn test_valid_submission_succeeds() {
    let form = employee_form();
    let calls = Arc::new(AtomicUsize::new(0));

    let state = form
        .submit(employee_values, counting_send(&calls, Response::new(201, "{}")))
        .await;

    assert_eq!(state, SubmissionState::Success);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(form.errors().is_empty());
}

#[tokio::test]
async fn test_empty_required_name_blocks_submission() {
    let form = employee_form();
    let calls = Arc::new(AtomicUsize::new(0));

    let values = employee_values().with("employee_name", "");
    let state = form
        .submit(|| values, counting_send(&calls, Response::new(201, "{}")))
        .await;

    assert_eq!(state, SubmissionState::Idle);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(!form.validate_all());

    let errors = form.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field_id, "employee_name");
    assert_eq!(errors[0].message, "Nome do funcionário é obrigatório");
    assert_eq!(form.first_invalid_field().as_deref(), Some("employee_name"));

    let announcement = form.announcement().unwrap();
    assert_eq!(announcement.priority, Priority::Assertive);
    assert_eq!(
        announcement.message,
        "Formulário contém erros. Corrija o campo Nome do funcionário"
    );
}

#[tokio::test]
async fn test_backend_conflict_message_is_verbatim() {
    let form = employee_form();

    let state = form
        .submit(employee_values, |_| async {
            Ok(Response::new(409, r#"{"message":"CPF já cadastrado"}"#))
        })
        .await;

    assert_eq!(state, SubmissionState::Failed("CPF já cadastrado".into()));
    match form.last_failure() {
        Some(SubmitError::Backend(err)) => assert_eq!(err.status, 409),
        other => panic!("expected backend error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_transport_error_fails_and_is_retryable() {
    let form = employee_form();

    let state = form
        .submit(employee_values, |_| async {
            Err(TransportError::network("connection refused"))
        })
        .await;

    assert_eq!(
        state,
        SubmissionState::Failed("Network error: connection refused".into())
    );
    assert!(form.last_failure().is_some_and(|e| e.is_retryable()));

    let state = form
        .submit(employee_values, |_| async { Ok(Response::new(200, "{}")) })
        .await;
    assert_eq!(state, SubmissionState::Success);
    assert!(form.last_failure().is_none());
}

#[tokio::test]
async fn test_retry_from_failed_clears_previous_errors() {
    let form = FormController::new("retry")
        .with_field(FieldSpec::new("a").required("a obrigatório"))
        .with_field(FieldSpec::new("b"));

    let state = form
        .submit(
            || FormSnapshot::new().with("a", "x"),
            |_| async { Ok(Response::new(500, "")) },
        )
        .await;
    assert_eq!(state, SubmissionState::Failed("HTTP 500 error".into()));

    // A stray error set through blur while Failed must not survive the retry.
    form.set_value("a", "");
    form.blur("a");
    assert!(form.has_error("a"));

    let mut rx = form.subscribe();
    let state = form
        .submit(
            || FormSnapshot::new().with("a", "y"),
            |_| async { Ok(Response::new(200, "")) },
        )
        .await;
    assert_eq!(state, SubmissionState::Success);
    assert!(!form.has_errors());
    assert!(rx.has_changed().unwrap());
    assert_eq!(*rx.borrow_and_update(), SubmissionState::Success);
}

#[tokio::test]
async fn test_reentrant_submit_is_rejected() {
    let form = employee_form();
    let calls = Arc::new(AtomicUsize::new(0));
    let (release_tx, release_rx) = oneshot::channel::<()>();

    let first = {
        let calls = Arc::clone(&calls);
        form.submit(employee_values, move |_| async move {
            calls.fetch_add(1, Ordering::SeqCst);
            let _ = release_rx.await;
            Ok(Response::new(201, "{}"))
        })
    };

    let second = async {
        let mut rx = form.subscribe();
        rx.wait_for(SubmissionState::is_submitting).await.unwrap();
        let errors_before = form.errors();
        let collected = AtomicBool::new(false);

        let state = form
            .submit(
                || {
                    collected.store(true, Ordering::SeqCst);
                    employee_values()
                },
                counting_send(&calls, Response::new(201, "{}")),
            )
            .await;

        assert_eq!(state, SubmissionState::Submitting);
        assert_eq!(form.errors(), errors_before);
        assert!(!collected.load(Ordering::SeqCst));
        let _ = release_tx.send(());
    };

    let (first_state, ()) = tokio::join!(first, second);

    assert_eq!(first_state, SubmissionState::Success);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_reset_while_submitting_discards_response() {
    let form = employee_form();
    let (release_tx, release_rx) = oneshot::channel::<()>();

    let first = form.submit(employee_values, move |_| async move {
        let _ = release_rx.await;
        Ok(Response::new(409, r#"{"message":"CPF já cadastrado"}"#))
    });

    let resetter = async {
        let mut rx = form.subscribe();
        rx.wait_for(SubmissionState::is_submitting).await.unwrap();
        form.reset();
        let _ = release_tx.send(());
    };

    let (state, ()) = tokio::join!(first, resetter);

    assert_eq!(state, SubmissionState::Idle);
    assert_eq!(form.state(), SubmissionState::Idle);
    assert!(form.last_failure().is_none());
    assert_eq!(form.generation(), 1);
}

#[tokio::test]
async fn test_detach_while_submitting_ignores_response() {
    let form = employee_form();
    let (release_tx, release_rx) = oneshot::channel::<()>();

    let first = form.submit(employee_values, move |_| async move {
        let _ = release_rx.await;
        Ok(Response::new(201, "{}"))
    });

    let unmount = async {
        let mut rx = form.subscribe();
        rx.wait_for(SubmissionState::is_submitting).await.unwrap();
        form.detach();
        let _ = release_tx.send(());
    };

    let (state, ()) = tokio::join!(first, unmount);
    assert_eq!(state, SubmissionState::Submitting);
}

#[tokio::test]
async fn test_success_is_terminal_until_reset() {
    let form = employee_form();
    let calls = Arc::new(AtomicUsize::new(0));

    form.submit(employee_values, counting_send(&calls, Response::new(201, "{}")))
        .await;
    let state = form
        .submit(employee_values, counting_send(&calls, Response::new(201, "{}")))
        .await;

    assert_eq!(state, SubmissionState::Success);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    form.reset();
    assert_eq!(form.state(), SubmissionState::Idle);
    assert!(form.snapshot().is_empty());
}

#[tokio::test]
async fn test_submit_after_success_does_not_collect_values() {
    let form = employee_form();
    let calls = Arc::new(AtomicUsize::new(0));
    form.submit(employee_values, counting_send(&calls, Response::new(201, "{}")))
        .await;

    let collected = AtomicBool::new(false);
    let state = form
        .submit(
            || {
                collected.store(true, Ordering::SeqCst);
                employee_values()
            },
            counting_send(&calls, Response::new(201, "{}")),
        )
        .await;

    assert_eq!(state, SubmissionState::Success);
    assert!(!collected.load(Ordering::SeqCst));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_reset_always_yields_idle_and_empty_registry() {
    let form = employee_form();

    form.submit(FormSnapshot::new, |_| async { Ok(Response::new(200, "")) })
        .await;
    assert!(form.has_errors());

    form.reset();
    assert_eq!(form.state(), SubmissionState::Idle);
    assert!(form.errors().is_empty());
    assert!(form.announcement().is_none());
}

#[tokio::test]
async fn test_submitting_entry_implies_empty_registry() {
    let form = employee_form();
    let observed = form.clone();

    let state = form
        .submit(employee_values, move |_| {
            let errors = observed.errors();
            let state = observed.state();
            async move {
                assert!(errors.is_empty());
                assert_eq!(state, SubmissionState::Submitting);
                Ok(Response::new(204, ""))
            }
        })
        .await;

    assert_eq!(state, SubmissionState::Success);
}

#[tokio::test]
async fn test_collect_values_may_read_the_controller() {
    let form = catalog::login_form();
    form.set_value("email", "ana@example.com");
    form.set_value("password", "segredo");

    let reader = form.clone();
    let state = form
        .submit(
            move || reader.snapshot(),
            |payload| async move {
                assert_eq!(payload.get("email"), Some("ana@example.com"));
                Ok(Response::new(200, r#"{"token":"abc"}"#))
            },
        )
        .await;

    assert_eq!(state, SubmissionState::Success);
}

#[test]
fn test_cpf_check_scenario() {
    let form = catalog::cpf_check_form();

    form.set_value("cpf", "111.444.777-35");
    assert!(form.blur("cpf").is_valid());
    assert!(!form.has_error("cpf"));

    form.set_value("cpf", "111.111.111-11");
    let result = form.blur("cpf");
    assert!(result.is_invalid());
    assert_eq!(form.error("cpf").as_deref(), Some("CPF inválido"));

    form.set_value("cpf", "");
    assert_eq!(form.error("cpf").as_deref(), Some("CPF é obrigatório"));
}

#[test]
fn test_confirmation_revalidates_when_password_changes() {
    let form = catalog::user_registration_form();
    form.set_value("password", "Segura#2024");
    form.set_value("confirm_password", "Segura#2023");
    assert!(form.blur("confirm_password").is_invalid());
    assert_eq!(
        form.error("confirm_password").as_deref(),
        Some("Senhas não coincidem")
    );

    // Fixing the other side of the comparison clears the dependent error.
    form.set_value("password", "Segura#2023");
    assert!(!form.has_error("confirm_password"));
}

#[test]
fn test_untouched_field_is_not_validated_on_change() {
    let form = catalog::login_form();
    form.set_value("email", "not-an-email");
    assert!(!form.has_error("email"));

    form.blur("email");
    assert!(form.has_error("email"));

    form.set_value("email", "ana@example.com");
    assert!(!form.has_error("email"));
}

#[test]
fn test_validate_all_matches_registry() {
    let form = catalog::user_registration_form();
    for (id, value) in [
        ("name", "A"),
        ("email", "ana@example.com"),
        ("password", "fraca"),
        ("confirm_password", "fraca"),
    ] {
        form.set_value(id, value);
    }
    assert_eq!(form.validate_all(), form.errors().is_empty());
    let ids: Vec<String> = form.errors().into_iter().map(|e| e.field_id).collect();
    assert_eq!(ids, vec!["name", "password", "terms"]);

    form.set_value("name", "Ana");
    form.set_value("password", "Segura#2024");
    form.set_value("confirm_password", "Segura#2024");
    form.set_value("terms", "true");
    assert!(form.validate_all());
    assert!(form.errors().is_empty());
}

#[test]
fn test_expired_document_date_uses_pinned_today() {
    let form = employee_form();
    form.set_value("documents[0].expiration_date", "2025-03-09");
    assert!(form.blur("documents[0].expiration_date").is_invalid());

    form.set_value("documents[0].expiration_date", "10/03/2025");
    assert!(!form.has_error("documents[0].expiration_date"));
}
