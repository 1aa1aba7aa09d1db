use engine::{EngineError, Transaction, TransactionId, TransactionStatus, apply_status};

fn transaction(status: TransactionStatus) -> Transaction {
    Transaction {
        id: TransactionId::from(42),
        user_id: Some(7),
        user_name: "minh".to_string(),
        total_payment: 1_300_000.0,
        payment_date: "2025-09-25T00:00:00Z".to_string(),
        status,
        reason: None,
    }
}

#[test]
fn pending_to_completed_keeps_every_other_field() {
    let current = transaction(TransactionStatus::Pending);
    let updated = apply_status(&current, TransactionStatus::Completed, None).unwrap();

    assert_eq!(updated.status, TransactionStatus::Completed);
    assert_eq!(
        Transaction {
            status: TransactionStatus::Pending,
            ..updated.clone()
        },
        current
    );
}

#[test]
fn reason_is_recorded_when_given() {
    let current = transaction(TransactionStatus::Pending);
    let updated = apply_status(
        &current,
        TransactionStatus::Failed,
        Some("card declined".to_string()),
    )
    .unwrap();
    assert_eq!(updated.reason.as_deref(), Some("card declined"));

    let blank = apply_status(&current, TransactionStatus::Cancelled, Some("  ".to_string()))
        .unwrap();
    assert_eq!(blank.reason, None);
}

#[test]
fn completed_cannot_go_back_to_pending() {
    let current = transaction(TransactionStatus::Completed);
    let err = apply_status(&current, TransactionStatus::Pending, None).unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidTransition {
            from: TransactionStatus::Completed,
            to: TransactionStatus::Pending,
        }
    );
}

#[test]
fn terminal_states_are_final() {
    let current = transaction(TransactionStatus::Failed);
    assert!(apply_status(&current, TransactionStatus::Cancelled, None).is_err());
    assert!(apply_status(&current, TransactionStatus::Failed, None).is_err());
}

#[test]
fn pending_self_transition_is_rejected() {
    let current = transaction(TransactionStatus::Pending);
    assert!(matches!(
        apply_status(&current, TransactionStatus::Pending, None),
        Err(EngineError::InvalidTransition { .. })
    ));
}
