mod common;

use common::{date, january_lessons, lesson, setup_config};
use rust_decimal_macros::dec;
use tutordesk_core::{
    config::{AmountPolicy, Config},
    core::services::{CatalogService, PaymentBook},
    core::ValidationIssue,
    domain::Catalog,
    errors::CoreError,
    view::{payment_form, PaymentFormAction, PaymentFormState},
};

fn book_with_lessons() -> PaymentBook {
    let mut book = PaymentBook::default();
    for item in january_lessons("STU001") {
        book.add_outstanding(item).unwrap();
    }
    book.add_outstanding(lesson("LES900", "STU002", dec!(95), date(2026, 1, 10)))
        .unwrap();
    book
}

#[test]
fn form_preview_then_commit_records_the_payment() {
    let mut book = book_with_lessons();

    let state = PaymentFormState::default();
    let state = payment_form::reduce(&state, PaymentFormAction::SelectPayer("STU001".into()), &book);
    let state = payment_form::reduce(&state, PaymentFormAction::EditAmount("400".into()), &book);
    assert!(state.is_submittable());
    let preview = state.preview.clone().unwrap();
    assert_eq!(preview.covered_ids(), vec!["LES001", "LES002"]);

    let record = book
        .commit("STU001", &state.amount_input, state.balance_version)
        .unwrap();
    assert_eq!(record.covered_item_ids, vec!["LES001", "LES002"]);
    assert_eq!(record.remaining_credit, dec!(70));
    assert_eq!(book.outstanding_total("STU001"), dec!(150));
    assert_eq!(book.outstanding_total("STU002"), dec!(95));
    assert_eq!(book.history_for("STU001").count(), 1);
}

#[test]
fn a_second_commit_with_the_same_preview_is_refused() {
    let mut book = book_with_lessons();
    let preview = book.preview("STU001", "150").unwrap();

    book.commit("STU001", "150", preview.version).unwrap();
    let err = book.commit("STU001", "150", preview.version).unwrap_err();
    assert!(matches!(err, CoreError::StaleBalance { .. }));

    assert_eq!(book.history().len(), 1);
    assert_eq!(book.outstanding_for("STU001").len(), 2);
}

#[test]
fn other_payers_do_not_invalidate_a_preview() {
    let mut book = book_with_lessons();
    let preview = book.preview("STU001", "150").unwrap();
    let other = book.preview("STU002", "95").unwrap();
    book.commit("STU002", "95", other.version).unwrap();
    assert!(book.commit("STU001", "150", preview.version).is_ok());
}

#[test]
fn reject_policy_from_saved_config_refuses_bad_amounts() {
    let (_guard, manager) = setup_config();
    manager
        .save(&Config {
            amount_policy: AmountPolicy::Reject,
            ..Config::default()
        })
        .unwrap();
    let config = manager.load().unwrap();

    let mut book = PaymentBook::from_config(&config);
    book.replace_outstanding(january_lessons("STU001")).unwrap();

    let err = book.preview("STU001", "-10").unwrap_err();
    let errors = err.validation().expect("validation error");
    assert_eq!(
        errors.get("amount"),
        &[ValidationIssue::InvalidAmount {
            input: "-10".into()
        }]
    );

    let state = PaymentFormState {
        payer_id: Some("STU001".into()),
        ..PaymentFormState::default()
    };
    let state = payment_form::reduce(&state, PaymentFormAction::EditAmount("abc".into()), &book);
    assert!(!state.is_submittable());
    assert!(state.preview.is_none());
}

#[test]
fn catalog_keeps_subjects_and_stage_pairs_unique() {
    let mut catalog = Catalog::default();
    let maths = CatalogService::add_subject(&mut catalog, "Maths").unwrap();
    let dup = CatalogService::add_subject(&mut catalog, "maths").unwrap_err();
    assert!(dup.validation().is_some());

    CatalogService::assign(&mut catalog, "Primary", maths).unwrap();
    assert!(CatalogService::assign(&mut catalog, "primary", maths).is_err());
    assert!(matches!(
        CatalogService::remove_subject(&mut catalog, maths),
        Err(CoreError::InvalidOperation(_))
    ));

    CatalogService::unassign(&mut catalog, "Primary", maths).unwrap();
    let removed = CatalogService::remove_subject(&mut catalog, maths).unwrap();
    assert_eq!(removed.name, "Maths");
    assert!(catalog.subjects.is_empty());
}
