//! Role assignment across inheritance chains, and the errors that stop a run before it starts.

use specrun::{ClassifyError, RoleId, TypeDescriptor, classify};

#[derive(Default)]
struct Account;

fn noop(_: &mut Account) {}

fn base() -> TypeDescriptor<Account> {
    TypeDescriptor::new("WithAnAccount")
        .method("given_an_account", noop)
        .method("because_it_is_opened", |_: &mut Account| ())
        .method("it_has_no_balance", noop)
        .method("cleanup", noop)
}

#[test]
fn test_single_level_assignment() {
    let spec = [TypeDescriptor::<Account>::new("WhenDepositing")
        .method("establish", noop)
        .method("when_depositing", noop)
        .method("should_increase_balance", noop)
        .method("then_the_ledger_records_it", noop)
        .method("format_amount", noop)
        .method("cleanup", noop)];

    let assignment = classify("WhenDepositing", &spec).unwrap();

    assert_eq!(assignment.setup_names(), vec!["establish"]);
    assert_eq!(assignment.action_name(), Some("when_depositing"));
    assert_eq!(
        assignment.assertion_names(),
        vec!["should_increase_balance", "then_the_ledger_records_it"]
    );
    assert_eq!(assignment.teardown_names(), vec!["cleanup"]);
    assert!(!assignment.is_parametrised());
}

#[test]
fn test_word_matching_ignores_keywords_inside_words() {
    let spec = [TypeDescriptor::<Account>::new("Spec")
        .method("because", noop)
        .method("withdrawal_is_recorded", noop)
        .method("itemised_statement", noop)
        .method("it_works", noop)];

    let assignment = classify("Spec", &spec).unwrap();
    assert_eq!(assignment.assertion_names(), vec!["it_works"]);
}

#[test]
fn test_ambiguous_base_method_is_reported() {
    let ancestry = [TypeDescriptor::<Account>::new("WhenClosing").method("it_is_closed", noop), base()];

    let err = classify("WhenClosing", &ancestry).unwrap_err();

    match &err {
        ClassifyError::NamingAmbiguity { spec, .. } => assert_eq!(spec, "WhenClosing"),
        other => panic!("unexpected {other:?}"),
    }
    let message = err.to_string();
    assert!(message.contains("WithAnAccount::because_it_is_opened"), "{message}");
    assert!(message.contains("action and assertion"), "{message}");
}

#[test]
fn test_two_teardowns_in_one_type() {
    let spec = [TypeDescriptor::<Account>::new("Spec")
        .method("cleanup", noop)
        .method("cleanup_files", noop)];

    let err = classify("Spec", &spec).unwrap_err();

    assert!(matches!(err, ClassifyError::TooManySpecialMethods { .. }));
    assert_eq!(err.role(), Some(RoleId::Teardown));
}

#[test]
fn test_example_parameter_without_provider() {
    let spec = [TypeDescriptor::<Account, u8>::new("Spec").method_with_example("it_uses_the_example", |_, _| ())];

    let err = classify("Spec", &spec).unwrap_err();

    assert!(matches!(err, ClassifyError::MissingExamples { ref method, .. } if method == "it_uses_the_example"));
    assert_eq!(err.role(), Some(RoleId::ExampleProvider));
}

#[test]
fn test_derived_examples_replace_inherited_ones() {
    let ancestry = [
        TypeDescriptor::<Account, u8>::new("Derived")
            .examples(|| [3u8])
            .method_with_example("it_sees", |_, _| ()),
        TypeDescriptor::<Account, u8>::new("Base").examples(|| [1u8, 2]),
    ];

    let assignment = classify("Derived", &ancestry).unwrap();
    assert!(assignment.is_parametrised());
}

#[test]
fn test_diagnostic_has_help() {
    let spec = [TypeDescriptor::<Account>::new("Spec")
        .method("because", noop)
        .method("since", noop)];
    let err = classify("Spec", &spec).unwrap_err();

    let report = format!("{:?}", miette::Report::new(err));
    assert!(report.contains("specrun::too_many_special_methods"), "{report}");
    assert!(report.contains("at most one setup"), "{report}");
}
