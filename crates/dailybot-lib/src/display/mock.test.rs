use super::*;

#[test]
fn spinner_is_cleared_around_operation() {
    let display = MockDisplayProvider::new();

    let value: Result<u8, String> = display.with_spinner("Working...", || Ok(7));
    assert_eq!(value, Ok(7));

    let failed: Result<u8, String> = display.with_spinner("Failing...", || Err("boom".into()));
    assert_eq!(failed, Err("boom".to_string()));

    assert_eq!(
        display.get_calls(),
        vec![
            DisplayCall::ProgressSpinner { message: "Working...".into() },
            DisplayCall::ProgressFinishClear,
            DisplayCall::ProgressSpinner { message: "Failing...".into() },
            DisplayCall::ProgressFinishClear,
        ]
    );
}

#[test]
fn output_flattens_status_and_structured_calls() {
    let display = MockDisplayProvider::new();
    display.status().list(&["one", "two"]);
    display.table().properties("Agent", &[("Name", "Deploy Bot")]);

    assert!(display.shows("one\ntwo"));
    assert!(display.shows("Agent\nName: Deploy Bot"));
    assert_eq!(display.count_calls("status_list"), 1);
    assert!(display.errors().is_empty());
}
