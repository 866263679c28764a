#![forbid(unsafe_code)]

//! Loading `TreeOptions` from TOML and JSON.
//!
//! Run:
//!   cargo test -p checktree-runtime --features options-config --test options_config

use std::io::Write;

use checktree_runtime::{NotifyPolicy, OptionsError, ReconcileMode, TreeOptions};

#[test]
fn toml_overrides_and_defaults() {
    let options = TreeOptions::from_toml_str(r#"notify = "every-transition""#).unwrap();
    assert_eq!(options.notify, NotifyPolicy::EveryTransition);
    assert_eq!(options.reconcile, ReconcileMode::FixedPoint);
}

#[test]
fn empty_documents_yield_defaults() {
    assert_eq!(TreeOptions::from_toml_str("").unwrap(), TreeOptions::default());
    assert_eq!(TreeOptions::from_json_str("{}").unwrap(), TreeOptions::default());
}

#[test]
fn json_uses_kebab_case_variants() {
    let options =
        TreeOptions::from_json_str(r#"{ "reconcile": "single-pass", "notify": "on-change" }"#)
            .unwrap();
    assert_eq!(options.reconcile, ReconcileMode::SinglePass);
    assert_eq!(options.notify, NotifyPolicy::OnChange);
}

#[test]
fn unknown_variant_is_a_parse_error() {
    let err = TreeOptions::from_toml_str(r#"reconcile = "eventually""#).unwrap_err();
    assert!(matches!(err, OptionsError::Toml(_)));

    let err = TreeOptions::from_json_str("[1, 2]").unwrap_err();
    assert!(matches!(err, OptionsError::Json(_)));
}

#[test]
fn files_round_trip_through_toml() {
    let options = TreeOptions::default()
        .with_reconcile(ReconcileMode::SinglePass)
        .with_notify(NotifyPolicy::EveryTransition);

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(options.to_toml_string().unwrap().as_bytes())
        .unwrap();
    assert_eq!(TreeOptions::from_toml_file(file.path()).unwrap(), options);
}

#[test]
fn json_file_loads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("checktree.json");
    std::fs::write(&path, r#"{ "reconcile": "single-pass" }"#).unwrap();
    assert_eq!(
        TreeOptions::from_json_file(&path).unwrap().reconcile,
        ReconcileMode::SinglePass
    );
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = TreeOptions::from_toml_file(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, OptionsError::Io(_)));
    assert!(err.to_string().starts_with("I/O error"));
}
