//! Tests for `#[derive(Hydrate)]` as seen from user code.

use argot::{hydrate, tokenize, BindingTable, Command, FieldKind, Hydrate, Input, MockEnv, ValueKind};

#[derive(Debug, Default, Hydrate)]
struct Deploy {
    #[argot(name = "target")]
    environment: String,
    #[argot]
    replicas: u32,
    #[argot(name = "label")]
    labels: Vec<String>,
    #[argot]
    dry_run: bool,
    #[argot(skip)]
    attempts: u8,
    notes: Option<String>,
}

#[derive(Default, Hydrate)]
struct Generic<T: Default> {
    #[argot]
    count: i16,
    #[allow(dead_code)]
    payload: T,
}

// ============================================================================
// Binding tables
// ============================================================================

#[test]
fn annotated_fields_are_bound_in_declaration_order() {
    let mut deploy = Deploy::default();
    let table = BindingTable::of(&mut deploy).unwrap();
    let names: Vec<&str> = table.names().collect();
    assert_eq!(names, ["target", "replicas", "label", "dry_run"]);
}

#[test]
fn skipped_and_unannotated_fields_are_not_bound() {
    let mut deploy = Deploy::default();
    let table = BindingTable::of(&mut deploy).unwrap();
    assert!(!table.contains("attempts"));
    assert!(!table.contains("notes"));
    assert!(!table.contains("environment"));
}

#[test]
fn field_kinds_follow_rust_types() {
    let mut deploy = Deploy::default();
    let table = BindingTable::of(&mut deploy).unwrap();
    assert_eq!(table.kind("target"), Some(FieldKind::Scalar(ValueKind::Text)));
    assert_eq!(table.kind("replicas"), Some(FieldKind::Scalar(ValueKind::Uint(32))));
    assert_eq!(table.kind("label"), Some(FieldKind::Sequence(ValueKind::Text)));
    assert_eq!(table.kind("dry_run"), Some(FieldKind::Scalar(ValueKind::Bool)));
    assert_eq!(table.kind("missing"), None);
}

#[test]
fn generic_records_derive() {
    let mut record: Generic<Vec<u8>> = Generic::default();
    let table = BindingTable::of(&mut record).unwrap();
    assert_eq!(table.kind("count"), Some(FieldKind::Scalar(ValueKind::Int(16))));
    assert!(!table.contains("payload"));
}

// ============================================================================
// Hydrating derived records
// ============================================================================

fn deploy_command() -> Command {
    Command::new("deploy", |_, _| Ok(()))
        .argument(Input::<String>::new("target").required().argument())
        .flag(Input::<u32>::new("replicas").default(1).flag())
        .flag(Input::<Vec<String>>::new("label").default(Vec::new()).flag())
        .flag(Input::<bool>::new("dry_run").default(false).flag())
}

#[test]
fn derived_record_hydrates() {
    let mut deploy = Deploy {
        attempts: 3,
        notes: Some("keep".to_string()),
        ..Deploy::default()
    };
    let args = tokenize([
        "staging",
        "--replicas",
        "4",
        "--label",
        "team=web,tier=front",
        "--dry_run",
    ]);
    hydrate(&deploy_command(), &args, &MockEnv::new(), &mut deploy).unwrap();

    assert_eq!(deploy.environment, "staging");
    assert_eq!(deploy.replicas, 4);
    assert_eq!(deploy.labels, ["team=web", "tier=front"]);
    assert!(deploy.dry_run);
    assert_eq!(deploy.attempts, 3);
    assert_eq!(deploy.notes.as_deref(), Some("keep"));
}

#[test]
fn bool_flag_accepts_explicit_false() {
    let mut deploy = Deploy::default();
    let args = tokenize(["prod", "--dry_run=false"]);
    hydrate(&deploy_command(), &args, &MockEnv::new(), &mut deploy).unwrap();
    assert!(!deploy.dry_run);
}

#[test]
fn bool_flag_rejects_garbage() {
    let mut deploy = Deploy::default();
    let args = tokenize(["prod", "--dry_run=maybe"]);
    let err = hydrate(&deploy_command(), &args, &MockEnv::new(), &mut deploy).unwrap_err();
    assert!(err.to_string().contains("dry_run"));
}
