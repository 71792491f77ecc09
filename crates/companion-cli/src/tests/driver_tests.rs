use clap::Parser;
use std::path::{Path, PathBuf};

use crate::args::CliArgs;
use crate::config::FileFilter;
use crate::driver::{check_files, discover_snapshots, load_program, resolve_inputs, run};

/// `Client.Call` invokes `Owner.Run`, which only `Friend` may call.
const REJECTED_CALL: &str = r#"{
    "types": [
        { "name": "Owner", "namespace": "App" },
        { "name": "Friend", "namespace": "App" },
        { "name": "Client", "namespace": "App" }
    ],
    "members": [
        { "name": "Run", "kind": "method", "declaring_type": 0, "companions": [ { "name": "App.Friend" } ] }
    ],
    "units": [
        {
            "file_name": "Client.cs",
            "source_text": "class Client {\n  void Call(Owner o) { o.Run(); }\n}\n",
            "nodes": [
                { "kind": "name", "text": "o" },
                { "kind": "name", "text": "Run" },
                { "kind": "member_access", "expression": 0, "name": 1 },
                { "kind": "invocation", "callee": 2 }
            ],
            "references": [
                { "node": 3, "member": 0, "kind": "invocation", "enclosing_type": 2, "location": { "start": 38, "length": 7 } }
            ]
        }
    ]
}"#;

const CLEAN: &str = r#"{ "types": [ { "name": "Owner" } ], "members": [], "units": [] }"#;

fn write(dir: &Path, relative: &str, contents: &str) -> PathBuf {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent dirs");
    }
    std::fs::write(&path, contents).expect("write file");
    path
}

fn args(extra: &[&str]) -> CliArgs {
    let mut argv = vec!["companion-check"];
    argv.extend_from_slice(extra);
    CliArgs::try_parse_from(argv).expect("args should parse")
}

#[test]
fn discovers_json_files_except_config() {
    let dir = tempfile::tempdir().expect("temp dir");
    let a = write(dir.path(), "a.json", CLEAN);
    let b = write(dir.path(), "nested/b.json", CLEAN);
    write(dir.path(), "companion.json", "{}");
    write(dir.path(), "notes.txt", "not a snapshot");

    let files = discover_snapshots(
        &[dir.path().to_path_buf()],
        dir.path(),
        &FileFilter::default(),
    )
    .expect("discovery");
    assert_eq!(files, vec![a, b]);
}

#[test]
fn explicit_files_bypass_filter_and_dedup() {
    let dir = tempfile::tempdir().expect("temp dir");
    let a = write(dir.path(), "fixtures/a.json", CLEAN);
    let filter = FileFilter::new(None, Some(&["fixtures/**".to_string()])).expect("filter");

    let files = discover_snapshots(&[a.clone(), a.clone()], dir.path(), &filter).expect("discovery");
    assert_eq!(files, vec![a]);

    let walked =
        discover_snapshots(&[dir.path().to_path_buf()], dir.path(), &filter).expect("discovery");
    assert!(walked.is_empty());
}

#[test]
fn missing_path_is_an_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let missing = dir.path().join("missing");
    let err = discover_snapshots(&[missing], dir.path(), &FileFilter::default())
        .expect_err("missing path should fail");
    assert!(err.to_string().contains("path not found"));
}

#[test]
fn config_drives_discovery_and_options() {
    let dir = tempfile::tempdir().expect("temp dir");
    write(
        dir.path(),
        "companion.json",
        r#"{ "include": ["src/**/*.json"], "checkerOptions": { "reportUnresolvedCompanionNames": true } }"#,
    );
    let kept = write(dir.path(), "src/app.json", CLEAN);
    write(dir.path(), "build/app.json", CLEAN);

    let inputs = resolve_inputs(&args(&[]), dir.path()).expect("inputs");
    assert_eq!(inputs.files, vec![kept]);
    assert!(inputs.options.report_unresolved_companion_names);
    assert_eq!(inputs.base_dir, dir.path());
}

#[test]
fn load_errors_name_the_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let bad = write(dir.path(), "bad.json", r#"{ "types": "#);
    let err = load_program(&bad).expect_err("invalid json should fail");
    assert!(err.to_string().contains("bad.json"));
}

#[test]
fn checks_all_files_and_collects_sources() {
    let dir = tempfile::tempdir().expect("temp dir");
    let rejected = write(dir.path(), "rejected.json", REJECTED_CALL);
    let clean = write(dir.path(), "clean.json", CLEAN);

    let run = check_files(&[clean, rejected], &companion_checker::CheckerOptions::default())
        .expect("check");
    assert_eq!(run.files.len(), 2);
    assert_eq!(run.output.error_count(), 1);
    assert_eq!(run.output.sites_checked, 1);
    assert_eq!(run.output.diagnostics[0].file, "Client.cs");
    assert!(run.sources.contains_key("Client.cs"));
}

#[test]
fn single_threaded_run_matches_default() {
    let dir = tempfile::tempdir().expect("temp dir");
    write(dir.path(), "one.json", REJECTED_CALL);
    write(dir.path(), "two.json", REJECTED_CALL);

    let parallel = run(&args(&[]), dir.path()).expect("run");
    let sequential = run(&args(&["--singleThreaded"]), dir.path()).expect("run");
    assert_eq!(parallel.output, sequential.output);
    assert_eq!(parallel.output.error_count(), 2);
}
