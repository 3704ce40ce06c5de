use serde_json::{Value, json};
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

const CONFIG_ENV: [&str; 10] = [
    "ENDPOINT",
    "CONTRACT_ADDRESS",
    "LEDGER_PATH",
    "JETSAM_BIND",
    "DB_USERNAME",
    "DB_PASSWORD",
    "DB_HOSTNAME",
    "NEW_RELIC_LICENSE_KEY",
    "APP_NAME",
    "STATS_PERIOD_SECS",
];

struct TempDirGuard {
    path: PathBuf,
}

impl TempDirGuard {
    fn new(prefix: &str) -> Self {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        let path = std::env::temp_dir().join(format!(
            "jetsam-cli-{prefix}-{}-{unique}",
            std::process::id()
        ));
        fs::create_dir_all(&path).expect("temp dir should be created");
        Self { path }
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempDirGuard {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../fixtures")
        .join(name)
}

fn run_jetsam<I, S>(args: I) -> Output
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let bin = env!("CARGO_BIN_EXE_jetsam");
    let mut command = Command::new(bin);
    for name in CONFIG_ENV {
        command.env_remove(name);
    }
    command
        .env("RUST_LOG", "warn")
        .args(args)
        .output()
        .expect("jetsam command should execute")
}

fn run_with_fixtures(subcommand: &str, extra: &[&str]) -> Output {
    let mut args: Vec<String> = vec![
        subcommand.to_string(),
        "--endpoint".to_string(),
        fixture("chain.json").display().to_string(),
        "--ledger".to_string(),
        fixture("ledger.jsonl").display().to_string(),
    ];
    args.extend(extra.iter().map(|s| s.to_string()));
    run_jetsam(args)
}

fn assert_success(output: &Output) {
    if !output.status.success() {
        panic!(
            "command failed with status {:?}\nstdout:\n{}\nstderr:\n{}",
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        );
    }
}

fn assert_failure(output: &Output) {
    if output.status.success() {
        panic!(
            "command unexpectedly succeeded\nstdout:\n{}\nstderr:\n{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        );
    }
}

fn stderr_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn parse_json_stdout(output: &Output) -> Value {
    serde_json::from_slice::<Value>(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "expected valid JSON stdout, got error: {e}\nstdout:\n{}",
            String::from_utf8_lossy(&output.stdout)
        )
    })
}

#[test]
fn snapshot_prints_full_document() {
    let output = run_with_fixtures("snapshot", &[]);
    assert_success(&output);
    let value = parse_json_stdout(&output);

    assert_eq!(value["modelType"], "petriNet");
    assert_eq!(value["version"], "v0");
    assert_eq!(value["address"], "0x7f1ed3d3aac8903f869eeb32182265dc34106353");
    assert_eq!(
        value["state"],
        json!({"idle_a": 0, "mutex": 0, "idle_b": 1, "busy_a": 1, "busy_b": 0})
    );
    assert_eq!(
        value["block_stats"],
        json!({"highest_index": 100, "latest": 104, "behind": 4})
    );
}

#[test]
fn snapshot_output_is_stable_across_runs() {
    let first = run_with_fixtures("snapshot", &[]);
    let second = run_with_fixtures("snapshot", &[]);
    assert_success(&first);
    assert_success(&second);
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn state_prints_vector_by_offset() {
    let output = run_with_fixtures("state", &[]);
    assert_success(&output);
    assert_eq!(parse_json_stdout(&output), json!([0, 0, 1, 1, 0]));
}

#[test]
fn model_does_not_need_the_ledger() {
    let output = run_jetsam([
        "model",
        "--endpoint",
        &fixture("chain.json").display().to_string(),
        "--ledger",
        "/nonexistent/ledger.jsonl",
    ]);
    assert_success(&output);
    let value = parse_json_stdout(&output);
    assert_eq!(value["places"]["mutex"], json!({"initial": 1, "capacity": 1, "x": 240, "y": 102}));
    assert_eq!(value["arcs"].as_array().map(Vec::len), Some(12));
    assert!(value.get("state").is_none());
}

#[test]
fn svg_writes_to_file() {
    let tmp = TempDirGuard::new("svg");
    let out = tmp.path().join("net.svg");
    let output = run_with_fixtures("svg", &["--out", &out.display().to_string()]);
    assert_success(&output);

    let svg = fs::read_to_string(&out).expect("svg file should exist");
    assert!(svg.starts_with("<svg"), "{svg}");
    assert!(svg.contains(">enter_a<"), "{svg}");
}

#[test]
fn snapshot_rejects_bad_address() {
    let output = run_with_fixtures("snapshot", &["--address", "0x1234"]);
    assert_failure(&output);
    assert!(
        stderr_text(&output).contains("invalid contract address"),
        "{}",
        stderr_text(&output)
    );
}

#[test]
fn rpc_url_endpoint_is_rejected() {
    let output = run_jetsam([
        "snapshot",
        "--endpoint",
        "http://127.0.0.1:8545",
        "--ledger",
        &fixture("ledger.jsonl").display().to_string(),
    ]);
    assert_failure(&output);
    assert!(output.stdout.is_empty());
    assert!(
        stderr_text(&output).contains("looks like a URL"),
        "{}",
        stderr_text(&output)
    );
}

#[test]
fn snapshot_fails_without_indexed_blocks() {
    let tmp = TempDirGuard::new("empty-ledger");
    let ledger = tmp.path().join("ledger.jsonl");
    fs::write(&ledger, "{\"kind\":\"head\",\"latest\":3}\n").expect("ledger should be written");

    let output = run_jetsam([
        "snapshot",
        "--endpoint",
        &fixture("chain.json").display().to_string(),
        "--ledger",
        &ledger.display().to_string(),
    ]);
    assert_failure(&output);
    assert!(output.stdout.is_empty());
    assert!(stderr_text(&output).contains("no indexed blocks"));
}

#[test]
fn model_reports_unresolved_arc_label() {
    let tmp = TempDirGuard::new("unresolved");
    let chain = tmp.path().join("chain.json");
    let doc = json!({
        "declaration": {
            "places": [{"label": "p0", "x": 0, "y": 0, "initial": 1, "capacity": 1}],
            "transitions": [{"label": "t0", "x": 1, "y": 0, "role": 0}],
            "arcs": [{"source": "p0", "target": "t9", "weight": 1}]
        },
        "model": {"places": [], "transitions": [], "arcs": []}
    });
    fs::write(&chain, serde_json::to_vec(&doc).expect("json")).expect("chain should be written");

    let output = run_jetsam(["model", "--endpoint", &chain.display().to_string()]);
    assert_failure(&output);
    assert!(
        stderr_text(&output).contains("unresolved target label `t9`"),
        "{}",
        stderr_text(&output)
    );
}

#[test]
fn serve_requires_database_credentials() {
    let output = run_with_fixtures("serve", &["--bind", "127.0.0.1:0"]);
    assert_failure(&output);
    assert!(
        stderr_text(&output).contains("missing required setting: DB_USERNAME"),
        "{}",
        stderr_text(&output)
    );
}
