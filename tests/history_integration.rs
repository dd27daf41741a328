mod common;

use std::time::Duration;

use tempfile::TempDir;
use wktriage::history::{HistoryConfig, fetch_all};
use wktriage::record::{FailureRecord, HistoryStatus};

fn history_config(command: &std::path::Path, working_dir: &std::path::Path) -> HistoryConfig {
    HistoryConfig {
        command: command.display().to_string(),
        working_dir: working_dir.to_path_buf(),
        workers: 4,
        max_attempts: 3,
        backoff: Duration::from_millis(1),
        timeout: Some(Duration::from_secs(10)),
    }
}

fn located_record(name: &str, tree: &std::path::Path, file: &str) -> FailureRecord {
    let path = tree.join(file);
    std::fs::write(&path, "<html/>").unwrap();
    let mut rec = FailureRecord::new(name);
    rec.local_path = Some(path);
    rec
}

#[tokio::test]
async fn test_revisions_parsed_newest_first() {
    let tree = TempDir::new().unwrap();
    let stub = common::write_history_stub(tree.path());
    let mut records = vec![located_record("WebkitCrashFooTest", tree.path(), "crash-foo.html")];

    fetch_all(&mut records, &history_config(&stub, tree.path())).await.unwrap();

    assert_eq!(records[0].history, HistoryStatus::Fetched);
    assert_eq!(records[0].revisions, vec!["r10", "r5"]);
}

#[tokio::test]
async fn test_fan_in_keyed_by_record_identity() {
    // Two records with different histories: whichever worker finishes first,
    // each record must end up with its own file's revisions.
    let tree = TempDir::new().unwrap();
    let stub = common::write_history_stub(tree.path());
    let mut records = vec![
        located_record("WebkitCrashFooTest", tree.path(), "crash-foo.html"),
        located_record("WebkitOtherTest", tree.path(), "other.html"),
    ];

    fetch_all(&mut records, &history_config(&stub, tree.path())).await.unwrap();

    assert_eq!(records[0].revisions, vec!["r10", "r5"]);
    assert_eq!(records[1].revisions, vec!["r7"]);
}

#[tokio::test]
async fn test_idempotent_against_unchanged_tree() {
    let tree = TempDir::new().unwrap();
    let stub = common::write_history_stub(tree.path());
    let config = history_config(&stub, tree.path());

    let mut first = vec![located_record("WebkitCrashFooTest", tree.path(), "crash-foo.html")];
    fetch_all(&mut first, &config).await.unwrap();

    let mut second = vec![first[0].clone()];
    second[0].revisions.clear();
    second[0].history = HistoryStatus::Pending;
    fetch_all(&mut second, &config).await.unwrap();

    assert_eq!(first[0].revisions, second[0].revisions);
}

#[tokio::test]
async fn test_transient_failure_retried_then_succeeds() {
    let tree = TempDir::new().unwrap();
    // Fails on the first invocation, succeeds afterwards.
    let stub = common::write_script(
        tree.path(),
        "flaky-svn",
        r#"marker="$(dirname "$0")/attempted"
if [ ! -f "$marker" ]; then
  touch "$marker"
  exit 1
fi
echo 'r42 | dave | 2014-02-02'
"#,
    );
    let mut records = vec![located_record("WebkitFlakyTest", tree.path(), "flaky.html")];

    fetch_all(&mut records, &history_config(&stub, tree.path())).await.unwrap();

    assert_eq!(records[0].history, HistoryStatus::Fetched);
    assert_eq!(records[0].revisions, vec!["r42"]);
}

#[tokio::test]
async fn test_persistent_failure_is_terminal_not_a_stall() {
    // The stub knows nothing about doomed.html and exits 1 for it every
    // time; the record must end up Failed without poisoning the batch.
    let tree = TempDir::new().unwrap();
    let stub = common::write_history_stub(tree.path());
    let mut config = history_config(&stub, tree.path());
    config.max_attempts = 2;
    let mut records = vec![
        located_record("WebkitDoomedTest", tree.path(), "doomed.html"),
        located_record("WebkitFineTest", tree.path(), "crash-foo.html"),
    ];

    fetch_all(&mut records, &config).await.unwrap();

    assert_eq!(records[0].history, HistoryStatus::Failed);
    assert!(records[0].revisions.is_empty());
    assert_eq!(records[1].history, HistoryStatus::Fetched);
    assert_eq!(records[1].revisions, vec!["r10", "r5"]);
}
