use predicates::prelude::*;
use test_support;

fn base() -> assert_cmd::Command {
  let mut cmd = test_support::cmd_bin(test_support::BIN);
  cmd.env_remove("RUST_LOG").args(["--repo-parent", "octo", "--repo-name", "widgets"]);
  cmd
}

#[test]
fn missing_source_is_a_config_error() {
  base()
    .assert()
    .failure()
    .stderr(predicate::str::contains("Provide one of --base-url or --fixtures"));
}

#[test]
fn both_sources_are_rejected() {
  base()
    .args(["--base-url", "http://127.0.0.1:9", "--fixtures", "tests/fixtures/widgets"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("Ambiguous data source"));
}

#[test]
fn missing_repo_flags_fail_in_clap() {
  test_support::cmd_bin(test_support::BIN)
    .args(["--fixtures", "tests/fixtures/widgets"])
    .assert()
    .code(2)
    .stderr(predicate::str::contains("--repo-parent"));
}

#[test]
fn unknown_start_at_phrase_fails() {
  let dir = test_support::fixture_set("widgets");
  test_support::dashboard_cmd(&dir)
    .args(["--start-at", "whenever works"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("unrecognized --start-at"));
}

#[test]
fn missing_endpoint_leaves_panel_out() {
  let td = test_support::copy_fixture_set("widgets");
  std::fs::remove_file(td.path().join("file-churn.json")).unwrap();

  let out = test_support::dashboard_cmd(td.path()).output().unwrap();
  assert!(out.status.success());

  let stderr = String::from_utf8_lossy(&out.stderr);
  assert!(stderr.contains("fetch failed; leaving panel out"), "stderr: {}", stderr);
  assert!(stderr.contains("file-churn.json"), "stderr: {}", stderr);

  let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
  assert!(v["panels"].get("file_churn").is_none());
  assert!(v["panels"].get("author_commits").is_some());
}

#[test]
fn failed_frequency_fetch_drops_tag_week_panel() {
  let td = test_support::copy_fixture_set("widgets");
  std::fs::write(td.path().join("tags-frequency.json"), "{not json").unwrap();

  let out = test_support::dashboard_cmd(td.path()).output().unwrap();
  assert!(out.status.success());

  let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
  assert!(v["panels"].get("tags_frequency").is_none());
  assert!(v["panels"].get("commits_by_tag_week").is_none());
  assert_eq!(v["tag_colors"], serde_json::json!({}));
}

#[test]
fn malformed_week_id_leaves_tag_week_panel_out() {
  let td = test_support::copy_fixture_set("widgets");
  std::fs::write(td.path().join("commits-by-tag-week.json"), r#"[{"week": "March", "tags": {"feature": 1}}]"#).unwrap();

  let out = test_support::dashboard_cmd(td.path()).output().unwrap();
  assert!(out.status.success());
  assert!(String::from_utf8_lossy(&out.stderr).contains("bad week id"));

  let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
  assert!(v["panels"].get("commits_by_tag_week").is_none());
  assert!(v["panels"].get("tags_frequency").is_some());
}

#[test]
fn unreachable_backend_still_emits_a_document() {
  let out = base()
    .args(["--base-url", "http://127.0.0.1:9", "--timeout-secs", "2"])
    .output()
    .unwrap();

  assert!(out.status.success());
  let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
  assert_eq!(v["panels"], serde_json::json!({}));
}
