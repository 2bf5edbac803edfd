use predicates::prelude::*;
use serial_test::serial;
use test_support;

fn run_json(cmd: &mut assert_cmd::Command) -> serde_json::Value {
  let out = cmd.output().unwrap();
  assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
  serde_json::from_slice(&out.stdout).expect("stdout is one JSON document")
}

fn labels(v: &serde_json::Value) -> Vec<&str> {
  v["labels"].as_array().unwrap().iter().map(|l| l.as_str().unwrap()).collect()
}

#[test]
fn full_fixture_set_renders_every_panel() {
  let dir = test_support::fixture_set("widgets");
  let v = run_json(&mut test_support::dashboard_cmd(&dir));

  assert_eq!(v["repo"], serde_json::json!({"parent": "octo", "name": "widgets"}));
  assert!(v.get("start_at").is_none());
  assert!(v.get("insights").is_none());

  let panels = v["panels"].as_object().unwrap();
  let names: Vec<&str> = panels.keys().map(String::as_str).collect();
  assert_eq!(
    names,
    vec![
      "author_commits",
      "file_changes",
      "directory_commits",
      "commits_over_time",
      "tags_frequency",
      "tag_count_table",
      "commits_by_tag_week",
      "pull_requests",
      "pull_requests_over_time",
      "file_churn",
    ]
  );

  assert_eq!(labels(&panels["directory_commits"]), vec!["web/static", "web", "pkg/old", ""]);
  assert_eq!(panels["commits_over_time"]["time_unit"], "week");
  assert_eq!(labels(&panels["pull_requests_over_time"]), vec!["2024-03-04", "2024-03-11"]);
  assert_eq!(panels["file_churn"]["exclude_root"], true);
}

#[test]
fn frequency_tail_collapses_into_other() {
  let dir = test_support::fixture_set("widgets");
  let v = run_json(&mut test_support::dashboard_cmd(&dir));

  let freq = &v["panels"]["tags_frequency"];
  let names = labels(freq);
  assert_eq!(names.len(), 12);
  assert_eq!(names[..3], ["feature", "bugfix", "refactor"]);
  assert_eq!(names[11], "Other");
  // deps(2) + revert(2) + security(1)
  assert_eq!(freq["datasets"][0]["data"][11], 5);

  let table_rows = v["panels"]["tag_count_table"]["rows"].as_array().unwrap();
  assert_eq!(table_rows.len(), 12);
}

#[test]
fn include_all_keeps_every_tag() {
  let dir = test_support::fixture_set("widgets");
  let v = run_json(test_support::dashboard_cmd(&dir).arg("--include-all"));

  assert_eq!(labels(&v["panels"]["tags_frequency"]).len(), 13);
  // 13th tag is past the palette
  let security = v["tag_colors"]["security"]["background"].as_str().unwrap();
  assert!(security.starts_with('#') && security.len() == 7, "{}", security);
}

#[test]
fn tag_colors_follow_frequency_order_across_charts() {
  let dir = test_support::fixture_set("widgets");
  let v = run_json(&mut test_support::dashboard_cmd(&dir));

  let colors = v["tag_colors"].as_object().unwrap();
  let order: Vec<&str> = colors.keys().map(String::as_str).take(3).collect();
  assert_eq!(order, vec!["feature", "bugfix", "refactor"]);
  assert_eq!(colors["feature"]["background"], "rgba(70, 86, 89, 0.8)");
  assert_eq!(colors["Other"]["background"], "rgba(204, 204, 204, 0.8)");

  // "security" is folded into Other in the doughnut, so the weekly chart generates its color
  let security = colors["security"]["background"].as_str().unwrap();
  assert!(security.starts_with('#'), "{}", security);

  let weekly = &v["panels"]["commits_by_tag_week"];
  assert_eq!(weekly["stacked"], true);
  for ds in weekly["datasets"].as_array().unwrap() {
    let tag = ds["label"].as_str().unwrap();
    assert_eq!(ds["background_color"], colors[tag]["background"], "tag {}", tag);
  }
}

#[test]
fn same_seed_same_document() {
  let dir = test_support::fixture_set("widgets");
  let a = test_support::dashboard_cmd(&dir).output().unwrap();
  let b = test_support::dashboard_cmd(&dir).output().unwrap();
  assert_eq!(a.stdout, b.stdout);
}

#[test]
fn start_at_phrase_is_resolved_against_now() {
  let dir = test_support::fixture_set("widgets");
  let v = run_json(test_support::dashboard_cmd(&dir).args(["--start-at", "last month"]));
  assert_eq!(v["start_at"], "07/01/2025");

  let v = run_json(test_support::dashboard_cmd(&dir).args(["--start-at", "2024-03-01"]));
  assert_eq!(v["start_at"], "03/01/2024");
}

#[test]
fn insights_come_from_explain_responses() {
  let dir = test_support::fixture_set("widgets");
  let v = run_json(test_support::dashboard_cmd(&dir).arg("--insights"));

  assert_eq!(v["insights"]["author-commits-summary"], "ana authored most commits; bo focused on fixes.");
  assert_eq!(v["insights"]["commit-count-by-date-summary"], "Activity peaked in the week of March 4.");
}

#[test]
fn dir_depth_groups_top_level() {
  let dir = test_support::fixture_set("widgets");
  let v = run_json(test_support::dashboard_cmd(&dir).args(["--dir-depth", "1"]));

  let chart = &v["panels"]["directory_commits"];
  assert_eq!(labels(chart), vec!["web", "pkg", ""]);
  assert_eq!(chart["datasets"][0]["data"], serde_json::json!([21, 5, 1]));
}

#[test]
fn out_writes_file_and_keeps_stdout_empty() {
  let td = test_support::tempdir();
  let target = td.path().join("reports/dashboard.json");
  let dir = test_support::fixture_set("widgets");

  test_support::dashboard_cmd(&dir)
    .arg("--out")
    .arg(&target)
    .assert()
    .success()
    .stdout(predicate::str::is_empty());

  let v: serde_json::Value = serde_json::from_slice(&std::fs::read(&target).unwrap()).unwrap();
  assert!(v["panels"].get("author_commits").is_some());
}

#[test]
fn verbose_logs_to_stderr_only() {
  let dir = test_support::fixture_set("widgets");
  let out = test_support::dashboard_cmd(&dir).arg("--verbose").output().unwrap();

  assert!(out.status.success());
  assert!(String::from_utf8_lossy(&out.stderr).contains("dashboard rendered"));
  serde_json::from_slice::<serde_json::Value>(&out.stdout).expect("stdout stays pure JSON");
}

#[test]
#[serial]
fn rust_log_overrides_default_level() {
  let _env = test_support::with_env(&[("RUST_LOG", "debug")]);
  let dir = test_support::fixture_set("widgets");

  test_support::cmd_bin(test_support::BIN)
    .args(["--repo-parent", "octo", "--repo-name", "widgets", "--seed", "1", "--fixtures"])
    .arg(&dir)
    .assert()
    .success()
    .stderr(predicate::str::contains("aggregated file commits by directory"));
}

#[test]
fn unpadded_weeks_warn_about_string_order() {
  let dir = test_support::fixture_set("unpadded");

  test_support::dashboard_cmd(&dir)
    .assert()
    .success()
    .stderr(predicate::str::contains("unpadded week numbers are out of order"));

  test_support::dashboard_cmd(&dir)
    .args(["--week-order", "chronological"])
    .assert()
    .success()
    .stderr(predicate::str::contains("unpadded week numbers").not());
}
