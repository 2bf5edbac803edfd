// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Fetch analytics JSON from the dashboard backend (HTTP) or from a directory of recorded responses
// role: client/backend-api
// inputs: Base URL or fixtures dir; RepoQuery (repo_parent, repo_name, optional startAt)
// outputs: serde_json::Value per endpoint, and typed records via the endpoint helpers
// side_effects: Network calls to the backend; file reads for fixtures
// invariants:
// - every GET carries repo_parent and repo_name; startAt only when set
// - fixture lookups map "/tags-frequency" to "<dir>/tags-frequency.json"
// errors: anyhow with endpoint/path context; callers decide whether a failure is fatal
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::model::{
  AuthorCommits, ChurnNode, CommitsOverTime, FileCommits, PullRequestRow, TagFrequency, TagWeekRecord,
  WeeklyPullRequests,
};

pub const AUTHOR_COMMITS: &str = "/author-commits";
pub const FILE_CHANGES: &str = "/file-changes";
pub const COMMITS_OVER_TIME: &str = "/commits-over-time";
pub const TAGS_FREQUENCY: &str = "/tags-frequency";
pub const COMMITS_BY_TAG_WEEK: &str = "/commits-by-tag-week";
pub const PULL_REQUESTS_RECENT: &str = "/pull-requests-recent";
pub const PULL_REQUESTS_OVER_TIME: &str = "/pull-requests-over-time";
pub const FILE_CHURN: &str = "/file-churn";
pub const EXPLAIN: &str = "/explain";

/// Which repository the dashboard is showing, and from when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoQuery {
  pub repo_parent: String,
  pub repo_name: String,
  /// `MM/DD/YYYY`, the format the backend parses.
  pub start_at: Option<String>,
}

impl RepoQuery {
  pub fn params(&self) -> Vec<(&'static str, String)> {
    let mut out = vec![
      ("repo_parent", self.repo_parent.clone()),
      ("repo_name", self.repo_name.clone()),
    ];

    if let Some(s) = &self.start_at {
      out.push(("startAt", s.clone()));
    }

    out
  }
}

// --- Trait seam for the backend ---
pub trait DashboardApi: Sync {
  fn get_json(&self, path: &str, params: &[(&str, String)]) -> Result<serde_json::Value>;
  fn post_json(&self, path: &str, body: &serde_json::Value) -> Result<serde_json::Value>;
}

pub struct HttpDashboardApi {
  agent: ureq::Agent,
  base_url: String,
}

impl HttpDashboardApi {
  pub fn new(base_url: &str, timeout: Duration) -> Self {
    let agent: ureq::Agent = ureq::Agent::config_builder()
      .timeout_global(Some(timeout))
      .build()
      .into();

    Self { agent, base_url: base_url.trim_end_matches('/').to_string() }
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.base_url, path)
  }
}

impl DashboardApi for HttpDashboardApi {
  fn get_json(&self, path: &str, params: &[(&str, String)]) -> Result<serde_json::Value> {
    let url = self.url(path);
    let mut req = self.agent.get(&url).header("Accept", "application/json");

    for (k, v) in params {
      req = req.query(*k, v);
    }

    tracing::debug!(%url, "GET");
    let mut resp = req.call().with_context(|| format!("GET {}", url))?;

    resp
      .body_mut()
      .read_json::<serde_json::Value>()
      .with_context(|| format!("decoding JSON from {}", url))
  }

  fn post_json(&self, path: &str, body: &serde_json::Value) -> Result<serde_json::Value> {
    let url = self.url(path);

    tracing::debug!(%url, "POST");
    let mut resp = self
      .agent
      .post(&url)
      .header("Accept", "application/json")
      .send_json(body)
      .with_context(|| format!("POST {}", url))?;

    resp
      .body_mut()
      .read_json::<serde_json::Value>()
      .with_context(|| format!("decoding JSON from {}", url))
  }
}

/// Serves recorded responses from a directory: `GET /x` reads `x.json`,
/// `POST /explain` with `request_type: t` reads `explain-t.json`.
pub struct FixtureDashboardApi {
  dir: PathBuf,
}

impl FixtureDashboardApi {
  pub fn new(dir: impl Into<PathBuf>) -> Self {
    Self { dir: dir.into() }
  }

  fn read(&self, stem: &str) -> Result<serde_json::Value> {
    let path = self.dir.join(format!("{}.json", stem));
    let data = std::fs::read(&path).with_context(|| format!("reading fixture {}", path.display()))?;

    serde_json::from_slice(&data).with_context(|| format!("parsing fixture {}", path.display()))
  }
}

impl DashboardApi for FixtureDashboardApi {
  fn get_json(&self, path: &str, _params: &[(&str, String)]) -> Result<serde_json::Value> {
    self.read(path.trim_start_matches('/'))
  }

  fn post_json(&self, path: &str, body: &serde_json::Value) -> Result<serde_json::Value> {
    let stem = path.trim_start_matches('/');

    match body.get("request_type").and_then(|v| v.as_str()) {
      Some(kind) => self.read(&format!("{}-{}", stem, kind)),
      None => self.read(stem),
    }
  }
}

fn get_typed<T: DeserializeOwned>(api: &dyn DashboardApi, path: &str, params: &[(&str, String)]) -> Result<T> {
  let v = api.get_json(path, params)?;
  serde_json::from_value(v).with_context(|| format!("unexpected response shape from {}", path))
}

pub fn author_commits(api: &dyn DashboardApi, q: &RepoQuery) -> Result<Vec<AuthorCommits>> {
  get_typed(api, AUTHOR_COMMITS, &q.params())
}

pub fn file_changes(api: &dyn DashboardApi, q: &RepoQuery) -> Result<Vec<FileCommits>> {
  get_typed(api, FILE_CHANGES, &q.params())
}

pub fn commits_over_time(api: &dyn DashboardApi, q: &RepoQuery) -> Result<CommitsOverTime> {
  get_typed(api, COMMITS_OVER_TIME, &q.params())
}

pub fn tags_frequency(api: &dyn DashboardApi, q: &RepoQuery, include_all: bool) -> Result<Vec<TagFrequency>> {
  let mut params = q.params();
  params.push(("include_all", include_all.to_string()));

  get_typed(api, TAGS_FREQUENCY, &params)
}

pub fn commits_by_tag_week(api: &dyn DashboardApi, q: &RepoQuery) -> Result<Vec<TagWeekRecord>> {
  get_typed(api, COMMITS_BY_TAG_WEEK, &q.params())
}

pub fn pull_requests_recent(api: &dyn DashboardApi, q: &RepoQuery) -> Result<Vec<PullRequestRow>> {
  get_typed(api, PULL_REQUESTS_RECENT, &q.params())
}

pub fn pull_requests_over_time(api: &dyn DashboardApi, q: &RepoQuery) -> Result<Vec<WeeklyPullRequests>> {
  get_typed(api, PULL_REQUESTS_OVER_TIME, &q.params())
}

pub fn file_churn(api: &dyn DashboardApi, q: &RepoQuery) -> Result<ChurnNode> {
  get_typed(api, FILE_CHURN, &q.params())
}

/// Ask the backend for a prose summary (`author-commits-summary`, ...).
pub fn insights_summary(api: &dyn DashboardApi, q: &RepoQuery, request_type: &str) -> Result<String> {
  let body = serde_json::json!({
    "repo_parent": q.repo_parent,
    "repo_name": q.repo_name,
    "request_type": request_type,
  });
  let v = api.post_json(EXPLAIN, &body)?;

  v.get("summary")
    .and_then(|s| s.as_str())
    .map(str::to_string)
    .with_context(|| format!("{} response for {} has no summary", EXPLAIN, request_type))
}
