// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Define the JSON shapes returned by the analytics backend endpoints
// role: model/types
// outputs: Deserializable records consumed by series, chart and churn builders
// invariants: Field names match the backend JSON; tag maps keep server order; counts are non-negative
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One row of `/commits-by-tag-week`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TagWeekRecord {
  pub week: String,
  #[serde(default)]
  pub tags: IndexMap<String, u64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AuthorCommits {
  pub author: String,
  pub commits: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct FileCommits {
  pub filename: String,
  pub commits: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct DateCommits {
  pub date: String,
  pub commits: u64,
}

/// `/commits-over-time` answers either with a bare list (weekly buckets) or
/// with the list wrapped alongside its bucket size.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum CommitsOverTime {
  Bucketed {
    #[serde(rename = "type")]
    timescale: String,
    data: Vec<DateCommits>,
  },
  Plain(Vec<DateCommits>),
}

impl CommitsOverTime {
  pub fn timescale(&self) -> &str {
    match self {
      CommitsOverTime::Bucketed { timescale, .. } => timescale,
      CommitsOverTime::Plain(_) => "Week",
    }
  }

  pub fn data(&self) -> &[DateCommits] {
    match self {
      CommitsOverTime::Bucketed { data, .. } => data,
      CommitsOverTime::Plain(data) => data,
    }
  }
}

/// One row of `/tags-frequency`, ordered by descending count by the server.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TagFrequency {
  pub name: String,
  #[serde(alias = "commit_count")]
  pub total_value: u64,
}

pub const OTHER_TAG: &str = "Other";

/// Keep the first `keep` rows and fold the remainder into a single
/// [`OTHER_TAG`] row, the way the backend trims the frequency list when
/// `include_all` is off.
pub fn collapse_tail(rows: Vec<TagFrequency>, keep: usize) -> Vec<TagFrequency> {
  if rows.len() <= keep {
    return rows;
  }

  let mut rows = rows;
  let rest = rows.split_off(keep);
  let total_value = rest.iter().map(|r| r.total_value).sum();

  rows.push(TagFrequency { name: OTHER_TAG.to_string(), total_value });
  rows
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PullRequestRow {
  pub pr_title: String,
  pub pr_url: String,
  pub date: String,
  pub user: String,
  pub file_count: u64,
  #[serde(default)]
  pub description: String,
}

/// One row of `/pull-requests-over-time`; `date` is a week id such as `2024-09`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct WeeklyPullRequests {
  pub date: String,
  pub pr_count: u64,
}

/// Node of the `/file-churn` hierarchy.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ChurnNode {
  pub name: String,
  #[serde(skip_serializing_if = "Option::is_none", default)]
  pub size: Option<u64>,
  #[serde(skip_serializing_if = "Option::is_none", default)]
  pub color: Option<String>,
  #[serde(skip_serializing_if = "Vec::is_empty", default)]
  pub children: Vec<ChurnNode>,
}

impl ChurnNode {
  /// Total churn of this subtree: leaf sizes summed, inner sizes ignored.
  pub fn total(&self) -> u64 {
    if self.children.is_empty() {
      self.size.unwrap_or(0)
    } else {
      self.children.iter().map(ChurnNode::total).sum()
    }
  }
}
