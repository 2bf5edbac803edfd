// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Run one dashboard render: fetch every panel, assign tag colors, assemble the output document
// role: processing/orchestrator
// inputs: DashboardApi, RepoQuery, DashboardOptions, a session-owned ColorAssigner
// outputs: DashboardReport (serializable; absent panels omitted)
// side_effects: Backend requests (concurrent on a rayon scope); warn logs for failed panels
// invariants:
// - tags-frequency is fetched before commits-by-tag-week and colors are assigned frequency first
// - a failed frequency fetch skips the tag-week panel
// - a failed panel never fails the render
// errors: Panel errors are logged and dropped; render itself is infallible
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use anyhow::Result;
use indexmap::IndexMap;
use rand::Rng;
use rand::rngs::StdRng;
use serde::Serialize;

use crate::chart::{self, ChartSpec, SunburstSpec, TableSpec};
use crate::churn::aggregate_by_directory;
use crate::client::{self, DashboardApi, RepoQuery};
use crate::color::{ColorAssigner, TagColor};
use crate::model::collapse_tail;
use crate::series::build_tag_series;
use crate::week::WeekOrder;

/// Rows kept before the frequency tail folds into "Other".
pub const TAIL_KEEP: usize = 11;

pub const INSIGHT_REQUESTS: [&str; 2] = ["author-commits-summary", "commit-count-by-date-summary"];

#[derive(Debug, Clone, Default)]
pub struct DashboardOptions {
  pub include_all: bool,
  pub week_order: WeekOrder,
  pub insights: bool,
  pub dir_depth: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RepoRef {
  pub parent: String,
  pub name: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Panels {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub author_commits: Option<ChartSpec>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub file_changes: Option<ChartSpec>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub directory_commits: Option<ChartSpec>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub commits_over_time: Option<ChartSpec>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub tags_frequency: Option<ChartSpec>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub tag_count_table: Option<TableSpec>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub commits_by_tag_week: Option<ChartSpec>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub pull_requests: Option<TableSpec>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub pull_requests_over_time: Option<ChartSpec>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub file_churn: Option<SunburstSpec>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
  pub repo: RepoRef,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub start_at: Option<String>,
  pub panels: Panels,
  pub tag_colors: IndexMap<String, TagColor>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub insights: Option<IndexMap<String, String>>,
}

/// One render of the dashboard. The color table lives as long as the session,
/// so rendering twice keeps every tag's color.
pub struct RenderSession<R = StdRng> {
  colors: ColorAssigner<R>,
  opts: DashboardOptions,
}

impl<R: Rng> RenderSession<R> {
  pub fn new(colors: ColorAssigner<R>, opts: DashboardOptions) -> Self {
    Self { colors, opts }
  }

  pub fn render(&mut self, api: &dyn DashboardApi, q: &RepoQuery) -> DashboardReport {
    let include_all = self.opts.include_all;
    let want_insights = self.opts.insights;

    let mut author = None;
    let mut files = None;
    let mut over_time = None;
    let mut frequency = None;
    let mut tag_weeks = None;
    let mut prs = None;
    let mut pr_weeks = None;
    let mut churn = None;
    let mut insight_slots: Vec<Option<Result<String>>> = INSIGHT_REQUESTS.iter().map(|_| None).collect();
    let insight_jobs: Vec<(&str, &mut Option<Result<String>>)> =
      INSIGHT_REQUESTS.iter().copied().zip(insight_slots.iter_mut()).collect();

    rayon::scope(|s| {
      s.spawn(|_| author = Some(client::author_commits(api, q)));
      s.spawn(|_| files = Some(client::file_changes(api, q)));
      s.spawn(|_| over_time = Some(client::commits_over_time(api, q)));
      s.spawn(|_| prs = Some(client::pull_requests_recent(api, q)));
      s.spawn(|_| pr_weeks = Some(client::pull_requests_over_time(api, q)));
      s.spawn(|_| churn = Some(client::file_churn(api, q)));

      // The tag-week colors depend on the frequency assignment.
      s.spawn(|_| {
        let freq = client::tags_frequency(api, q, include_all);
        if freq.is_ok() {
          tag_weeks = Some(client::commits_by_tag_week(api, q));
        }
        frequency = Some(freq);
      });

      if want_insights {
        for (kind, slot) in insight_jobs {
          s.spawn(move |_| *slot = Some(client::insights_summary(api, q, kind)));
        }
      }
    });

    let mut panels = Panels::default();

    if let Some(rows) = settle("author_commits", author) {
      panels.author_commits = Some(chart::author_commits_chart(&rows));
    }

    if let Some(rows) = settle("file_changes", files) {
      let dirs = aggregate_by_directory(&rows, self.opts.dir_depth);
      panels.directory_commits = Some(chart::directory_commits_chart(&dirs));
      panels.file_changes = Some(chart::file_changes_chart(&rows));
    }

    if let Some(series) = settle("commits_over_time", over_time) {
      panels.commits_over_time = Some(chart::commits_over_time_chart(&series));
    }

    if let Some(rows) = settle("tags_frequency", frequency) {
      let rows = if include_all { rows } else { collapse_tail(rows, TAIL_KEEP) };
      panels.tags_frequency = Some(chart::tags_frequency_chart(&rows, &mut self.colors));
      panels.tag_count_table = Some(chart::tag_count_table(&rows));

      if let Some(records) = settle("commits_by_tag_week", tag_weeks) {
        match build_tag_series(&records, self.opts.week_order) {
          Ok(series) => {
            if series.is_empty() {
              tracing::info!(panel = "commits_by_tag_week", "no tagged commits in range");
            }
            panels.commits_by_tag_week = Some(chart::tag_week_chart(&series, &mut self.colors));
          }
          Err(e) => tracing::warn!(panel = "commits_by_tag_week", error = %e, "bad week id; leaving panel out"),
        }
      }
    } else {
      tracing::warn!(panel = "commits_by_tag_week", "skipped: tag colors need the frequency panel");
    }

    if let Some(rows) = settle("pull_requests", prs) {
      panels.pull_requests = Some(chart::pull_requests_table(&rows));
    }

    if let Some(rows) = settle("pull_requests_over_time", pr_weeks) {
      match chart::pull_requests_over_time_chart(&rows) {
        Ok(c) => panels.pull_requests_over_time = Some(c),
        Err(e) => tracing::warn!(panel = "pull_requests_over_time", error = %e, "bad week id; leaving panel out"),
      }
    }

    if let Some(root) = settle("file_churn", churn) {
      tracing::debug!(total = root.total(), "file churn");
      panels.file_churn = Some(chart::churn_sunburst(root));
    }

    let insights = want_insights.then(|| {
      INSIGHT_REQUESTS
        .iter()
        .zip(insight_slots)
        .filter_map(|(kind, slot)| settle(kind, slot).map(|text| (kind.to_string(), text)))
        .collect::<IndexMap<_, _>>()
    });

    tracing::info!(tags = self.colors.table().len(), "dashboard rendered");

    DashboardReport {
      repo: RepoRef { parent: q.repo_parent.clone(), name: q.repo_name.clone() },
      start_at: q.start_at.clone(),
      panels,
      tag_colors: self.colors.table().clone(),
      insights,
    }
  }
}

fn settle<T>(panel: &str, slot: Option<Result<T>>) -> Option<T> {
  match slot? {
    Ok(v) => Some(v),
    Err(e) => {
      tracing::warn!(panel, error = %format!("{:#}", e), "fetch failed; leaving panel out");
      None
    }
  }
}
