// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Build renderer-neutral chart, table and sunburst specs for each dashboard panel
// role: rendering/specs
// inputs: Backend records, TagSeries, the session ColorAssigner
// outputs: Serializable ChartSpec / TableSpec / SunburstSpec values
// invariants:
// - every dataset has exactly one data point per label
// - tag colors come from the session assigner only (frequency chart assigns, tag-week chart looks up)
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use indexmap::IndexMap;
use rand::Rng;
use serde::Serialize;

use crate::color::{palette_rgb, ColorAssigner};
use crate::model::{
  AuthorCommits, ChurnNode, CommitsOverTime, FileCommits, PullRequestRow, TagFrequency, WeeklyPullRequests,
};
use crate::series::TagSeries;
use crate::week::{WeekKey, WeekKeyError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
  Bar,
  Line,
  Doughnut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
  Day,
  Week,
}

/// One color for the whole dataset, or one per point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Paint {
  Single(String),
  PerPoint(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Point {
  Value(u64),
  Dated { x: String, y: u64 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
  pub label: String,
  pub data: Vec<Point>,
  pub background_color: Paint,
  pub border_color: Paint,
  pub border_width: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
  pub kind: ChartKind,
  pub title: String,
  pub labels: Vec<String>,
  pub datasets: Vec<Dataset>,
  #[serde(skip_serializing_if = "std::ops::Not::not")]
  pub stacked: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub time_unit: Option<TimeUnit>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSpec {
  pub columns: Vec<String>,
  pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SunburstSpec {
  pub root: ChurnNode,
  pub exclude_root: bool,
  pub height: u32,
}

// Single-series charts use fixed palette slots at half opacity.
fn single_series(kind: ChartKind, title: &str, slot: usize, labels: Vec<String>, data: Vec<Point>) -> ChartSpec {
  let rgb = palette_rgb(slot);

  ChartSpec {
    kind,
    title: title.to_string(),
    labels,
    datasets: vec![Dataset {
      label: title.to_string(),
      data,
      background_color: Paint::Single(rgb.rgba(0.5)),
      border_color: Paint::Single(rgb.rgba(1.0)),
      border_width: 1,
    }],
    stacked: false,
    time_unit: None,
  }
}

pub fn author_commits_chart(rows: &[AuthorCommits]) -> ChartSpec {
  single_series(
    ChartKind::Bar,
    "Number of Commits",
    0,
    rows.iter().map(|r| r.author.clone()).collect(),
    rows.iter().map(|r| Point::Value(r.commits)).collect(),
  )
}

pub fn file_changes_chart(rows: &[FileCommits]) -> ChartSpec {
  single_series(
    ChartKind::Bar,
    "Number of Commits",
    1,
    rows.iter().map(|r| r.filename.clone()).collect(),
    rows.iter().map(|r| Point::Value(r.commits)).collect(),
  )
}

pub fn directory_commits_chart(dirs: &IndexMap<String, u64>) -> ChartSpec {
  single_series(
    ChartKind::Bar,
    "Commits by Directory",
    3,
    dirs.keys().cloned().collect(),
    dirs.values().map(|n| Point::Value(*n)).collect(),
  )
}

pub fn commits_over_time_chart(series: &CommitsOverTime) -> ChartSpec {
  let timescale = series.timescale();
  let unit = if timescale.eq_ignore_ascii_case("week") { TimeUnit::Week } else { TimeUnit::Day };
  let data = series.data();

  let mut chart = single_series(
    ChartKind::Line,
    &format!("Commits by {}", timescale),
    2,
    data.iter().map(|r| r.date.clone()).collect(),
    data
      .iter()
      .map(|r| Point::Dated { x: r.date.clone(), y: r.commits })
      .collect(),
  );
  chart.time_unit = Some(unit);

  chart
}

/// Doughnut of tag frequencies. This is the bulk color pass: tags take palette
/// slots in the server's descending-frequency order.
pub fn tags_frequency_chart<R: Rng>(rows: &[TagFrequency], colors: &mut ColorAssigner<R>) -> ChartSpec {
  let assigned = colors.assign_in_order(rows.iter().map(|r| r.name.as_str()));

  let background = rows.iter().map(|r| assigned[r.name.as_str()].background.clone()).collect();
  let border = rows.iter().map(|r| assigned[r.name.as_str()].border.clone()).collect();

  ChartSpec {
    kind: ChartKind::Doughnut,
    title: "Number of Commits".to_string(),
    labels: rows.iter().map(|r| r.name.clone()).collect(),
    datasets: vec![Dataset {
      label: "Number of Commits".to_string(),
      data: rows.iter().map(|r| Point::Value(r.total_value)).collect(),
      background_color: Paint::PerPoint(background),
      border_color: Paint::PerPoint(border),
      border_width: 1,
    }],
    stacked: false,
    time_unit: None,
  }
}

/// Stacked bar chart, one dataset per tag; colors are looked up (or generated)
/// in the session table, so tags seen by the frequency chart keep their slot.
pub fn tag_week_chart<R: Rng>(series: &TagSeries, colors: &mut ColorAssigner<R>) -> ChartSpec {
  let datasets = series
    .tags
    .iter()
    .enumerate()
    .map(|(i, tag)| {
      let color = colors.color_for(tag);

      Dataset {
        label: tag.clone(),
        data: series.column(i).into_iter().map(Point::Value).collect(),
        background_color: Paint::Single(color.background),
        border_color: Paint::Single(color.border),
        border_width: 0,
      }
    })
    .collect();

  ChartSpec {
    kind: ChartKind::Bar,
    title: "Commits by Tag per Week".to_string(),
    labels: series.labels.clone(),
    datasets,
    stacked: true,
    time_unit: None,
  }
}

/// Weekly pull-request counts; week ids are resolved to their Monday.
pub fn pull_requests_over_time_chart(rows: &[WeeklyPullRequests]) -> Result<ChartSpec, WeekKeyError> {
  let mut labels = Vec::with_capacity(rows.len());

  for row in rows {
    labels.push(row.date.parse::<WeekKey>()?.label()?);
  }

  let data = labels
    .iter()
    .zip(rows)
    .map(|(label, row)| Point::Dated { x: label.clone(), y: row.pr_count })
    .collect();

  let mut chart = single_series(ChartKind::Line, "Pull Requests by Week", 5, labels, data);
  chart.time_unit = Some(TimeUnit::Week);

  Ok(chart)
}

pub fn tag_count_table(rows: &[TagFrequency]) -> TableSpec {
  TableSpec {
    columns: vec!["Tag".to_string(), "Commits".to_string()],
    rows: rows
      .iter()
      .map(|r| vec![r.name.clone(), r.total_value.to_string()])
      .collect(),
  }
}

pub fn pull_requests_table(rows: &[PullRequestRow]) -> TableSpec {
  TableSpec {
    columns: ["Date", "Title", "Link", "User", "Files", "Description"]
      .iter()
      .map(|c| c.to_string())
      .collect(),
    rows: rows
      .iter()
      .map(|r| {
        vec![
          r.date.clone(),
          r.pr_title.clone(),
          r.pr_url.clone(),
          r.user.clone(),
          r.file_count.to_string(),
          r.description.clone(),
        ]
      })
      .collect(),
  }
}

pub fn churn_sunburst(root: ChurnNode) -> SunburstSpec {
  SunburstSpec { root, exclude_root: true, height: 600 }
}
