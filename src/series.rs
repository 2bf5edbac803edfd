// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Reconcile per-week tag counts into a dense week x tag matrix for the stacked tag chart
// role: core/series
// inputs: TagWeekRecord slice in fetched order; WeekOrder policy
// outputs: TagSeries (week ids, Monday labels, tags in first-seen order, zero-filled counts)
// invariants:
// - counts is rectangular: weeks.len() rows, tags.len() columns
// - a later record for the same week id replaces an earlier one
// - every (week, tag, count) present in the winning records appears unchanged
// errors: WeekKeyError when any week id fails to parse or resolve
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::HashMap;

use indexmap::IndexSet;
use serde::Serialize;

use crate::model::TagWeekRecord;
use crate::week::{WeekKey, WeekKeyError, WeekOrder};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagSeries {
  /// Source week identifiers, in axis order.
  pub weeks: Vec<String>,
  /// `YYYY-MM-DD` Monday per entry of `weeks`.
  pub labels: Vec<String>,
  /// Tags in first-occurrence order.
  pub tags: Vec<String>,
  /// `counts[week][tag]`.
  pub counts: Vec<Vec<u64>>,
}

impl TagSeries {
  pub fn cell(&self, week: usize, tag: usize) -> u64 {
    self.counts[week][tag]
  }

  /// Counts for one tag across the week axis.
  pub fn column(&self, tag: usize) -> Vec<u64> {
    (0..self.weeks.len()).map(|week| self.cell(week, tag)).collect()
  }

  pub fn is_empty(&self) -> bool {
    self.weeks.is_empty() || self.tags.is_empty()
  }
}

pub fn build_tag_series(records: &[TagWeekRecord], order: WeekOrder) -> Result<TagSeries, WeekKeyError> {
  let mut by_week: HashMap<&str, &TagWeekRecord> = HashMap::new();
  let mut tags: IndexSet<&str> = IndexSet::new();

  for record in records {
    by_week.insert(record.week.as_str(), record);

    for tag in record.tags.keys() {
      tags.insert(tag.as_str());
    }
  }

  let mut weeks: Vec<(&str, WeekKey)> = Vec::with_capacity(by_week.len());

  for id in by_week.keys() {
    weeks.push((*id, id.parse::<WeekKey>()?));
  }
  weeks.sort_by(|a, b| order.compare((a.0, &a.1), (b.0, &b.1)));

  if order == WeekOrder::Lexical && !is_chronological(&weeks) {
    let axis: Vec<&str> = weeks.iter().map(|(id, _)| *id).collect();
    let chronological = chronological_ids(&weeks);
    tracing::warn!(
      ?axis,
      ?chronological,
      "week ids sort differently as strings than by (year, week); unpadded week numbers are out of order"
    );
  }

  let mut labels = Vec::with_capacity(weeks.len());
  let mut counts = Vec::with_capacity(weeks.len());

  for (id, key) in &weeks {
    labels.push(key.label()?);

    let record = by_week[id];
    let row: Vec<u64> = tags
      .iter()
      .map(|tag| record.tags.get(*tag).copied().unwrap_or(0))
      .collect();

    counts.push(row);
  }

  Ok(TagSeries {
    weeks: weeks.into_iter().map(|(id, _)| id.to_string()).collect(),
    labels,
    tags: tags.into_iter().map(str::to_string).collect(),
    counts,
  })
}

// Zero-padded `YYYY-Www` ids in (year, week) order.
fn chronological_ids(weeks: &[(&str, WeekKey)]) -> Vec<String> {
  let mut keys: Vec<WeekKey> = weeks.iter().map(|(_, key)| *key).collect();
  keys.sort();
  keys.iter().map(WeekKey::to_string).collect()
}

fn is_chronological(weeks: &[(&str, WeekKey)]) -> bool {
  weeks.windows(2).all(|pair| pair[0].1 <= pair[1].1)
}
