// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Parse week identifiers ("YYYY-Www" / "YYYY-WW") and resolve them to the Monday that starts the week
// role: core/calendar
// inputs: Week identifier strings from the analytics backend; (year, week) pairs
// outputs: WeekKey values, NaiveDate week starts, "YYYY-MM-DD" axis labels
// invariants:
// - week_start reproduces the dashboard's approximate Monday calculation, not strict ISO-8601
// - week numbers are never range-checked; only unrepresentable dates are errors
// - parsing rejects anything that is not <integer>-[W]<integer>
// errors: WeekKeyError::Malformed for bad identifiers; WeekKeyError::OutOfRange for dates chrono cannot hold
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate};
use clap::ValueEnum;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WeekKeyError {
  #[error("week identifier {0:?} is not of the form YYYY-Www")]
  Malformed(String),
  #[error("week {week} of {year} falls outside the representable calendar")]
  OutOfRange { year: i32, week: i64 },
}

/// A parsed week identifier.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WeekKey {
  pub year: i32,
  pub week: u32,
}

impl WeekKey {
  pub fn new(year: i32, week: u32) -> Self {
    Self { year, week }
  }

  pub fn monday(&self) -> Result<NaiveDate, WeekKeyError> {
    week_start(self.year, i64::from(self.week))
  }

  /// Axis label for this week, formatted as `YYYY-MM-DD`.
  pub fn label(&self) -> Result<String, WeekKeyError> {
    Ok(self.monday()?.format("%Y-%m-%d").to_string())
  }
}

impl fmt::Display for WeekKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:04}-W{:02}", self.year, self.week)
  }
}

impl FromStr for WeekKey {
  type Err = WeekKeyError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    static RE_WEEK: Lazy<regex::Regex> =
      Lazy::new(|| regex::Regex::new(r"^\s*(-?\d+)-[Ww]?(\d+)\s*$").unwrap());

    let malformed = || WeekKeyError::Malformed(s.to_string());
    let caps = RE_WEEK.captures(s).ok_or_else(malformed)?;
    let year: i32 = caps[1].parse().map_err(|_| malformed())?;
    let week: u32 = caps[2].parse().map_err(|_| malformed())?;

    Ok(WeekKey::new(year, week))
  }
}

/// Monday starting `week` of `year`, using the dashboard's approximation.
///
/// Starts from January 1st plus `(week - 1) * 7` days, then snaps to a Monday:
/// backwards when that day is Sunday..Thursday (Sunday snaps *forward* one day,
/// since the offset is computed from a Sunday-based weekday index), forwards to
/// the next Monday otherwise. Week 1 of a year whose January 1st falls on a
/// Friday..Sunday therefore starts in January, while week 1 of a year starting
/// on Tuesday..Thursday starts in the previous December.
pub fn week_start(year: i32, week: i64) -> Result<NaiveDate, WeekKeyError> {
  let out_of_range = || WeekKeyError::OutOfRange { year, week };

  let jan1 = NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(out_of_range)?;
  let offset = week
    .checked_sub(1)
    .and_then(|w| w.checked_mul(7))
    .and_then(Duration::try_days)
    .ok_or_else(out_of_range)?;
  let simple = jan1.checked_add_signed(offset).ok_or_else(out_of_range)?;

  let dow = i64::from(simple.weekday().num_days_from_sunday());
  let shift = if dow <= 4 { 1 - dow } else { 8 - dow };

  simple
    .checked_add_signed(Duration::days(shift))
    .ok_or_else(out_of_range)
}

/// How the week axis is ordered.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
#[value(rename_all = "lowercase")]
pub enum WeekOrder {
  /// Plain string order of the identifiers, as the dashboard sorted them.
  #[default]
  Lexical,
  /// Numeric (year, week) order.
  Chronological,
}

impl WeekOrder {
  pub fn compare(&self, a: (&str, &WeekKey), b: (&str, &WeekKey)) -> Ordering {
    match self {
      WeekOrder::Lexical => a.0.cmp(b.0),
      WeekOrder::Chronological => a.1.cmp(b.1).then_with(|| a.0.cmp(b.0)),
    }
  }
}
