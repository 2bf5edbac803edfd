use anyhow::{Context, Result, bail};
use chrono::{DateTime, Datelike, Duration, Local, NaiveDate};
use chrono_english::{Interval, parse_duration};
use once_cell::sync::Lazy;
use two_timer::parse as parse_natural;

// Resolution of the dashboard's `startAt` lower bound. The backend parses it
// with `%m/%d/%Y`, so everything funnels into that format.

const BACKEND_FORMAT: &str = "%m/%d/%Y";

pub fn format_for_backend(date: NaiveDate) -> String {
  date.format(BACKEND_FORMAT).to_string()
}

/// Resolve a user phrase into the first day to include.
///
/// Accepts `MM/DD/YYYY`, `YYYY-MM-DD`, `today`, `yesterday`, `last week`
/// (Monday of the previous week), `last month` (first of the previous month),
/// durations such as `3 weeks ago` or `2 months`, and whatever `two_timer`
/// understands as a range (its start is used).
pub fn resolve_start_at(input: &str, today: NaiveDate) -> Result<NaiveDate> {
  static RE_US_DATE: Lazy<regex::Regex> = Lazy::new(|| regex::Regex::new(r"^\d{1,2}/\d{1,2}/\d{4}$").unwrap());
  static RE_ISO_DATE: Lazy<regex::Regex> = Lazy::new(|| regex::Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

  let phrase = input.trim().to_lowercase();

  if RE_US_DATE.is_match(&phrase) {
    return NaiveDate::parse_from_str(&phrase, BACKEND_FORMAT).with_context(|| format!("invalid date {:?}", input));
  }

  if RE_ISO_DATE.is_match(&phrase) {
    return NaiveDate::parse_from_str(&phrase, "%Y-%m-%d").with_context(|| format!("invalid date {:?}", input));
  }

  match phrase.as_str() {
    "today" => return Ok(today),
    "yesterday" => return Ok(today - Duration::days(1)),
    "last week" => {
      let back = i64::from(today.weekday().num_days_from_monday()) + 7;
      return days_before(today, back).with_context(|| out_of_range(input));
    }
    "last month" => return subtract_months(first_of_month(today), 1).with_context(|| out_of_range(input)),
    _ => {}
  }

  // Durations count backwards from today whether or not "ago" is present.
  if let Ok(interval) = parse_duration(&phrase) {
    let start = match interval {
      Interval::Seconds(secs) => Duration::try_seconds(i64::from(secs.unsigned_abs()))
        .and_then(|d| today.checked_sub_signed(d)),
      Interval::Days(days) => days_before(today, i64::from(days.unsigned_abs())),
      Interval::Months(months) => subtract_months(today, months.unsigned_abs()),
    };

    return start.with_context(|| out_of_range(input));
  }

  if let Ok((start, _end, _literal)) = parse_natural(&phrase, None) {
    return Ok(start.date());
  }

  bail!("unrecognized --start-at {:?}; try MM/DD/YYYY, YYYY-MM-DD or a phrase like \"3 months ago\"", input)
}

/// Today in local time, or the date of the `--now-override` instant.
pub fn today(now: Option<DateTime<Local>>) -> NaiveDate {
  now.unwrap_or_else(Local::now).date_naive()
}

/// Parse a `--now-override` string into a local DateTime.
/// Accepts RFC3339 (e.g. 2025-08-15T12:00:00Z) or a naive local timestamp
/// formatted as `%Y-%m-%dT%H:%M:%S`.
pub fn parse_now_override(s: Option<&str>) -> Option<DateTime<Local>> {
  s.and_then(|raw| {
    chrono::DateTime::parse_from_rfc3339(raw)
      .ok()
      .map(|dt| dt.with_timezone(&Local))
      .or_else(|| {
        chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
          .ok()
          .and_then(|ndt| ndt.and_local_timezone(Local).single())
      })
  })
}

fn out_of_range(input: &str) -> String {
  format!("--start-at {:?} is out of range", input)
}

fn days_before(d: NaiveDate, days: i64) -> Option<NaiveDate> {
  Duration::try_days(days).and_then(|delta| d.checked_sub_signed(delta))
}

fn first_of_month(d: NaiveDate) -> NaiveDate {
  d.with_day(1).unwrap_or(d)
}

fn last_day_of_month(year: i32, month: u32) -> Option<u32> {
  let (ny, nm) = if month == 12 { (year.checked_add(1)?, 1) } else { (year, month + 1) };

  NaiveDate::from_ymd_opt(ny, nm, 1)
    .and_then(|d| d.pred_opt())
    .map(|d| d.day())
}

// Clamps the day to the target month's length (Mar 31 - 1 month = Feb 28/29).
// None when the result falls outside chrono's calendar.
fn subtract_months(d: NaiveDate, n: u32) -> Option<NaiveDate> {
  let total = i64::from(d.year()) * 12 + i64::from(d.month0()) - i64::from(n);
  let y = i32::try_from(total.div_euclid(12)).ok()?;
  let m = total.rem_euclid(12) as u32 + 1;
  let day = d.day().min(last_day_of_month(y, m)?);

  NaiveDate::from_ymd_opt(y, m, day)
}
