use anyhow::{Result, bail};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::week::WeekOrder;

#[derive(Parser, Debug)]
#[command(
    name = "git-activity-charts",
    version,
    about = "Turn repository-analytics JSON into chart specs with stable tag colors",
    long_about = None
)]
pub struct Cli {
  /// Owner/organization part of the repository, e.g. "rust-lang"
  #[arg(long, required_unless_present = "gen_man")]
  pub repo_parent: Option<String>,

  /// Repository name, e.g. "cargo"
  #[arg(long, required_unless_present = "gen_man")]
  pub repo_name: Option<String>,

  /// Analytics backend base URL, e.g. http://localhost:5000
  #[arg(long)]
  pub base_url: Option<String>,

  /// Directory of recorded endpoint responses (author-commits.json, tags-frequency.json, ...)
  #[arg(long)]
  pub fixtures: Option<PathBuf>,

  /// Only count activity from this day on: MM/DD/YYYY, YYYY-MM-DD, "last month", "6 weeks ago", ...
  #[arg(long)]
  pub start_at: Option<String>,

  /// Show every tag instead of folding the tail into "Other"
  #[arg(long)]
  pub include_all: bool,

  /// Order of the week axis in the tag-week chart
  #[arg(long, value_enum, default_value_t = WeekOrder::Lexical)]
  pub week_order: WeekOrder,

  /// Seed for overflow tag colors (random per run when absent)
  #[arg(long)]
  pub seed: Option<u64>,

  /// Also request prose summaries from the backend's /explain endpoint
  #[arg(long)]
  pub insights: bool,

  /// Group the directory chart by the first N path components (0 = full directory)
  #[arg(long, default_value_t = 0)]
  pub dir_depth: usize,

  /// HTTP timeout in seconds
  #[arg(long, default_value_t = 30)]
  pub timeout_secs: u64,

  /// Output file (default stdout "-")
  #[arg(long, default_value = "-")]
  pub out: String,

  /// Log progress to stderr (RUST_LOG overrides)
  #[arg(long, short)]
  pub verbose: bool,

  /// Emit a troff man page to stdout (internal; for packaging)
  #[arg(long, hide = true)]
  pub gen_man: bool,

  /// Override the "now" instant for natural-language parsing (hidden; tests only)
  #[arg(long = "now-override", hide = true)]
  pub now_override: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Source {
  Http { base_url: String, timeout_secs: u64 },
  Fixtures { dir: String },
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EffectiveConfig {
  pub repo_parent: String,
  pub repo_name: String,
  pub source: Source,
  pub start_at: Option<String>,
  pub include_all: bool,
  pub week_order: WeekOrder,
  pub seed: Option<u64>,
  pub insights: bool,
  pub dir_depth: Option<usize>,
  pub out: String,
  pub verbose: bool,
  pub now_override: Option<String>,
}

pub fn normalize(cli: Cli) -> Result<EffectiveConfig> {
  let (repo_parent, repo_name) = match (&cli.repo_parent, &cli.repo_name) {
    (Some(p), Some(n)) if !p.trim().is_empty() && !n.trim().is_empty() => (p.trim().to_string(), n.trim().to_string()),
    _ => bail!("--repo-parent and --repo-name must not be empty"),
  };

  let source = match (&cli.base_url, &cli.fixtures) {
    (Some(url), None) => {
      if !(url.starts_with("http://") || url.starts_with("https://")) {
        bail!("--base-url must start with http:// or https:// (got {:?})", url);
      }
      Source::Http { base_url: url.trim_end_matches('/').to_string(), timeout_secs: cli.timeout_secs }
    }
    (None, Some(dir)) => Source::Fixtures { dir: dir.to_string_lossy().to_string() },
    (None, None) => bail!("Provide one of --base-url or --fixtures"),
    (Some(_), Some(_)) => bail!("Ambiguous data source: choose only one of --base-url | --fixtures"),
  };

  Ok(EffectiveConfig {
    repo_parent,
    repo_name,
    source,
    start_at: cli.start_at.filter(|s| !s.trim().is_empty()),
    include_all: cli.include_all,
    week_order: cli.week_order,
    seed: cli.seed,
    insights: cli.insights,
    dir_depth: (cli.dir_depth > 0).then_some(cli.dir_depth),
    out: cli.out,
    verbose: cli.verbose,
    now_override: cli.now_override,
  })
}
