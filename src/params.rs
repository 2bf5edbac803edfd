use anyhow::Result;
use chrono::{DateTime, Local};

use crate::cli::EffectiveConfig;
use crate::client::RepoQuery;
use crate::start_at::{format_for_backend, resolve_start_at, today};

pub fn build_repo_query(cfg: &EffectiveConfig, now: Option<DateTime<Local>>) -> Result<RepoQuery> {
  let start_at = match &cfg.start_at {
    Some(phrase) => {
      let date = resolve_start_at(phrase, today(now))?;
      tracing::info!(%phrase, %date, "resolved --start-at");
      Some(format_for_backend(date))
    }
    None => None,
  };

  Ok(RepoQuery {
    repo_parent: cfg.repo_parent.clone(),
    repo_name: cfg.repo_name.clone(),
    start_at,
  })
}
