use std::time::Duration;

use anyhow::Result;
use clap::Parser;

mod chart;
mod churn;
mod cli;
mod client;
mod color;
mod dashboard;
mod model;
mod params;
mod series;
mod start_at;
mod util;
mod week;

use crate::cli::{Cli, Source, normalize};
use crate::client::{DashboardApi, FixtureDashboardApi, HttpDashboardApi};
use crate::color::ColorAssigner;
use crate::dashboard::{DashboardOptions, RenderSession};

fn main() -> Result<()> {
  let cli = Cli::parse();

  if cli.gen_man {
    let page = util::render_man_page::<Cli>()?;
    print!("{}", page);
    return Ok(());
  }

  util::init_tracing(cli.verbose);

  // Phase 1: normalize CLI
  let cfg = normalize(cli)?;

  // Phase 2: resolve the query (startAt) against now
  let now_opt = start_at::parse_now_override(cfg.now_override.as_deref());
  let query = params::build_repo_query(&cfg, now_opt)?;

  let api: Box<dyn DashboardApi> = match &cfg.source {
    Source::Http { base_url, timeout_secs } => {
      Box::new(HttpDashboardApi::new(base_url, Duration::from_secs(*timeout_secs)))
    }
    Source::Fixtures { dir } => Box::new(FixtureDashboardApi::new(dir)),
  };

  let colors = match cfg.seed {
    Some(seed) => ColorAssigner::seeded(seed),
    None => ColorAssigner::from_entropy(),
  };

  // Phase 3: fetch, color and assemble every panel
  let opts = DashboardOptions {
    include_all: cfg.include_all,
    week_order: cfg.week_order,
    insights: cfg.insights,
    dir_depth: cfg.dir_depth,
  };
  let mut session = RenderSession::new(colors, opts);
  let report = session.render(api.as_ref(), &query);

  util::write_output(&cfg.out, &serde_json::to_value(&report)?)
}
