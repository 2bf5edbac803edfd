// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Logging setup, output writing and man page rendering
// role: utilities/helpers
// inputs: verbosity flag and RUST_LOG; output target; clap CommandFactory
// outputs: Installed tracing subscriber; JSON on stdout or in a file; man page text
// side_effects: write_output creates parent directories and writes files
// invariants:
// - logs go to stderr; stdout carries only the JSON document
// - write_output to "-" never touches the filesystem
// errors: IO errors bubble with the output path as context
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::io::{IsTerminal, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::CommandFactory;
use tracing_subscriber::{EnvFilter, fmt};

/// Install the global subscriber. `RUST_LOG` wins; otherwise `warn`, or `info` with `--verbose`.
pub fn init_tracing(verbose: bool) {
  let default = if verbose { "info" } else { "warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

  let _ = fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_ansi(std::io::stderr().is_terminal())
    .with_target(false)
    .try_init();
}

/// Pretty-print `doc` to stdout (`-`) or to a file, creating parent directories.
pub fn write_output(out: &str, doc: &serde_json::Value) -> Result<()> {
  let body = serde_json::to_string_pretty(doc)?;

  if out == "-" {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", body).context("writing to stdout")?;
    return Ok(());
  }

  let path = Path::new(out);

  if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
    std::fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
  }

  std::fs::write(path, body + "\n").with_context(|| format!("writing {}", path.display()))?;
  tracing::info!(path = %path.display(), "wrote dashboard");

  Ok(())
}

/// Render a section-1 man page for a clap `CommandFactory` implementor.
/// Returns the troff content as a UTF-8 string.
pub fn render_man_page<T: CommandFactory>() -> anyhow::Result<String> {
  let cmd = T::command();
  let man = clap_mangen::Man::new(cmd);
  let mut buf: Vec<u8> = Vec::new();

  man.render(&mut buf)?;

  Ok(String::from_utf8_lossy(&buf).to_string())
}
