use indexmap::IndexMap;
use once_cell::sync::Lazy;

use crate::model::FileCommits;

/// Git's compact rename notation inside a path: `{old => new}`.
static RE_RENAME: Lazy<regex::Regex> = Lazy::new(|| regex::Regex::new(r"\{([^}]+)\s=>\s([^}]*)\}").unwrap());

/// Collapse a numstat-style rename path to its pre-rename form,
/// e.g. `src/{util => helpers}/io.rs` becomes `src/util/io.rs`.
pub fn normalize_rename(path: &str) -> String {
  RE_RENAME.replace_all(path, "$1").into_owned()
}

/// Directory part of `path`, optionally cut to its first `levels` components.
pub fn directory_of(path: &str, levels: Option<usize>) -> String {
  let dir = match path.rfind('/') {
    Some(idx) => &path[..idx],
    None => "",
  };

  match levels {
    Some(n) => dir.split('/').take(n).collect::<Vec<_>>().join("/"),
    None => dir.to_string(),
  }
}

/// Sum per-file commit counts into their directories, in first-seen order.
/// Files at the repository root land under the empty directory name.
pub fn aggregate_by_directory(files: &[FileCommits], levels: Option<usize>) -> IndexMap<String, u64> {
  let mut dirs: IndexMap<String, u64> = IndexMap::new();

  for f in files {
    let path = normalize_rename(&f.filename);
    *dirs.entry(directory_of(&path, levels)).or_insert(0) += f.commits;
  }

  tracing::debug!(directories = dirs.len(), "aggregated file commits by directory");
  dirs
}
