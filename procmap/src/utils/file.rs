//! File utility functions

use std::path::{Path, PathBuf};

use super::encoding::OtlpEncoding;

/// Suffix inserted before the extension of remapped captures
pub const REMAPPED_SUFFIX: &str = "remapped";

/// Expand a path string: `~` and `~/path` resolve to the home directory,
/// relative paths resolve against the current directory.
///
/// ```text
/// expand_path("~/.procmap")  // -> /home/user/.procmap
/// expand_path("./captures")  // -> /current/dir/./captures
/// expand_path("/etc/config") // -> /etc/config
/// ```
pub fn expand_path(path: &str) -> PathBuf {
    let path = path.trim();

    if path.is_empty() {
        return std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    }

    let expanded = if path == "~" {
        dirs::home_dir().unwrap_or_else(|| PathBuf::from(path))
    } else if let Some(rest) = path.strip_prefix("~/") {
        match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => PathBuf::from(path),
        }
    } else {
        PathBuf::from(path)
    };

    if expanded.is_relative() {
        std::env::current_dir()
            .map(|cwd| cwd.join(&expanded))
            .unwrap_or(expanded)
    } else {
        expanded
    }
}

/// Output path for a remapped capture: `<stem>.remapped.<ext>`, placed in
/// `output_dir` when given, otherwise next to the input.
pub fn remapped_output_path(
    input: &Path,
    output_dir: Option<&Path>,
    encoding: OtlpEncoding,
) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "metrics".to_string());
    let file_name = format!("{}.{}.{}", stem, REMAPPED_SUFFIX, encoding.extension());

    match output_dir {
        Some(dir) => dir.join(file_name),
        None => input
            .parent()
            .map(|p| p.join(&file_name))
            .unwrap_or_else(|| PathBuf::from(&file_name)),
    }
}
