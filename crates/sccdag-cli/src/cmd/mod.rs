pub mod analyze;
pub mod components;

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use sccdag_core::{Distance, Objective};
use tempfile::NamedTempFile;

/// Write `body` to `path` via a uniquely named temp file in the same
/// directory, so readers never see a half-written report and no sibling file
/// is clobbered.
pub fn write_atomically(path: &Path, body: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to create temp file in {}", dir.display()))?;
    tmp.write_all(body)
        .and_then(|()| tmp.flush())
        .with_context(|| format!("failed to write {}", tmp.path().display()))?;
    tmp.persist(path)
        .map_err(|err| err.error)
        .with_context(|| format!("failed to atomically replace {}", path.display()))?;
    Ok(())
}

/// Send a rendered buffer to `path`, or to stdout when no path is given.
pub fn emit(path: Option<&Path>, body: &[u8]) -> Result<()> {
    match path {
        Some(path) => write_atomically(path, body),
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            out.write_all(body)?;
            out.flush()?;
            Ok(())
        }
    }
}

/// Human form of a raw distance: the number, or `unreached` for the sentinel.
pub fn fmt_distance(distance: Distance, objective: Objective) -> String {
    if distance == objective.unreached() {
        "unreached".to_string()
    } else {
        distance.to_string()
    }
}

/// `C0 -> C2 -> C3`, or `-` for an empty path.
pub fn fmt_component_path(path: &[usize]) -> String {
    if path.is_empty() {
        return "-".to_string();
    }
    path.iter()
        .map(|c| format!("C{c}"))
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Space-separated vertex list.
pub fn fmt_members(members: &[usize]) -> String {
    members
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
