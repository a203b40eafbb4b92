//! Platform probe for the REAPER ExtState file
//!
//! REAPER keeps `reaper-extstate.ini` in its resource directory, which
//! differs per platform. The probe checks the conventional locations in
//! order and falls back to the first candidate when none exists yet (the
//! store creates it lazily on the first write).

use std::path::PathBuf;

/// Candidate ExtState locations, most likely first
///
/// Linux, then macOS, then Windows (`APPDATA`).
pub(crate) fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Some(home) = dirs::home_dir() {
        paths.push(
            home.join(".config")
                .join("REAPER")
                .join("reaper-extstate.ini"),
        );
        paths.push(
            home.join("Library")
                .join("Application Support")
                .join("REAPER")
                .join("reaper-extstate.ini"),
        );
    }

    if let Some(appdata) = std::env::var_os("APPDATA").filter(|v| !v.is_empty()) {
        paths.push(
            PathBuf::from(appdata)
                .join("REAPER")
                .join("reaper-extstate.ini"),
        );
    }

    paths
}

/// Resolve the ExtState path, probing once
pub(crate) fn resolve() -> PathBuf {
    let candidates = candidate_paths();

    for path in &candidates {
        if path.exists() {
            tracing::info!(path = %path.display(), "Found REAPER ExtState file");
            return path.clone();
        }
    }

    tracing::warn!("REAPER ExtState file not found, will be created on first write");
    candidates
        .into_iter()
        .next()
        .unwrap_or_else(|| PathBuf::from("reaper-extstate.ini"))
}
