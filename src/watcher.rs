//! Catalog file watching.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, warn};

/// True if any of `paths` refers to the watched file.
///
/// Editors often replace files instead of writing in place, so fall back to
/// comparing file names when canonical paths differ.
fn event_matches(paths: &[PathBuf], canonical: &Path, file_name: Option<&std::ffi::OsStr>) -> bool {
    paths.iter().any(|p| {
        if p.canonicalize().is_ok_and(|c| c == canonical) {
            return true;
        }
        matches!((file_name, p.file_name()), (Some(expected), Some(actual)) if expected == actual)
    })
}

/// Watch `catalog_path` and raise `needs_reload` when it changes.
///
/// Returns None if the watcher could not be created; the app then simply
/// keeps the catalog it loaded at startup.
pub fn setup_catalog_watcher(
    catalog_path: PathBuf,
    needs_reload: Arc<Mutex<bool>>,
) -> Option<RecommendedWatcher> {
    let config = Config::default().with_poll_interval(Duration::from_millis(500));
    let canonical = catalog_path
        .canonicalize()
        .unwrap_or_else(|_| catalog_path.clone());
    let file_name = catalog_path.file_name().map(|s| s.to_os_string());

    let handler = move |res: Result<notify::Event, notify::Error>| {
        let Ok(event) = res else {
            return;
        };
        if event_matches(&event.paths, &canonical, file_name.as_deref()) {
            if let Ok(mut flag) = needs_reload.lock() {
                *flag = true;
            }
        }
    };

    let mut watcher = match RecommendedWatcher::new(handler, config) {
        Ok(watcher) => watcher,
        Err(e) => {
            warn!(error = %e, "could not create catalog watcher");
            return None;
        }
    };

    // Watch the parent directory since some editors replace files
    if let Some(parent) = catalog_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = watcher.watch(parent, RecursiveMode::NonRecursive) {
            warn!(dir = %parent.display(), error = %e, "could not watch catalog directory");
            return None;
        }
    } else if let Err(e) = watcher.watch(Path::new("."), RecursiveMode::NonRecursive) {
        warn!(error = %e, "could not watch current directory");
        return None;
    }
    debug!(path = %catalog_path.display(), "watching catalog");
    Some(watcher)
}
