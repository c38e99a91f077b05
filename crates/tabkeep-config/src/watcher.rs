//! Debounced file watching for live config reload.

use std::ffi::OsStr;
use std::path::Path;
use std::time::Duration;

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tabkeep_common::ConfigError;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

/// Events arriving within this window of the first one collapse into a
/// single reload; editors that save by write + rename emit several.
pub const DEBOUNCE: Duration = Duration::from_millis(500);

/// Watch `path` and yield one `()` per burst of changes to it.
///
/// The parent directory is watched so a file replaced by rename keeps
/// being seen. The watcher lives in a spawned task until the receiver is
/// dropped. Must be called inside a tokio runtime.
pub fn watch_debounced(path: &Path) -> Result<mpsc::Receiver<()>, ConfigError> {
    let file_name = path
        .file_name()
        .map(OsStr::to_os_string)
        .ok_or_else(|| ConfigError::WatchError(format!("{} names no file", path.display())))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => Path::new(".").to_path_buf(),
    };

    let (raw_tx, mut raw_rx) = mpsc::channel::<()>(16);
    let mut watcher = RecommendedWatcher::new(
        move |result: notify::Result<Event>| match result {
            Ok(event) if touches_file(&event, &file_name) => {
                debug!(kind = ?event.kind, "config file event");
                let _ = raw_tx.try_send(());
            }
            Ok(_) => {}
            Err(e) => error!("file watcher error: {e}"),
        },
        notify::Config::default(),
    )
    .map_err(|e| ConfigError::WatchError(format!("failed to create watcher: {e}")))?;
    watcher
        .watch(&dir, RecursiveMode::NonRecursive)
        .map_err(|e| ConfigError::WatchError(format!("failed to watch {}: {e}", dir.display())))?;
    info!(path = %path.display(), "watching config file");

    let (tx, rx) = mpsc::channel(1);
    tokio::spawn(async move {
        let _watcher = watcher;
        loop {
            tokio::select! {
                first = raw_rx.recv() => {
                    if first.is_none() {
                        return;
                    }
                }
                _ = tx.closed() => return,
            }

            let window = tokio::time::sleep(DEBOUNCE);
            tokio::pin!(window);
            loop {
                tokio::select! {
                    _ = &mut window => break,
                    more = raw_rx.recv() => {
                        if more.is_none() {
                            return;
                        }
                    }
                }
            }

            if tx.send(()).await.is_err() {
                debug!("config reload receiver dropped, stopping watcher");
                return;
            }
        }
    });
    Ok(rx)
}

/// Whether `event` creates or modifies the file called `file_name`.
fn touches_file(event: &Event, file_name: &OsStr) -> bool {
    matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_))
        && event.paths.iter().any(|p| p.file_name() == Some(file_name))
}
