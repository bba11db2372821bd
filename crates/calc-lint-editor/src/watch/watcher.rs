//! File watching for stylesheets that are not open in an editor.

use notify::{RecommendedWatcher, RecursiveMode};
use notify_debouncer_mini::{DebouncedEventKind, Debouncer, new_debouncer};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::Duration;

use calc_lint_core::parser::CssParser;

use crate::document::TextDocument;
use crate::host::EditorHost;
use crate::session::CalcSession;
use crate::{Error, Result};

/// Event indicating a stylesheet file changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StylesheetChangeEvent {
    /// Path to the changed file.
    pub path: PathBuf,
    /// Type of change.
    pub kind: ChangeKind,
}

/// Type of file change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// File was modified.
    Modified,
    /// File was removed.
    Removed,
}

/// Watches stylesheet files and feeds their contents to a [`CalcSession`].
///
/// # Example
///
/// ```ignore
/// let mut watcher = StylesheetWatcher::new()?;
/// watcher.watch("styles/app.css")?;
///
/// // In your event loop:
/// let changes = watcher.poll();
/// if !changes.is_empty() {
///     watcher.apply_changes(&mut session, &mut host, &changes);
/// }
/// ```
pub struct StylesheetWatcher {
    debouncer: Debouncer<RecommendedWatcher>,
    rx: Receiver<std::result::Result<Vec<notify_debouncer_mini::DebouncedEvent>, notify::Error>>,
    watched_paths: HashSet<PathBuf>,
    versions: HashMap<PathBuf, i32>,
}

impl StylesheetWatcher {
    /// Create a new stylesheet watcher.
    pub fn new() -> Result<Self> {
        let (tx, rx) = mpsc::channel();

        let debouncer = new_debouncer(Duration::from_millis(100), tx)
            .map_err(|e| Error::Watch(e.to_string()))?;

        Ok(Self {
            debouncer,
            rx,
            watched_paths: HashSet::new(),
            versions: HashMap::new(),
        })
    }

    /// Start watching a stylesheet file.
    pub fn watch(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path
            .as_ref()
            .canonicalize()
            .map_err(|e| Error::io(path.as_ref(), e))?;

        if !self.watched_paths.contains(&path) {
            self.debouncer
                .watcher()
                .watch(&path, RecursiveMode::NonRecursive)
                .map_err(|e| Error::Watch(e.to_string()))?;

            self.watched_paths.insert(path.clone());
            tracing::info!("Watching stylesheet: {}", path.display());
        }

        Ok(())
    }

    /// Stop watching a stylesheet file.
    pub fn unwatch(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = match path.as_ref().canonicalize() {
            Ok(p) => p,
            Err(_) => return Ok(()), // gone already
        };

        if self.watched_paths.remove(&path) {
            let _ = self.debouncer.watcher().unwatch(&path);
            self.versions.remove(&path);
            tracing::info!("Stopped watching stylesheet: {}", path.display());
        }

        Ok(())
    }

    /// Poll for stylesheet changes.
    ///
    /// Returns each changed watched file once. Call this in your event loop.
    pub fn poll(&mut self) -> Vec<StylesheetChangeEvent> {
        let mut changes = vec![];

        loop {
            match self.rx.try_recv() {
                Ok(Ok(events)) => {
                    for event in events {
                        if event.kind != DebouncedEventKind::Any
                            || !self.watched_paths.contains(&event.path)
                        {
                            continue;
                        }
                        let kind = if event.path.exists() {
                            ChangeKind::Modified
                        } else {
                            ChangeKind::Removed
                        };
                        changes.push(StylesheetChangeEvent {
                            path: event.path,
                            kind,
                        });
                    }
                }
                Ok(Err(e)) => {
                    tracing::warn!("File watcher error: {}", e);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    tracing::error!("File watcher disconnected");
                    break;
                }
            }
        }

        changes.sort_by(|a, b| a.path.cmp(&b.path));
        changes.dedup_by(|a, b| a.path == b.path);

        changes
    }

    /// Re-check changed files.
    ///
    /// Modified files are read and handed to [`CalcSession::refresh`];
    /// removed files are closed and stop being watched, so a file created
    /// again at the same path has to be passed to [`watch`](Self::watch)
    /// anew. A file that cannot be read is logged and skipped.
    pub fn apply_changes<P: CssParser>(
        &mut self,
        session: &mut CalcSession<P>,
        host: &mut impl EditorHost,
        changes: &[StylesheetChangeEvent],
    ) {
        for change in changes {
            match change.kind {
                ChangeKind::Modified => match self.load(&change.path) {
                    Ok(document) => {
                        tracing::info!(
                            "Re-checking stylesheet: {} (version {})",
                            change.path.display(),
                            document.version()
                        );
                        session.refresh(&document, host);
                    }
                    Err(e) => {
                        tracing::error!("Failed to re-check {}: {}", change.path.display(), e);
                    }
                },
                ChangeKind::Removed => {
                    tracing::info!("Stylesheet removed: {}", change.path.display());
                    self.versions.remove(&change.path);
                    if self.watched_paths.remove(&change.path) {
                        let _ = self.debouncer.watcher().unwatch(&change.path);
                    }
                    session.did_close(&change.path.display().to_string(), host);
                }
            }
        }
    }

    /// Read `path` as the next version of its document.
    pub fn load(&mut self, path: &Path) -> Result<TextDocument> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let version = self.versions.entry(path.to_path_buf()).or_insert(0);
        *version += 1;
        Ok(TextDocument::from_path(path, *version, text))
    }

    /// Get the number of watched files.
    pub fn watched_count(&self) -> usize {
        self.watched_paths.len()
    }

    /// Get the watched paths.
    pub fn watched_paths(&self) -> impl Iterator<Item = &Path> {
        self.watched_paths.iter().map(|p| p.as_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use tempfile::tempdir;

    use crate::config::EditorConfig;
    use crate::host::MemoryHost;

    fn enabled_session() -> CalcSession {
        CalcSession::new(EditorConfig {
            enabled: true,
            ..Default::default()
        })
    }

    #[test]
    fn watcher_creation() {
        let watcher = StylesheetWatcher::new();
        assert!(watcher.is_ok());
    }

    #[test]
    fn watch_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("site.css");
        fs::write(&file_path, "a { width: 100% - 20px; }").unwrap();

        let mut watcher = StylesheetWatcher::new().unwrap();
        watcher.watch(&file_path).unwrap();
        watcher.watch(&file_path).unwrap();
        assert_eq!(watcher.watched_count(), 1);
    }

    #[test]
    fn watch_missing_file_fails() {
        let dir = tempdir().unwrap();
        let mut watcher = StylesheetWatcher::new().unwrap();
        let err = watcher.watch(dir.path().join("missing.css")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn unwatch_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("site.css");
        fs::write(&file_path, "a { color: red; }").unwrap();

        let mut watcher = StylesheetWatcher::new().unwrap();
        watcher.watch(&file_path).unwrap();
        assert_eq!(watcher.watched_count(), 1);

        watcher.unwatch(&file_path).unwrap();
        assert_eq!(watcher.watched_count(), 0);
    }

    #[test]
    fn load_bumps_version() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("site.css");
        fs::write(&file_path, "a { color: red; }").unwrap();

        let mut watcher = StylesheetWatcher::new().unwrap();
        assert_eq!(watcher.load(&file_path).unwrap().version(), 1);
        let doc = watcher.load(&file_path).unwrap();
        assert_eq!(doc.version(), 2);
        assert_eq!(doc.language_id(), "css");
    }

    #[test]
    fn apply_changes_refreshes_session() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("site.css");
        fs::write(&file_path, "a { width: 100% - 20px; }").unwrap();
        let uri = file_path.display().to_string();

        let mut watcher = StylesheetWatcher::new().unwrap();
        let mut session = enabled_session();
        let mut host = MemoryHost::new();

        let modified = [StylesheetChangeEvent {
            path: file_path.clone(),
            kind: ChangeKind::Modified,
        }];
        watcher.apply_changes(&mut session, &mut host, &modified);
        assert_eq!(host.diagnostics_for(&uri).len(), 1);

        fs::write(&file_path, "a { width: calc(100% - 20px); }").unwrap();
        watcher.apply_changes(&mut session, &mut host, &modified);
        assert!(host.diagnostics_for(&uri).is_empty());

        let removed = [StylesheetChangeEvent {
            path: file_path.clone(),
            kind: ChangeKind::Removed,
        }];
        fs::write(&file_path, "a { width: 1px + 1px; }").unwrap();
        watcher.apply_changes(&mut session, &mut host, &modified);
        assert_eq!(host.diagnostics_for(&uri).len(), 1);
        watcher.apply_changes(&mut session, &mut host, &removed);
        assert!(host.diagnostics_for(&uri).is_empty());
    }

    #[test]
    fn unreadable_change_is_skipped() {
        let dir = tempdir().unwrap();
        let mut watcher = StylesheetWatcher::new().unwrap();
        let mut session = enabled_session();
        let mut host = MemoryHost::new();

        let changes = [StylesheetChangeEvent {
            path: dir.path().join("missing.css"),
            kind: ChangeKind::Modified,
        }];
        watcher.apply_changes(&mut session, &mut host, &changes);
        assert!(host.diagnostics.is_empty());
    }

    #[test]
    fn removed_file_is_unwatched() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("site.css");
        fs::write(&file_path, "a { top: 1px + 1px; }").unwrap();
        let canonical = file_path.canonicalize().unwrap();

        let mut watcher = StylesheetWatcher::new().unwrap();
        let mut session = enabled_session();
        let mut host = MemoryHost::new();
        watcher.watch(&file_path).unwrap();

        let modified = [StylesheetChangeEvent {
            path: canonical.clone(),
            kind: ChangeKind::Modified,
        }];
        watcher.apply_changes(&mut session, &mut host, &modified);
        assert_eq!(host.diagnostics_for(&canonical.display().to_string()).len(), 1);

        fs::remove_file(&file_path).unwrap();
        let removed = [StylesheetChangeEvent {
            path: canonical.clone(),
            kind: ChangeKind::Removed,
        }];
        watcher.apply_changes(&mut session, &mut host, &removed);
        assert_eq!(watcher.watched_count(), 0);
        assert!(host.diagnostics_for(&canonical.display().to_string()).is_empty());

        fs::write(&file_path, "a { top: 1px; }").unwrap();
        watcher.watch(&file_path).unwrap();
        assert_eq!(watcher.watched_count(), 1);
    }
}
