//! Description file watcher for watch mode.
//!
//! # Responsibilities
//! - Observe the description file across in-place writes and rename-saves
//! - Reload and forward each new description to the compile loop
//!
//! # Design Decisions
//! - The parent directory is watched, not the file: a rename-save
//!   replaces the inode and a file-level watch goes silent after it
//! - Events are filtered by file name, so sibling temp files are ignored
//! - Unreadable or unparsable saves are logged and dropped

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::event::{EventKind, ModifyKind};
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_description;
use crate::model::LoadBalancerDescription;

/// Watches a description file and streams reloaded descriptions.
pub struct DescriptionWatcher {
    path: PathBuf,
    poll_interval: Duration,
    update_tx: mpsc::UnboundedSender<LoadBalancerDescription>,
}

impl DescriptionWatcher {
    /// Returns the watcher and the receiving end of its update channel.
    pub fn new(
        path: &Path,
        poll_interval: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<LoadBalancerDescription>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        let watcher = Self {
            path: path.to_path_buf(),
            poll_interval,
            update_tx,
        };
        (watcher, update_rx)
    }

    /// Start watching. Events stop when the returned handle is dropped.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let file_name = self.path.file_name().map(OsString::from).ok_or_else(|| {
            notify::Error::generic(&format!("{} does not name a file", self.path.display()))
        })?;
        let directory = watched_directory(&self.path);

        let path = self.path.clone();
        let tx = self.update_tx;
        let handler = move |res: notify::Result<Event>| {
            let event = match res {
                Ok(event) => event,
                Err(e) => {
                    tracing::error!(error = %e, "Description watch error");
                    return;
                }
            };
            if !touches_file(&event, &file_name) {
                return;
            }

            tracing::debug!(kind = ?event.kind, path = %path.display(), "Description changed");
            match load_description(&path) {
                Ok(description) => {
                    let _ = tx.send(description);
                }
                Err(e) => tracing::error!(
                    error = %e,
                    path = %path.display(),
                    "Reload failed, keeping current configuration"
                ),
            }
        };

        let config = Config::default().with_poll_interval(self.poll_interval);
        let mut watcher = RecommendedWatcher::new(handler, config)?;
        watcher.watch(&directory, RecursiveMode::NonRecursive)?;

        tracing::info!(
            path = %self.path.display(),
            directory = %directory.display(),
            "Description watcher started"
        );
        Ok(watcher)
    }
}

/// Directory containing `path`; a bare file name lives in `.`.
fn watched_directory(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Whether `event` may have changed the content at `file_name`.
fn touches_file(event: &Event, file_name: &OsString) -> bool {
    let relevant_kind = match event.kind {
        EventKind::Create(_) => true,
        EventKind::Modify(ModifyKind::Metadata(_)) => false,
        EventKind::Modify(_) => true,
        _ => false,
    };

    relevant_kind
        && event
            .paths
            .iter()
            .any(|p| p.file_name() == Some(file_name.as_os_str()))
}
