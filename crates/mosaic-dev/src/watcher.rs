//! File system watcher for component directories
//!
//! Monitors directories for file changes and forwards them as [`WatchEvent`]s
//! through a channel.

use crate::error::Result;
use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher as NotifyWatcher};
use std::path::PathBuf;
use tokio::sync::mpsc;

/// Events emitted by the file watcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
	/// A file was created (or renamed into place)
	Created(PathBuf),
	/// A file was modified
	Modified(PathBuf),
	/// A file was deleted (or renamed away)
	Deleted(PathBuf),
	/// An error occurred while watching
	Error(String),
}

impl WatchEvent {
	/// The affected path, if any.
	pub fn path(&self) -> Option<&PathBuf> {
		match self {
			Self::Created(path) | Self::Modified(path) | Self::Deleted(path) => Some(path),
			Self::Error(_) => None,
		}
	}
}

/// File system watcher
///
/// Dropping the watcher stops the underlying notifier and closes the channel.
pub struct FileWatcher {
	_watcher: RecommendedWatcher,
	receiver: mpsc::UnboundedReceiver<WatchEvent>,
}

impl FileWatcher {
	/// Starts watching `paths` recursively.
	///
	/// # Examples
	///
	/// ```rust,no_run
	/// use mosaic_dev::FileWatcher;
	/// use std::path::PathBuf;
	///
	/// #[tokio::main]
	/// async fn main() {
	///     let mut watcher = FileWatcher::new(&[PathBuf::from("./components")]).unwrap();
	///
	///     while let Some(event) = watcher.next_event().await {
	///         println!("component file changed: {:?}", event);
	///     }
	/// }
	/// ```
	pub fn new(paths: &[PathBuf]) -> Result<Self> {
		let (tx, rx) = mpsc::unbounded_channel();

		let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
			for event in translate(res) {
				if tx.send(event).is_err() {
					return;
				}
			}
		})?;

		for path in paths {
			watcher.watch(path, RecursiveMode::Recursive)?;
			tracing::debug!(path = %path.display(), "watching directory");
		}

		Ok(Self {
			_watcher: watcher,
			receiver: rx,
		})
	}

	/// Waits for the next event.
	///
	/// Returns `None` once the watcher has been closed.
	pub async fn next_event(&mut self) -> Option<WatchEvent> {
		self.receiver.recv().await
	}

	/// Receives an event without waiting.
	pub fn try_next_event(&mut self) -> Option<WatchEvent> {
		self.receiver.try_recv().ok()
	}
}

/// Maps one notifier result onto watch events, one per affected path.
fn translate(res: notify::Result<Event>) -> Vec<WatchEvent> {
	let event = match res {
		Ok(event) => event,
		Err(err) => return vec![WatchEvent::Error(err.to_string())],
	};

	match event.kind {
		EventKind::Create(_) => event.paths.into_iter().map(WatchEvent::Created).collect(),
		EventKind::Remove(_) => event.paths.into_iter().map(WatchEvent::Deleted).collect(),
		EventKind::Modify(ModifyKind::Name(RenameMode::From)) => {
			event.paths.into_iter().map(WatchEvent::Deleted).collect()
		}
		EventKind::Modify(ModifyKind::Name(RenameMode::To)) => {
			event.paths.into_iter().map(WatchEvent::Created).collect()
		}
		EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => {
			let mut paths = event.paths.into_iter();
			paths
				.next()
				.map(WatchEvent::Deleted)
				.into_iter()
				.chain(paths.map(WatchEvent::Created))
				.collect()
		}
		EventKind::Modify(ModifyKind::Metadata(_)) => Vec::new(),
		EventKind::Modify(_) => event.paths.into_iter().map(WatchEvent::Modified).collect(),
		_ => Vec::new(),
	}
}

/// Builder for a watcher over several directories
#[derive(Debug, Default)]
pub struct FileWatcherBuilder {
	paths: Vec<PathBuf>,
}

impl FileWatcherBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a directory to watch.
	pub fn watch_path(mut self, path: impl Into<PathBuf>) -> Self {
		self.paths.push(path.into());
		self
	}

	pub fn build(self) -> Result<FileWatcher> {
		FileWatcher::new(&self.paths)
	}
}
