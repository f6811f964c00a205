//! Registry invalidation from file changes
//!
//! [`InvalidationHook`] applies watcher events under the components
//! directory to a shared [`ComponentRegistry`]:
//!
//! | Event | Component source | Other file |
//! |---|---|---|
//! | created, modified | reload and replace the entry | refresh raw content |
//! | deleted | evict entries loaded from it | drop raw content |
//!
//! Every applied change is also broadcast to subscribers, so a dev server can
//! tell connected browsers to reload.

use crate::error::Result;
use crate::watcher::{FileWatcher, WatchEvent};
use mosaic_components::{ComponentError, ComponentName, ComponentRegistry};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

const CHANNEL_CAPACITY: usize = 100;

/// Outcome of one watcher event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invalidation {
	/// A component source was reloaded and its entry replaced
	Reloaded(ComponentName),
	/// A non-component file's raw content was refreshed
	RawRefreshed(PathBuf),
	/// Entries loaded from a path were evicted
	Evicted(PathBuf),
	/// The event did not concern the registry
	Ignored,
	/// The event could not be applied
	Failed(String),
}

/// Keeps a registry in step with its components directory.
#[derive(Debug, Clone)]
pub struct InvalidationHook {
	registry: Arc<ComponentRegistry>,
	tx: broadcast::Sender<Invalidation>,
}

impl InvalidationHook {
	pub fn new(registry: Arc<ComponentRegistry>) -> Self {
		let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
		Self { registry, tx }
	}

	pub fn registry(&self) -> &Arc<ComponentRegistry> {
		&self.registry
	}

	/// Receives every applied (not ignored) invalidation from now on.
	pub fn subscribe(&self) -> broadcast::Receiver<Invalidation> {
		self.tx.subscribe()
	}

	/// Applies one event to the registry.
	pub fn handle(&self, event: &WatchEvent) -> Invalidation {
		let outcome = match event {
			WatchEvent::Created(path) | WatchEvent::Modified(path) => self.refresh(path),
			WatchEvent::Deleted(path) => self.evict(path),
			WatchEvent::Error(message) => {
				tracing::warn!(error = %message, "file watch error");
				Invalidation::Failed(message.clone())
			}
		};
		if outcome != Invalidation::Ignored {
			let _ = self.tx.send(outcome.clone());
		}
		outcome
	}

	fn refresh(&self, path: &Path) -> Invalidation {
		if !self.registry.owns(path) || path.is_dir() {
			return Invalidation::Ignored;
		}

		match self.registry.reload_path(path) {
			Ok(Some(definition)) => {
				tracing::debug!(component = %definition.name(), path = %path.display(), "component reloaded");
				Invalidation::Reloaded(definition.name().clone())
			}
			Ok(None) => {
				tracing::debug!(path = %path.display(), "raw content refreshed");
				Invalidation::RawRefreshed(path.to_path_buf())
			}
			Err(ComponentError::Io(err)) if err.kind() == io::ErrorKind::NotFound => self.evict(path),
			Err(err) => {
				tracing::warn!(path = %path.display(), error = %err, "failed to reload component");
				self.registry.invalidate_path(path);
				Invalidation::Failed(err.to_string())
			}
		}
	}

	fn evict(&self, path: &Path) -> Invalidation {
		if !self.registry.owns(path) {
			return Invalidation::Ignored;
		}
		if self.registry.invalidate_path(path) {
			tracing::debug!(path = %path.display(), "evicted component entries");
			Invalidation::Evicted(path.to_path_buf())
		} else {
			Invalidation::Ignored
		}
	}

	/// Applies events until the watcher closes.
	pub async fn run(&self, mut watcher: FileWatcher) {
		while let Some(event) = watcher.next_event().await {
			self.handle(&event);
		}
		tracing::debug!("file watcher closed");
	}

	/// Runs the hook with `watcher` on a tokio task.
	pub fn spawn(self, watcher: FileWatcher) -> JoinHandle<()> {
		tokio::spawn(async move { self.run(watcher).await })
	}

	/// Watches the registry's components directory on a tokio task.
	///
	/// # Errors
	///
	/// Returns [`WatchError`](crate::WatchError) if the directory cannot be
	/// watched.
	pub fn start(self) -> Result<JoinHandle<()>> {
		let dir = self.registry.config().components_dir.clone();
		let watcher = FileWatcher::new(&[dir])?;
		Ok(self.spawn(watcher))
	}
}
