//! Live file watching against a temporary components directory

use mosaic_components::{ComponentName, ComponentRegistry, Props, RegistryConfig};
use mosaic_dev::{Invalidation, InvalidationHook};
use std::fs;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::broadcast;

async fn wait_for(
	rx: &mut broadcast::Receiver<Invalidation>,
	wanted: impl Fn(&Invalidation) -> bool,
) -> bool {
	let deadline = tokio::time::sleep(Duration::from_secs(10));
	tokio::pin!(deadline);
	loop {
		tokio::select! {
			_ = &mut deadline => return false,
			received = rx.recv() => match received {
				Ok(change) if wanted(&change) => return true,
				Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => continue,
				Err(broadcast::error::RecvError::Closed) => return false,
			},
		}
	}
}

#[tokio::test]
async fn test_edit_is_picked_up_by_running_hook() {
	let dir = TempDir::new().unwrap();
	let path = dir.path().join("alert.component");
	fs::write(&path, "export Alert = { render: `v1` }").unwrap();

	let registry = Arc::new(ComponentRegistry::new(RegistryConfig::new(dir.path())));
	registry.preload(dir.path()).unwrap();
	let hook = InvalidationHook::new(Arc::clone(&registry));
	let mut changes = hook.subscribe();
	let task = hook.start().unwrap();

	fs::write(&path, "export Alert = { render: `v2` }").unwrap();
	let alert = ComponentName::new("Alert").unwrap();
	assert!(wait_for(&mut changes, |c| *c == Invalidation::Reloaded(alert.clone())).await);

	let rendered = registry.resolve("Alert").unwrap().render(&Props::new()).unwrap();
	assert_eq!(rendered, "v2");

	task.abort();
}

#[tokio::test]
async fn test_deletion_is_picked_up_by_running_hook() {
	let dir = TempDir::new().unwrap();
	let path = dir.path().join("alert.component");
	fs::write(&path, "export Alert = { render: `v1` }").unwrap();

	let registry = Arc::new(ComponentRegistry::new(RegistryConfig::new(dir.path())));
	registry.preload(dir.path()).unwrap();
	let hook = InvalidationHook::new(Arc::clone(&registry));
	let mut changes = hook.subscribe();
	let task = hook.start().unwrap();

	fs::remove_file(&path).unwrap();
	assert!(wait_for(&mut changes, |c| matches!(c, Invalidation::Evicted(_))).await);
	assert!(!registry.contains("Alert"));

	task.abort();
}
