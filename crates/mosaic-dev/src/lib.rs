//! # Mosaic Dev
//!
//! Development-time file watching for Mosaic. A [`FileWatcher`] reports
//! changes under the components directory and an [`InvalidationHook`]
//! applies them to the shared registry, so edited components show up on the
//! next mount without a restart.
//!
//! ## Example
//!
//! ```rust,no_run
//! use mosaic_components::{ComponentRegistry, RegistryConfig};
//! use mosaic_dev::InvalidationHook;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), mosaic_dev::WatchError> {
//!     let registry = Arc::new(ComponentRegistry::new(RegistryConfig::new("components")));
//!     let hook = InvalidationHook::new(Arc::clone(&registry));
//!     let mut changes = hook.subscribe();
//!     let _task = hook.start()?;
//!
//!     while let Ok(change) = changes.recv().await {
//!         println!("registry updated: {:?}", change);
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod invalidation;
pub mod watcher;

pub use error::{Result, WatchError};
pub use invalidation::{Invalidation, InvalidationHook};
pub use watcher::{FileWatcher, FileWatcherBuilder, WatchEvent};
