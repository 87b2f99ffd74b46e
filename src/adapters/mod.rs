//! External integrations for Spool.
//!
//! This module provides adapters between the core relay and the outside
//! world:
//!
//! - [`storage`] - Attachment storage (trait-based, local filesystem
//!   implementation)
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern** to isolate external dependencies
//! and enable testing with mock implementations. The storage layer uses
//! trait-based abstraction so additional backends can be added without
//! touching callers.
//!
//! # Storage Adapter
//!
//! ```rust,no_run
//! use spool::adapters::storage::{LocalStorageService, StorageService};
//! use spool::config::{RelayConfig, StorageConfig};
//! use spool::core::relay::StreamService;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let stream = Arc::new(StreamService::new(RelayConfig::default()));
//! let storage = LocalStorageService::new(&StorageConfig::default(), stream)?;
//!
//! let key = storage
//!     .save_from(
//!         |mut sink| async move { sink.write(b"report body").await },
//!         Some(11),
//!         None,
//!         None,
//!     )
//!     .await?;
//!
//! let _data = storage.get_data(&key).await?;
//! # Ok(())
//! # }
//! ```

pub mod storage;
