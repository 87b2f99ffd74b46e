//! Attachment storage abstraction
//!
//! This module defines the trait that storage backends implement, plus the
//! local filesystem implementation. Stored data is addressed by
//! `/`-separated keys, optionally namespaced by a module id; keys for data
//! saved without an explicit suffix are generated as `yyyy/MM/<uuid>`.

pub mod local;

pub use local::LocalStorageService;

use crate::core::relay::ByteSource;
use crate::domain::keys::ModuleId;
use crate::domain::Result;
use async_trait::async_trait;

/// Storage backend trait for attachment data
///
/// All operations take and return plain key strings; construction and
/// validation of keys is the implementation's concern so callers can't
/// bypass it.
#[async_trait]
pub trait StorageService: Send + Sync {
    /// Store a byte source and return the key it was stored under
    ///
    /// With no `key_suffix`, a date-grouped unique key is generated. With a
    /// `module_id`, the key is prefixed with the module's namespace.
    ///
    /// # Errors
    ///
    /// Returns an error if the key already exists, is invalid, or the copy
    /// fails. A failed copy leaves no file behind.
    async fn save_data(
        &self,
        source: ByteSource,
        module_id: Option<&ModuleId>,
        key_suffix: Option<&str>,
    ) -> Result<String>;

    /// Store a byte source in the temporary staging area
    ///
    /// Returns a generated key usable with
    /// [`get_temp_data`](Self::get_temp_data) and
    /// [`purge_data`](Self::purge_data).
    async fn save_temp_data(&self, source: ByteSource) -> Result<String>;

    /// Fetch stored data by key
    ///
    /// # Errors
    ///
    /// Returns an error if no data is stored under the key.
    async fn get_data(&self, key: &str) -> Result<ByteSource>;

    /// Fetch temporary data by the key returned from
    /// [`save_temp_data`](Self::save_temp_data)
    async fn get_temp_data(&self, key: &str) -> Result<ByteSource>;

    /// List keys under a module namespace matching a key prefix
    ///
    /// Only the directory named by the prefix is listed: files are returned
    /// as full keys, child directories once each with a trailing `/`.
    async fn get_keys(&self, module_id: Option<&ModuleId>, prefix: &str) -> Result<Vec<String>>;

    /// Whether data is stored under the key
    async fn exists(&self, key: &str) -> Result<bool>;

    /// Delete data stored under the key
    ///
    /// Returns `true` when data was deleted, `false` when nothing was
    /// stored under the key.
    async fn purge_data(&self, key: &str) -> Result<bool>;
}
