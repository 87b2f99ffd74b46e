//! Storage identifier types with validation
//!
//! This module provides newtype wrappers for storage identifiers.
//! Each type ensures type safety and validates format on construction.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Module identifier newtype wrapper
///
/// Represents the namespace a piece of stored data belongs to. Module ids
/// may contain ASCII letters, digits, `_`, `-`, `.` and `/`; anything else
/// is rejected so that ids always map to a safe directory prefix.
///
/// # Examples
///
/// ```
/// use spool::domain::keys::ModuleId;
/// use std::str::FromStr;
///
/// let module_id = ModuleId::from_str("lab_reports").unwrap();
/// assert_eq!(module_id.as_str(), "lab_reports");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModuleId(String);

impl ModuleId {
    /// Creates a new ModuleId from a string
    ///
    /// # Arguments
    ///
    /// * `id` - The module identifier string
    ///
    /// # Returns
    ///
    /// Returns `Ok(ModuleId)` if the id is valid, `Err` otherwise
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Module id cannot be empty".to_string());
        }
        if !id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '/'))
        {
            return Err(format!(
                "Module id may only contain letters, digits, '_', '-', '.' and '/', got: {}",
                id
            ));
        }
        Ok(Self(id))
    }

    /// Returns the module id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ModuleId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for ModuleId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Storage key newtype wrapper
///
/// Represents a relative key under the storage root. Keys are `/`-separated
/// and must stay inside the storage directory: absolute keys and keys whose
/// `..` segments would climb above the root are rejected.
///
/// # Examples
///
/// ```
/// use spool::domain::keys::StorageKey;
/// use std::str::FromStr;
///
/// let key = StorageKey::from_str("lab_reports/2025/01/report.pdf").unwrap();
/// assert_eq!(key.as_str(), "lab_reports/2025/01/report.pdf");
///
/// assert!(StorageKey::from_str("/etc/passwd").is_err());
/// assert!(StorageKey::from_str("../outside").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StorageKey(String);

impl StorageKey {
    /// Creates a new StorageKey from a string
    ///
    /// # Arguments
    ///
    /// * `key` - The storage key string
    ///
    /// # Returns
    ///
    /// Returns `Ok(StorageKey)` if the key is a relative path that stays
    /// inside the storage root, `Err` otherwise
    pub fn new(key: impl Into<String>) -> Result<Self, String> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err("Key cannot be empty".to_string());
        }
        if key.starts_with('/') {
            return Err(format!(
                "Key must not point outside storage dir. Wrong key: {}",
                key
            ));
        }
        // Lexical traversal check: every `..` must be matched by a preceding
        // normal segment, otherwise the key escapes the root.
        let mut depth: i32 = 0;
        for segment in key.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    depth -= 1;
                    if depth < 0 {
                        return Err(format!(
                            "Key must not point outside storage dir. Wrong key: {}",
                            key
                        ));
                    }
                }
                _ => depth += 1,
            }
        }
        Ok(Self(key))
    }

    /// Returns the key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for StorageKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for StorageKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_module_id_creation() {
        let id = ModuleId::new("lab_reports").unwrap();
        assert_eq!(id.as_str(), "lab_reports");
    }

    #[test]
    fn test_module_id_empty_fails() {
        assert!(ModuleId::new("").is_err());
        assert!(ModuleId::new("   ").is_err());
    }

    #[test_case("test10-.a/10" ; "dash dot slash digits")]
    #[test_case("test_module" ; "underscore")]
    #[test_case("a.b.c" ; "dotted")]
    fn test_module_id_allowed_characters(id: &str) {
        assert!(ModuleId::new(id).is_ok());
    }

    #[test_case("test10$-.a/10" ; "dollar")]
    #[test_case("test10-.a/10," ; "comma")]
    #[test_case("test10-.a/10=" ; "equals")]
    #[test_case("test10-.a/10\\" ; "backslash")]
    #[test_case("@test10-.a/10" ; "at sign")]
    #[test_case("test!10-.a/10" ; "bang")]
    #[test_case("t[est10-.a/10" ; "bracket")]
    fn test_module_id_bad_characters(id: &str) {
        assert!(ModuleId::new(id).is_err());
    }

    #[test]
    fn test_module_id_display() {
        let id = ModuleId::new("radiology").unwrap();
        assert_eq!(format!("{}", id), "radiology");
    }

    #[test]
    fn test_module_id_from_str() {
        let id: ModuleId = "radiology".parse().unwrap();
        assert_eq!(id.as_str(), "radiology");
    }

    #[test]
    fn test_storage_key_creation() {
        let key = StorageKey::new("lab_reports/2025/01/report.pdf").unwrap();
        assert_eq!(key.as_str(), "lab_reports/2025/01/report.pdf");
    }

    #[test]
    fn test_storage_key_rejects_absolute() {
        let err = StorageKey::new("/test").unwrap_err();
        assert_eq!(err, "Key must not point outside storage dir. Wrong key: /test");
    }

    #[test]
    fn test_storage_key_rejects_traversal() {
        assert!(StorageKey::new("../test").is_err());
        assert!(StorageKey::new("a/../../test").is_err());
    }

    #[test]
    fn test_storage_key_allows_internal_parent_segments() {
        // `a/../b` never leaves the root
        assert!(StorageKey::new("a/../b").is_ok());
    }

    #[test]
    fn test_storage_key_empty_fails() {
        assert!(StorageKey::new("").is_err());
    }

    #[test]
    fn test_storage_key_serialization() {
        let key = StorageKey::new("x/y/z").unwrap();
        let json = serde_json::to_string(&key).unwrap();
        let deserialized: StorageKey = serde_json::from_str(&json).unwrap();
        assert_eq!(key, deserialized);
    }
}
