//! Domain models and types for Spool.
//!
//! This module contains the core domain types and business rules for Spool.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`ModuleId`], [`StorageKey`])
//! - **Error types** ([`SpoolError`], [`RelayError`], [`StorageError`])
//! - **Result type alias** ([`Result`])
//!
//! # Type Safety
//!
//! Spool uses the newtype pattern for identifiers so that validation happens
//! once, at the boundary:
//!
//! ```rust
//! use spool::domain::{ModuleId, StorageKey};
//!
//! # fn example() -> Result<(), String> {
//! let module_id = ModuleId::new("lab_reports")?;
//! let key = StorageKey::new("lab_reports/2025/01/report.pdf")?;
//!
//! // Keys that escape the storage root never construct
//! assert!(StorageKey::new("../outside").is_err());
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, SpoolError>`]:
//!
//! ```rust
//! use spool::domain::{Result, SpoolError};
//!
//! fn example() -> Result<()> {
//!     Err(SpoolError::Validation("Invalid input".to_string()))
//! }
//! ```

pub mod errors;
pub mod keys;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::{RelayError, SpoolError, StorageError};
pub use keys::{ModuleId, StorageKey};
pub use result::Result;
