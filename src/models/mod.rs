//! Data models for FitLock
//!
//! This module contains the core data structures:
//! - App catalog entries and the catalog itself
//! - Persisted workout history records
//! - Enums for state management

pub mod catalog;
pub mod enums;
pub mod history;

// Re-exports for convenient access
pub use catalog::{Catalog, CatalogItem};
pub use enums::{FlowState, PermissionStatus, SelectionKind};
pub use history::{total_reps, HistoryRecord};
