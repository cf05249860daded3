//! Core archive automation for metapack
//!
//! This crate provides:
//! - The archive engine (full-rebuild compression, extraction, deletion)
//! - The re-entrancy guard for compression passes
//! - Project layout discovery and persisted configuration
//! - Host-collaborator interfaces (asset labels, asset refresh)
//! - The top-level operation boundary and first-run bootstrap gate

pub mod bootstrap;
pub mod config;
pub mod engine;
pub mod guard;
pub mod host;
pub mod layout;
pub mod ops;

// Re-exports
pub use config::Config;
pub use engine::{CompressOutcome, EngineError, ExtractOutcome};
pub use guard::{RunGuard, RunPermit};
pub use host::{AssetLabels, AssetRefresher, FsLabels, HookRefresher};
pub use layout::Layout;
pub use ops::{CleanStatus, CompressStatus, ExtractStatus, Organizer};
