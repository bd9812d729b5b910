//! Core types and pure logic for imagegate.
//!
//! This crate defines the revision and scope inputs ([`RevisionRef`],
//! [`BuildScope`], [`BuildTarget`]), the change set produced by a
//! two-commit diff ([`ChangeSet`]), the build decision engine
//! ([`decide`]), the skip-status file protocol ([`status`]), and the
//! `imagegate.toml` schema ([`GateConfig`]).

pub mod config;
pub mod decision;
pub mod error;
pub mod revision;
pub mod status;

pub use config::{BuilderConfig, GateConfig, GitConfig};
pub use decision::{BuildDecision, Trigger, decide, trigger};
pub use error::{Error, Result};
pub use revision::{BuildScope, BuildTarget, ChangeSet, RevisionRef};
pub use status::{SKIPPED_STATUS, SkipStatus, StatusError};
