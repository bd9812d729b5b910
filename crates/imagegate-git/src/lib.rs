//! Version-control collaborator for imagegate.
//!
//! [`GitClient`] exposes the handful of git capabilities the gate needs
//! (init, remote, fetch, checkout, resolve, parents, diff) on top of a
//! [`GitExecutor`]. [`Materializer`] drives them to turn a repository URL
//! and one or two revisions into a checked-out working tree plus the
//! [`ChangeSet`](imagegate_core::ChangeSet) between the two commits.
//!
//! # Fetch depths
//!
//! ```text
//! pr      base  --depth=1   head  (full)   diff base..head
//! commit  target --depth=2                  diff parent..target
//! ```

pub mod client;
pub mod error;
pub mod executor;
pub mod materialize;

pub use client::{FetchDepth, GitClient};
pub use error::GitError;
pub use executor::{GitExecutor, RealExecutor};
pub use materialize::{MaterializeError, Materialized, Materializer};
