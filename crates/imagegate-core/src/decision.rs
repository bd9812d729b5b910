//! Build decision engine.
//!
//! Classifies a [`ChangeSet`] against a [`BuildScope`]:
//!
//! ```text
//! context_dir empty                      -> Build
//! any path == dockerfile                 -> Build
//! any path starts with "<context_dir>/"  -> Build
//! otherwise                              -> Skip
//! ```
//!
//! A single qualifying path is enough. Matching on the context directory
//! always includes the trailing separator, so `services/api` does not
//! match `services/apiv2/main.rs`, nor a file named `services/api`.

use crate::revision::{BuildScope, ChangeSet};

/// Path separator used by git for repository-relative paths.
const SEPARATOR: char = '/';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildDecision {
    Build,
    Skip,
}

impl BuildDecision {
    pub fn is_skip(self) -> bool {
        matches!(self, Self::Skip)
    }

    /// Verdict for a [`trigger`] result: any trigger means build.
    pub fn from_trigger(trigger: Option<&Trigger>) -> Self {
        match trigger {
            Some(_) => Self::Build,
            None => Self::Skip,
        }
    }
}

/// What caused a [`BuildDecision::Build`] verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// No context directory configured
    EmptyContext,
    /// The Dockerfile itself changed
    Dockerfile(String),
    /// A path under the context directory changed
    Context(String),
}

/// Decide whether the image has to be rebuilt.
pub fn decide(changes: &ChangeSet, scope: &BuildScope) -> BuildDecision {
    BuildDecision::from_trigger(trigger(changes, scope).as_ref())
}

/// The first reason to build, or `None` when the change set is out of scope.
pub fn trigger(changes: &ChangeSet, scope: &BuildScope) -> Option<Trigger> {
    let dockerfile = scope.dockerfile.trim();
    let context_dir = scope.context_dir.trim();

    if context_dir.is_empty() {
        return Some(Trigger::EmptyContext);
    }

    let prefix = if context_dir.ends_with(SEPARATOR) {
        context_dir.to_owned()
    } else {
        format!("{context_dir}{SEPARATOR}")
    };

    changes.iter().find_map(|path| {
        if path == dockerfile {
            Some(Trigger::Dockerfile(path.to_owned()))
        } else if path.starts_with(&prefix) {
            Some(Trigger::Context(path.to_owned()))
        } else {
            None
        }
    })
}
