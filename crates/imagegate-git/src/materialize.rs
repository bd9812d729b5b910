//! Revision materializer.
//!
//! Reproduces a two-commit comparison in an empty clone path with the
//! minimum history needed. Callers must not assume any ancestor beyond
//! the fetched depth is present.

use crate::client::{FetchDepth, GitClient};
use crate::error::GitError;
use crate::executor::GitExecutor;
use imagegate_core::{ChangeSet, RevisionRef};

/// Working tree state after materialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Materialized {
    /// Commit the change set is computed from
    pub base_commit: String,
    /// Commit checked out in the working tree
    pub head_commit: String,
    pub changes: ChangeSet,
}

pub struct Materializer<E: GitExecutor> {
    git: GitClient<E>,
    remote: String,
}

impl<E: GitExecutor> Materializer<E> {
    pub fn new(git: GitClient<E>, remote: impl Into<String>) -> Self {
        Self {
            git,
            remote: remote.into(),
        }
    }

    pub fn git(&self) -> &GitClient<E> {
        &self.git
    }

    /// Check out `head` and diff it against `base`.
    ///
    /// `base` is fetched at depth 1; `head` is fetched with full history.
    pub async fn materialize_pr(
        &self,
        repo_url: &str,
        base: &RevisionRef,
        head: &RevisionRef,
    ) -> Result<Materialized, MaterializeError> {
        self.prepare(repo_url, &base.local_ref).await?;

        self.fetch(base, FetchDepth::Shallow(1)).await?;
        self.fetch(head, FetchDepth::Full).await?;
        self.checkout(head).await?;

        let base_commit = self.resolve(&base.local_ref).await?;
        let head_commit = self.resolve(&head.local_ref).await?;
        let changes = self.diff(&base_commit, &head_commit).await?;

        Ok(Materialized {
            base_commit,
            head_commit,
            changes,
        })
    }

    /// Check out `target` and diff it against its only parent.
    ///
    /// Root and merge commits are rejected before the checkout.
    pub async fn materialize_commit(
        &self,
        repo_url: &str,
        target: &RevisionRef,
    ) -> Result<Materialized, MaterializeError> {
        self.prepare(repo_url, &target.local_ref).await?;

        self.fetch(target, FetchDepth::Shallow(2)).await?;

        let head_commit = self.resolve(&target.local_ref).await?;
        let parents = self
            .git
            .parents(&head_commit)
            .await
            .map_err(|e| MaterializeError::Parents {
                commit: head_commit.clone(),
                source: e,
            })?;

        let base_commit = match <[String; 1]>::try_from(parents) {
            Ok([parent]) => parent,
            Err(parents) => {
                tracing::warn!(
                    commit = %head_commit,
                    parents = parents.len(),
                    "commit does not have exactly one parent"
                );
                return Err(MaterializeError::NotSingleParent {
                    commit: head_commit,
                    parents: parents.len(),
                });
            }
        };

        self.checkout(target).await?;
        let changes = self.diff(&base_commit, &head_commit).await?;

        Ok(Materialized {
            base_commit,
            head_commit,
            changes,
        })
    }

    async fn prepare(&self, repo_url: &str, default_branch: &str) -> Result<(), MaterializeError> {
        tracing::info!(
            repo_url,
            clone_path = %self.git.repo_dir().display(),
            "initializing clone"
        );
        self.git
            .init(default_branch)
            .await
            .map_err(|e| MaterializeError::Init { source: e })?;
        self.git
            .add_remote(&self.remote, repo_url)
            .await
            .map_err(|e| MaterializeError::Remote { source: e })
    }

    async fn fetch(&self, rev: &RevisionRef, depth: FetchDepth) -> Result<(), MaterializeError> {
        tracing::info!(hash = %rev.hash, local_ref = %rev.local_ref, ?depth, "fetching revision");
        self.git
            .fetch(&self.remote, rev, depth)
            .await
            .map_err(|e| MaterializeError::Fetch {
                hash: rev.hash.clone(),
                source: e,
            })
    }

    async fn checkout(&self, rev: &RevisionRef) -> Result<(), MaterializeError> {
        self.git
            .checkout(&rev.local_ref)
            .await
            .map_err(|e| MaterializeError::Checkout {
                local_ref: rev.local_ref.clone(),
                source: e,
            })
    }

    async fn resolve(&self, local_ref: &str) -> Result<String, MaterializeError> {
        self.git
            .resolve_commit(local_ref)
            .await
            .map_err(|e| MaterializeError::Resolve {
                rev: local_ref.to_owned(),
                source: e,
            })
    }

    async fn diff(&self, from: &str, to: &str) -> Result<ChangeSet, MaterializeError> {
        let changes = self
            .git
            .changed_paths(from, to)
            .await
            .map_err(|e| MaterializeError::Diff { source: e })?;
        tracing::info!(from, to, changed = changes.len(), "computed change set");
        for path in &changes {
            tracing::debug!(%path, "changed");
        }
        Ok(changes)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MaterializeError {
    #[error("error in init")]
    Init { source: GitError },

    #[error("error in remote")]
    Remote { source: GitError },

    #[error("error in fetch of {hash}")]
    Fetch { hash: String, source: GitError },

    #[error("error in checkout of {local_ref}")]
    Checkout { local_ref: String, source: GitError },

    #[error("error in resolve of {rev}")]
    Resolve { rev: String, source: GitError },

    #[error("error in parents of {commit}")]
    Parents { commit: String, source: GitError },

    #[error("error in diff")]
    Diff { source: GitError },

    #[error("commit {commit} has {parents} parents; exactly one is required")]
    NotSingleParent { commit: String, parents: usize },
}
