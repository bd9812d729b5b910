use crate::error::GitError;
use crate::executor::{GitExecutor, RealExecutor};
use imagegate_core::{ChangeSet, RevisionRef};
use std::path::{Path, PathBuf};

/// How much history a fetch brings in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchDepth {
    /// `--depth=N` commits from the fetched tip
    Shallow(u32),
    /// Unrestricted history
    Full,
}

/// git operations on a single clone path, parameterized over the executor for testability.
pub struct GitClient<E: GitExecutor = RealExecutor> {
    executor: E,
    repo_dir: PathBuf,
}

impl GitClient<RealExecutor> {
    pub fn new(repo_dir: impl Into<PathBuf>) -> Self {
        Self::with_executor(RealExecutor::default(), repo_dir)
    }
}

impl<E: GitExecutor> GitClient<E> {
    pub fn with_executor(executor: E, repo_dir: impl Into<PathBuf>) -> Self {
        Self {
            executor,
            repo_dir: repo_dir.into(),
        }
    }

    pub fn repo_dir(&self) -> &Path {
        &self.repo_dir
    }

    // ── Setup ──

    /// Initialize (or reinitialize) a repository at the clone path.
    pub async fn init(&self, default_branch: &str) -> Result<(), GitError> {
        let dir = self.dir_arg()?;
        let branch = format!("--initial-branch={default_branch}");
        self.executor
            .exec(&args(["init", "--quiet", &branch, dir]))
            .await?;
        Ok(())
    }

    pub async fn add_remote(&self, name: &str, url: &str) -> Result<(), GitError> {
        self.exec_in_repo(&["remote", "add", name, url]).await?;
        Ok(())
    }

    // ── History ──

    /// Fetch `rev.hash` into `refs/heads/<rev.local_ref>`, without tags.
    ///
    /// `--update-head-ok` is needed because the freshly initialized HEAD
    /// already points at the branch being fetched into.
    pub async fn fetch(
        &self,
        remote: &str,
        rev: &RevisionRef,
        depth: FetchDepth,
    ) -> Result<(), GitError> {
        let refspec = rev.refspec();
        let depth_flag = match depth {
            FetchDepth::Shallow(n) => Some(format!("--depth={n}")),
            FetchDepth::Full => None,
        };

        let mut cmd = vec!["fetch", "--quiet", "--no-tags", "--update-head-ok"];
        if let Some(flag) = &depth_flag {
            cmd.push(flag);
        }
        cmd.push(remote);
        cmd.push(&refspec);

        self.exec_in_repo(&cmd).await?;
        Ok(())
    }

    /// Check out a local branch, discarding whatever the index and tree hold.
    pub async fn checkout(&self, local_ref: &str) -> Result<(), GitError> {
        self.exec_in_repo(&["checkout", "--quiet", "--force", local_ref])
            .await?;
        Ok(())
    }

    /// Resolve a revision identifier to a full commit id.
    pub async fn resolve_commit(&self, rev: &str) -> Result<String, GitError> {
        let spec = format!("{rev}^{{commit}}");
        let output = self.exec_in_repo(&["rev-parse", "--verify", &spec]).await?;
        Ok(output.trim().to_owned())
    }

    /// Parent commit ids of `commit`, in order.
    pub async fn parents(&self, commit: &str) -> Result<Vec<String>, GitError> {
        let output = self
            .exec_in_repo(&["log", "-1", "--format=%P", commit])
            .await?;
        Ok(output.split_whitespace().map(str::to_owned).collect())
    }

    // ── Diff ──

    /// Paths that differ between two commits, on either side.
    ///
    /// Rename detection is off so a move reports both the old and the new path.
    /// Paths that are not valid UTF-8 are decoded lossily rather than failing
    /// the whole diff.
    pub async fn changed_paths(&self, from: &str, to: &str) -> Result<ChangeSet, GitError> {
        let output = self
            .exec_in_repo_bytes(&[
                "diff",
                "--name-only",
                "--no-renames",
                "--no-ext-diff",
                "-z",
                from,
                to,
            ])
            .await?;

        Ok(output
            .split(|b| *b == b'\0')
            .filter(|p| !p.is_empty())
            .map(String::from_utf8_lossy)
            .collect())
    }

    // ── Helpers ──

    fn dir_arg(&self) -> Result<&str, GitError> {
        self.repo_dir
            .to_str()
            .ok_or_else(|| GitError::InvalidPath(self.repo_dir.clone()))
    }

    async fn exec_in_repo(&self, cmd: &[&str]) -> Result<String, GitError> {
        self.executor.exec(&self.repo_args(cmd)?).await
    }

    async fn exec_in_repo_bytes(&self, cmd: &[&str]) -> Result<Vec<u8>, GitError> {
        self.executor.exec_bytes(&self.repo_args(cmd)?).await
    }

    fn repo_args(&self, cmd: &[&str]) -> Result<Vec<String>, GitError> {
        let dir = self.dir_arg()?;
        let mut full = Vec::with_capacity(cmd.len() + 2);
        full.push("-C".to_owned());
        full.push(dir.to_owned());
        full.extend(cmd.iter().map(|s| (*s).to_owned()));
        Ok(full)
    }
}

fn args<const N: usize>(a: [&str; N]) -> Vec<String> {
    a.iter().map(|s| (*s).to_owned()).collect()
}
