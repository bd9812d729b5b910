//! Inputs and intermediate values of a single revision comparison.

use std::collections::BTreeSet;

/// A point in history and the local branch it is fetched into.
///
/// # Examples
///
/// ```
/// use imagegate_core::RevisionRef;
///
/// let pr = RevisionRef::new("3f2a9c1", "pr-42");
/// assert_eq!(pr.refspec(), "+3f2a9c1:refs/heads/pr-42");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionRef {
    /// Revision id as known by the remote (usually a commit sha)
    pub hash: String,
    /// Local branch name the revision is stored under
    pub local_ref: String,
}

impl RevisionRef {
    pub fn new(hash: impl Into<String>, local_ref: impl Into<String>) -> Self {
        Self {
            hash: hash.into(),
            local_ref: local_ref.into(),
        }
    }

    /// Force-updating refspec mapping the remote revision onto the local branch.
    pub fn refspec(&self) -> String {
        format!("+{}:refs/heads/{}", self.hash, self.local_ref)
    }
}

/// The build-relevant part of the repository.
///
/// An empty `context_dir` means the target has no scoped inputs and is
/// always rebuilt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildScope {
    /// Repository-relative path of the Dockerfile
    pub dockerfile: String,
    /// Repository-relative docker context directory
    pub context_dir: String,
}

impl BuildScope {
    pub fn new(dockerfile: impl Into<String>, context_dir: impl Into<String>) -> Self {
        Self {
            dockerfile: dockerfile.into(),
            context_dir: context_dir.into(),
        }
    }
}

/// Push destination for commit builds.
///
/// Components are concatenated verbatim; each must already be a valid
/// partial image reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildTarget {
    /// Registry host including trailing slash, or blank for Docker Hub
    pub registry: String,
    pub repo_prefix: String,
    /// Suffix distinguishing images in a monorepo, may be blank
    pub repo_suffix: String,
    pub tag: String,
}

impl BuildTarget {
    /// `<registry><repo_prefix><repo_suffix>:<tag>`
    ///
    /// ```
    /// use imagegate_core::BuildTarget;
    ///
    /// let target = BuildTarget {
    ///     registry: "ghcr.io/".to_owned(),
    ///     repo_prefix: "acme/shop".to_owned(),
    ///     repo_suffix: "-api".to_owned(),
    ///     tag: "3f2a9c1".to_owned(),
    /// };
    /// assert_eq!(target.destination(), "ghcr.io/acme/shop-api:3f2a9c1");
    /// ```
    pub fn destination(&self) -> String {
        format!(
            "{}{}{}:{}",
            self.registry, self.repo_prefix, self.repo_suffix, self.tag
        )
    }
}

/// Repository-relative paths touched between two commits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    paths: BTreeSet<String>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if the path was already present.
    pub fn insert(&mut self, path: impl Into<String>) -> bool {
        self.paths.insert(path.into())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ChangeSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            paths: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ChangeSet {
    type Item = &'a String;
    type IntoIter = std::collections::btree_set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.iter()
    }
}
