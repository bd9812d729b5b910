use imagegate_core::{BuildScope, BuildTarget, BuilderConfig};
use std::path::{Path, PathBuf};

/// Whether the built image is pushed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildMode {
    /// Build all layers, push nothing
    Verify,
    /// Build and push to the destination
    Push(BuildTarget),
}

/// A fully resolved builder command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuilderInvocation {
    /// Executable to run
    pub program: PathBuf,
    /// argv[0] seen by the builder
    pub arg0: String,
    /// Arguments after argv[0]
    pub args: Vec<String>,
}

impl BuilderInvocation {
    pub fn new(
        config: &BuilderConfig,
        clone_path: &Path,
        scope: &BuildScope,
        mode: &BuildMode,
    ) -> Self {
        let clone = clone_path.display();
        let mut args = vec![
            format!("--dockerfile={clone}/{}", scope.dockerfile),
            format!("--context=dir://{clone}/{}", scope.context_dir),
        ];
        match mode {
            BuildMode::Verify => args.push("--no-push".to_owned()),
            BuildMode::Push(target) => {
                args.push(format!("--destination={}", target.destination()));
            }
        }
        args.extend(config.extra_args.iter().cloned());

        Self {
            program: PathBuf::from(&config.path),
            arg0: config.name.clone(),
            args,
        }
    }

    /// Build without pushing (pull requests).
    pub fn for_pr(config: &BuilderConfig, clone_path: &Path, scope: &BuildScope) -> Self {
        Self::new(config, clone_path, scope, &BuildMode::Verify)
    }

    /// Build and push to `target` (commits).
    pub fn for_commit(
        config: &BuilderConfig,
        clone_path: &Path,
        scope: &BuildScope,
        target: &BuildTarget,
    ) -> Self {
        Self::new(config, clone_path, scope, &BuildMode::Push(target.clone()))
    }

    /// argv as the builder receives it, argv[0] included.
    pub fn argv(&self) -> Vec<String> {
        std::iter::once(self.arg0.clone())
            .chain(self.args.iter().cloned())
            .collect()
    }
}
