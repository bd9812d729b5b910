mod build;
mod check;

use clap::Args;
use imagegate_build::BuilderInvocation;
use imagegate_core::{BuildDecision, BuildScope, BuildTarget, ChangeSet, Trigger};
use std::path::PathBuf;

pub use build::{build_commit, build_pr};
pub use check::{check_commit, check_pr};

/// Clone location and build scope shared by every subcommand.
#[derive(Args, Debug)]
pub struct ScopeArgs {
    /// The path to the cloned repo
    #[arg(long, allow_hyphen_values = true)]
    pub clone_path: PathBuf,

    /// The path to the dockerfile to build, relative to the clone path
    #[arg(long, allow_hyphen_values = true)]
    pub dockerfile: String,

    /// The path to the docker context used for the build. If blank, every change triggers a build
    #[arg(long, allow_hyphen_values = true)]
    pub docker_context_dir: String,

    /// The status file shared by check and build. If its content is Skipped,
    /// no image build is performed and the command exits successfully
    #[arg(long, allow_hyphen_values = true)]
    pub status_file: PathBuf,
}

impl ScopeArgs {
    fn scope(&self) -> BuildScope {
        BuildScope::new(&self.dockerfile, &self.docker_context_dir)
    }
}

#[derive(Args, Debug)]
pub struct RevisionArgs {
    /// The revision id (e.g. commit sha hash)
    #[arg(long, allow_hyphen_values = true)]
    pub revision_hash: String,

    /// The ref that will be used locally
    #[arg(long, allow_hyphen_values = true)]
    pub revision_ref: String,
}

#[derive(Args, Debug)]
pub struct ImageArgs {
    /// The image registry used for pushing images. Set to blank to use docker hub
    #[arg(long, allow_hyphen_values = true)]
    pub image_registry: String,

    /// The image repo used for pushing images. Typically the repo name
    #[arg(long, allow_hyphen_values = true)]
    pub image_repo: String,

    /// Suffix of the image repo, used to distinguish images in a monorepo. May be blank.
    /// The full image format is: <image-registry><image-repo><dockerfile-dir>:<revision>
    #[arg(long, allow_hyphen_values = true)]
    pub dockerfile_dir: String,
}

impl ImageArgs {
    fn target(&self, tag: &str) -> BuildTarget {
        BuildTarget {
            registry: self.image_registry.clone(),
            repo_prefix: self.image_repo.clone(),
            repo_suffix: self.dockerfile_dir.clone(),
            tag: tag.to_owned(),
        }
    }
}

#[derive(Args, Debug)]
pub struct CheckPrArgs {
    /// The URL of the repository to clone
    #[arg(long, allow_hyphen_values = true)]
    pub repo_url: String,

    /// The base revision id the PR is compared against
    #[arg(long, allow_hyphen_values = true)]
    pub base_revision_hash: String,

    /// The ref the base revision is fetched into
    #[arg(long, allow_hyphen_values = true)]
    pub base_revision_ref: String,

    /// The PR head revision id
    #[arg(long, allow_hyphen_values = true)]
    pub pr_revision_hash: String,

    /// The ref the PR head is fetched into
    #[arg(long, allow_hyphen_values = true)]
    pub pr_revision_ref: String,

    #[command(flatten)]
    pub scope: ScopeArgs,

    /// Decide and record the skip status only; leave the build to `imagegate build`
    #[arg(long)]
    pub check_only: bool,
}

#[derive(Args, Debug)]
pub struct CheckCommitArgs {
    /// The URL of the repository to clone
    #[arg(long, allow_hyphen_values = true)]
    pub repo_url: String,

    #[command(flatten)]
    pub revision: RevisionArgs,

    #[command(flatten)]
    pub scope: ScopeArgs,

    #[command(flatten)]
    pub image: ImageArgs,

    /// Decide and record the skip status only; leave the build to `imagegate build`
    #[arg(long)]
    pub check_only: bool,
}

#[derive(Args, Debug)]
pub struct BuildPrArgs {
    #[command(flatten)]
    pub scope: ScopeArgs,
}

#[derive(Args, Debug)]
pub struct BuildCommitArgs {
    #[command(flatten)]
    pub revision: RevisionArgs,

    #[command(flatten)]
    pub scope: ScopeArgs,

    #[command(flatten)]
    pub image: ImageArgs,
}

/// Classify the change set, logging what triggered a build.
fn evaluate(changes: &ChangeSet, scope: &BuildScope) -> BuildDecision {
    let trigger = imagegate_core::trigger(changes, scope);
    match &trigger {
        Some(Trigger::EmptyContext) => {
            tracing::info!("no docker context dir set, every change triggers a build");
        }
        Some(Trigger::Dockerfile(path)) => tracing::info!(%path, "dockerfile changed"),
        Some(Trigger::Context(path)) => tracing::info!(%path, "docker context changed"),
        None => tracing::info!(
            changed = changes.len(),
            "no changes to the dockerfile or docker context"
        ),
    }
    BuildDecision::from_trigger(trigger.as_ref())
}

/// Replace this process with the image builder.
///
/// A failed handoff leaves nothing meaningful to clean up, so it aborts the
/// invocation instead of returning.
fn handoff(invocation: &BuilderInvocation) -> ! {
    println!(
        "Starting image build using {} with args {:?}",
        invocation.program.display(),
        invocation.argv()
    );
    let Err(err) = invocation.handoff();
    panic!("{:#}", anyhow::Error::new(err));
}
