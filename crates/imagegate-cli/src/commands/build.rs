use super::{BuildCommitArgs, BuildPrArgs, ScopeArgs};
use anyhow::Context;
use imagegate_build::BuilderInvocation;
use imagegate_core::{GateConfig, status};

/// Build a PR image in an existing clone, unless skipped.
pub fn build_pr(config: &GateConfig, args: BuildPrArgs) -> anyhow::Result<()> {
    tracing::info!(
        clone_path = %args.scope.clone_path.display(),
        dockerfile = %args.scope.dockerfile,
        docker_context_dir = %args.scope.docker_context_dir,
        status_file = %args.scope.status_file.display(),
        "PR build"
    );

    if is_skipped(&args.scope)? {
        return Ok(());
    }

    let invocation =
        BuilderInvocation::for_pr(&config.builder, &args.scope.clone_path, &args.scope.scope());
    super::handoff(&invocation)
}

/// Build and push a commit image in an existing clone, unless skipped.
pub fn build_commit(config: &GateConfig, args: BuildCommitArgs) -> anyhow::Result<()> {
    tracing::info!(
        clone_path = %args.scope.clone_path.display(),
        revision_hash = %args.revision.revision_hash,
        revision_ref = %args.revision.revision_ref,
        dockerfile = %args.scope.dockerfile,
        docker_context_dir = %args.scope.docker_context_dir,
        status_file = %args.scope.status_file.display(),
        image_registry = %args.image.image_registry,
        image_repo = %args.image.image_repo,
        dockerfile_dir = %args.image.dockerfile_dir,
        "commit build"
    );

    if is_skipped(&args.scope)? {
        return Ok(());
    }

    let invocation = BuilderInvocation::for_commit(
        &config.builder,
        &args.scope.clone_path,
        &args.scope.scope(),
        &args.image.target(&args.revision.revision_hash),
    );
    super::handoff(&invocation)
}

fn is_skipped(scope: &ScopeArgs) -> anyhow::Result<bool> {
    let skipped = status::read_status(&scope.status_file)
        .context("error checking skip status")?
        .is_skipped();

    if skipped {
        println!("Build is skipped. Exiting early");
    } else {
        println!("Continuing build");
    }
    Ok(skipped)
}
