use super::{CheckCommitArgs, CheckPrArgs, ScopeArgs};
use imagegate_build::BuilderInvocation;
use imagegate_core::{BuildDecision, GateConfig, RevisionRef, status};
use imagegate_git::{GitClient, Materializer, RealExecutor};

/// Fetch base and PR head, decide, then record the skip or build without pushing.
pub async fn check_pr(config: &GateConfig, args: CheckPrArgs) -> anyhow::Result<()> {
    tracing::info!(
        repo_url = %args.repo_url,
        base = %args.base_revision_hash,
        head = %args.pr_revision_hash,
        clone_path = %args.scope.clone_path.display(),
        dockerfile = %args.scope.dockerfile,
        docker_context_dir = %args.scope.docker_context_dir,
        status_file = %args.scope.status_file.display(),
        "PR check"
    );

    let base = RevisionRef::new(args.base_revision_hash, args.base_revision_ref);
    let head = RevisionRef::new(args.pr_revision_hash, args.pr_revision_ref);

    println!("Fetching {} and {}...", base.hash, head.hash);
    let materialized = materializer(config, &args.scope)
        .materialize_pr(&args.repo_url, &base, &head)
        .await?;

    if !record(&args.scope, &materialized.changes)? || args.check_only {
        return Ok(());
    }

    let invocation =
        BuilderInvocation::for_pr(&config.builder, &args.scope.clone_path, &args.scope.scope());
    super::handoff(&invocation)
}

/// Fetch a commit and its parent, decide, then record the skip or build and push.
pub async fn check_commit(config: &GateConfig, args: CheckCommitArgs) -> anyhow::Result<()> {
    tracing::info!(
        repo_url = %args.repo_url,
        revision = %args.revision.revision_hash,
        clone_path = %args.scope.clone_path.display(),
        dockerfile = %args.scope.dockerfile,
        docker_context_dir = %args.scope.docker_context_dir,
        status_file = %args.scope.status_file.display(),
        "commit check"
    );

    let target = RevisionRef::new(
        args.revision.revision_hash.clone(),
        args.revision.revision_ref.clone(),
    );

    println!("Fetching {}...", target.hash);
    let materialized = materializer(config, &args.scope)
        .materialize_commit(&args.repo_url, &target)
        .await?;

    if !record(&args.scope, &materialized.changes)? || args.check_only {
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

fn materializer(config: &GateConfig, scope: &ScopeArgs) -> Materializer<RealExecutor> {
    let git = GitClient::with_executor(
        RealExecutor::new(config.git.program.as_str()),
        &scope.clone_path,
    );
    Materializer::new(git, config.git.remote.as_str())
}

/// Decide, write the status file on skip, and report whether a build is needed.
fn record(scope: &ScopeArgs, changes: &imagegate_core::ChangeSet) -> anyhow::Result<bool> {
    let decision = super::evaluate(changes, &scope.scope());
    status::record(&scope.status_file, decision)?;

    match decision {
        BuildDecision::Skip => {
            println!(
                "No changes to {} or {}. Build skipped",
                scope.dockerfile, scope.docker_context_dir
            );
            Ok(false)
        }
        BuildDecision::Build => {
            println!("Build required");
            Ok(true)
        }
    }
}
