//! End-to-end materialization against real git repositories served over `file://`.

use imagegate_core::{BuildDecision, BuildScope, RevisionRef, decide};
use imagegate_git::{GitClient, MaterializeError, Materializer, RealExecutor};
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).unwrap().trim().to_owned()
}

/// Initialize a source repository that serves arbitrary commit ids.
fn init_source(dir: &Path) {
    git(dir, &["init", "--quiet", "--initial-branch=main"]);
    git(dir, &["config", "user.email", "test@test.com"]);
    git(dir, &["config", "user.name", "Test"]);
    git(dir, &["config", "commit.gpgsign", "false"]);
    git(dir, &["config", "uploadpack.allowAnySHA1InWant", "true"]);
}

/// Write the given files, remove the given paths, commit, and return the commit id.
fn commit(dir: &Path, write: &[(&str, &str)], remove: &[&str], message: &str) -> String {
    for (path, content) in write {
        let full = dir.join(path);
        std::fs::create_dir_all(full.parent().unwrap()).unwrap();
        std::fs::write(full, content).unwrap();
    }
    for path in remove {
        git(dir, &["rm", "--quiet", path]);
    }
    git(dir, &["add", "--all"]);
    git(dir, &["commit", "--quiet", "--allow-empty", "-m", message]);
    git(dir, &["rev-parse", "HEAD"])
}

fn url(dir: &Path) -> String {
    format!("file://{}", dir.display())
}

fn materializer(clone_path: &Path) -> Materializer<RealExecutor> {
    Materializer::new(GitClient::new(clone_path), "origin")
}

struct Fixture {
    _tmp: TempDir,
    source: std::path::PathBuf,
    clone: std::path::PathBuf,
}

fn fixture() -> Fixture {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("source");
    std::fs::create_dir_all(&source).unwrap();
    init_source(&source);
    let clone = tmp.path().join("clone");
    Fixture {
        _tmp: tmp,
        source,
        clone,
    }
}

// ── PR mode ──

#[tokio::test]
async fn pr_change_under_context_builds() {
    let fx = fixture();
    let base = commit(
        &fx.source,
        &[("Dockerfile", "FROM scratch\n"), ("context/sub/file.txt", "one\n")],
        &[],
        "base",
    );
    git(&fx.source, &["checkout", "--quiet", "-b", "feature"]);
    let head = commit(&fx.source, &[("context/sub/file.txt", "two\n")], &[], "change");

    let result = materializer(&fx.clone)
        .materialize_pr(
            &url(&fx.source),
            &RevisionRef::new(&base, "main"),
            &RevisionRef::new(&head, "pr"),
        )
        .await
        .unwrap();

    assert_eq!(result.base_commit, base);
    assert_eq!(result.head_commit, head);
    assert_eq!(
        result.changes.iter().collect::<Vec<_>>(),
        vec!["context/sub/file.txt"]
    );
    assert_eq!(
        std::fs::read_to_string(fx.clone.join("context/sub/file.txt")).unwrap(),
        "two\n"
    );
    assert_eq!(
        decide(&result.changes, &BuildScope::new("Dockerfile", "context")),
        BuildDecision::Build
    );
}

#[tokio::test]
async fn pr_docs_only_change_skips() {
    let fx = fixture();
    let base = commit(
        &fx.source,
        &[("app/Dockerfile", "FROM scratch\n"), ("docs/readme.md", "v1\n")],
        &[],
        "base",
    );
    git(&fx.source, &["checkout", "--quiet", "-b", "docs"]);
    commit(&fx.source, &[("docs/readme.md", "v2\n")], &[], "docs 1");
    let head = commit(&fx.source, &[("docs/readme.md", "v3\n")], &[], "docs 2");

    let result = materializer(&fx.clone)
        .materialize_pr(
            &url(&fx.source),
            &RevisionRef::new(&base, "main"),
            &RevisionRef::new(&head, "pr-12"),
        )
        .await
        .unwrap();

    assert_eq!(
        result.changes.iter().collect::<Vec<_>>(),
        vec!["docs/readme.md"]
    );
    assert_eq!(
        decide(&result.changes, &BuildScope::new("app/Dockerfile", "app")),
        BuildDecision::Skip
    );
}

#[tokio::test]
async fn pr_change_set_includes_both_sides_of_moves_and_deletions() {
    let fx = fixture();
    let base = commit(
        &fx.source,
        &[("old/name.txt", "same content\n"), ("gone.txt", "bye\n")],
        &[],
        "base",
    );
    git(&fx.source, &["checkout", "--quiet", "-b", "move"]);
    git(&fx.source, &["mv", "old/name.txt", "new-name.txt"]);
    let head = commit(&fx.source, &[], &["gone.txt"], "move and delete");

    let result = materializer(&fx.clone)
        .materialize_pr(
            &url(&fx.source),
            &RevisionRef::new(&base, "main"),
            &RevisionRef::new(&head, "pr"),
        )
        .await
        .unwrap();

    assert_eq!(
        result.changes.iter().collect::<Vec<_>>(),
        vec!["gone.txt", "new-name.txt", "old/name.txt"]
    );
    assert!(!fx.clone.join("gone.txt").exists());
}

#[cfg(unix)]
#[tokio::test]
async fn pr_non_utf8_path_outside_scope_skips() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let fx = fixture();
    let base = commit(
        &fx.source,
        &[("app/Dockerfile", "FROM scratch\n"), ("app/main.rs", "fn main() {}\n")],
        &[],
        "base",
    );
    git(&fx.source, &["checkout", "--quiet", "-b", "feature"]);
    let docs = fx.source.join("docs");
    std::fs::create_dir_all(&docs).unwrap();
    std::fs::write(docs.join(OsStr::from_bytes(b"caf\xe9.txt")), "latin-1\n").unwrap();
    let head = commit(&fx.source, &[], &[], "latin-1 file name");

    let result = materializer(&fx.clone)
        .materialize_pr(
            &url(&fx.source),
            &RevisionRef::new(&base, "main"),
            &RevisionRef::new(&head, "pr"),
        )
        .await
        .unwrap();

    assert_eq!(result.changes.len(), 1);
    assert!(result.changes.iter().all(|p| p.starts_with("docs/caf")));
    assert_eq!(
        decide(&result.changes, &BuildScope::new("app/Dockerfile", "app")),
        BuildDecision::Skip
    );
}

#[tokio::test]
async fn pr_unknown_revision_fails_in_fetch() {
    let fx = fixture();
    let base = commit(&fx.source, &[("a.txt", "a\n")], &[], "base");

    let result = materializer(&fx.clone)
        .materialize_pr(
            &url(&fx.source),
            &RevisionRef::new(&base, "main"),
            &RevisionRef::new("0000000000000000000000000000000000000001", "pr"),
        )
        .await;

    assert!(matches!(result, Err(MaterializeError::Fetch { .. })));
}

// ── Commit mode ──

#[tokio::test]
async fn commit_touching_only_dockerfile_builds() {
    let fx = fixture();
    commit(
        &fx.source,
        &[("Dockerfile", "FROM scratch\n"), ("README.md", "hi\n")],
        &[],
        "init",
    );
    let parent = commit(&fx.source, &[("README.md", "hello\n")], &[], "readme");
    let target = commit(&fx.source, &[("Dockerfile", "FROM busybox\n")], &[], "bump");

    let result = materializer(&fx.clone)
        .materialize_commit(&url(&fx.source), &RevisionRef::new(&target, "build"))
        .await
        .unwrap();

    assert_eq!(result.base_commit, parent);
    assert_eq!(result.head_commit, target);
    assert_eq!(result.changes.iter().collect::<Vec<_>>(), vec!["Dockerfile"]);
    assert_eq!(
        std::fs::read_to_string(fx.clone.join("Dockerfile")).unwrap(),
        "FROM busybox\n"
    );
    assert_eq!(
        decide(&result.changes, &BuildScope::new("Dockerfile", "")),
        BuildDecision::Build
    );
    assert_eq!(
        decide(&result.changes, &BuildScope::new("Dockerfile", "services/api")),
        BuildDecision::Build
    );
}

#[tokio::test]
async fn commit_fetch_is_shallow() {
    let fx = fixture();
    commit(&fx.source, &[("a.txt", "1\n")], &[], "one");
    commit(&fx.source, &[("a.txt", "2\n")], &[], "two");
    commit(&fx.source, &[("a.txt", "3\n")], &[], "three");
    let target = commit(&fx.source, &[("a.txt", "4\n")], &[], "four");

    materializer(&fx.clone)
        .materialize_commit(&url(&fx.source), &RevisionRef::new(&target, "build"))
        .await
        .unwrap();

    let count = git(&fx.clone, &["rev-list", "--count", "build"]);
    assert_eq!(count, "2");
}

#[tokio::test]
async fn commit_mode_rejects_root_commit() {
    let fx = fixture();
    let root = commit(&fx.source, &[("a.txt", "1\n")], &[], "root");

    let result = materializer(&fx.clone)
        .materialize_commit(&url(&fx.source), &RevisionRef::new(&root, "build"))
        .await;

    assert!(matches!(
        result,
        Err(MaterializeError::NotSingleParent { parents: 0, .. })
    ));
}

#[tokio::test]
async fn commit_mode_rejects_merge_commit() {
    let fx = fixture();
    commit(&fx.source, &[("a.txt", "1\n")], &[], "root");
    git(&fx.source, &["checkout", "--quiet", "-b", "feature"]);
    commit(&fx.source, &[("b.txt", "feature\n")], &[], "feature");
    git(&fx.source, &["checkout", "--quiet", "main"]);
    commit(&fx.source, &[("c.txt", "main\n")], &[], "main");
    git(
        &fx.source,
        &["merge", "--quiet", "--no-ff", "--no-edit", "feature"],
    );
    let merge = git(&fx.source, &["rev-parse", "HEAD"]);

    let result = materializer(&fx.clone)
        .materialize_commit(&url(&fx.source), &RevisionRef::new(&merge, "build"))
        .await;

    assert!(matches!(
        result,
        Err(MaterializeError::NotSingleParent { ref commit, parents: 2 }) if *commit == merge
    ));
    assert!(!fx.clone.join("a.txt").exists());
}
