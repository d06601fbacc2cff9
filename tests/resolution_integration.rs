//! Integration tests for URL resolution against real repositories.
//!
//! These tests build actual git repositories via tempfile and the git
//! CLI, then resolve URLs through the library. No network access: the
//! remotes are configured but never contacted, since a local handle
//! only reads its own refs.

use std::path::Path;
use std::process::Command as Process;

use tempfile::TempDir;

use git_surf::command::{BrowserOpener, Command};
use git_surf::repo::{RepoError, RepoHandle};

const GITHUB_REMOTE: &str = "https://github.com/octocat/hello-world.git";

/// Test fixture that creates a real git repository.
struct TestRepo {
    dir: TempDir,
}

impl TestRepo {
    /// Create a new test repository on branch `main` with one commit.
    fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");

        run_git(dir.path(), &["init"]);
        run_git(dir.path(), &["checkout", "-b", "main"]);
        run_git(dir.path(), &["config", "user.email", "test@example.com"]);
        run_git(dir.path(), &["config", "user.name", "Test User"]);

        std::fs::write(dir.path().join("README.md"), "# Test Repo\n").unwrap();
        run_git(dir.path(), &["add", "README.md"]);
        run_git(dir.path(), &["commit", "-m", "Initial commit"]);

        Self { dir }
    }

    /// Create a repository whose `origin` points at `url`.
    fn with_remote(url: &str) -> Self {
        let repo = Self::new();
        repo.add_remote("origin", url);
        repo
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn add_remote(&self, name: &str, url: &str) {
        run_git(self.path(), &["remote", "add", name, url]);
    }

    /// Create a file and commit it, returning the new commit id.
    fn commit_file(&self, path: &str, content: &str, message: &str) -> String {
        std::fs::write(self.path().join(path), content).unwrap();
        run_git(self.path(), &["add", path]);
        run_git(self.path(), &["commit", "-m", message]);
        self.rev_parse("HEAD")
    }

    fn create_branch(&self, name: &str) {
        run_git(self.path(), &["branch", name]);
    }

    fn create_tag(&self, name: &str) {
        run_git(self.path(), &["tag", name]);
    }

    fn rev_parse(&self, rev: &str) -> String {
        let output = Process::new("git")
            .args(["rev-parse", rev])
            .current_dir(self.path())
            .output()
            .expect("git rev-parse failed");
        String::from_utf8(output.stdout).unwrap().trim().to_string()
    }

    /// A command resolving against this repository.
    fn command(&self) -> Command {
        Command {
            dir: Some(self.path().to_path_buf()),
            ..Command::default()
        }
    }
}

/// Run a git command in the given directory.
fn run_git(dir: &Path, args: &[&str]) {
    let output = Process::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}

fn url(repo: &TestRepo, args: &[&str]) -> anyhow::Result<String> {
    let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
    repo.command().url(&args)
}

#[test]
fn zero_args_opens_the_head_commit() {
    let repo = TestRepo::with_remote(GITHUB_REMOTE);
    let head = repo.rev_parse("HEAD");

    let resolved = url(&repo, &[]).unwrap();
    assert_eq!(
        resolved,
        format!("https://github.com/octocat/hello-world/commit/{}", head)
    );
}

#[test]
fn branch_name_is_preserved_in_tree_view() {
    let repo = TestRepo::with_remote(GITHUB_REMOTE);

    let resolved = url(&repo, &["main"]).unwrap();
    assert_eq!(resolved, "https://github.com/octocat/hello-world/tree/main");
}

#[test]
fn tag_name_is_preserved_in_tree_view() {
    let repo = TestRepo::with_remote(GITHUB_REMOTE);
    repo.create_tag("v1.0");

    let resolved = url(&repo, &["v1.0"]).unwrap();
    assert_eq!(resolved, "https://github.com/octocat/hello-world/tree/v1.0");
}

#[test]
fn relative_rev_resolves_to_a_full_commit_id() {
    let repo = TestRepo::with_remote(GITHUB_REMOTE);
    let first = repo.rev_parse("HEAD");
    repo.commit_file("second.txt", "two\n", "Second commit");

    let resolved = url(&repo, &["HEAD~1"]).unwrap();
    assert_eq!(
        resolved,
        format!("https://github.com/octocat/hello-world/commit/{}", first)
    );
}

#[test]
fn abbreviated_hash_resolves_to_the_full_id() {
    let repo = TestRepo::with_remote(GITHUB_REMOTE);
    let head = repo.rev_parse("HEAD");

    let resolved = url(&repo, &[&head[..8]]).unwrap();
    assert_eq!(
        resolved,
        format!("https://github.com/octocat/hello-world/commit/{}", head)
    );
}

#[test]
fn file_view_with_line_range() {
    let repo = TestRepo::with_remote(GITHUB_REMOTE);

    let resolved = url(&repo, &["main:README.md#L10-L20"]).unwrap();
    assert_eq!(
        resolved,
        "https://github.com/octocat/hello-world/blob/main/README.md#L10-L20"
    );
}

#[test]
fn compare_between_branches_keeps_names_in_order() {
    let repo = TestRepo::with_remote(GITHUB_REMOTE);
    repo.create_branch("dev");

    let resolved = url(&repo, &["main...dev"]).unwrap();
    assert_eq!(
        resolved,
        "https://github.com/octocat/hello-world/compare/main...dev"
    );
}

#[test]
fn bitbucket_remote_uses_bitbucket_paths() {
    let repo = TestRepo::with_remote("https://bitbucket.org/octocat/hello-world.git");
    let head = repo.rev_parse("HEAD");

    let resolved = url(&repo, &[]).unwrap();
    assert_eq!(
        resolved,
        format!("https://bitbucket.org/octocat/hello-world/commits/{}", head)
    );

    let err = url(&repo, &["main...main"]).unwrap_err();
    assert!(err.to_string().contains("does not support comparing"));
}

#[test]
fn gitlab_remote_rejects_two_dot_compare() {
    let repo = TestRepo::with_remote("https://gitlab.com/octocat/hello-world.git");
    repo.create_branch("dev");

    let err = url(&repo, &["main..dev"]).unwrap_err();
    assert!(err.to_string().contains("'...'"));

    assert!(url(&repo, &["main...dev"]).is_ok());
}

#[test]
fn ssh_remote_is_detected() {
    let repo = TestRepo::with_remote("git@github.com:octocat/hello-world.git");

    let resolved = url(&repo, &["main"]).unwrap();
    assert_eq!(resolved, "https://github.com/octocat/hello-world/tree/main");
}

#[test]
fn origin_is_preferred_over_other_remotes() {
    let repo = TestRepo::new();
    repo.add_remote("upstream", "https://github.com/upstream/hello-world.git");
    repo.add_remote("origin", GITHUB_REMOTE);

    let resolved = url(&repo, &["main"]).unwrap();
    assert_eq!(resolved, "https://github.com/octocat/hello-world/tree/main");
}

#[test]
fn first_remote_is_used_when_origin_is_absent() {
    let repo = TestRepo::new();
    repo.add_remote("upstream", "https://github.com/upstream/hello-world.git");

    let resolved = url(&repo, &["main"]).unwrap();
    assert_eq!(
        resolved,
        "https://github.com/upstream/hello-world/tree/main"
    );
}

#[test]
fn no_remotes_fails() {
    let repo = TestRepo::new();

    let err = url(&repo, &["main"]).unwrap_err();
    assert!(err.to_string().contains("no configured remote"));
}

#[test]
fn unknown_ref_fails_naming_it() {
    let repo = TestRepo::with_remote(GITHUB_REMOTE);

    let err = url(&repo, &["no-such-branch"]).unwrap_err();
    assert!(err.to_string().contains("no-such-branch"));
}

#[test]
fn reversed_line_range_fails_before_any_repository_access() {
    // Not a repository at all: if the shape check ran after opening, this
    // would report OpenFailed instead of the argument error.
    let dir = TempDir::new().unwrap();
    let command = Command {
        dir: Some(dir.path().to_path_buf()),
        ..Command::default()
    };

    let err = command
        .url(&["main:README.md#L20-L10".to_string()])
        .unwrap_err();
    assert!(err.to_string().contains("invalid arguments"));
}

#[test]
fn opening_a_non_repository_fails() {
    let dir = TempDir::new().unwrap();
    let command = Command {
        dir: Some(dir.path().to_path_buf()),
        ..Command::default()
    };

    let err = command.url(&[]).unwrap_err();
    assert!(err.to_string().contains("failed to open repository"));
}

#[test]
fn open_delegates_the_resolved_url_to_the_opener() {
    use std::cell::RefCell;

    struct RecordingOpener {
        opened: RefCell<Vec<String>>,
    }

    impl BrowserOpener for RecordingOpener {
        fn open(&self, url: &str) -> anyhow::Result<()> {
            self.opened.borrow_mut().push(url.to_string());
            Ok(())
        }
    }

    let repo = TestRepo::with_remote(GITHUB_REMOTE);
    let opener = RecordingOpener {
        opened: RefCell::new(Vec::new()),
    };

    repo.command()
        .open(&["main".to_string()], &opener)
        .unwrap();
    assert_eq!(
        opener.opened.borrow().as_slice(),
        ["https://github.com/octocat/hello-world/tree/main"]
    );
}

#[test]
fn opener_failure_is_surfaced() {
    struct FailingOpener;

    impl BrowserOpener for FailingOpener {
        fn open(&self, _url: &str) -> anyhow::Result<()> {
            anyhow::bail!("no display")
        }
    }

    let repo = TestRepo::with_remote(GITHUB_REMOTE);
    let err = repo
        .command()
        .open(&["main".to_string()], &FailingOpener)
        .unwrap_err();
    assert!(err.to_string().contains("no display"));
}

#[test]
fn handle_reports_remotes_and_current_branch() {
    let repo = TestRepo::with_remote(GITHUB_REMOTE);

    let handle = RepoHandle::open(None, Some(repo.path())).unwrap();
    assert_eq!(
        handle.remotes().unwrap(),
        vec![("origin".to_string(), GITHUB_REMOTE.to_string())]
    );
    assert_eq!(handle.current_branch().unwrap().as_deref(), Some("main"));
}

#[test]
fn handle_open_fails_for_missing_directory() {
    let err = RepoHandle::open(None, Some(Path::new("/nonexistent/repo"))).unwrap_err();
    assert!(matches!(err, RepoError::OpenFailed { .. }));
}
