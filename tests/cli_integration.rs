//! End-to-end tests for the `gu` binary.
//!
//! Each test points `GIT_UTILS_CONFIG` at a file in a temporary directory so
//! the developer's own configuration never leaks in.

use std::path::Path;
use std::process::Command as StdCommand;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A `gu` command isolated from user configuration and credentials.
fn gu(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("gu").unwrap();
    cmd.env("GIT_UTILS_CONFIG", config_dir.path().join("config.toml"))
        .env_remove("GITHUB_TOKEN")
        .env_remove("GITHUB_USER")
        .env_remove("RUST_LOG");
    cmd
}

fn run_git(dir: &Path, args: &[&str]) {
    let output = StdCommand::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("git command failed");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}

fn git_output(dir: &Path, args: &[&str]) -> String {
    let output = StdCommand::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("git command failed");
    String::from_utf8(output.stdout).unwrap().trim().to_string()
}

/// A repository with one commit on `main`.
fn init_repo(dir: &Path) {
    run_git(dir, &["init", "-q"]);
    run_git(dir, &["symbolic-ref", "HEAD", "refs/heads/main"]);
    run_git(dir, &["config", "user.email", "test@example.com"]);
    run_git(dir, &["config", "user.name", "Test User"]);
    run_git(dir, &["config", "commit.gpgsign", "false"]);
    run_git(dir, &["config", "tag.gpgsign", "false"]);
    std::fs::write(dir.join("README.md"), "# Test\n").unwrap();
    run_git(dir, &["add", "README.md"]);
    run_git(dir, &["commit", "-q", "-m", "Initial commit"]);
}

#[test]
fn version_flag_works() {
    let config = TempDir::new().unwrap();
    gu(&config)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("gu"));
}

#[test]
fn help_lists_commands() {
    let config = TempDir::new().unwrap();
    gu(&config)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("github"))
        .stdout(predicate::str::contains("remote-tags"))
        .stdout(predicate::str::contains("unpushed"));
}

#[test]
fn completion_bash() {
    let config = TempDir::new().unwrap();
    gu(&config)
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("_gu"));
}

#[test]
fn unpushed_without_remotes_prints_every_commit() {
    let config = TempDir::new().unwrap();
    let repo = TempDir::new().unwrap();
    init_repo(repo.path());
    let head = git_output(repo.path(), &["rev-parse", "HEAD"]);

    gu(&config)
        .arg("--cwd")
        .arg(repo.path())
        .arg("unpushed")
        .assert()
        .success()
        .stdout(format!("{}\n", head));
}

#[test]
fn unpushed_outside_repository_fails() {
    let config = TempDir::new().unwrap();
    let dir = TempDir::new().unwrap();

    gu(&config)
        .arg("--cwd")
        .arg(dir.path())
        .arg("unpushed")
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("error:"));
}

#[test]
fn remote_tags_of_local_path() {
    let config = TempDir::new().unwrap();
    let repo = TempDir::new().unwrap();
    init_repo(repo.path());
    run_git(repo.path(), &["tag", "v0.1.0"]);
    run_git(repo.path(), &["tag", "-a", "v0.2.0", "-m", "second"]);

    gu(&config)
        .arg("remote-tags")
        .arg(repo.path())
        .assert()
        .success()
        .stdout("v0.1.0\nv0.2.0\n");
}

#[test]
fn status_reports_each_child_directory() {
    let config = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();
    let clean = root.path().join("clean");
    let dirty = root.path().join("dirty");
    let plain = root.path().join("plain");
    for dir in [&clean, &dirty, &plain] {
        std::fs::create_dir(dir).unwrap();
    }
    init_repo(&clean);
    init_repo(&dirty);
    std::fs::write(dirty.join("new.txt"), "new\n").unwrap();

    let output = gu(&config)
        .arg("--cwd")
        .arg(root.path())
        .arg("status")
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();

    assert!(stdout.contains(&dirty.display().to_string()));
    assert!(stdout.contains("?? new.txt"));
    assert!(stdout.contains("not a git repo"));
    // No origin, so the tracking line is shown for both repositories.
    assert!(stdout.contains(&clean.display().to_string()));
    assert!(stdout.contains("## main"));
    assert!(!stdout.contains("clean and committed"));
}

#[test]
fn invalid_config_is_reported() {
    let config = TempDir::new().unwrap();
    std::fs::write(
        config.path().join("config.toml"),
        "[github]\nper_page = 500\n",
    )
    .unwrap();

    gu(&config)
        .arg("unpushed")
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration"));
}

#[tokio::test]
async fn github_path_strips_url_keys() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .and(header("authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "login": "octocat",
            "url": "https://api.github.com/users/octocat",
            "repos_url": "https://api.github.com/users/octocat/repos",
            "id": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = TempDir::new().unwrap();
    gu(&config)
        .args(["github", "path", "/user", "--token", "secret", "--api-base"])
        .arg(server.uri())
        .assert()
        .success()
        .stdout("{\"id\":1,\"login\":\"octocat\"}\n");
}
