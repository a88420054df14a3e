use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

const SAMPLE: &str = "public class Sample {
    void foo() {
        bar();
    }

    void bar() {
        println();
    }
}
";

#[allow(deprecated)]
fn cli(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("code-semi-graph").expect("binary");
    cmd.env_remove("RUST_LOG")
        .env_remove("CODE_SEMI_GRAPH_API_KEY")
        .arg("--home")
        .arg(home);
    cmd
}

fn setup_project() -> TempDir {
    let temp = tempdir().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("src")).unwrap();
    fs::write(root.join("src/Sample.java"), SAMPLE).unwrap();
    fs::write(root.join("notes.py"), "print('hello')\n").unwrap();
    temp
}

fn build(home: &Path, project: &Path) {
    cli(home)
        .arg("build")
        .arg("--path")
        .arg(project)
        .args(["--model", "mock", "--embedding-dim", "32"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Chunks:             3"))
        .stdout(predicate::str::contains("Call relationships: 2"));
}

#[test]
fn build_writes_config_and_index() {
    let home = tempdir().unwrap();
    let project = setup_project();
    build(home.path(), project.path());

    assert!(home.path().join("config.toml").exists());
    assert!(home.path().join("index/vectors.json").exists());
    assert!(home.path().join("index/graph.json").exists());
}

#[test]
fn search_prints_ranked_chunks() {
    let home = tempdir().unwrap();
    let project = setup_project();
    build(home.path(), project.path());

    let output = cli(home.path())
        .args(["search", "call bar from foo", "--limit", "2"])
        .output()
        .expect("command run");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2, "stdout: {stdout}");
    assert!(lines[0].starts_with("1. "));
    assert!(lines[1].starts_with("2. "));
    assert!(lines.iter().all(|line| line.contains("(similarity: ")));
}

#[test]
fn graph_walks_from_class() {
    let home = tempdir().unwrap();
    let project = setup_project();
    build(home.path(), project.path());

    cli(home.path())
        .args(["graph", "Sample", "--type", "bfs"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "1. Sample (class) - src/Sample.java\n2. foo (method) - src/Sample.java\n\
             3. bar (method) - src/Sample.java\n4. println (method) - \n",
        ))
        .stdout(predicate::str::contains("Total nodes: 4, Total edges: 4"));

    cli(home.path())
        .args(["graph", "Sample", "-r", "calls"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("1. Sample (class)"))
        .stdout(predicate::str::contains("2. ").not());

    cli(home.path())
        .args(["graph", "foo", "-t", "dfs", "--max-nodes", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1. foo (method)"))
        .stdout(predicate::str::contains("2. bar (method)"))
        .stdout(predicate::str::contains("3. ").not());
}

#[test]
fn unknown_node_is_not_an_error() {
    let home = tempdir().unwrap();
    let project = setup_project();
    build(home.path(), project.path());

    cli(home.path())
        .args(["graph", "Missing"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No node named 'Missing'"));
}

#[test]
fn search_without_index_fails() {
    let home = tempdir().unwrap();

    cli(home.path())
        .args(["search", "anything"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("run `build` first"));
}

#[test]
fn build_rejects_missing_path() {
    let home = tempdir().unwrap();

    cli(home.path())
        .args(["build", "--path"])
        .arg(home.path().join("does-not-exist"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Path does not exist"));
}

#[test]
fn build_rejects_model_path_without_onnx_export() {
    let home = tempdir().unwrap();
    let project = setup_project();
    let model_dir = tempdir().unwrap();

    cli(home.path())
        .arg("build")
        .arg("--path")
        .arg(project.path())
        .arg("--model-path")
        .arg(model_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid embedding configuration"))
        .stderr(predicate::str::contains("No ONNX model"));
}
