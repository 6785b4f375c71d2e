use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

#[allow(deprecated)]
fn cli() -> Command {
    let mut cmd = Command::cargo_bin("context-compress").expect("binary");
    cmd.env_remove("CONTEXT_COMPRESS_JOBS").env_remove("RUST_LOG");
    cmd
}

fn run_json(args: &[&str], root: &Path) -> Vec<Value> {
    let output = cli()
        .args(args)
        .arg("--json")
        .arg(root)
        .output()
        .expect("command run");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let body: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    body.as_array().expect("json array").clone()
}

fn file_name(entry: &Value) -> String {
    Path::new(entry["path"].as_str().expect("path"))
        .file_name()
        .expect("file name")
        .to_string_lossy()
        .into_owned()
}

fn setup_repo() -> tempfile::TempDir {
    let temp = tempdir().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("src")).unwrap();
    fs::write(
        root.join("src/main.go"),
        "package main\n\nimport \"fmt\"\n\nfunc main() {\n\tfmt.Println(\"secret body\")\n}\n",
    )
    .unwrap();
    fs::write(
        root.join("src/tool.py"),
        "import sys\n\ndef run(argv):\n    print('python body')\n",
    )
    .unwrap();
    fs::write(root.join("README.txt"), "plain notes\n").unwrap();
    temp
}

#[test]
fn compress_markdown_output() {
    let temp = setup_repo();

    cli()
        .arg("--compress")
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("main.go`:"))
        .stdout(predicate::str::contains(
            "func main() { ... } // Body removed",
        ))
        .stdout(predicate::str::contains("def run(argv): { ... } # Body removed"))
        .stdout(predicate::str::contains("```txt\nplain notes\n"))
        .stdout(predicate::str::contains("secret body").not())
        .stdout(predicate::str::contains("python body").not());
}

#[test]
fn uncompressed_output_is_formatted() {
    let temp = setup_repo();

    cli()
        .arg("--line-number")
        .arg(temp.path().join("src/main.go"))
        .assert()
        .success()
        .stdout(predicate::str::contains("```go\n   1 | package main\n"))
        .stdout(predicate::str::contains("secret body"));

    cli()
        .arg("--no-codeblock")
        .arg(temp.path().join("src/tool.py"))
        .assert()
        .success()
        .stdout(predicate::str::contains("```").not())
        .stdout(predicate::str::contains("print('python body')"));
}

#[test]
fn json_entries_are_sorted_and_annotated() {
    let temp = setup_repo();
    let entries = run_json(&["--compress"], temp.path());

    let names: Vec<String> = entries.iter().map(file_name).collect();
    assert_eq!(names, vec!["README.txt", "main.go", "tool.py"]);

    let readme = &entries[0];
    assert_eq!(readme["compressed"], false);
    assert_eq!(readme["extension"], ".txt");
    assert!(readme["note"].is_null());

    let go = &entries[1];
    assert_eq!(go["compressed"], true);
    assert_eq!(
        go["code"],
        "package main\n// -----\nimport \"fmt\"\n// -----\nfunc main() { ... } // Body removed\n"
    );
}

#[test]
fn gitignored_hidden_and_binary_files_are_skipped() {
    let temp = setup_repo();
    let root = temp.path();
    fs::write(root.join(".gitignore"), "generated.go\n").unwrap();
    fs::write(root.join("generated.go"), "package gen\n").unwrap();
    fs::write(root.join(".env.sh"), "SECRET=1\n").unwrap();
    fs::write(root.join("blob.c"), [0xffu8, 0xfe, 0x00, 0x9f]).unwrap();

    let entries = run_json(&[], root);
    let names: Vec<String> = entries.iter().map(file_name).collect();
    assert_eq!(names, vec!["README.txt", "main.go", "tool.py"]);
}

#[test]
fn config_filter_falls_back_to_original_content() {
    let temp = setup_repo();
    let config = temp.path().join("compress.toml");
    fs::write(&config, "supported_languages = [\"python\"]\n").unwrap();

    let entries = run_json(
        &["--compress", "--config", config.to_str().unwrap()],
        &temp.path().join("src"),
    );
    assert_eq!(entries.len(), 2);

    let go = &entries[0];
    assert_eq!(go["compressed"], false);
    assert!(go["code"].as_str().unwrap().contains("secret body"));
    assert!(go["note"]
        .as_str()
        .is_some_and(|note| note.contains("Unsupported language")));

    let py = &entries[1];
    assert_eq!(py["compressed"], true);
}

#[test]
fn invalid_config_is_reported() {
    let temp = setup_repo();
    let config = temp.path().join("bad.toml");
    fs::write(&config, "supported_languages = [\"cobol\"]\n").unwrap();

    cli()
        .arg("--compress")
        .arg("--config")
        .arg(&config)
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid config"));
}

#[test]
fn jobs_setting_does_not_change_output() {
    let temp = setup_repo();

    let sequential = cli()
        .args(["--compress", "--jobs", "1"])
        .arg(temp.path())
        .output()
        .expect("command run");
    let from_env = cli()
        .env("CONTEXT_COMPRESS_JOBS", "8")
        .arg("--compress")
        .arg(temp.path())
        .output()
        .expect("command run");

    assert!(sequential.status.success());
    assert!(from_env.status.success());
    assert_eq!(sequential.stdout, from_env.stdout);
}

#[test]
fn missing_path_fails() {
    let temp = tempdir().unwrap();

    cli()
        .arg(temp.path().join("nope"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot access"));
}
