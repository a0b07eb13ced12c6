use std::io::Write;

fn rebrief() -> std::process::Command {
    let bin = assert_cmd::cargo::cargo_bin!("rebrief");
    let mut cmd = std::process::Command::new(bin);
    cmd.env_remove("REBRIEF_ENV_FILE")
        .env_remove("REBRIEF_STRATEGY")
        .env_remove("REBRIEF_MAX_WORDS");
    cmd
}

#[test]
fn match_json_contract() {
    let out = rebrief()
        .args([
            "match",
            "--summary",
            "quick brown lazy dog",
            "--article",
            "the quick brown fox jumped over the lazy dog",
        ])
        .output()
        .expect("run rebrief match");

    assert!(out.status.success(), "rebrief match failed: {:?}", out);
    let v: serde_json::Value = serde_json::from_slice(&out.stdout).expect("parse match json");
    assert_eq!(v["schema_version"].as_u64(), Some(1));
    assert_eq!(v["kind"].as_str(), Some("match"));
    assert_eq!(v["ok"].as_bool(), Some(true));
    assert_eq!(v["strategy"].as_str(), Some("document"));
    assert_eq!(
        v["snippets"],
        serde_json::json!(["quick brown", "lazy dog"])
    );
    assert_eq!(v["coverage"].as_f64(), Some(1.0));
    assert!(v["jaccard_2"].as_f64().is_some());
}

#[test]
fn match_text_output_lists_one_snippet_per_line() {
    let out = rebrief()
        .args([
            "match",
            "--output",
            "text",
            "--summary",
            "Dog. RAN far",
            "--article",
            "the dog ran far away",
        ])
        .output()
        .expect("run rebrief match --output text");

    assert!(out.status.success());
    assert_eq!(String::from_utf8_lossy(&out.stdout), "dog ran far\n");
}

#[test]
fn match_split_strategy_from_env() {
    let out = rebrief()
        .env("REBRIEF_STRATEGY", "split")
        .args([
            "match",
            "--summary",
            "Quick Brown lazy dog",
            "--article",
            "the quick brown fox jumped over the lazy dog",
        ])
        .output()
        .expect("run rebrief match");

    assert!(out.status.success());
    let v: serde_json::Value = serde_json::from_slice(&out.stdout).expect("parse match json");
    assert_eq!(v["strategy"].as_str(), Some("split"));
    assert_eq!(v["snippets"], serde_json::json!(["lazy dog"]));
}

#[test]
fn match_reads_summary_from_stdin() {
    let mut child = rebrief()
        .args([
            "match",
            "--output",
            "text",
            "--summary-file",
            "-",
            "--article",
            "the quick brown fox",
        ])
        .stdin(std::process::Stdio::piped())
        .stdout(std::process::Stdio::piped())
        .spawn()
        .expect("spawn rebrief match");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(b"a quick brown cat")
        .expect("write stdin");
    let out = child.wait_with_output().expect("wait rebrief match");

    assert!(out.status.success());
    assert_eq!(String::from_utf8_lossy(&out.stdout), "quick brown\n");
}

#[test]
fn match_rejects_oversized_input() {
    let out = rebrief()
        .args([
            "match",
            "--max-words",
            "3",
            "--summary",
            "one two three four",
            "--article",
            "one two",
        ])
        .output()
        .expect("run rebrief match");

    assert!(!out.status.success(), "expected size bound to fail the run");
    let err = String::from_utf8_lossy(&out.stderr);
    assert!(err.contains("summary text has 4 words (max 3)"), "stderr={err}");
}

#[test]
fn match_rejects_unknown_strategy() {
    let out = rebrief()
        .args(["match", "--strategy", "fuzzy", "--summary", "a b", "--article", "a b"])
        .output()
        .expect("run rebrief match");

    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("unknown match strategy"));
}

#[test]
fn match_requires_a_summary() {
    assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("rebrief"))
        .env_remove("REBRIEF_ENV_FILE")
        .args(["match", "--article", "a b"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("missing --summary or --summary-file"));
}
