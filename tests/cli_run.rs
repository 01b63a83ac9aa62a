use assert_cmd::prelude::*;
use serde_json::Value;
use std::path::Path;
use std::process::Command;

fn hintkit() -> Command {
    let bin = assert_cmd::cargo::cargo_bin!("hintkit");
    let mut cmd = Command::new(bin);
    // keep a user-level config from leaking into the run
    cmd.args(["--config", "tests/fixtures/missing-config.yaml"]);
    cmd
}

fn run_json(args: &[&str]) -> Value {
    let page = Path::new("tests/fixtures/links.yaml");
    assert!(page.exists(), "fixture missing");

    let assert = hintkit()
        .args(["--output", "json", "run", "--page", page.to_str().unwrap()])
        .args(args)
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 output");
    serde_json::from_str(&stdout).expect("valid json")
}

fn labels(step: &Value) -> Vec<&str> {
    step["labels"]
        .as_array()
        .expect("labels array")
        .iter()
        .map(|label| label.as_str().expect("label string"))
        .collect()
}

#[test]
fn typing_a_label_resolves_the_link() {
    let report = run_json(&["--category", "links", "--keys", "d"]);

    let steps = report["steps"].as_array().unwrap();
    assert_eq!(steps.len(), 2);
    assert_eq!(labels(&steps[0]), vec!["F", "D", "S"]);
    assert_eq!(steps[0]["status"].as_str(), Some("https://example.com/home"));
    assert_eq!(steps[1]["outcome"]["outcome"].as_str(), Some("action"));

    assert_eq!(
        report["action"].as_str(),
        Some("click|click|https://example.com/docs")
    );
    assert_eq!(report["performed"].as_bool(), Some(false));
    assert!(report["events"].as_array().unwrap().is_empty());
}

#[test]
fn cycling_then_following_and_performing_clicks_the_element() {
    let report = run_json(&[
        "--category",
        "links",
        "--keys",
        "<TAB><TAB>",
        "--follow",
        "--perform",
    ]);

    let steps = report["steps"].as_array().unwrap();
    assert_eq!(steps[2]["status"].as_str(), Some("https://example.com/blog"));
    assert_eq!(steps.last().unwrap()["key"].as_str(), Some("<follow>"));
    assert_eq!(
        report["action"].as_str(),
        Some("click|click|https://example.com/blog")
    );
    assert_eq!(report["performed"].as_bool(), Some(true));

    let events = report["events"].as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["kind"].as_str(), Some("click"));
    assert_eq!(events[0]["button"].as_u64(), Some(0));
}

#[test]
fn new_tab_full_click_uses_the_auxiliary_button() {
    let report = run_json(&["--category", "all", "--keys", "ax", "--new-tab"]);

    let steps = report["steps"].as_array().unwrap();
    assert_eq!(labels(&steps[0]), vec!["F", "D", "S", "A"]);
    assert_eq!(
        report["action"].as_str(),
        Some("click|activate-all-events|unknown")
    );
    assert_eq!(report["performed"].as_bool(), Some(true));
    assert_eq!(report["ignored_keys"], serde_json::json!(["x"]));

    let events = report["events"].as_array().unwrap();
    let kinds: Vec<&str> = events.iter().map(|e| e["kind"].as_str().unwrap()).collect();
    assert_eq!(kinds, vec!["mousedown", "mouseover", "click", "mouseup"]);
    assert!(events.iter().all(|e| e["button"].as_u64() == Some(1)));
}

#[test]
fn unmatched_text_reports_no_hints() {
    let report = run_json(&["--category", "links", "--keys", "9"]);
    assert_eq!(report["outcome"]["outcome"].as_str(), Some("no-hints"));
    assert!(report["action"].is_null());
}

#[test]
fn frames_in_json_fixtures_are_hinted() {
    let page = Path::new("tests/fixtures/framed.json");
    let assert = hintkit()
        .args(["--output", "json", "run", "--page", page.to_str().unwrap()])
        .args(["--category", "links", "--keys", "d"])
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 output");
    let report: Value = serde_json::from_str(&stdout).expect("valid json");
    assert_eq!(
        report["action"].as_str(),
        Some("click|click|https://example.com/side/page")
    );
}

#[test]
fn missing_page_fails_with_context() {
    let assert = hintkit()
        .args(["run", "--page", "tests/fixtures/nope.yaml"])
        .assert()
        .failure();
    let stderr = String::from_utf8(assert.get_output().stderr.clone()).expect("utf8 output");
    assert!(stderr.contains("loading page fixture"), "stderr: {stderr}");
}
