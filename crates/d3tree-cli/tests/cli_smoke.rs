use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

#[test]
fn help_works() -> Result<(), Box<dyn std::error::Error>> {
    Command::new(assert_cmd::cargo::cargo_bin!("d3tree-cli"))
        .arg("--help")
        .assert()
        .success();
    Ok(())
}

#[test]
fn json_file_to_payload() -> Result<(), Box<dyn std::error::Error>> {
    let mut tmp = NamedTempFile::new()?;
    write!(tmp, "{{\"name\": [\"root\"], \"children\": [{{\"name\": \"a\", \"size\": 1}}]}}")?;

    let output = Command::new(assert_cmd::cargo::cargo_bin!("d3tree-cli"))
        .arg(tmp.path())
        .output()?;
    assert!(output.status.success());
    let out: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(
        out,
        serde_json::json!({
            "data": {"name": "root", "children": [{"name": "a", "size": 1}]},
            "options": {"celltext": "name", "id": "id", "valueField": "size"}
        })
    );
    Ok(())
}

#[test]
fn treemap_from_stdin() -> Result<(), Box<dyn std::error::Error>> {
    let input = r#"{"tm": [
        {"continent": "Asia", "iso3": "CHN", "vSize": 1000},
        {"continent": "Europe", "iso3": "DEU", "vSize": 300}
    ], "type": "index"}"#;
    let output = assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("d3tree-cli"))
        .args(["--treemap", "--rootname", "World", "--click-action", "function(d){}"])
        .write_stdin(input)
        .output()?;
    assert!(output.status.success());
    let out: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(out["data"]["name"], "World");
    assert_eq!(out["data"]["children"][1]["children"][0]["id"], "World/Europe/DEU");
    assert_eq!(out["meta"], serde_json::json!({"type": "index"}));
    assert_eq!(out["options"]["clickAction"], "function(d){}");
    assert_eq!(out["evals"], serde_json::json!(["options.clickAction"]));
    Ok(())
}

#[test]
fn html_output() -> Result<(), Box<dyn std::error::Error>> {
    assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("d3tree-cli"))
        .args(["--html", "--height", "300", "--element-id", "t"])
        .write_stdin(r#"{"name": "root"}"#)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"<div id="t" class="d3tree html-widget" style="height:300px;">"#))
        .stdout(predicate::str::contains(r#"data-for="t""#));
    Ok(())
}

#[test]
fn malformed_input_fails() -> Result<(), Box<dyn std::error::Error>> {
    assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("d3tree-cli"))
        .write_stdin("{not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid data from JSON text"));
    Ok(())
}

#[test]
fn nested_rejects_scalars() -> Result<(), Box<dyn std::error::Error>> {
    assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("d3tree-cli"))
        .arg("--nested")
        .write_stdin("42")
        .assert()
        .failure()
        .stderr(predicate::str::contains("got number"));
    Ok(())
}
