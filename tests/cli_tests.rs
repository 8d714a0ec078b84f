//! CLI integration tests
//!
//! These tests run the built binary against local documents.

#![cfg(feature = "cli")]

use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

const EXTENSION: &str = r#"<extension xmlns="http://rs.gbif.org/extension/"
    title="Resource Relationship" name="Resource Relationship"
    rowType="http://rs.tdwg.org/dwc/terms/ResourceRelationship">
  <property name="relationshipOfResource" qualName="http://rs.tdwg.org/dwc/terms/relationshipOfResource" required="true"/>
  <property name="remarks" qualName="http://rs.tdwg.org/dwc/terms/relationshipRemarks"/>
</extension>"#;

const THESAURUS: &str = r#"<thesaurus xmlns="http://rs.gbif.org/thesaurus/" title="Type Status">
  <concept identifier="holotype"><preferred><term lang="en" title="Holotype"/></preferred></concept>
</thesaurus>"#;

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_dwca-model"))
}

fn document(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", content).unwrap();
    file
}

#[test]
fn test_cli_extension_summary() {
    let file = document(EXTENSION);
    let output = bin()
        .args(["extension", file.path().to_str().unwrap()])
        .output()
        .expect("failed to run binary");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Name: Resource_Relationship"));
    assert!(stdout.contains("=== Properties (2) ==="));
    assert!(stdout.contains("http://rs.tdwg.org/dwc/terms/relationshipOfResource : string [required]"));
}

#[test]
fn test_cli_extension_json() {
    let file = document(EXTENSION);
    let output = bin()
        .args(["extension", "--dev", "--json", file.path().to_str().unwrap()])
        .output()
        .expect("failed to run binary");

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["dev"], true);
    assert_eq!(json["properties"].as_array().map(|p| p.len()), Some(2));
    assert_eq!(
        json["rowType"]["simple_name"],
        serde_json::Value::from("ResourceRelationship")
    );
}

#[test]
fn test_cli_vocabulary_summary() {
    let file = document(THESAURUS);
    let output = bin()
        .args(["vocabulary", file.path().to_str().unwrap()])
        .output()
        .expect("failed to run binary");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Thesaurus: Type Status"));
    assert!(stdout.contains("holotype : Holotype"));
}

#[test]
fn test_cli_reports_errors() {
    let file = document("<extension><property></extension>");
    let output = bin()
        .args(["extension", file.path().to_str().unwrap()])
        .output()
        .expect("failed to run binary");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error:"));
}
