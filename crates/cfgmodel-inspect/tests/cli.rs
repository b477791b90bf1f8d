use std::fs;
use std::path::PathBuf;
use std::process::Command;

const COMPOSITE: &str = r#"<composite xmlns="http://docs.oasis-open.org/ns/opencsa/sca/200912" name="orders">
  <property name="host" value="localhost"/>
  <reference name="Warehouse" promote="OrderComponent/Warehouse" requires="transaction">
    <interface.java interface="org.example.Warehouse"/>
    <binding.rest name="rest" uri="http://${host}:${port:8080}/warehouse"/>
  </reference>
  <component name="OrderComponent">
    <reference name="Warehouse"/>
  </component>
</composite>"#;

fn write_temp(name: &str, content: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("cfgmodel-inspect-{}-{}", std::process::id(), name));
    fs::write(&path, content).expect("Failed to write temp file");
    path
}

#[test]
fn test_json_summary_with_resolution() {
    let input = write_temp("resolve.xml", COMPOSITE);

    let output = Command::new(env!("CARGO_BIN_EXE_cfgmodel-inspect"))
        .arg(&input)
        .args(["--json", "--resolve", "--property", "port=9090"])
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("Failed to parse JSON from stdout");
    let reference = &json["references"][0];
    assert_eq!(reference["name"], "Warehouse");
    assert_eq!(reference["promoted_reference"], "OrderComponent/Warehouse");
    assert_eq!(reference["interface"], "org.example.Warehouse");
    assert_eq!(
        reference["bindings"][0]["uri"],
        "http://localhost:9090/warehouse"
    );
    assert_eq!(reference["policy_requirements"][0], "transaction");

    let _ = fs::remove_file(input);
}

#[test]
fn test_text_summary_without_resolution() {
    let input = write_temp("text.xml", COMPOSITE);

    let output = Command::new(env!("CARGO_BIN_EXE_cfgmodel-inspect"))
        .arg(&input)
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Composite: orders\n"));
    assert!(stdout.contains("  Warehouse -> OrderComponent/Warehouse\n"));
    assert!(stdout.contains("http://${host}:${port:8080}/warehouse"));

    let _ = fs::remove_file(input);
}

#[test]
fn test_custom_descriptor() {
    let input = write_temp(
        "custom.xml",
        r#"<assembly name="custom"><reference name="R" promote="C/R"/></assembly>"#,
    );
    let descriptor = write_temp(
        "custom.toml",
        "extends = \"sca\"\n\n[bindings]\nassembly = \"composite\"\n",
    );

    let output = Command::new(env!("CARGO_BIN_EXE_cfgmodel-inspect"))
        .arg(&input)
        .arg("--descriptor")
        .arg(&descriptor)
        .arg("--json")
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["name"], "custom");
    assert_eq!(json["references"][0]["promoted_reference"], "C/R");

    let _ = fs::remove_file(input);
    let _ = fs::remove_file(descriptor);
}

#[test]
fn test_wrong_root_fails_with_context() {
    let input = write_temp("wrong.xml", "<component name=\"x\"/>");

    let output = Command::new(env!("CARGO_BIN_EXE_cfgmodel-inspect"))
        .arg(&input)
        .output()
        .expect("Failed to execute command");
    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error: Failed to load composite from"));
    assert!(stderr.contains("Expected a composite element, found <component>"));

    let _ = fs::remove_file(input);
}

#[test]
fn test_missing_file() {
    let output = Command::new(env!("CARGO_BIN_EXE_cfgmodel-inspect"))
        .arg("/nonexistent/composite.xml")
        .output()
        .expect("Failed to execute command");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to read input file"));
}
