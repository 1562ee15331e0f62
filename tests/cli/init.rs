use anyhow::{Context, Result};
use insta_cmd::assert_cmd_snapshot;
use serde_json::Value;

use crate::CliTest;

/// Default config parses and carries the scanner settings.
fn assert_config_content(content: &str) -> Result<()> {
    let parsed: Value = serde_json::from_str(content).context("Config should be valid JSON")?;

    assert_eq!(parsed["sourceRoot"], "./");
    assert!(parsed["markupExtensions"].is_array());
    assert!(parsed["checkedAttributes"].is_array());
    assert!(
        content.contains("  "),
        "Config should use 2-space indentation"
    );

    Ok(())
}

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    assert_cmd_snapshot!(test.command().arg("init"), @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Created .locscanrc.json

    ----- stderr -----
    "#);

    assert!(test.root().join(".locscanrc.json").is_file());
    let content = test.read_file(".locscanrc.json")?;
    assert_config_content(&content)?;

    Ok(())
}

#[test]
fn test_init_keeps_existing_config() -> Result<()> {
    let existing = r#"{ "ignoreTexts": ["OK"] }"#;
    let test = CliTest::with_file(".locscanrc.json", existing)?;

    assert_cmd_snapshot!(test.command().arg("init"), @r#"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    error: .locscanrc.json already exists
    "#);

    assert_eq!(test.read_file(".locscanrc.json")?, existing);

    Ok(())
}

#[test]
fn test_initialized_config_is_usable() -> Result<()> {
    let test = CliTest::with_file("bin/Debug/Page.aspx", "<p>Build output</p>")?;
    test.write_file("Page.aspx", "<p>Hello</p>")?;

    let init = test.command().arg("init").output()?;
    assert!(init.status.success());

    assert_cmd_snapshot!(test.check_command(), @r#"
    success: false
    exit_code: 1
    ----- stdout -----
    warning: "Hello"  hardcoded
      --> Page.aspx:1:4
      |
    1 | <p>Hello</p>
      |    ^

    ✘ 1 problems (0 errors, 1 warning)

    ----- stderr -----
    "#);

    Ok(())
}
