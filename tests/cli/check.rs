use anyhow::Result;
use insta_cmd::assert_cmd_snapshot;
use serde_json::Value;

use crate::CliTest;

const PAGE: &str = r#"<%@ Page Language="C#" %>
<h1>Welcome</h1>
<asp:Button ID="Go" Text="Search" runat="server" />
"#;

#[test]
fn test_hardcoded_text() -> Result<()> {
    let test = CliTest::with_file("Default.aspx", PAGE)?;

    assert_cmd_snapshot!(test.check_command(), @r#"
    success: false
    exit_code: 1
    ----- stdout -----
    warning: "Welcome"  hardcoded
      --> Default.aspx:2:5
      |
    2 | <h1>Welcome</h1>
      |     ^

    warning: "Search"  hardcoded
      --> Default.aspx:3:27
      |
    3 | <asp:Button ID="Go" Text="Search" runat="server" />
      |                           ^
      = note: in attribute 'Text' of <asp:Button>
      = hint: bind the attribute with meta:resourcekey or a <%$ Resources %> expression

    ✘ 2 problems (0 errors, 2 warnings)

    ----- stderr -----
    "#);

    Ok(())
}

#[test]
fn test_localized_markup() -> Result<()> {
    let test = CliTest::with_file(
        "Default.aspx",
        r#"<%@ Page Language="C#" %>
<h1><%= Resources.Strings.Title %></h1>
<asp:Button ID="Go" Text="<%$ Resources:Strings, Search %>" runat="server" />
<asp:Label ID="Hint" meta:resourcekey="Hint" Text="Type here" runat="server" />
<!-- <p>Old banner</p> -->
<p>&nbsp;2024</p>
"#,
    )?;

    assert_cmd_snapshot!(test.check_command(), @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Checked 1 file - no issues found

    ----- stderr -----
    "#);

    Ok(())
}

#[test]
fn test_code_behind_is_not_checked() -> Result<()> {
    let test = CliTest::with_file(
        "Default.aspx.cs",
        r#"public partial class Default { string s = "Hello"; }"#,
    )?;

    assert_cmd_snapshot!(test.check_command(), @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Checked 0 files - no issues found

    ----- stderr -----
    "#);

    Ok(())
}

#[test]
fn test_json_output() -> Result<()> {
    let test = CliTest::with_file("Default.aspx", PAGE)?;

    let output = test.check_command().arg("--json").output()?;
    let report: Value = serde_json::from_slice(&output.stdout)?;

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(report["filesChecked"], 1);
    assert_eq!(report["issues"].as_array().map(Vec::len), Some(2));
    assert_eq!(report["issues"][0]["message"], "Welcome");
    assert_eq!(report["issues"][0]["severity"], "warning");
    assert_eq!(report["issues"][0]["file"], "Default.aspx");
    assert_eq!(report["issues"][0]["line"], 2);
    assert_eq!(report["issues"][0]["col"], 5);
    assert_eq!(
        report["issues"][1]["details"],
        "in attribute 'Text' of <asp:Button>"
    );

    Ok(())
}

#[test]
fn test_config_ignores_and_ignore_texts() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        ".locscanrc.json",
        r#"{ "ignores": ["Legacy"], "ignoreTexts": ["OK"] }"#,
    )?;
    test.write_file("Legacy/Old.aspx", "<p>Old page</p>")?;
    test.write_file("Web/New.aspx", "<p>New page</p><button>OK</button>")?;

    assert_cmd_snapshot!(test.check_command(), @r#"
    success: false
    exit_code: 1
    ----- stdout -----
    warning: "New page"  hardcoded
      --> Web/New.aspx:1:4
      |
    1 | <p>New page</p><button>OK</button>
      |    ^

    ✘ 1 problems (0 errors, 1 warning)

    ----- stderr -----
    "#);

    Ok(())
}

#[test]
fn test_source_root_flag() -> Result<()> {
    let test = CliTest::with_file("Site/Default.aspx", "<p>Hello</p>")?;

    assert_cmd_snapshot!(test.check_command().args(["--source-root", "Site"]), @r#"
    success: false
    exit_code: 1
    ----- stdout -----
    warning: "Hello"  hardcoded
      --> Default.aspx:1:4
      |
    1 | <p>Hello</p>
      |    ^

    ✘ 1 problems (0 errors, 1 warning)

    ----- stderr -----
    "#);

    Ok(())
}

#[test]
fn test_missing_source_root() -> Result<()> {
    let test = CliTest::new()?;

    assert_cmd_snapshot!(test.check_command().args(["--source-root", "missing"]), @r#"
    success: false
    exit_code: 2
    ----- stdout -----

    ----- stderr -----
    error: Source root is not a directory: missing
    "#);

    Ok(())
}

#[test]
fn test_invalid_config() -> Result<()> {
    let test = CliTest::with_file(".locscanrc.json", r#"{ "ignores": ["[invalid"] }"#)?;

    let output = test.check_command().output()?;
    let stderr = String::from_utf8(output.stderr)?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr.starts_with("error: Invalid glob pattern in 'ignores': \"[invalid\""));

    Ok(())
}

#[test]
fn test_verbose_reports_config_source() -> Result<()> {
    let test = CliTest::with_file("Default.aspx", "<p><%= Title %></p>")?;

    assert_cmd_snapshot!(test.check_command().arg("-v"), @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Checked 1 file - no issues found

    ----- stderr -----
    info: no config file found, using defaults
    "#);

    Ok(())
}

#[test]
fn test_help_lists_commands() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().arg("--help").output()?;
    let stdout = String::from_utf8(output.stdout)?;

    assert_eq!(output.status.code(), Some(0));
    for command in ["check", "refs", "init"] {
        assert!(stdout.contains(command), "missing {command} in:\n{stdout}");
    }

    Ok(())
}
