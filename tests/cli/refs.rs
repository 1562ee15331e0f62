use anyhow::Result;
use insta_cmd::assert_cmd_snapshot;
use serde_json::Value;

use crate::CliTest;

fn project() -> Result<CliTest> {
    let test = CliTest::new()?;
    test.write_file("Default.aspx", "<h1><%= Resources.Strings.Title %></h1>\n")?;
    test.write_file(
        "Default.aspx.cs",
        "var title = Resources.\n    Strings.Title;\nvar other = MyResources.Strings.Title;\n",
    )?;
    Ok(test)
}

#[test]
fn test_refs_with_key_flag() -> Result<()> {
    let test = project()?;

    assert_cmd_snapshot!(test.refs_command().args(["--key", "Resources.Strings.Title"]), @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    note: "Resources.Strings.Title"  resource-ref
      --> Default.aspx:1:9
      |
    1 | <h1><%= Resources.Strings.Title %></h1>
      |         ^

    note: "Resources.Strings.Title"  resource-ref
      --> Default.aspx.cs:1:13
      |
    1 | var title = Resources.
      |             ^

    ✓ 2 references found

    ----- stderr -----
    "#);

    Ok(())
}

#[test]
fn test_refs_keys_from_config() -> Result<()> {
    let test = project()?;
    test.write_file(
        ".locscanrc.json",
        r#"{ "resourceKeys": ["Resources.Strings.Title", "Resources.Strings.Footer"] }"#,
    )?;

    assert_cmd_snapshot!(test.refs_command(), @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    note: "Resources.Strings.Title"  resource-ref
      --> Default.aspx:1:9
      |
    1 | <h1><%= Resources.Strings.Title %></h1>
      |         ^

    note: "Resources.Strings.Title"  resource-ref
      --> Default.aspx.cs:1:13
      |
    1 | var title = Resources.
      |             ^

    ✓ 2 references found
    note: no references to "Resources.Strings.Footer"

    ----- stderr -----
    "#);

    Ok(())
}

#[test]
fn test_refs_without_keys() -> Result<()> {
    let test = project()?;

    assert_cmd_snapshot!(test.refs_command(), @r#"
    success: false
    exit_code: 2
    ----- stdout -----

    ----- stderr -----
    error: No resource keys given. Use --key or set 'resourceKeys' in the config file.
    "#);

    Ok(())
}

#[test]
fn test_refs_json_output() -> Result<()> {
    let test = project()?;

    let output = test
        .refs_command()
        .args([
            "--json",
            "--key",
            "Resources.Strings.Title",
            "--key",
            "Resources.Strings.Footer",
        ])
        .output()?;
    let report: Value = serde_json::from_slice(&output.stdout)?;

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(report["filesChecked"], 2);
    assert_eq!(report["issues"].as_array().map(Vec::len), Some(2));
    assert_eq!(report["issues"][0]["severity"], "note");
    assert_eq!(report["issues"][0]["rule"], "resource-ref");
    assert_eq!(report["issues"][1]["file"], "Default.aspx.cs");
    assert_eq!(report["issues"][1]["line"], 1);
    assert_eq!(report["unreferencedKeys"][0], "Resources.Strings.Footer");

    Ok(())
}
