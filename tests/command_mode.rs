//! Integration tests for the command line

use std::fs;
use std::path::PathBuf;
use std::process::Command;

fn run_command(args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .arg("run")
        .arg("-q")
        .arg("--")
        // Tests must be deterministic and not depend on a user's ~/.config/gridfill/settings.toml.
        .arg("--no-config")
        .args(args)
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    (stdout, stderr, exit_code)
}

fn temp_file(name: &str, content: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("gridfill_test_{}_{}", std::process::id(), name));
    fs::write(&path, content).unwrap();
    path
}

const TEMPLATE: &str = r#"
[[sheets]]
name = "Orders"

[sheets.cells]
A1 = "Order"
A2 = "=order.id"
B4 = "=SUM(B2)"

[[sheets.regions]]
collection = "orders"
variable = "order"
area = "A2:B2"
"#;

#[test]
fn test_listing_with_size_flag() {
    let template = temp_file("listing.toml", TEMPLATE);
    let (stdout, _, code) = run_command(&[template.to_str().unwrap(), "-s", "orders=3"]);
    fs::remove_file(&template).ok();

    assert_eq!(code, 0);
    assert_eq!(
        stdout,
        "# Orders\nA1: Order\nA2: =order.id\nA3: =order.id\nA4: =order.id\nB6: =SUM(B2:B4)\n"
    );
}

#[test]
fn test_sizes_from_data_file() {
    let template = temp_file("data.toml", TEMPLATE);
    let data = temp_file("data.json", r#"{"orders": [{"id": 1}, {"id": 2}]}"#);
    let (stdout, _, code) = run_command(&[
        template.to_str().unwrap(),
        "--data",
        data.to_str().unwrap(),
    ]);
    fs::remove_file(&template).ok();
    fs::remove_file(&data).ok();

    assert_eq!(code, 0);
    assert!(stdout.contains("A3: =order.id"));
    assert!(stdout.contains("B5: =SUM(B2:B3)"));
}

#[test]
fn test_size_flag_overrides_data() {
    let template = temp_file("override.toml", TEMPLATE);
    let data = temp_file("override.json", r#"{"orders": [{"id": 1}, {"id": 2}]}"#);
    let (stdout, _, code) = run_command(&[
        template.to_str().unwrap(),
        "-d",
        data.to_str().unwrap(),
        "--size",
        "orders=1",
    ]);
    fs::remove_file(&template).ok();
    fs::remove_file(&data).ok();

    assert_eq!(code, 0);
    assert!(stdout.contains("B4: =SUM(B2)"));
    assert!(!stdout.contains("A3:"));
}

#[test]
fn test_markdown_output() {
    let template = temp_file("markdown.toml", TEMPLATE);
    let output_file = std::env::temp_dir().join(format!(
        "gridfill_test_{}_preview.md",
        std::process::id()
    ));
    let (stdout, stderr, code) = run_command(&[
        template.to_str().unwrap(),
        "-s",
        "orders=2",
        "-o",
        output_file.to_str().unwrap(),
    ]);
    fs::remove_file(&template).ok();

    assert_eq!(code, 0);
    assert!(stdout.is_empty());
    assert!(stderr.contains("Preview written to"));

    let content = fs::read_to_string(&output_file).unwrap();
    assert!(content.contains("| 2 | order[0] | =order.id |  |"));
    assert!(content.contains("| 3 | order[1] | =order.id |  |"));
    assert!(content.contains("| 5 |  |  | =SUM(B2:B3) |"));

    fs::remove_file(&output_file).ok();
}

#[test]
fn test_listing_output_file() {
    let template = temp_file("listing_out.toml", TEMPLATE);
    let output_file = std::env::temp_dir().join(format!(
        "gridfill_test_{}_listing.txt",
        std::process::id()
    ));
    let (stdout, stderr, code) = run_command(&[
        template.to_str().unwrap(),
        "-s",
        "orders=2",
        "-o",
        output_file.to_str().unwrap(),
    ]);
    fs::remove_file(&template).ok();

    assert_eq!(code, 0);
    assert!(stdout.is_empty());
    assert!(stderr.contains("Listing written to"));

    let content = fs::read_to_string(&output_file).unwrap();
    assert_eq!(
        content,
        "# Orders\nA1: Order\nA2: =order.id\nA3: =order.id\nB5: =SUM(B2:B3)\n"
    );

    fs::remove_file(&output_file).ok();
}

#[test]
fn test_overlap_error_exit_code() {
    let template = temp_file(
        "overlap.toml",
        r#"
[[sheets]]
name = "Bad"

[[sheets.regions]]
collection = "a"
variable = "x"
area = "A1:B2"

[[sheets.regions]]
collection = "b"
variable = "y"
area = "B2:C3"
"#,
    );
    let (_, stderr, code) = run_command(&[template.to_str().unwrap()]);
    fs::remove_file(&template).ok();

    assert_eq!(code, 1);
    assert!(stderr.contains("Error: Repeat regions overlap"));
}

#[test]
fn test_missing_template() {
    let (_, stderr, code) = run_command(&["/nonexistent/template.toml"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Failed to load template"));
}

#[test]
fn test_invalid_size_argument() {
    let (_, stderr, code) = run_command(&["template.toml", "-s", "orders"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("expected NAME=N"));
}

#[test]
fn test_help() {
    let (_, stderr, code) = run_command(&["--help"]);
    assert_eq!(code, 0);
    assert!(stderr.contains("Usage: gridfill"));
}
