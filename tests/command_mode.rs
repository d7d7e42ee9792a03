//! Integration tests for the tabula binary

use std::io::Write;
use std::process::{Command, Stdio};

fn run(args: &[&str], stdin: &str) -> (String, String, i32) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_tabula"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn tabula");

    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(stdin.as_bytes())
        .expect("Failed to write stdin");

    let output = child.wait_with_output().expect("Failed to wait for tabula");
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    (stdout, stderr, exit_code)
}

#[test]
fn test_basic_arithmetic() {
    let (stdout, _, code) = run(&["-c", "5 + 3"], "");
    assert_eq!(stdout.trim(), "8");
    assert_eq!(code, 0);
}

#[test]
fn test_auto_prepend_equals() {
    let (stdout1, _, _) = run(&["-c", "10 + 5"], "");
    let (stdout2, _, _) = run(&["-c", "=10 + 5"], "");
    assert_eq!(stdout1, stdout2);
}

#[test]
fn test_division_by_zero() {
    let (stdout, _, code) = run(&["-c", "1/0"], "");
    assert_eq!(stdout.trim(), "#DIV/0!");
    assert_eq!(code, 1);
}

#[test]
fn test_parse_error_exit_code() {
    let (stdout, stderr, code) = run(&["-c", "1 +"], "");
    assert!(stdout.is_empty());
    assert!(stderr.contains("parse error"));
    assert_eq!(code, 1);
}

#[test]
fn test_script_from_stdin_prints_values() {
    let script = "A1 = 5\nB1 = =A1*2\nA2 = '=text\nA1 = 7\n";
    let (stdout, _, code) = run(&[], script);
    assert_eq!(stdout, "7\t14\n=text\t\n");
    assert_eq!(code, 0);
}

#[test]
fn test_script_prints_texts() {
    let script = "A1 = 5\nB1 = =(A1)*2\n";
    let (stdout, _, code) = run(&["--texts"], script);
    assert_eq!(stdout, "5\t=A1*2\n");
    assert_eq!(code, 0);
}

#[test]
fn test_script_cycle_reports_line() {
    let script = "A1 = =B1+1\nB1 = =A1+1\n";
    let (stdout, stderr, code) = run(&[], script);
    assert!(stdout.is_empty());
    assert!(stderr.contains("line 2"), "stderr: {}", stderr);
    assert!(stderr.contains("Circular dependency"), "stderr: {}", stderr);
    assert_eq!(code, 1);
}

#[test]
fn test_script_clear_shrinks_output() {
    let script = "A1 = a\nC3 = c\nclear C3\n";
    let (stdout, _, code) = run(&[], script);
    assert_eq!(stdout, "a\n");
    assert_eq!(code, 0);
}

#[test]
fn test_deeply_nested_formula_is_rejected() {
    let formula = format!("={}1{}", "(".repeat(20000), ")".repeat(20000));
    let (stdout, stderr, code) = run(&["-c", &formula], "");
    assert_eq!(code, 1);
    assert!(stdout.is_empty());
    assert!(stderr.contains("formula parse error"), "stderr: {}", stderr);
}

#[test]
fn test_long_chain_script() {
    let mut script = String::from("A1 = 1\n");
    for row in 2..=2000 {
        script.push_str(&format!("A{} = =A{}+1\n", row, row - 1));
    }
    let (stdout, _, code) = run(&[], &script);
    assert_eq!(code, 0);
    assert_eq!(stdout.lines().count(), 2000);
    assert_eq!(stdout.lines().last(), Some("2000"));
}
