//! Process-level tests: stdin payload in, exit status and stderr out

use std::io::Write;
use std::process::{Command, Output, Stdio};

use tempfile::NamedTempFile;
use write_guard::output::{EXIT_ALLOW, EXIT_BLOCK, EXIT_MALFORMED};

fn config_file(toml: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"[general]\naudit_log = false\n").unwrap();
    file.write_all(toml.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn run_with_args(config: &NamedTempFile, args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_write-guard"))
        .arg("--config")
        .arg(config.path())
        .args(args)
        .env_remove("WRITE_GUARD_DRY_RUN")
        .env_remove("WRITE_GUARD_LOG")
        .env_remove("CLAUDE_PROJECT_DIR")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    child
        .stdin
        .take()
        .unwrap()
        .write_all(stdin.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

fn run(config: &NamedTempFile, stdin: &str) -> (i32, String) {
    let output = run_with_args(config, &[], stdin);
    (
        output.status.code().unwrap(),
        String::from_utf8_lossy(&output.stderr).to_string(),
    )
}

// ============================================================================
// Exit status contract
// ============================================================================

#[test]
fn test_zero_access_write_exits_2() {
    let config = config_file("[policy]\nzeroAccessPaths = [\"~/.ssh/\"]\n");
    let (code, stderr) = run(
        &config,
        r#"{"tool_name":"Write","tool_input":{"file_path":"~/.ssh/id_rsa"}}"#,
    );
    assert_eq!(code, 2);
    assert!(stderr.contains("SECURITY:"));
    assert!(stderr.contains("zero-access path"));
    assert!(stderr.contains("~/.ssh/id_rsa"));
}

#[test]
fn test_exit_status_matches_library_constants() {
    let config = config_file("[policy]\nzeroAccessPaths = [\"/etc/\"]\n");
    let cases = [
        (r#"{"tool_name":"Write","tool_input":{"file_path":"/tmp/a"}}"#, EXIT_ALLOW),
        (r#"{"tool_name":"Write","tool_input":{"file_path":"/etc/hosts"}}"#, EXIT_BLOCK),
        ("{not json", EXIT_MALFORMED),
    ];
    for (stdin, expected) in cases {
        let (code, _) = run(&config, stdin);
        assert_eq!(code, i32::from(expected), "{}", stdin);
    }
}

#[test]
fn test_base_dir_with_glob_characters_matches_literally() {
    let config = config_file(
        "base_dir = \"/work/app[1]\"\n[policy]\nzeroAccessPaths = [\"$CLAUDE_PROJECT_DIR/secrets/*\"]\n",
    );
    let write = |path: &str| {
        format!(
            r#"{{"tool_name":"Write","tool_input":{{"file_path":"{}"}}}}"#,
            path
        )
    };

    let (code, _) = run(&config, &write("/work/app[1]/secrets/key"));
    assert_eq!(code, 2);
    let (code, _) = run(&config, &write("$CLAUDE_PROJECT_DIR/secrets/key"));
    assert_eq!(code, 2);
    let (code, _) = run(&config, &write("/work/app1/secrets/key"));
    assert_eq!(code, 0);
}

#[test]
fn test_read_passes_through() {
    let config = config_file("[policy]\n");
    let (code, stderr) = run(
        &config,
        r#"{"tool_name":"Read","tool_input":{"file_path":"/etc/passwd"}}"#,
    );
    assert_eq!(code, 0);
    assert!(!stderr.contains("SECURITY"));
}

#[test]
fn test_content_rule_exits_2() {
    let config = config_file(
        r#"
[policy]
[[policy.contentRules]]
filePattern = '.*\.env$'
contentPattern = "API_KEY"
reason = "secret literal"
"#,
    );
    let (code, stderr) = run(
        &config,
        r#"{"tool_name":"Write","tool_input":{"file_path":"app.env","content":"API_KEY=123"}}"#,
    );
    assert_eq!(code, 2);
    assert!(stderr.contains("SECURITY:"));
    assert!(stderr.contains("secret literal"));
}

#[test]
fn test_malformed_payload_exits_1() {
    let config = config_file("[policy]\nzeroAccessPaths = [\"/\"]\n");
    for payload in ["{not json", r#"{"tool_input":{}}"#, r#"[1,2,3]"#] {
        let (code, stderr) = run(&config, payload);
        assert_eq!(code, 1, "{}", payload);
        assert!(!stderr.contains("SECURITY"), "{}", payload);
        assert!(stderr.contains("failed to parse hook input"), "{}", payload);
    }
}

#[test]
fn test_empty_stdin_allows() {
    let config = config_file("[policy]\nzeroAccessPaths = [\"/\"]\n");
    let (code, _) = run(&config, "");
    assert_eq!(code, 0);
}

#[test]
fn test_write_without_path_allows() {
    let config = config_file("[policy]\nzeroAccessPaths = [\"/\"]\n");
    let (code, _) = run(&config, r#"{"tool_name":"Write","tool_input":{"content":"x"}}"#);
    assert_eq!(code, 0);
}

#[test]
fn test_allowed_write_is_silent() {
    let config = config_file("[policy]\nreadOnlyPaths = [\"/etc/\"]\n");
    let (code, stderr) = run(
        &config,
        r#"{"tool_name":"Write","tool_input":{"file_path":"/srv/app/main.rs","content":"fn main() {}"}}"#,
    );
    assert_eq!(code, 0);
    assert!(stderr.is_empty(), "unexpected stderr: {}", stderr);
}

// ============================================================================
// Fault policy
// ============================================================================

#[test]
fn test_fault_fails_open_with_report() {
    let config = config_file(
        r#"
[policy]
[[policy.contentRules]]
filePattern = '.*'
contentPattern = "(unclosed"
reason = "broken rule"
"#,
    );
    let (code, stderr) = run(
        &config,
        r#"{"tool_name":"Write","tool_input":{"file_path":"a.txt","content":"x"}}"#,
    );
    assert_eq!(code, 0);
    assert!(stderr.contains("internal fault"));
    assert!(!stderr.contains("SECURITY"));
}

#[test]
fn test_fault_fails_closed_when_configured() {
    let mut config = NamedTempFile::new().unwrap();
    config
        .write_all(
            br#"
[general]
audit_log = false
on_fault = "block"

[policy]
[[policy.contentRules]]
filePattern = '.*'
contentPattern = "(unclosed"
reason = "broken rule"
"#,
        )
        .unwrap();
    let (code, stderr) = run(
        &config,
        r#"{"tool_name":"Write","tool_input":{"file_path":"a.txt","content":"x"}}"#,
    );
    assert_eq!(code, 2);
    assert!(stderr.contains("SECURITY:"));
    assert!(stderr.contains("internal fault"));
}

// ============================================================================
// Dry-run and audit
// ============================================================================

#[test]
fn test_dry_run_reports_but_allows() {
    let config = config_file("[policy]\nzeroAccessPaths = [\"~/.ssh/\"]\n");
    let output = run_with_args(
        &config,
        &["--dry-run"],
        r#"{"tool_name":"Write","tool_input":{"file_path":"~/.ssh/id_rsa","content":"k"}}"#,
    );
    assert_eq!(output.status.code(), Some(0));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("SECURITY (dry-run)"));
}

#[test]
fn test_audit_log_written() {
    let dir = tempfile::tempdir().unwrap();
    let audit = dir.path().join("audit.jsonl");
    let mut config = NamedTempFile::new().unwrap();
    write!(
        config,
        "[general]\naudit_log = true\naudit_path = \"{}\"\n\n[policy]\nreadOnlyPaths = [\"/etc/\"]\n",
        audit.display()
    )
    .unwrap();

    let (code, _) = run(
        &config,
        r#"{"tool_name":"Write","tool_input":{"file_path":"/etc/hosts","content":"x"},"session_id":"s1"}"#,
    );
    assert_eq!(code, 2);

    let log = std::fs::read_to_string(&audit).unwrap();
    assert!(log.contains("\"level\":\"BLOCKED\""));
    assert!(log.contains("read-only path"));
    assert!(log.contains("\"session_id\":\"s1\""));
}
