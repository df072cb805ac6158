
use serial_test::serial;
use tempfile::tempdir;
use test_helpers::base_moodlog_command;

/// JSON logs go to stderr, one object per line, inside the invocation span.
#[test]
#[serial]
fn test_json_logs_carry_correlation_id() {
    let temp_dir = tempdir().unwrap();

    let output = base_moodlog_command(temp_dir.path())
        .env("RUST_LOG", "info")
        .args(["--log-format", "json", "list"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "No hay entradas aún."
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    let lines: Vec<serde_json::Value> = stderr
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).expect("log line is not JSON"))
        .collect();
    assert!(!lines.is_empty());

    let ids: Vec<&str> = lines
        .iter()
        .filter_map(|line| line["span"]["correlation_id"].as_str())
        .collect();
    assert_eq!(ids.len(), lines.len());
    assert!(ids.windows(2).all(|pair| pair[0] == pair[1]));
    assert!(lines
        .iter()
        .all(|line| line["span"]["name"] == "app_invocation"));
}

#[test]
#[serial]
fn test_errors_are_logged_once() {
    let temp_dir = tempdir().unwrap();

    let output = base_moodlog_command(temp_dir.path())
        .env("RUST_LOG", "debug")
        .args(["delete", "missing-id"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches("Command failed").count(), 1);
    assert!(stderr.contains("Error: Entry not found: missing-id"));
}

#[test]
#[serial]
fn test_default_level_hides_debug() {
    let temp_dir = tempdir().unwrap();

    let output = base_moodlog_command(temp_dir.path())
        .env_remove("RUST_LOG")
        .args(["feel", "Feliz"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Starting moodlog"));
    assert!(!stderr.contains("Stored emotion entry"));
}
