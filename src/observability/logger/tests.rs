use super::*;
use tempfile::tempdir;

#[test]
fn test_logger_creation() {
    let temp_dir = tempdir().unwrap();
    let log_path = temp_dir.path().join("test.md");

    let logger = Logger::new(Some(&log_path), Some("debug")).unwrap();
    assert_eq!(logger.log_file(), log_path.as_path());
    assert_eq!(logger.log_level(), "DEBUG");
}

#[test]
fn test_log_file_creation() {
    let temp_dir = tempdir().unwrap();
    let log_path = temp_dir.path().join("logs").join("test.md");

    let _logger = Logger::new(Some(&log_path), None).unwrap();
    assert!(log_path.exists());

    let content = std::fs::read_to_string(&log_path).unwrap();
    assert!(content.contains("# botctl Session Log"));
    assert!(content.contains("Log started:"));
}

#[test]
fn test_existing_log_is_appended_not_truncated() {
    let temp_dir = tempdir().unwrap();
    let log_path = temp_dir.path().join("test.md");

    let first = Logger::new(Some(&log_path), None).unwrap();
    first.log_completion("first run").unwrap();

    let second = Logger::new(Some(&log_path), None).unwrap();
    second.log_completion("second run").unwrap();

    let content = std::fs::read_to_string(&log_path).unwrap();
    assert_eq!(content.matches("# botctl Session Log").count(), 1);
    assert!(content.contains("first run"));
    assert!(content.contains("second run"));
}

#[test]
fn test_log_session_operations() {
    let temp_dir = tempdir().unwrap();
    let log_path = temp_dir.path().join("test.md");
    let logger = Logger::new(Some(&log_path), None).unwrap();

    let argv = vec!["botctl".to_string(), "deploy".to_string(), "prod".to_string()];
    logger.log_session_start(&argv).unwrap();
    logger
        .log_dispatch(
            "deployment-deploy",
            &[vec!["deployment-deploy".to_string(), "prod".to_string()]],
        )
        .unwrap();
    logger
        .log_error("Handler not found: x", Some(&serde_json::json!({"path": "deploy"})))
        .unwrap();
    logger.log_completion("ok").unwrap();

    let content = std::fs::read_to_string(&log_path).unwrap();
    assert!(content.contains("## Session Started"));
    assert!(content.contains("`botctl deploy prod`"));
    assert!(content.contains("**Command:** `deployment-deploy`"));
    assert!(content.contains("- `deployment-deploy prod`"));
    assert!(content.contains("Handler not found: x"));
    assert!(content.contains("\"path\": \"deploy\""));
    assert!(content.contains("### Session Completed"));
}

#[test]
fn test_api_requests_only_logged_at_debug() {
    let temp_dir = tempdir().unwrap();

    let info_path = temp_dir.path().join("info.md");
    let info = Logger::new(Some(&info_path), Some("INFO")).unwrap();
    info.log_api_request("GET", "http://api/bots/1/deployments", Some(200)).unwrap();
    let content = std::fs::read_to_string(&info_path).unwrap();
    assert!(!content.contains("API Request"));

    let debug_path = temp_dir.path().join("debug.md");
    let debug = Logger::new(Some(&debug_path), Some("DEBUG")).unwrap();
    debug.log_api_request("GET", "http://api/bots/1/deployments", Some(404)).unwrap();
    let content = std::fs::read_to_string(&debug_path).unwrap();
    assert!(content.contains("`GET http://api/bots/1/deployments`"));
    assert!(content.contains("**Status:** 404"));
}
