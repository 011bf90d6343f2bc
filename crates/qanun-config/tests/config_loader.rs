use qanun_config::{Config, ConfigLoader};
use qanun_types::Mode;
use std::fs;
use std::time::Duration;

#[test]
fn later_files_override_earlier_ones() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.jsonc");
    let second = dir.path().join("second.json");
    fs::write(
        &first,
        r#"{
            "server": { "url": "http://first:5000", "timeoutSecs": 12 },
            "dictation": { "command": ["rec", "{lang}"] },
            "logLevel": "debug",
        }"#,
    )
    .unwrap();
    fs::write(
        &second,
        r#"{ "server": { "url": "http://second:5000" }, "mode": "labor" }"#,
    )
    .unwrap();

    let mut loader = ConfigLoader::new();
    loader.load_from_file(&first).unwrap();
    loader.load_from_file(&second).unwrap();
    let config: &Config = loader.config();

    assert_eq!(config.base_url(), "http://second:5000");
    assert_eq!(config.timeout(), Duration::from_secs(12));
    assert_eq!(config.default_mode(), Mode::Labor);
    assert_eq!(config.log_level.as_deref(), Some("debug"));
    assert_eq!(
        config.dictation_command().unwrap(),
        vec!["rec".to_string(), "ar-MA".to_string()]
    );
    assert_eq!(loader.config_paths(), &[first, second]);
}

#[test]
fn missing_file_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let mut loader = ConfigLoader::new();
    loader
        .load_from_file(dir.path().join("absent.jsonc"))
        .unwrap();
    assert!(loader.config_paths().is_empty());
}

#[test]
fn malformed_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.jsonc");
    fs::write(&path, "{ \"server\": ").unwrap();
    let err = ConfigLoader::new().load_from_file(&path).unwrap_err();
    assert!(format!("{:#}", err).contains("broken.jsonc"));
}

#[test]
fn explicit_path_must_exist() {
    let dir = tempfile::tempdir().unwrap();
    let err = ConfigLoader::new()
        .load_all(Some(&dir.path().join("nope.jsonc")))
        .unwrap_err();
    assert!(err.to_string().contains("not found"));
}

#[test]
fn user_id_is_trimmed() {
    let mut loader = ConfigLoader::new();
    loader
        .load_from_str(r#"{ "server": { "user_id": "  abc  " } }"#)
        .unwrap();
    assert_eq!(loader.config().user_id(), Some("abc"));
}
