//! 설정 및 어댑터 와이어링 통합 테스트.
//!
//! 설정 파일 → AppConfig → 어댑터 생성 검증.

use quickedl_core::config::AppConfig;
use quickedl_core::config_manager::ConfigManager;
use quickedl_core::ports::clock::SystemClock;
use quickedl_storage::marker_log::MarkerLog;
use quickedl_storage::recent::{RecentProjects, RECENT_PROJECTS_FILE};
use std::fs;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn config_defaults_are_valid() {
    let config = AppConfig::default_config();
    assert!(config.validate().is_ok());

    assert_eq!(config.autosave.interval_secs, 300);
    assert_eq!(config.autosave.interval(), Some(Duration::from_secs(300)));
    assert_eq!(config.markers.history_capacity, 5);
    assert!(!config.markers.delete_key_enabled);
    assert!(!config.markers.funny_mode);
    assert_eq!(config.projects.max_recent, 5);
    assert_eq!(config.logging.level, "info");
}

#[test]
fn partial_config_file_fills_defaults() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("config.json");
    let partial = serde_json::json!({
        "autosave": { "interval_secs": -1 },
        "markers": { "funny_mode": true }
    });
    fs::write(&path, partial.to_string()).unwrap();

    let config = ConfigManager::with_path(path).unwrap().get();
    assert!(!config.autosave.is_enabled());
    assert!(config.autosave.interval().is_none());
    assert!(config.markers.funny_mode);
    assert_eq!(config.markers.history_capacity, 5);
    assert_eq!(config.projects.max_recent, 5);
}

#[test]
fn config_persists_across_managers() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("nested").join("config.json");

    let manager = ConfigManager::with_path(path.clone()).unwrap();
    manager
        .update_with(|config| {
            config.markers.delete_key_enabled = true;
            config.projects.max_recent = 2;
        })
        .unwrap();

    let reopened = ConfigManager::with_path(path).unwrap().get();
    assert!(reopened.markers.delete_key_enabled);
    assert_eq!(reopened.projects.max_recent, 2);
}

#[test]
fn adapters_instantiate_from_config() {
    let tmp = TempDir::new().unwrap();
    let config = AppConfig::default_config();

    let log = MarkerLog::new(config.markers.history_capacity, Arc::new(SystemClock));
    assert_eq!(log.history().capacity(), config.markers.history_capacity);
    assert!(!log.is_bound());

    let recent = RecentProjects::load_from(
        &tmp.path().join(RECENT_PROJECTS_FILE),
        config.projects.max_recent,
    );
    assert!(recent.is_empty());
}
