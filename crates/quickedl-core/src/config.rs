//! 애플리케이션 설정 구조체.
//!
//! 자동 저장 주기, 마커 기록 정책, 프로젝트 목록, 로그 레벨 등
//! 런타임 설정을 정의한다. 누락된 키는 기본값으로 채워진다 (하위 호환).

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// 라벨 뱅크 자동 저장 설정
    #[serde(default)]
    pub autosave: AutoSaveConfig,
    /// 마커 기록 설정
    #[serde(default)]
    pub markers: MarkerConfig,
    /// 프로젝트 설정
    #[serde(default)]
    pub projects: ProjectConfig,
    /// 로그 설정
    #[serde(default)]
    pub logging: LoggingConfig,
}

// ============================================================
// 자동 저장 설정
// ============================================================

/// 자동 저장 설정 — 라벨 뱅크 주기적 저장
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoSaveConfig {
    /// 저장 주기 (초). 0 이하이면 자동 저장 비활성화
    #[serde(default = "default_autosave_interval_secs")]
    pub interval_secs: i64,
}

impl Default for AutoSaveConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_autosave_interval_secs(),
        }
    }
}

impl AutoSaveConfig {
    /// 자동 저장 활성화 여부
    pub fn is_enabled(&self) -> bool {
        self.interval_secs > 0
    }

    /// 저장 주기 (비활성화면 None)
    pub fn interval(&self) -> Option<Duration> {
        u64::try_from(self.interval_secs)
            .ok()
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

// ============================================================
// 마커 설정
// ============================================================

/// 마커 기록 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerConfig {
    /// 최근 기록 표시 개수
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
    /// 단축키로 마지막 마커 삭제 허용 (호스트 정책)
    #[serde(default)]
    pub delete_key_enabled: bool,
    /// 빈 라벨에 랜덤 문구 사용
    #[serde(default)]
    pub funny_mode: bool,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            history_capacity: default_history_capacity(),
            delete_key_enabled: false,
            funny_mode: false,
        }
    }
}

// ============================================================
// 프로젝트 설정
// ============================================================

/// 프로젝트 설정 — 기본 위치, 최근 프로젝트 목록 크기
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// 새 프로젝트 기본 상위 디렉토리
    #[serde(default)]
    pub default_dir: Option<PathBuf>,
    /// 최근 프로젝트 최대 개수
    #[serde(default = "default_max_recent")]
    pub max_recent: usize,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            default_dir: None,
            max_recent: default_max_recent(),
        }
    }
}

// ============================================================
// 로그 설정
// ============================================================

/// 로그 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl AppConfig {
    /// 기본 설정값 반환
    pub fn default_config() -> Self {
        Self {
            autosave: AutoSaveConfig::default(),
            markers: MarkerConfig::default(),
            projects: ProjectConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    /// 설정값 유효성 검증
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.markers.history_capacity == 0 {
            return Err(CoreError::Config(
                "markers.history_capacity는 1 이상이어야 합니다".to_string(),
            ));
        }
        if self.projects.max_recent == 0 {
            return Err(CoreError::Config(
                "projects.max_recent는 1 이상이어야 합니다".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::default_config()
    }
}

fn default_autosave_interval_secs() -> i64 {
    300 // 5분
}
fn default_history_capacity() -> usize {
    5
}
fn default_max_recent() -> usize {
    5
}
fn default_log_level() -> String {
    "info".to_string()
}
