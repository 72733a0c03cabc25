//! 설정 파일 관리.
//!
//! `config.json` 하나에 `AppConfig` 전체를 둔다. 같은 디렉토리가 설정 폴더이며
//! 최근 프로젝트 목록과 기본 라벨 파일(`texts.txt`)도 여기에 있다.

use crate::config::AppConfig;
use crate::error::CoreError;
use directories::ProjectDirs;
use parking_lot::RwLock;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 설정 파일 이름
const CONFIG_FILE_NAME: &str = "config.json";

/// 설정 폴더 이름 (플랫폼 경로를 못 찾을 때)
const APP_DIR_NAME: &str = "quickedl";

/// 설정 관리자
///
/// 복제해도 같은 설정을 공유한다. 변경은 검증 후 파일에 먼저 쓰고 메모리에 반영한다.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: Arc<RwLock<AppConfig>>,
    config_path: PathBuf,
}

impl ConfigManager {
    /// 플랫폼 설정 폴더의 `config.json`
    pub fn new() -> Result<Self, CoreError> {
        Self::with_path(Self::config_dir().join(CONFIG_FILE_NAME))
    }

    /// 지정 경로의 설정 파일 (없으면 기본값으로 생성)
    pub fn with_path(config_path: PathBuf) -> Result<Self, CoreError> {
        ensure_parent(&config_path)?;

        let config = match read_config(&config_path)? {
            Some(config) => config,
            None => {
                let config = AppConfig::default_config();
                write_config(&config_path, &config)?;
                info!("기본 설정 파일 생성: {}", config_path.display());
                config
            }
        };

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            config_path,
        })
    }

    /// 현재 설정 (복제본)
    pub fn get(&self) -> AppConfig {
        self.config.read().clone()
    }

    /// 설정 전체 교체
    pub fn update(&self, new_config: AppConfig) -> Result<(), CoreError> {
        new_config.validate()?;
        write_config(&self.config_path, &new_config)?;
        *self.config.write() = new_config;
        debug!("설정 저장: {}", self.config_path.display());
        Ok(())
    }

    /// 현재 설정을 고쳐서 저장, 저장된 설정 반환
    ///
    /// 검증에 실패하면 파일과 메모리 모두 그대로다.
    pub fn update_with<F>(&self, edit: F) -> Result<AppConfig, CoreError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut config = self.get();
        edit(&mut config);
        self.update(config.clone())?;
        Ok(config)
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// 설정 파일이 있는 폴더
    pub fn settings_dir(&self) -> PathBuf {
        match self.config_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// 플랫폼별 설정 폴더
    ///
    /// - macOS: `~/Library/Application Support/com.quickedl.quickedl/`
    /// - Windows: `%APPDATA%\quickedl\quickedl\config\`
    /// - Linux: `~/.config/quickedl/`
    pub fn config_dir() -> PathBuf {
        ProjectDirs::from("com", "quickedl", APP_DIR_NAME)
            .map(|dirs| dirs.config_dir().to_path_buf())
            .unwrap_or_else(|| {
                warn!("플랫폼 설정 디렉토리를 찾을 수 없음, 현재 디렉토리 사용");
                PathBuf::from(".").join(APP_DIR_NAME)
            })
    }
}

fn ensure_parent(path: &Path) -> Result<(), CoreError> {
    let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };
    if parent.is_dir() {
        return Ok(());
    }
    fs::create_dir_all(parent).map_err(|e| {
        CoreError::Config(format!("설정 디렉토리 생성 실패: {}: {e}", parent.display()))
    })?;
    info!("설정 디렉토리 생성: {}", parent.display());
    Ok(())
}

/// 설정 파일 읽기 (없으면 None)
fn read_config(path: &Path) -> Result<Option<AppConfig>, CoreError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(CoreError::Config(format!(
                "설정 파일 읽기 실패: {}: {e}",
                path.display()
            )))
        }
    };

    let config: AppConfig = serde_json::from_str(&content).map_err(|e| {
        CoreError::Config(format!("설정 파일 파싱 실패: {}: {e}", path.display()))
    })?;
    config.validate()?;
    debug!("설정 파일 로드: {}", path.display());
    Ok(Some(config))
}

fn write_config(path: &Path, config: &AppConfig) -> Result<(), CoreError> {
    let content = serde_json::to_string_pretty(config)?;
    fs::write(path, content).map_err(|e| {
        CoreError::Config(format!("설정 파일 저장 실패: {}: {e}", path.display()))
    })
}
