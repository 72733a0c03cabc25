//! 최근 프로젝트 목록.
//!
//! 설정 디렉토리의 `recent_projects.json`에 최신순으로 저장.
//! 같은 경로는 한 번만 나타나며 `max_recent`개를 넘지 않는다.

use quickedl_core::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// 최근 프로젝트 파일 이름
pub const RECENT_PROJECTS_FILE: &str = "recent_projects.json";

/// 최근 프로젝트 항목
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentEntry {
    /// 표시 이름
    pub name: String,
    /// 프로젝트 디렉토리
    pub path: PathBuf,
}

/// 최근 연 프로젝트 목록
#[derive(Debug, Clone)]
pub struct RecentProjects {
    entries: Vec<RecentEntry>,
    storage_path: PathBuf,
    max_recent: usize,
}

impl RecentProjects {
    /// 파일에서 로드
    ///
    /// 파일이 없거나 깨졌으면 빈 목록으로 시작한다.
    pub fn load_from(path: &Path, max_recent: usize) -> Self {
        let entries = match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<Vec<RecentEntry>>(&json) {
                Ok(entries) => {
                    debug!("최근 프로젝트 {}개 로드", entries.len());
                    entries
                }
                Err(e) => {
                    warn!("최근 프로젝트 파일 파싱 실패, 빈 목록으로 시작: {e}");
                    Vec::new()
                }
            },
            Err(e) => {
                if e.kind() != io::ErrorKind::NotFound {
                    warn!("최근 프로젝트 파일 읽기 실패: {}: {e}", path.display());
                }
                Vec::new()
            }
        };

        let mut recent = Self {
            entries,
            storage_path: path.to_path_buf(),
            max_recent,
        };
        recent.entries.truncate(max_recent);
        recent
    }

    /// 항목 추가 (이미 있으면 맨 앞으로 이동)
    pub fn add(&mut self, path: &Path, name: &str) {
        if name.trim().is_empty() || path.as_os_str().is_empty() {
            return;
        }
        let path = resolve(path);
        self.entries.retain(|e| e.path != path);
        self.entries.insert(
            0,
            RecentEntry {
                name: name.to_string(),
                path,
            },
        );
        self.entries.truncate(self.max_recent);
        debug!("최근 프로젝트 추가: {name} ({}개)", self.entries.len());
    }

    /// 경로로 항목 제거
    pub fn remove(&mut self, path: &Path) -> bool {
        let path = resolve(path);
        let before = self.entries.len();
        self.entries.retain(|e| e.path != path);
        before != self.entries.len()
    }

    /// 최대 개수 변경 (초과분은 오래된 것부터 제거)
    pub fn set_max(&mut self, max_recent: usize) {
        self.max_recent = max_recent;
        self.entries.truncate(max_recent);
    }

    /// 디스크에서 사라진 프로젝트 제거
    pub fn prune_missing(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| {
            let exists = e.path.is_dir();
            if !exists {
                debug!("사라진 프로젝트 제거: {}", e.path.display());
            }
            exists
        });
        before - self.entries.len()
    }

    /// 최신순 항목
    pub fn entries(&self) -> &[RecentEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 디스크에 저장
    pub fn save(&self) -> Result<(), CoreError> {
        if let Some(parent) = self.storage_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                error!("최근 프로젝트 디렉토리 생성 실패: {}: {e}", parent.display());
                CoreError::Io(e)
            })?;
        }

        let json = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.storage_path, json).map_err(|e| {
            error!(
                "최근 프로젝트 저장 실패: {}: {e}",
                self.storage_path.display()
            );
            CoreError::Io(e)
        })?;

        info!("최근 프로젝트 {}개 저장", self.entries.len());
        Ok(())
    }
}

/// 같은 디렉토리를 다른 표기로 두 번 넣지 않도록 정규화
fn resolve(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn project_dir(tmp: &TempDir, name: &str) -> PathBuf {
        let path = tmp.path().join(name);
        fs::create_dir_all(&path).unwrap();
        fs::canonicalize(path).unwrap()
    }

    #[test]
    fn missing_file_loads_empty() {
        let tmp = TempDir::new().unwrap();
        let recent = RecentProjects::load_from(&tmp.path().join(RECENT_PROJECTS_FILE), 5);
        assert!(recent.is_empty());
    }

    #[test]
    fn corrupt_file_loads_empty() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(RECENT_PROJECTS_FILE);
        fs::write(&path, "{not json").unwrap();
        assert!(RecentProjects::load_from(&path, 5).is_empty());
    }

    #[test]
    fn add_moves_existing_to_front() {
        let tmp = TempDir::new().unwrap();
        let a = project_dir(&tmp, "A");
        let b = project_dir(&tmp, "B");
        let mut recent = RecentProjects::load_from(&tmp.path().join(RECENT_PROJECTS_FILE), 5);

        recent.add(&a, "A");
        recent.add(&b, "B");
        recent.add(&tmp.path().join("A"), "A");

        let names: Vec<&str> = recent.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["A", "B"]);
    }

    #[test]
    fn add_caps_at_max_and_set_max_truncates() {
        let tmp = TempDir::new().unwrap();
        let mut recent = RecentProjects::load_from(&tmp.path().join(RECENT_PROJECTS_FILE), 3);
        for name in ["p1", "p2", "p3", "p4"] {
            recent.add(&project_dir(&tmp, name), name);
        }
        assert_eq!(recent.len(), 3);
        assert_eq!(recent.entries()[0].name, "p4");

        recent.set_max(1);
        assert_eq!(recent.len(), 1);
        assert_eq!(recent.entries()[0].name, "p4");
    }

    #[test]
    fn remove_and_prune() {
        let tmp = TempDir::new().unwrap();
        let keep = project_dir(&tmp, "keep");
        let gone = project_dir(&tmp, "gone");
        let other = project_dir(&tmp, "other");
        let mut recent = RecentProjects::load_from(&tmp.path().join(RECENT_PROJECTS_FILE), 5);
        recent.add(&keep, "keep");
        recent.add(&gone, "gone");
        recent.add(&other, "other");

        assert!(recent.remove(&other));
        assert!(!recent.remove(&other));

        fs::remove_dir(&gone).unwrap();
        assert_eq!(recent.prune_missing(), 1);
        assert_eq!(recent.entries()[0].name, "keep");
    }

    #[test]
    fn save_and_reload() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("settings").join(RECENT_PROJECTS_FILE);
        let mut recent = RecentProjects::load_from(&path, 5);
        recent.add(&project_dir(&tmp, "Show"), "Show");
        recent.save().unwrap();

        let reloaded = RecentProjects::load_from(&path, 5);
        assert_eq!(reloaded.entries(), recent.entries());
    }
}
