//! 프로젝트 세션 — 디렉토리를 정규 데이터 파일 3개로 해석.
//!
//! 디렉토리 이름이 `X`이면 `X_EDL.txt`, `X_MARKERLABEL.txt`, `X_PLAYLIST.txt`를
//! 먼저 찾고, 없는 종류는 디렉토리 직속 파일 중 접미사가 맞는 첫 파일을 채택한다
//! (대소문자 무시, 이름순).
//!
//! 탐색 중 파일 시스템 에러는 로그만 남기고 "파일 없음"으로 처리한다.
//! 일부가 깨진 프로젝트 폴더라도 해석된 부분은 운영자가 볼 수 있어야 한다.
//! 탐색 결과는 캐시하지 않고 로드할 때마다 다시 스캔한다.

use quickedl_core::error::CoreError;
use quickedl_core::models::label_bank::LabelBank;
use quickedl_core::models::session::{Discovery, FileKind, SessionFiles};
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use crate::label_bank;

/// 세션 변경 콜백
pub type SessionObserver = Box<dyn FnMut(&Session) + Send>;

/// 디렉토리에 묶인 파일 집합
///
/// 루트 경로는 인스턴스 수명 동안 고정이다. 프로젝트를 바꾸면 새 세션을 만든다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    root: Option<PathBuf>,
    name: Option<String>,
    files: SessionFiles,
}

impl Session {
    /// 프로젝트 없는 빈 세션 (앱 시작 상태)
    pub fn empty() -> Self {
        Self::default()
    }

    /// 디렉토리를 스캔해 세션 해석
    pub fn discover(root: &Path) -> Self {
        let name = project_name(root);
        let mut files = SessionFiles::default();

        if !root.is_dir() {
            warn!("프로젝트 디렉토리가 존재하지 않음: {}", root.display());
            return Self {
                root: Some(root.to_path_buf()),
                name: Some(name),
                files,
            };
        }

        debug!("프로젝트 파일 탐색: {name}");
        for kind in FileKind::ALL {
            let expected = root.join(kind.canonical_name(&name));
            if expected.is_file() {
                files.set(kind, Some(expected));
            }
        }

        let missing = files.missing();
        if !missing.is_empty() {
            let candidates = list_files(root);
            for kind in missing {
                match candidates
                    .iter()
                    .find(|(file_name, _)| kind.matches_file_name(file_name))
                {
                    Some((file_name, path)) => {
                        debug!("접미사로 파일 채택: {kind:?} → {file_name}");
                        files.set(kind, Some(path.clone()));
                    }
                    None => warn!("프로젝트 파일 없음: {kind:?} ({})", root.display()),
                }
            }
        }

        Self {
            root: Some(root.to_path_buf()),
            name: Some(name),
            files,
        }
    }

    /// 프로젝트 루트 디렉토리
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// 프로젝트 이름 (디렉토리 이름)
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// 해석된 파일 전체
    pub fn files(&self) -> &SessionFiles {
        &self.files
    }

    /// 마커 로그 파일
    pub fn log_file(&self) -> Option<&Path> {
        self.files.log.as_deref()
    }

    /// 라벨 뱅크 파일
    pub fn label_bank_file(&self) -> Option<&Path> {
        self.files.label_bank.as_deref()
    }

    /// 플레이리스트 파일
    pub fn playlist_file(&self) -> Option<&Path> {
        self.files.playlist.as_deref()
    }

    /// 로그 파일이 있어야 유효
    pub fn is_valid(&self) -> bool {
        self.files.log.is_some()
    }

    /// 탐색 완료 상태
    pub fn discovery(&self) -> Discovery {
        Discovery::from_files(&self.files)
    }
}

/// 새 프로젝트 생성 옵션
#[derive(Debug, Clone, Copy, Default)]
pub struct CreateOptions<'a> {
    /// 이름이 겹치면 `name_2`, `name_3`, … 중 첫 빈 이름 사용
    pub auto_increment: bool,
    /// 새 라벨 뱅크 파일에 바로 기록할 현재 라벨
    pub seed_labels: Option<&'a LabelBank>,
}

/// 현재 세션과 변경 콜백을 보유
pub struct SessionManager {
    current: Session,
    observer: Option<SessionObserver>,
}

impl SessionManager {
    /// 빈 세션으로 시작
    pub fn new() -> Self {
        Self {
            current: Session::empty(),
            observer: None,
        }
    }

    /// 변경 콜백 등록 (이전 콜백은 교체)
    pub fn observe<F>(&mut self, callback: F)
    where
        F: FnMut(&Session) + Send + 'static,
    {
        self.observer = Some(Box::new(callback));
    }

    /// 현재 세션
    pub fn current(&self) -> &Session {
        &self.current
    }

    /// 기존 프로젝트 디렉토리 로드
    ///
    /// 결과와 관계없이 콜백을 정확히 한 번 호출한다.
    /// 디렉토리가 없어도 에러 대신 `false`를 반환한다.
    pub fn load_existing(&mut self, root: &Path) -> bool {
        let session = Session::discover(root);
        let valid = session.is_valid();
        match session.discovery() {
            Discovery::Complete => {
                info!("프로젝트 '{}' 로드 완료", session.name().unwrap_or_default());
            }
            Discovery::Incomplete { missing } => {
                info!(
                    "프로젝트 '{}' 로드 완료 (일부 파일 없음: {missing:?})",
                    session.name().unwrap_or_default()
                );
            }
            Discovery::Invalid => {
                error!(
                    "프로젝트를 로드할 수 없음 ({}): EDL 파일 없음",
                    root.display()
                );
            }
        }

        self.current = session;
        self.notify();
        valid
    }

    /// 새 프로젝트 디렉토리와 빈 파일 3개 생성
    pub fn create_new(
        &mut self,
        name: &str,
        parent_dir: &Path,
        options: CreateOptions<'_>,
    ) -> Result<bool, CoreError> {
        let name = validate_project_name(name)?;
        if parent_dir.as_os_str().is_empty() {
            return Err(CoreError::InvalidInput(
                "프로젝트 위치가 비어 있습니다".to_string(),
            ));
        }

        fs::create_dir_all(parent_dir)?;
        let (dir, name) = resolve_target(parent_dir, name, options.auto_increment)?;
        fs::create_dir(&dir).map_err(|e| match e.kind() {
            io::ErrorKind::AlreadyExists => CoreError::PathConflict(dir.clone()),
            _ => {
                error!("프로젝트 디렉토리 생성 실패: {}: {e}", dir.display());
                CoreError::Io(e)
            }
        })?;

        let files = SessionFiles::canonical(&dir, &name);
        for kind in FileKind::ALL {
            if let Some(path) = files.get(kind) {
                touch(path)?;
                info!("파일 생성: {}", path.display());
            }
        }

        if let (Some(labels), Some(path)) = (options.seed_labels, files.get(FileKind::LabelBank)) {
            // 시드 실패는 프로젝트 생성을 막지 않는다
            match label_bank::save(path, labels) {
                Ok(()) => info!("현재 라벨을 새 프로젝트에 저장: {}", path.display()),
                Err(e) => warn!("새 프로젝트 라벨 저장 실패: {e}"),
            }
        }

        info!("새 프로젝트 '{name}' 생성: {}", dir.display());
        self.current = Session {
            root: Some(dir),
            name: Some(name),
            files,
        };
        self.notify();
        Ok(true)
    }

    /// 프로젝트 닫기 (빈 세션으로 교체, 콜백 호출)
    pub fn close(&mut self) {
        if let Some(name) = self.current.name() {
            info!("프로젝트 '{name}' 닫음");
        }
        self.current = Session::empty();
        self.notify();
    }

    fn notify(&mut self) {
        if let Some(observer) = self.observer.as_mut() {
            observer(&self.current);
        }
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

fn project_name(root: &Path) -> String {
    root.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn validate_project_name(name: &str) -> Result<&str, CoreError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CoreError::InvalidInput(
            "프로젝트 이름이 비어 있습니다".to_string(),
        ));
    }
    if name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(CoreError::InvalidInput(format!(
            "프로젝트 이름에 경로를 쓸 수 없습니다: {name}"
        )));
    }
    Ok(name)
}

/// 생성할 디렉토리와 최종 프로젝트 이름 결정
fn resolve_target(
    parent_dir: &Path,
    name: &str,
    auto_increment: bool,
) -> Result<(PathBuf, String), CoreError> {
    let candidate = parent_dir.join(name);
    if !candidate.exists() {
        return Ok((candidate, name.to_string()));
    }
    if !auto_increment {
        return Err(CoreError::PathConflict(candidate));
    }

    (2u32..)
        .map(|index| format!("{name}_{index}"))
        .map(|numbered| (parent_dir.join(&numbered), numbered))
        .find(|(path, _)| !path.exists())
        .ok_or(CoreError::PathConflict(candidate))
}

/// 디렉토리 직속 파일 (이름순). 읽기 실패는 로그만 남긴다.
fn list_files(root: &Path) -> Vec<(String, PathBuf)> {
    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("프로젝트 디렉토리 스캔 실패: {}: {e}", root.display());
            return Vec::new();
        }
    };

    let mut files: Vec<(String, PathBuf)> = entries
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry.path()),
            Err(e) => {
                warn!("디렉토리 항목 읽기 실패: {e}");
                None
            }
        })
        .filter(|path| path.is_file())
        .filter_map(|path| {
            let file_name = path.file_name()?.to_string_lossy().into_owned();
            Some((file_name, path))
        })
        .collect();
    files.sort();
    files
}

fn touch(path: &Path) -> Result<(), CoreError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map(|_| ())
        .map_err(|e| {
            error!("파일 생성 실패: {}: {e}", path.display());
            CoreError::Io(e)
        })
}
