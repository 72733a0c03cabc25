//! 세션 파일 모델.
//!
//! 프로젝트 디렉토리 `X` 안의 정규 파일 이름:
//! `X_EDL.txt`, `X_MARKERLABEL.txt`, `X_PLAYLIST.txt`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 세션을 구성하는 파일 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileKind {
    /// 마커 로그 (EDL 텍스트)
    Log,
    /// 라벨 뱅크
    LabelBank,
    /// 플레이리스트
    Playlist,
}

impl FileKind {
    /// 탐색 순서
    pub const ALL: [FileKind; 3] = [FileKind::Log, FileKind::LabelBank, FileKind::Playlist];

    /// 파일 이름 접미사
    pub fn suffix(self) -> &'static str {
        match self {
            FileKind::Log => "_EDL.txt",
            FileKind::LabelBank => "_MARKERLABEL.txt",
            FileKind::Playlist => "_PLAYLIST.txt",
        }
    }

    /// 프로젝트 이름 기반 정규 파일 이름
    pub fn canonical_name(self, project_name: &str) -> String {
        format!("{project_name}{}", self.suffix())
    }

    /// 파일 이름이 이 종류의 접미사로 끝나는지 (대소문자 무시)
    pub fn matches_file_name(self, file_name: &str) -> bool {
        file_name
            .to_uppercase()
            .ends_with(&self.suffix().to_uppercase())
    }
}

/// 세션이 해석한 파일 경로 (각각 없을 수 있음)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionFiles {
    pub log: Option<PathBuf>,
    pub label_bank: Option<PathBuf>,
    pub playlist: Option<PathBuf>,
}

impl SessionFiles {
    /// 디렉토리 안의 정규 파일 경로 3개
    pub fn canonical(dir: &Path, project_name: &str) -> Self {
        Self {
            log: Some(dir.join(FileKind::Log.canonical_name(project_name))),
            label_bank: Some(dir.join(FileKind::LabelBank.canonical_name(project_name))),
            playlist: Some(dir.join(FileKind::Playlist.canonical_name(project_name))),
        }
    }

    /// 종류별 경로
    pub fn get(&self, kind: FileKind) -> Option<&Path> {
        match kind {
            FileKind::Log => self.log.as_deref(),
            FileKind::LabelBank => self.label_bank.as_deref(),
            FileKind::Playlist => self.playlist.as_deref(),
        }
    }

    /// 종류별 경로 설정
    pub fn set(&mut self, kind: FileKind, path: Option<PathBuf>) {
        match kind {
            FileKind::Log => self.log = path,
            FileKind::LabelBank => self.label_bank = path,
            FileKind::Playlist => self.playlist = path,
        }
    }

    /// 해석되지 않은 파일 종류
    pub fn missing(&self) -> Vec<FileKind> {
        FileKind::ALL
            .into_iter()
            .filter(|kind| self.get(*kind).is_none())
            .collect()
    }
}

/// 파일 탐색 결과
///
/// `Incomplete`는 에러가 아니다: 로그만 있으면 세션은 유효하고
/// 라벨 뱅크/플레이리스트 기능만 비활성화된다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discovery {
    /// 3개 파일 모두 해석됨
    Complete,
    /// 로그는 있으나 일부 파일 없음
    Incomplete { missing: Vec<FileKind> },
    /// 로그 파일 없음 (세션 무효)
    Invalid,
}

impl Discovery {
    /// 해석된 파일 집합으로부터 상태 판정
    pub fn from_files(files: &SessionFiles) -> Self {
        if files.log.is_none() {
            return Discovery::Invalid;
        }
        let missing = files.missing();
        if missing.is_empty() {
            Discovery::Complete
        } else {
            Discovery::Incomplete { missing }
        }
    }
}
