//! 마커 로그 파일 저장소.
//!
//! 줄 단위 append-only 텍스트 파일. 한 줄에 항목 하나.
//! 모든 변경 작업은 파일과 최근 기록 캐시를 같은 호출 안에서 함께 갱신하므로
//! 캐시의 끝부분은 항상 파일의 끝부분과 같다.

use chrono::{NaiveDateTime, NaiveTime};
use quickedl_core::error::CoreError;
use quickedl_core::models::entry::LogEntry;
use quickedl_core::ports::clock::{Clock, SystemClock};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::history::RecentHistory;

/// 최근 기록 기본 용량
pub const DEFAULT_HISTORY_CAPACITY: usize = 5;

/// 독립 로그 파일 첫 줄 접두사
pub const STANDALONE_HEADER_PREFIX: &str = "File created on ";

/// 타임스탬프 마커 로그
pub struct MarkerLog {
    /// 바인딩된 로그 파일
    path: Option<PathBuf>,
    /// 표시용 최근 기록
    history: RecentHistory,
    clock: Arc<dyn Clock>,
}

impl MarkerLog {
    /// 바인딩되지 않은 로그 생성
    pub fn new(history_capacity: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            path: None,
            history: RecentHistory::new(history_capacity),
            clock,
        }
    }

    /// 시스템 시계를 사용하는 로그 생성
    pub fn with_system_clock(history_capacity: usize) -> Self {
        Self::new(history_capacity, Arc::new(SystemClock))
    }

    /// 로그 파일 바인딩 (None이면 해제)
    ///
    /// 파일이 바뀔 때마다 최근 기록을 파일 끝부분으로 다시 채운다.
    /// 읽기 실패는 로그만 남기고 빈 기록으로 진행한다.
    pub fn bind(&mut self, path: Option<PathBuf>) -> usize {
        self.path = path;
        match self.seed_history() {
            Ok(count) => count,
            Err(e) => {
                warn!("최근 기록 로드 실패: {e}");
                self.history.clear();
                0
            }
        }
    }

    /// 프로젝트 없이 쓰는 독립 로그 파일을 만들고 바인딩
    ///
    /// 첫 줄은 생성 시각 머리줄이다. 이미 있는 파일은 건드리지 않고 `PathConflict`.
    pub fn create_standalone(
        &mut self,
        path: &Path,
        created: NaiveDateTime,
    ) -> Result<(), CoreError> {
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|e| match e.kind() {
                io::ErrorKind::AlreadyExists => CoreError::PathConflict(path.to_path_buf()),
                _ => {
                    error!("로그 파일 생성 실패: {}: {e}", path.display());
                    CoreError::Io(e)
                }
            })?;

        let header = format!(
            "{STANDALONE_HEADER_PREFIX}{}\n",
            created.format("%Y-%m-%d %H:%M:%S")
        );
        file.write_all(header.as_bytes()).map_err(|e| {
            error!("로그 머리줄 기록 실패: {}: {e}", path.display());
            CoreError::Io(e)
        })?;

        info!("독립 로그 파일 생성: {}", path.display());
        self.bind(Some(path.to_path_buf()));
        Ok(())
    }

    /// 바인딩된 파일의 마지막 비어있지 않은 줄들로 최근 기록 초기화
    pub fn seed_history(&mut self) -> Result<usize, CoreError> {
        self.history.clear();
        let Some(path) = self.path.as_deref() else {
            return Ok(0);
        };

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("로그 파일 없음, 빈 기록으로 시작: {}", path.display());
                return Ok(0);
            }
            Err(e) => return Err(e.into()),
        };

        let count = self.history.reseed(content.lines());
        info!("로그 파일에서 최근 기록 {}개 로드: {}", count, path.display());
        Ok(count)
    }

    /// 현재 시각으로 마커 추가
    ///
    /// 빈 라벨도 그대로 기록한다. 기본 문구 대체는 호출자 책임이다.
    pub fn append(&mut self, text: &str) -> Result<LogEntry, CoreError> {
        let entry = LogEntry::marker(self.clock.now(), single_line(text));
        self.write_entry(entry)
    }

    /// 구분선 추가 (타임스탬프 없음, 실행 취소 대상)
    pub fn append_separator(&mut self) -> Result<LogEntry, CoreError> {
        self.write_entry(LogEntry::Separator)
    }

    /// 현재 시각 캡처 (입력 팝업을 연 시점 기록용)
    pub fn stamp(&self) -> NaiveTime {
        self.clock.now()
    }

    /// 미리 캡처한 시각으로 마커 추가
    ///
    /// 텍스트가 비어 있으면 입력 취소로 보고 `InvalidInput`을 반환한다.
    pub fn append_stamped(&mut self, time: NaiveTime, text: &str) -> Result<LogEntry, CoreError> {
        if text.trim().is_empty() {
            return Err(CoreError::InvalidInput("마커 텍스트가 비어 있습니다".to_string()));
        }
        self.write_entry(LogEntry::marker(time, single_line(text)))
    }

    /// 마지막 항목 삭제
    ///
    /// 파일 전체를 읽고 마지막 줄을 뺀 앞부분을 바이트 그대로 다시 쓴다.
    /// 파일이 비었거나 바인딩되지 않았으면 아무것도 바꾸지 않고 `false`.
    pub fn undo_last(&mut self) -> Result<bool, CoreError> {
        let Some(path) = self.path.clone() else {
            debug!("실행 취소: 바인딩된 로그 없음");
            return Ok(false);
        };

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(e) => {
                error!("로그 파일 읽기 실패: {}: {e}", path.display());
                return Err(e.into());
            }
        };

        // 줄 끝 문자를 보존하려고 개행 포함으로 자른다
        let mut segments: Vec<&str> = content.split_inclusive('\n').collect();
        // 끝의 빈 줄은 항목이 아니다
        while segments.last().is_some_and(|line| line.trim().is_empty()) {
            segments.pop();
        }
        let Some(removed) = segments.pop() else {
            debug!("실행 취소: 로그가 비어 있음");
            return Ok(false);
        };

        let kept_len: usize = segments.iter().map(|segment| segment.len()).sum();
        let kept = &content[..kept_len];
        fs::write(&path, kept).map_err(|e| {
            error!("로그 파일 다시 쓰기 실패: {}: {e}", path.display());
            CoreError::Io(e)
        })?;

        self.history.reseed(kept.lines());
        info!("마지막 항목 삭제: {}", removed.trim_end());
        Ok(true)
    }

    /// 바인딩된 파일 경로
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// 파일 바인딩 여부
    pub fn is_bound(&self) -> bool {
        self.path.is_some()
    }

    /// 최근 기록
    pub fn history(&self) -> &RecentHistory {
        &self.history
    }

    fn write_entry(&mut self, entry: LogEntry) -> Result<LogEntry, CoreError> {
        let path = self.path.as_deref().ok_or(CoreError::NoActiveLog)?;
        let line = entry.to_line();

        append_line(path, &line).map_err(|e| {
            error!("로그 기록 실패: {}: {e}", path.display());
            CoreError::Io(e)
        })?;

        debug!("로그 기록: {line}");
        self.history.push(entry.clone());
        Ok(entry)
    }
}

/// 한 항목이 한 줄을 넘지 않도록 개행 제거
fn single_line(text: &str) -> String {
    text.replace(['\r', '\n'], " ")
}

/// 파일 끝에 한 줄 추가 (기존 마지막 줄에 개행이 없으면 먼저 보충)
fn append_line(path: &Path, line: &str) -> io::Result<()> {
    let mut file = OpenOptions::new()
        .read(true)
        .append(true)
        .create(true)
        .open(path)?;

    let mut buf = String::with_capacity(line.len() + 2);
    if missing_trailing_newline(&mut file)? {
        buf.push('\n');
    }
    buf.push_str(line);
    buf.push('\n');

    file.write_all(buf.as_bytes())?;
    file.flush()
}

fn missing_trailing_newline(file: &mut File) -> io::Result<bool> {
    let len = file.metadata()?.len();
    if len == 0 {
        return Ok(false);
    }
    file.seek(SeekFrom::Start(len - 1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}
