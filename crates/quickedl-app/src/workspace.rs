//! 작업 공간 — 세션, 마커 로그, 플레이리스트, 라벨을 묶는 호스트 측 조립부.
//!
//! 세션이 바뀔 때마다 로그를 다시 바인딩하고(최근 기록 재시드),
//! 해석된 라벨/플레이리스트 파일을 읽어 들인다.

use chrono::{NaiveDateTime, NaiveTime};
use parking_lot::{Mutex, MutexGuard};
use quickedl_core::config::AppConfig;
use quickedl_core::error::CoreError;
use quickedl_core::models::autosave::AutosaveProbe;
use quickedl_core::models::entry::LogEntry;
use quickedl_core::models::label_bank::LabelBank;
use quickedl_core::ports::autosave::AutosaveSource;
use quickedl_core::ports::clock::Clock;
use quickedl_storage::label_bank;
use quickedl_storage::marker_log::MarkerLog;
use quickedl_storage::playlist::Playlist;
use quickedl_storage::recent::RecentProjects;
use quickedl_storage::session::{CreateOptions, Session, SessionManager};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use crate::event_bus::{AppEvent, EventBus};
use crate::placeholder;

/// 운영자 작업 공간
pub struct Workspace {
    sessions: SessionManager,
    log: MarkerLog,
    playlist: Playlist,
    labels: LabelBank,
    recent: Option<RecentProjects>,
    events: Arc<EventBus>,
    funny_mode: bool,
}

impl Workspace {
    /// 새 작업 공간 (프로젝트 없음)
    pub fn new(config: &AppConfig, clock: Arc<dyn Clock>, events: Arc<EventBus>) -> Self {
        let mut sessions = SessionManager::new();
        let bus = events.clone();
        sessions.observe(move |session: &Session| {
            bus.publish(AppEvent::SessionChanged {
                name: session.name().map(str::to_string),
                valid: session.is_valid(),
            });
        });

        Self {
            sessions,
            log: MarkerLog::new(config.markers.history_capacity, clock),
            playlist: Playlist::new(),
            labels: LabelBank::default(),
            recent: None,
            events,
            funny_mode: config.markers.funny_mode,
        }
    }

    /// 최근 프로젝트 목록 연결
    pub fn with_recent(mut self, recent: RecentProjects) -> Self {
        self.recent = Some(recent);
        self
    }

    /// 기존 프로젝트 로드
    pub fn load_project(&mut self, root: &Path) -> bool {
        let valid = self.sessions.load_existing(root);
        self.apply_session();
        valid
    }

    /// 새 프로젝트 생성 (현재 라벨을 새 라벨 파일에 기록)
    pub fn create_project(
        &mut self,
        name: &str,
        parent_dir: &Path,
        auto_increment: bool,
    ) -> Result<bool, CoreError> {
        let seed_labels = (!self.labels.is_blank()).then_some(&self.labels);
        let options = CreateOptions {
            auto_increment,
            seed_labels,
        };
        let created = self
            .sessions
            .create_new(name, parent_dir, options)
            .inspect_err(|e| self.report(e))?;
        self.apply_session();
        Ok(created)
    }

    /// 슬롯 라벨로 마커 기록 (빈 라벨은 대체 문구)
    pub fn mark_slot(&mut self, slot: usize) -> Result<LogEntry, CoreError> {
        let Some(label) = self.labels.get(slot) else {
            let e = CoreError::InvalidInput(format!("라벨 슬롯 범위 밖: {}", slot + 1));
            self.report(&e);
            return Err(e);
        };
        let text = placeholder::resolve_label(label, slot, self.funny_mode);
        let result = self.log.append(&text);
        self.finish_append(result)
    }

    /// 플레이리스트 현재 항목으로 마커 기록
    ///
    /// 기록에 성공해야 커서가 전진한다. 실패하면 같은 항목을 다시 시도할 수 있다.
    pub fn mark_playlist(&mut self) -> Result<LogEntry, CoreError> {
        let item = self.playlist.current().map(str::to_string);
        let Some(item) = item else {
            let e = CoreError::IndexOutOfRange {
                index: self.playlist.playhead(),
                len: self.playlist.len(),
            };
            self.report(&e);
            return Err(e);
        };
        let result = self.log.append(&item);
        let entry = self.finish_append(result)?;
        if self.playlist.advance() {
            self.publish_playhead();
        }
        Ok(entry)
    }

    /// 자유 입력 시작 시각 캡처
    pub fn stamp(&self) -> NaiveTime {
        self.log.stamp()
    }

    /// 캡처한 시각으로 자유 입력 마커 기록
    pub fn mark_text(&mut self, time: NaiveTime, text: &str) -> Result<LogEntry, CoreError> {
        let result = self.log.append_stamped(time, text);
        self.finish_append(result)
    }

    /// 구분선 기록
    pub fn separator(&mut self) -> Result<LogEntry, CoreError> {
        let result = self.log.append_separator();
        self.finish_append(result)
    }

    /// 마지막 항목 삭제
    pub fn undo(&mut self) -> Result<bool, CoreError> {
        let removed = self.log.undo_last().inspect_err(|e| self.report(e))?;
        if removed {
            self.events.publish(AppEvent::MarkerUndone);
        }
        Ok(removed)
    }

    /// 플레이리스트 커서 앞으로
    pub fn advance_playlist(&mut self) -> bool {
        let moved = self.playlist.advance();
        if moved {
            self.publish_playhead();
        }
        moved
    }

    /// 플레이리스트 커서 뒤로
    pub fn retreat_playlist(&mut self) -> bool {
        let moved = self.playlist.retreat();
        if moved {
            self.publish_playhead();
        }
        moved
    }

    /// 라벨 변경 (메모리만, 저장은 자동/수동 저장이 담당)
    pub fn set_label(&mut self, slot: usize, text: &str) -> Result<(), CoreError> {
        self.labels.set(slot, text.trim())
    }

    /// 라벨 파일 가져오기 (앞 9줄). 프로젝트 파일 저장은 자동/수동 저장이 담당
    pub fn import_labels(&mut self, path: &Path) -> Result<(), CoreError> {
        self.labels = label_bank::load(path).inspect_err(|e| self.report(e))?;
        info!("라벨 가져오기: {}", path.display());
        Ok(())
    }

    /// 현재 라벨을 임의 파일로 내보내기
    pub fn export_labels(&self, path: &Path) -> Result<(), CoreError> {
        label_bank::save(path, &self.labels).inspect_err(|e| self.report(e))?;
        info!("라벨 내보내기: {}", path.display());
        Ok(())
    }

    /// 빈 슬롯 대체 문구 모드
    pub fn set_funny_mode(&mut self, enabled: bool) {
        self.funny_mode = enabled;
    }

    /// 프로젝트 없이 기존 로그 파일만 열기
    ///
    /// 열린 프로젝트는 닫는다. 라벨과 플레이리스트는 그대로 둔다.
    pub fn open_log(&mut self, path: &Path) -> Result<(), CoreError> {
        if !path.is_file() {
            let e = CoreError::InvalidInput(format!("로그 파일이 아님: {}", path.display()));
            self.report(&e);
            return Err(e);
        }
        self.close_project();
        let count = self.log.bind(Some(path.to_path_buf()));
        info!("독립 로그 파일 열기: {} (최근 기록 {count}개)", path.display());
        Ok(())
    }

    /// 프로젝트 없이 새 로그 파일 만들기 (생성 시각 머리줄)
    pub fn create_log(&mut self, path: &Path, created: NaiveDateTime) -> Result<(), CoreError> {
        self.close_project();
        self.log
            .create_standalone(path, created)
            .inspect_err(|e| self.report(e))
    }

    fn close_project(&mut self) {
        if self.sessions.current() != &Session::empty() {
            self.sessions.close();
            self.apply_session();
        }
    }

    /// 라벨을 세션의 라벨 파일에 저장
    pub fn save_labels(&self) -> Result<PathBuf, CoreError> {
        let path = self.data_file(self.sessions.current().label_bank_file())?;
        label_bank::save(&path, &self.labels).inspect_err(|e| self.report(e))?;
        info!("라벨 저장: {}", path.display());
        Ok(path)
    }

    /// 플레이리스트를 세션의 플레이리스트 파일에 저장
    pub fn save_playlist(&self) -> Result<PathBuf, CoreError> {
        let path = self.data_file(self.sessions.current().playlist_file())?;
        self.playlist
            .save_to_file(&path)
            .inspect_err(|e| self.report(e))?;
        Ok(path)
    }

    /// 현재 세션
    pub fn session(&self) -> &Session {
        self.sessions.current()
    }

    /// 마커 로그
    pub fn log(&self) -> &MarkerLog {
        &self.log
    }

    /// 플레이리스트
    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    /// 플레이리스트 항목 교체 후 프로젝트 파일에 저장
    ///
    /// 저장에 실패해도 메모리의 목록은 바뀐 상태로 남는다.
    pub fn update_playlist<I, S>(&mut self, items: I) -> Result<PathBuf, CoreError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.playlist.replace_all(items);
        self.publish_playhead();
        self.save_playlist()
    }

    /// 현재 라벨
    pub fn labels(&self) -> &LabelBank {
        &self.labels
    }

    /// 최근 프로젝트 목록
    #[allow(dead_code)]
    pub fn recent(&self) -> Option<&RecentProjects> {
        self.recent.as_ref()
    }

    /// 자동 저장 판정용 스냅샷
    pub fn autosave_probe(&self) -> AutosaveProbe {
        let session = self.sessions.current();
        AutosaveProbe {
            session_valid: session.is_valid(),
            label_bank_file: session.label_bank_file().map(Path::to_path_buf),
            has_recent_entries: !self.log.history().is_empty(),
            labels: self.labels.clone(),
        }
    }

    /// 새 세션을 로그/라벨/플레이리스트에 반영
    fn apply_session(&mut self) {
        let session = self.sessions.current();
        let log_file = session.log_file().map(Path::to_path_buf);
        let label_file = session.label_bank_file().map(Path::to_path_buf);
        let playlist_file = session.playlist_file().map(Path::to_path_buf);
        let root = session.root().map(Path::to_path_buf);
        let name = session.name().map(str::to_string);
        let valid = session.is_valid();

        self.log.bind(log_file);

        if let Some(path) = label_file {
            match label_bank::load(&path) {
                Ok(bank) => self.labels = bank,
                Err(e) => warn!("라벨 파일을 읽지 못해 현재 라벨 유지: {e}"),
            }
        }

        if let Some(path) = playlist_file {
            match self.playlist.load_from_file(&path) {
                Ok(_) => self.publish_playhead(),
                Err(e) => warn!("플레이리스트 로드 실패: {}: {e}", path.display()),
            }
        }

        if let (true, Some(root), Some(name), Some(recent)) =
            (valid, root, name, self.recent.as_mut())
        {
            recent.add(&root, &name);
            if let Err(e) = recent.save() {
                warn!("최근 프로젝트 저장 실패: {e}");
            }
        }
    }

    fn data_file(&self, path: Option<&Path>) -> Result<PathBuf, CoreError> {
        let session = self.sessions.current();
        if !session.is_valid() {
            return Err(CoreError::NoActiveLog);
        }
        path.map(Path::to_path_buf).ok_or_else(|| {
            CoreError::InvalidInput(format!(
                "프로젝트 '{}'에 해당 파일이 없습니다",
                session.name().unwrap_or_default()
            ))
        })
    }

    fn finish_append(
        &self,
        result: Result<LogEntry, CoreError>,
    ) -> Result<LogEntry, CoreError> {
        let entry = result.inspect_err(|e| self.report(e))?;
        self.events.publish(AppEvent::MarkerAppended(entry.clone()));
        Ok(entry)
    }

    fn publish_playhead(&self) {
        self.events.publish(AppEvent::PlayheadMoved {
            playhead: self.playlist.playhead(),
            len: self.playlist.len(),
        });
    }

    fn report(&self, error: &CoreError) {
        self.events.publish(AppEvent::Error(error.to_string()));
    }
}

/// 여러 태스크가 공유하는 작업 공간
#[derive(Clone)]
pub struct SharedWorkspace {
    inner: Arc<Mutex<Workspace>>,
}

impl SharedWorkspace {
    pub fn new(workspace: Workspace) -> Self {
        Self {
            inner: Arc::new(Mutex::new(workspace)),
        }
    }

    /// 잠금 획득
    pub fn lock(&self) -> MutexGuard<'_, Workspace> {
        self.inner.lock()
    }
}

impl AutosaveSource for SharedWorkspace {
    fn probe(&self) -> AutosaveProbe {
        self.inner.lock().autosave_probe()
    }
}
