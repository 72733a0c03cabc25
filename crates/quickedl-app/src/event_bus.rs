//! 내부 이벤트 버스.
//!
//! `tokio::broadcast` 기반. 엔진 상태 변화를 화면(콘솔) 쪽으로 전달한다.

use quickedl_core::models::entry::LogEntry;
use std::path::PathBuf;
use tokio::sync::broadcast;
use tracing::debug;

/// 내부 앱 이벤트
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// 프로젝트 로드/생성 (성공 여부와 무관하게 발행)
    SessionChanged {
        name: Option<String>,
        valid: bool,
    },
    /// 로그에 항목 추가
    MarkerAppended(LogEntry),
    /// 마지막 항목 삭제
    MarkerUndone,
    /// 플레이리스트 커서 이동
    PlayheadMoved { playhead: usize, len: usize },
    /// 자동 저장 완료
    AutoPersisted(PathBuf),
    /// 에러 발생
    Error(String),
}

/// 내부 이벤트 버스
pub struct EventBus {
    tx: broadcast::Sender<AppEvent>,
}

impl EventBus {
    /// 새 이벤트 버스 생성
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// 이벤트 발행 (구독자가 없어도 무시)
    pub fn publish(&self, event: AppEvent) {
        debug!("이벤트 발행: {:?}", std::mem::discriminant(&event));
        let _ = self.tx.send(event);
    }

    /// 구독자 생성
    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(128)
    }
}
