//! 자동 저장 소스 포트.
//!
//! 구현: `quickedl-app` crate (Workspace)

use crate::models::autosave::AutosaveProbe;

/// 타이머 발화 시 현재 세션/라벨 상태를 제공
pub trait AutosaveSource: Send + Sync {
    /// 현재 상태 스냅샷
    fn probe(&self) -> AutosaveProbe;
}
