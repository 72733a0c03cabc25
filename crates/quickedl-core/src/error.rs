//! QuickEDL 핵심 에러 타입.
//!
//! 모든 어댑터 crate는 이 타입을 그대로 반환한다.
//! 파일 시스템 실패는 컴포넌트 경계에서 로그를 남긴 뒤 이 타입으로 변환된다.

use std::path::PathBuf;
use thiserror::Error;

/// 코어 레이어 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// 바인딩된 로그 파일 없이 로그 작업 시도
    #[error("활성 로그 파일 없음 — 프로젝트를 먼저 만들거나 불러오세요")]
    NoActiveLog,

    /// I/O 에러 (읽기/쓰기 실패)
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),

    /// 필수 입력값 누락 또는 범위 밖
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),

    /// 대상 디렉토리가 이미 존재
    #[error("경로 충돌: {} 이(가) 이미 존재합니다", .0.display())]
    PathConflict(PathBuf),

    /// 플레이리스트 인덱스 범위 초과
    #[error("인덱스 범위 초과: {index} (길이 {len})")]
    IndexOutOfRange {
        /// 요청된 인덱스
        index: usize,
        /// 현재 항목 수
        len: usize,
    },

    /// 설정값 오류
    #[error("설정 에러: {0}")]
    Config(String),

    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),
}
