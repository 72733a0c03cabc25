//! 라벨 뱅크 파일 입출력.
//!
//! 파일은 정확히 9줄. 줄이 부족하면 빈 슬롯, 넘치면 무시한다.

use quickedl_core::error::CoreError;
use quickedl_core::models::label_bank::LabelBank;
use std::fs;
use std::path::Path;
use tracing::{debug, error};

/// 설정 폴더의 기본 라벨 파일 (시작할 때 읽고 새 프로젝트 라벨로 쓴다)
pub const DEFAULT_LABELS_FILE: &str = "texts.txt";

/// 파일에서 라벨 뱅크 로드
pub fn load(path: &Path) -> Result<LabelBank, CoreError> {
    let content = fs::read_to_string(path).map_err(|e| {
        error!("라벨 뱅크 읽기 실패: {}: {e}", path.display());
        CoreError::Io(e)
    })?;
    let bank = LabelBank::from_lines(content.lines());
    debug!("라벨 뱅크 로드: {}", path.display());
    Ok(bank)
}

/// 라벨 뱅크를 파일에 저장 (9줄 덮어쓰기)
pub fn save(path: &Path, bank: &LabelBank) -> Result<(), CoreError> {
    fs::write(path, bank.to_file_contents()).map_err(|e| {
        error!("라벨 뱅크 저장 실패: {}: {e}", path.display());
        CoreError::Io(e)
    })?;
    debug!("라벨 뱅크 저장: {}", path.display());
    Ok(())
}
