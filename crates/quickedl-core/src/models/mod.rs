//! QuickEDL 도메인 모델.
//!
//! 로그 파일, 라벨 뱅크, 프로젝트 디렉토리에 대응하는 데이터 구조체를 정의한다.

pub mod autosave;
pub mod entry;
pub mod label_bank;
pub mod session;
