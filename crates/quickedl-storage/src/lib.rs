//! # quickedl-storage
//!
//! 로컬 파일 저장소 어댑터.
//! 프로젝트 디렉토리 탐색/생성, 마커 로그, 플레이리스트, 라벨 뱅크,
//! 최근 프로젝트 목록을 평문/JSON 파일로 관리한다.
//!
//! ## 모듈
//! - `session`: 프로젝트 디렉토리 → 데이터 파일 해석, 새 프로젝트 생성
//! - `marker_log`: append-only 마커 로그와 실행 취소
//! - `history`: 최근 기록 링 버퍼
//! - `playlist`: 커서 있는 큐 시트
//! - `label_bank`: 9칸 라벨 파일 입출력
//! - `recent`: 최근 프로젝트 목록

pub mod history;
pub mod label_bank;
pub mod marker_log;
pub mod playlist;
pub mod recent;
pub mod session;
