//! 포트 인터페이스 (trait).
//!
//! 어댑터 crate가 이 trait들을 구현하거나 소비하며,
//! `quickedl-app`에서 `Arc<dyn T>`로 와이어링한다.

pub mod autosave;
pub mod clock;
