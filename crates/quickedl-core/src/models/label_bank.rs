//! 라벨 뱅크 (퀵 버튼 9개).
//!
//! 슬롯 순서가 단축키 1–9에 대응한다.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};

/// 라벨 슬롯 수
pub const LABEL_SLOTS: usize = 9;

/// 9개의 퀵 라벨
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelBank {
    slots: [String; LABEL_SLOTS],
}

impl LabelBank {
    /// 줄 목록에서 생성 (앞 9줄만 사용, 각 줄 앞뒤 공백 제거, 부족하면 빈 슬롯)
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut bank = Self::default();
        for (slot, line) in bank.slots.iter_mut().zip(lines) {
            *slot = line.as_ref().trim().to_string();
        }
        bank
    }

    /// 슬롯 라벨 (0부터 시작)
    pub fn get(&self, slot: usize) -> Option<&str> {
        self.slots.get(slot).map(String::as_str)
    }

    /// 슬롯 라벨 변경
    pub fn set(&mut self, slot: usize, text: impl Into<String>) -> Result<(), CoreError> {
        let entry = self.slots.get_mut(slot).ok_or_else(|| {
            CoreError::InvalidInput(format!("라벨 슬롯은 0..{LABEL_SLOTS} 범위여야 합니다: {slot}"))
        })?;
        *entry = text.into();
        Ok(())
    }

    /// 슬롯 순회
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(String::as_str)
    }

    /// 모든 슬롯이 비어있는지
    pub fn is_blank(&self) -> bool {
        self.slots.iter().all(|s| s.trim().is_empty())
    }

    /// 파일 내용 (정확히 9줄, 줄마다 개행)
    pub fn to_file_contents(&self) -> String {
        let mut out = String::new();
        for slot in &self.slots {
            out.push_str(slot);
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_lines_pads_missing_slots() {
        let bank = LabelBank::from_lines(["Intro", " Guest "]);
        assert_eq!(bank.get(0), Some("Intro"));
        assert_eq!(bank.get(1), Some("Guest"));
        assert_eq!(bank.get(8), Some(""));
        assert_eq!(bank.get(9), None);
    }

    #[test]
    fn from_lines_ignores_extra_lines() {
        let lines: Vec<String> = (1..=12).map(|i| format!("L{i}")).collect();
        let bank = LabelBank::from_lines(&lines);
        assert_eq!(bank.iter().count(), LABEL_SLOTS);
        assert_eq!(bank.get(8), Some("L9"));
    }

    #[test]
    fn file_contents_always_nine_lines() {
        let mut bank = LabelBank::default();
        bank.set(2, "Applause").unwrap();
        let contents = bank.to_file_contents();
        assert_eq!(contents.lines().count(), LABEL_SLOTS);
        assert_eq!(contents, "\n\nApplause\n\n\n\n\n\n\n");
    }

    #[test]
    fn set_out_of_range_slot_fails() {
        let mut bank = LabelBank::default();
        let err = bank.set(LABEL_SLOTS, "x").unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(_)));
    }

    #[test]
    fn blank_detection() {
        let mut bank = LabelBank::default();
        assert!(bank.is_blank());
        bank.set(4, "  ").unwrap();
        assert!(bank.is_blank());
        bank.set(4, "Cue").unwrap();
        assert!(!bank.is_blank());
    }
}
