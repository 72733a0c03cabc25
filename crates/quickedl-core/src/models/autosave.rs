//! 자동 저장 판정용 스냅샷.

use crate::models::label_bank::LabelBank;
use std::path::PathBuf;

/// 타이머 발화 시점의 세션/라벨 상태
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutosaveProbe {
    /// 세션 유효 여부 (로그 파일 존재)
    pub session_valid: bool,
    /// 라벨 뱅크 파일 경로
    pub label_bank_file: Option<PathBuf>,
    /// 로드 이후 최근 기록이 하나라도 있는지
    pub has_recent_entries: bool,
    /// 현재 라벨
    pub labels: LabelBank,
}

impl AutosaveProbe {
    /// 저장 대상 경로 (조건 불충족 시 None)
    ///
    /// 세션이 유효하고, 라벨 뱅크 파일이 있고, 최근 기록이 있을 때만 저장한다.
    pub fn target(&self) -> Option<&PathBuf> {
        if !self.session_valid || !self.has_recent_entries {
            return None;
        }
        self.label_bank_file.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn probe() -> AutosaveProbe {
        AutosaveProbe {
            session_valid: true,
            label_bank_file: Some(PathBuf::from("/p/Demo/Demo_MARKERLABEL.txt")),
            has_recent_entries: true,
            labels: LabelBank::default(),
        }
    }

    #[test]
    fn target_when_all_conditions_hold() {
        assert!(probe().target().is_some());
    }

    #[test]
    fn no_target_without_activity_or_file() {
        let mut p = probe();
        p.has_recent_entries = false;
        assert!(p.target().is_none());

        let mut p = probe();
        p.label_bank_file = None;
        assert!(p.target().is_none());

        let mut p = probe();
        p.session_valid = false;
        assert!(p.target().is_none());
    }
}
