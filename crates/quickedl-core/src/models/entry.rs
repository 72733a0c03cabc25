//! 마커 로그 항목 모델.
//!
//! 로그 파일의 한 줄은 타임스탬프 마커(`HH:MM:SS - 라벨`), 구분선,
//! 또는 수동으로 가져온 자유 형식 줄 중 하나다.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 타임스탬프 포맷 (초 단위, 소수점 없음)
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// 타임스탬프와 라벨 사이 구분자
pub const MARKER_DELIMITER: &str = " - ";

/// 구분선 (고정 폭 20자)
pub const SEPARATOR: &str = "--------------------";

/// 로그 항목
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LogEntry {
    /// 타임스탬프 마커
    Marker {
        /// 기록 시각
        time: NaiveTime,
        /// 라벨 텍스트
        label: String,
    },
    /// 구분선
    Separator,
    /// 형식을 알 수 없는 줄 (수동 편집/레거시 파일)
    Legacy {
        /// 원본 줄
        text: String,
    },
}

impl LogEntry {
    /// 마커 항목 생성
    pub fn marker(time: NaiveTime, label: impl Into<String>) -> Self {
        Self::Marker {
            time,
            label: label.into(),
        }
    }

    /// 저장된 한 줄을 항목으로 분류
    pub fn parse(line: &str) -> Self {
        let line = line.trim_end_matches(['\r', '\n']);
        if line == SEPARATOR {
            return Self::Separator;
        }

        let stamp = line.get(..8);
        let delimiter = line.get(8..8 + MARKER_DELIMITER.len());
        if let (Some(stamp), Some(MARKER_DELIMITER)) = (stamp, delimiter) {
            // chrono은 숫자 앞 공백을 허용하므로 자리수를 먼저 확인
            if !is_clock_stamp(stamp) {
                return Self::Legacy {
                    text: line.to_string(),
                };
            }
            if let Ok(time) = NaiveTime::parse_from_str(stamp, TIME_FORMAT) {
                return Self::Marker {
                    time,
                    label: line[8 + MARKER_DELIMITER.len()..].to_string(),
                };
            }
        }

        Self::Legacy {
            text: line.to_string(),
        }
    }

    /// 파일에 기록되는 한 줄 (개행 제외)
    pub fn to_line(&self) -> String {
        match self {
            Self::Marker { time, label } => {
                format!("{}{}{}", time.format(TIME_FORMAT), MARKER_DELIMITER, label)
            }
            Self::Separator => SEPARATOR.to_string(),
            Self::Legacy { text } => text.clone(),
        }
    }

    /// 구분선 여부
    pub fn is_separator(&self) -> bool {
        matches!(self, Self::Separator)
    }
}

/// 정확히 `DD:DD:DD` 형태인지
fn is_clock_stamp(stamp: &str) -> bool {
    stamp.len() == 8
        && stamp.bytes().enumerate().all(|(i, b)| match i {
            2 | 5 => b == b':',
            _ => b.is_ascii_digit(),
        })
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_line())
    }
}
