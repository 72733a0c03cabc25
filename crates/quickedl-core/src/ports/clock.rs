//! 시계 포트.
//!
//! 마커 타임스탬프는 벽시계(로컬 시간) 기준이다.
//! 테스트와 재생 도구는 `FixedClock`으로 시각을 고정한다.

use chrono::{Local, NaiveTime};
use parking_lot::Mutex;

/// 현재 시각 제공자
pub trait Clock: Send + Sync {
    /// 현재 로컬 시각
    fn now(&self) -> NaiveTime;
}

/// 시스템 로컬 시계
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveTime {
        Local::now().time()
    }
}

/// 고정 시계 (수동으로만 이동)
#[derive(Debug)]
pub struct FixedClock {
    time: Mutex<NaiveTime>,
}

impl FixedClock {
    /// 지정 시각으로 고정
    pub fn new(time: NaiveTime) -> Self {
        Self {
            time: Mutex::new(time),
        }
    }

    /// 시:분:초로 고정 (범위 밖이면 None)
    pub fn at(hour: u32, min: u32, sec: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, min, sec).map(Self::new)
    }

    /// 시각 변경
    pub fn set(&self, time: NaiveTime) {
        *self.time.lock() = time;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveTime {
        *self.time.lock()
    }
}
