//! 라벨 자동 저장 타이머.
//!
//! 주기마다 작업 공간 상태를 조회해 조건이 맞으면 라벨을 파일에 쓴다.
//! 저장 성공/실패와 관계없이 다음 주기는 항상 다시 예약된다.
//! 새로 예약하면 이전 타이머는 취소되므로 동시에 둘 이상 돌지 않는다.

use parking_lot::Mutex;
use quickedl_core::config::AutoSaveConfig;
use quickedl_core::ports::autosave::AutosaveSource;
use quickedl_storage::label_bank;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::event_bus::{AppEvent, EventBus};

/// 타이머 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistState {
    Idle,
    Scheduled,
    Firing,
}

/// 발화 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireOutcome {
    Saved,
    Skipped,
    Failed,
}

/// 누적 통계
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PersistStats {
    pub fired: u64,
    pub saved: u64,
    pub skipped: u64,
    pub failed: u64,
}

/// 상태 + 세대 번호. 취소된 타이머가 상태를 덮어쓰지 못하게 한다.
struct Shared {
    source: Arc<dyn AutosaveSource>,
    events: Option<Arc<EventBus>>,
    state: Mutex<PersistState>,
    generation: AtomicU64,
    stats: Mutex<PersistStats>,
}

impl Shared {
    fn set_state(&self, generation: u64, state: PersistState) {
        let mut current = self.state.lock();
        if self.generation.load(Ordering::SeqCst) == generation {
            *current = state;
        }
    }

    fn fire(&self) -> FireOutcome {
        let probe = self.source.probe();
        let outcome = match probe.target() {
            None => {
                debug!("자동 저장 건너뜀: 저장할 변경 없음");
                FireOutcome::Skipped
            }
            Some(path) => match label_bank::save(path, &probe.labels) {
                Ok(()) => {
                    info!("라벨 자동 저장: {}", path.display());
                    self.publish(AppEvent::AutoPersisted(path.clone()));
                    FireOutcome::Saved
                }
                Err(e) => {
                    error!("라벨 자동 저장 실패: {e}");
                    self.publish(AppEvent::Error(format!("자동 저장 실패: {e}")));
                    FireOutcome::Failed
                }
            },
        };

        let mut stats = self.stats.lock();
        stats.fired += 1;
        match outcome {
            FireOutcome::Saved => stats.saved += 1,
            FireOutcome::Skipped => stats.skipped += 1,
            FireOutcome::Failed => stats.failed += 1,
        }
        outcome
    }

    fn publish(&self, event: AppEvent) {
        if let Some(events) = &self.events {
            events.publish(event);
        }
    }
}

/// 주기적 라벨 저장기
pub struct AutoPersist {
    shared: Arc<Shared>,
    handle: Option<JoinHandle<()>>,
}

impl AutoPersist {
    #[allow(dead_code)]
    pub fn new(source: Arc<dyn AutosaveSource>) -> Self {
        Self::build(source, None)
    }

    /// 저장 결과를 이벤트 버스로도 알림
    pub fn with_events(source: Arc<dyn AutosaveSource>, events: Arc<EventBus>) -> Self {
        Self::build(source, Some(events))
    }

    fn build(source: Arc<dyn AutosaveSource>, events: Option<Arc<EventBus>>) -> Self {
        Self {
            shared: Arc::new(Shared {
                source,
                events,
                state: Mutex::new(PersistState::Idle),
                generation: AtomicU64::new(0),
                stats: Mutex::new(PersistStats::default()),
            }),
            handle: None,
        }
    }

    /// 초 단위 주기로 예약 (0 이하면 비활성화)
    ///
    /// tokio 런타임 안에서 호출해야 한다.
    pub fn schedule(&mut self, interval_secs: i64) -> bool {
        self.schedule_config(&AutoSaveConfig { interval_secs })
    }

    /// 설정대로 예약
    pub fn schedule_config(&mut self, config: &AutoSaveConfig) -> bool {
        match config.interval() {
            Some(interval) => {
                self.schedule_every(interval);
                true
            }
            None => {
                self.cancel();
                info!("자동 저장 비활성화 (주기 {}초)", config.interval_secs);
                false
            }
        }
    }

    /// 임의 주기로 예약 (기존 타이머는 취소)
    pub fn schedule_every(&mut self, interval: Duration) {
        self.cancel();
        let generation = self.shared.generation.load(Ordering::SeqCst);
        self.shared.set_state(generation, PersistState::Scheduled);

        let shared = self.shared.clone();
        self.handle = Some(tokio::spawn(async move {
            loop {
                tokio::time::sleep(interval).await;
                shared.set_state(generation, PersistState::Firing);
                shared.fire();
                shared.set_state(generation, PersistState::Scheduled);
            }
        }));
        info!("자동 저장 예약: {}초마다", interval.as_secs_f64());
    }

    /// 예약된 타이머 취소
    pub fn cancel(&mut self) {
        {
            let mut state = self.shared.state.lock();
            self.shared.generation.fetch_add(1, Ordering::SeqCst);
            *state = PersistState::Idle;
        }
        if let Some(handle) = self.handle.take() {
            handle.abort();
            debug!("자동 저장 타이머 취소");
        }
    }

    /// 즉시 한 번 실행 (예약에는 영향 없음)
    pub fn fire_now(&self) -> FireOutcome {
        self.shared.fire()
    }

    pub fn state(&self) -> PersistState {
        *self.shared.state.lock()
    }

    pub fn stats(&self) -> PersistStats {
        *self.shared.stats.lock()
    }
}

impl Drop for AutoPersist {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickedl_core::models::autosave::AutosaveProbe;
    use quickedl_core::models::label_bank::LabelBank;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    struct FakeSource {
        probe: Mutex<AutosaveProbe>,
    }

    impl FakeSource {
        fn new(label_bank_file: Option<PathBuf>, has_recent_entries: bool) -> Arc<Self> {
            let mut labels = LabelBank::default();
            labels.set(0, "Auto").unwrap();
            Arc::new(Self {
                probe: Mutex::new(AutosaveProbe {
                    session_valid: true,
                    label_bank_file,
                    has_recent_entries,
                    labels,
                }),
            })
        }
    }

    impl AutosaveSource for FakeSource {
        fn probe(&self) -> AutosaveProbe {
            self.probe.lock().clone()
        }
    }

    #[test]
    fn fire_now_saves_when_conditions_hold() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("Demo_MARKERLABEL.txt");
        let persist = AutoPersist::new(FakeSource::new(Some(path.clone()), true));

        assert_eq!(persist.fire_now(), FireOutcome::Saved);
        assert_eq!(label_bank::load(&path).unwrap().get(0), Some("Auto"));
        assert_eq!(persist.stats().saved, 1);
    }

    #[test]
    fn fire_now_skips_without_activity() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("Demo_MARKERLABEL.txt");
        let persist = AutoPersist::new(FakeSource::new(Some(path.clone()), false));

        assert_eq!(persist.fire_now(), FireOutcome::Skipped);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn timer_fires_repeatedly() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("Demo_MARKERLABEL.txt");
        let mut persist = AutoPersist::new(FakeSource::new(Some(path.clone()), true));

        persist.schedule_every(Duration::from_millis(20));
        assert_eq!(persist.state(), PersistState::Scheduled);
        tokio::time::sleep(Duration::from_millis(150)).await;

        let stats = persist.stats();
        assert!(stats.fired >= 2, "fired {}", stats.fired);
        assert_eq!(stats.fired, stats.saved);
        assert!(fs::read_to_string(&path).unwrap().starts_with("Auto\n"));
    }

    #[tokio::test]
    async fn failure_does_not_stop_rescheduling() {
        let tmp = TempDir::new().unwrap();
        let unwritable = tmp.path().join("missing-dir").join("labels.txt");
        let events = Arc::new(EventBus::new(64));
        let mut rx = events.subscribe();
        let mut persist =
            AutoPersist::with_events(FakeSource::new(Some(unwritable), true), events);

        persist.schedule_every(Duration::from_millis(20));
        tokio::time::sleep(Duration::from_millis(150)).await;

        let stats = persist.stats();
        assert!(stats.failed >= 2, "failed {}", stats.failed);
        assert_eq!(stats.saved, 0);
        assert!(matches!(rx.try_recv(), Ok(AppEvent::Error(_))));
    }

    #[tokio::test]
    async fn non_positive_interval_disables() {
        let tmp = TempDir::new().unwrap();
        let source = FakeSource::new(Some(tmp.path().join("labels.txt")), true);
        let mut persist = AutoPersist::new(source);

        assert!(!persist.schedule(0));
        assert!(!persist.schedule(-5));
        assert_eq!(persist.state(), PersistState::Idle);
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(persist.stats().fired, 0);
    }

    #[tokio::test]
    async fn rescheduling_replaces_pending_timer() {
        let tmp = TempDir::new().unwrap();
        let source = FakeSource::new(Some(tmp.path().join("labels.txt")), true);
        let mut persist = AutoPersist::new(source);

        persist.schedule_every(Duration::from_millis(10));
        persist.schedule_every(Duration::from_secs(3600));
        tokio::time::sleep(Duration::from_millis(60)).await;

        assert_eq!(persist.stats().fired, 0);
        assert_eq!(persist.state(), PersistState::Scheduled);
    }

    #[tokio::test]
    async fn fires_against_session_loaded_after_scheduling() {
        use crate::workspace::{SharedWorkspace, Workspace};
        use quickedl_core::config::AppConfig;
        use quickedl_core::ports::clock::FixedClock;

        let tmp = TempDir::new().unwrap();
        for name in ["First", "Second"] {
            let root = tmp.path().join(name);
            fs::create_dir(&root).unwrap();
            fs::write(root.join(format!("{name}_EDL.txt")), "10:00:00 - earlier\n").unwrap();
            fs::write(root.join(format!("{name}_MARKERLABEL.txt")), "").unwrap();
        }

        let events = Arc::new(EventBus::new(64));
        let clock = Arc::new(FixedClock::at(10, 0, 0).unwrap());
        let shared = SharedWorkspace::new(Workspace::new(
            &AppConfig::default_config(),
            clock,
            events.clone(),
        ));
        assert!(shared.lock().load_project(&tmp.path().join("First")));

        let mut persist = AutoPersist::with_events(Arc::new(shared.clone()), events);
        persist.schedule_every(Duration::from_millis(30));

        {
            let mut ws = shared.lock();
            assert!(ws.load_project(&tmp.path().join("Second")));
            ws.set_label(0, "Second only").unwrap();
        }
        tokio::time::sleep(Duration::from_millis(120)).await;

        assert!(persist.stats().saved >= 1);
        let first = tmp.path().join("First").join("First_MARKERLABEL.txt");
        let second = tmp.path().join("Second").join("Second_MARKERLABEL.txt");
        assert_eq!(fs::read_to_string(first).unwrap(), "");
        assert_eq!(label_bank::load(&second).unwrap().get(0), Some("Second only"));
    }

    #[tokio::test]
    async fn cancel_stops_timer() {
        let tmp = TempDir::new().unwrap();
        let source = FakeSource::new(Some(tmp.path().join("labels.txt")), true);
        let mut persist = AutoPersist::new(source);

        persist.schedule_every(Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(45)).await;
        persist.cancel();
        let fired = persist.stats().fired;
        assert_eq!(persist.state(), PersistState::Idle);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(persist.stats().fired, fired);
    }
}
