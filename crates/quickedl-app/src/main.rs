//! # quickedl-app
//!
//! QuickEDL 바이너리 진입점.
//! 설정 로드, 작업 공간 조립, 자동 저장 타이머, 운영자 콘솔.

mod auto_persist;
mod event_bus;
mod lifecycle;
mod placeholder;
mod workspace;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveTime};
use clap::{Parser, Subcommand};
use quickedl_core::config::AppConfig;
use quickedl_core::config_manager::ConfigManager;
use quickedl_core::models::label_bank::LABEL_SLOTS;
use quickedl_core::ports::clock::SystemClock;
use quickedl_storage::label_bank::DEFAULT_LABELS_FILE;
use quickedl_storage::recent::{RecentProjects, RECENT_PROJECTS_FILE};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::auto_persist::AutoPersist;
use crate::event_bus::{AppEvent, EventBus};
use crate::lifecycle::LifecycleManager;
use crate::workspace::{SharedWorkspace, Workspace};

/// QuickEDL 라이브 이벤트 마커 로거
///
/// 방송/공연 중 타임스탬프 마커를 프로젝트 로그 파일에 기록한다.
#[derive(Parser, Debug)]
#[command(name = "quickedl")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 로그 레벨 (trace, debug, info, warn, error). 기본값은 설정 파일
    #[arg(long, short = 'l', global = true)]
    log_level: Option<String>,

    /// 설정 파일 경로 (기본: 플랫폼 설정 디렉토리의 config.json)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

/// `project` 인자는 프로젝트 디렉토리 또는 독립 로그 파일
#[derive(Subcommand, Debug)]
enum Command {
    /// 새 프로젝트 생성
    New {
        /// 프로젝트 이름
        name: String,
        /// 상위 디렉토리 (기본: 설정의 projects.default_dir 또는 현재 디렉토리)
        #[arg(long, short = 'p')]
        parent: Option<PathBuf>,
        /// 이름이 겹치면 `이름_2`, `이름_3`, … 사용
        #[arg(long, short = 'a')]
        auto_increment: bool,
    },
    /// 프로젝트 없이 독립 로그 파일 생성
    NewLog {
        /// 파일 경로 (기본: `EDL_<날짜>_<시각>.txt`)
        path: Option<PathBuf>,
    },
    /// 자유 입력 마커 기록
    Mark {
        project: PathBuf,
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// 구분선 기록
    Separator { project: PathBuf },
    /// 마지막 항목 삭제
    Undo { project: PathBuf },
    /// 최근 기록 출력
    Tail { project: PathBuf },
    /// 라벨 파일 가져오기/내보내기
    Labels {
        #[command(subcommand)]
        action: LabelsAction,
    },
    /// 최근 프로젝트 목록
    Recent,
    /// 운영자 콘솔 실행
    Run { project: PathBuf },
}

#[derive(Subcommand, Debug)]
enum LabelsAction {
    /// 파일의 앞 9줄을 프로젝트 라벨로 저장
    Import { project: PathBuf, file: PathBuf },
    /// 프로젝트 라벨을 파일로 내보내기
    Export { project: PathBuf, file: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_manager = match &args.config {
        Some(path) => ConfigManager::with_path(path.clone())
            .with_context(|| format!("설정 파일을 열 수 없음: {}", path.display()))?,
        None => ConfigManager::new().or_else(|e| {
            eprintln!("설정 관리자 초기화 실패, 현재 디렉토리 설정 사용: {e}");
            ConfigManager::with_path(PathBuf::from("quickedl-config.json"))
        })?,
    };
    let config = config_manager.get();

    // tracing 초기화
    let level = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.clone());
    let log_filter = format!(
        "quickedl={level},quickedl_app={level},quickedl_core={level},quickedl_storage={level}"
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)),
        )
        .init();
    debug!("설정 파일: {}", config_manager.config_path().display());

    let settings_dir = config_manager.settings_dir();
    let mut recent = RecentProjects::load_from(
        &settings_dir.join(RECENT_PROJECTS_FILE),
        config.projects.max_recent,
    );

    if let Command::Recent = args.command {
        let pruned = recent.prune_missing();
        if pruned > 0 {
            if let Err(e) = recent.save() {
                warn!("최근 프로젝트 저장 실패: {e}");
            }
        }
        if recent.is_empty() {
            println!("최근 프로젝트 없음");
        }
        for entry in recent.entries() {
            println!("{:<24} {}", entry.name, entry.path.display());
        }
        return Ok(());
    }

    let events = Arc::new(EventBus::default());
    let mut workspace =
        Workspace::new(&config, Arc::new(SystemClock), events.clone()).with_recent(recent);
    load_default_labels(&mut workspace, &settings_dir);

    match args.command {
        Command::New {
            name,
            parent,
            auto_increment,
        } => {
            let parent = match parent.or_else(|| config.projects.default_dir.clone()) {
                Some(parent) => parent,
                None => std::env::current_dir().context("현재 디렉토리 확인 실패")?,
            };
            workspace.create_project(&name, &parent, auto_increment)?;
            if let Some(root) = workspace.session().root() {
                println!("프로젝트 생성: {}", root.display());
            }
        }
        Command::NewLog { path } => {
            let now = Local::now().naive_local();
            let path = match path {
                Some(path) => path,
                None => {
                    let dir = match config.projects.default_dir.clone() {
                        Some(dir) => dir,
                        None => std::env::current_dir().context("현재 디렉토리 확인 실패")?,
                    };
                    dir.join(format!("EDL_{}.txt", now.format("%Y-%m-%d_%H-%M-%S")))
                }
            };
            workspace.create_log(&path, now)?;
            println!("로그 파일 생성: {}", path.display());
        }
        Command::Mark { project, text } => {
            open_project(&mut workspace, &project, &config)?;
            let stamp = workspace.stamp();
            let entry = workspace.mark_text(stamp, &text.join(" "))?;
            println!("{entry}");
        }
        Command::Separator { project } => {
            open_project(&mut workspace, &project, &config)?;
            println!("{}", workspace.separator()?);
        }
        Command::Undo { project } => {
            open_project(&mut workspace, &project, &config)?;
            if workspace.undo()? {
                println!("마지막 항목 삭제됨");
            } else {
                println!("삭제할 항목 없음");
            }
        }
        Command::Tail { project } => {
            open_project(&mut workspace, &project, &config)?;
            for line in workspace.log().history().lines() {
                println!("{line}");
            }
        }
        Command::Labels { action } => match action {
            LabelsAction::Import { project, file } => {
                open_project(&mut workspace, &project, &config)?;
                workspace.import_labels(&file)?;
                let saved = workspace.save_labels()?;
                println!("라벨 저장: {}", saved.display());
            }
            LabelsAction::Export { project, file } => {
                open_project(&mut workspace, &project, &config)?;
                workspace.export_labels(&file)?;
                println!("라벨 내보내기: {}", file.display());
            }
        },
        Command::Run { project } => {
            open_project(&mut workspace, &project, &config)?;
            run_console(SharedWorkspace::new(workspace), &config_manager, events).await?;
        }
        Command::Recent => {}
    }

    Ok(())
}

/// 프로젝트 디렉토리 또는 독립 로그 파일 열기
///
/// 상대 경로가 없으면 설정의 기본 프로젝트 디렉토리 아래에서 찾는다.
fn open_project(workspace: &mut Workspace, project: &Path, config: &AppConfig) -> Result<()> {
    let target = match &config.projects.default_dir {
        Some(base) if project.is_relative() && !project.exists() => base.join(project),
        _ => project.to_path_buf(),
    };
    if target.is_file() {
        workspace.open_log(&target)?;
        return Ok(());
    }
    if !workspace.load_project(&target) {
        bail!("프로젝트를 열 수 없음 (EDL 파일 없음): {}", target.display());
    }
    Ok(())
}

/// 설정 폴더의 기본 라벨 (없으면 조용히 건너뜀)
fn load_default_labels(workspace: &mut Workspace, settings_dir: &Path) -> bool {
    let path = settings_dir.join(DEFAULT_LABELS_FILE);
    if !path.is_file() {
        debug!("기본 라벨 파일 없음: {}", path.display());
        return false;
    }
    match workspace.import_labels(&path) {
        Ok(()) => true,
        Err(e) => {
            warn!("기본 라벨 로드 실패: {e}");
            false
        }
    }
}

/// 콘솔 명령 처리 결과
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    /// 자동 저장 주기 변경 (초)
    Reschedule(i64),
    Quit,
}

/// 여러 줄에 걸친 입력 상태
#[derive(Debug, Default)]
enum Pending {
    #[default]
    Idle,
    /// 자유 입력: 캡처한 시각으로 다음 줄을 기록
    Text(NaiveTime),
    /// 플레이리스트 편집: 빈 줄이 나올 때까지 모은다
    Playlist(Vec<String>),
}

/// 운영자 콘솔
///
/// 표준 입력 한 줄이 명령 하나. 종료 명령 또는 SIGINT/SIGTERM까지 실행한다.
async fn run_console(
    shared: SharedWorkspace,
    config_manager: &ConfigManager,
    events: Arc<EventBus>,
) -> Result<()> {
    let lifecycle = Arc::new(LifecycleManager::new());
    let mut persist = AutoPersist::with_events(Arc::new(shared.clone()), events.clone());
    persist.schedule_config(&config_manager.get().autosave);

    let signal_lifecycle = lifecycle.clone();
    tokio::spawn(async move {
        signal_lifecycle.wait_for_signal().await;
    });

    let mut rx = events.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => print_event(&event),
                Err(RecvError::Lagged(skipped)) => warn!("이벤트 {skipped}개 누락"),
                Err(RecvError::Closed) => break,
            }
        }
    });

    print_status(&shared);
    print_help();

    let mut shutdown_rx = lifecycle.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut pending = Pending::default();

    info!("콘솔 실행 중 (q 또는 Ctrl+C로 종료)");
    loop {
        tokio::select! {
            _ = shutdown_rx.changed() => break,
            line = lines.next_line() => match line {
                Ok(Some(line)) => match handle_line(&shared, &line, config_manager, &mut pending) {
                    Flow::Continue => {}
                    Flow::Reschedule(secs) => {
                        persist.schedule(secs);
                    }
                    Flow::Quit => {
                        lifecycle.shutdown();
                        break;
                    }
                },
                Ok(None) => break,
                Err(e) => {
                    error!("입력 읽기 실패: {e}");
                    break;
                }
            },
        }
    }

    persist.cancel();
    // 종료 직전 한 번 더 저장
    persist.fire_now();
    let stats = persist.stats();
    info!(
        "자동 저장 통계: 실행 {}회, 저장 {}회, 건너뜀 {}회, 실패 {}회 (상태 {:?})",
        stats.fired,
        stats.saved,
        stats.skipped,
        stats.failed,
        persist.state()
    );
    info!("콘솔 종료");
    Ok(())
}

fn handle_line(
    shared: &SharedWorkspace,
    line: &str,
    config_manager: &ConfigManager,
    pending: &mut Pending,
) -> Flow {
    let mut ws = shared.lock();

    match std::mem::take(pending) {
        Pending::Idle => {}
        // 자유 입력 대기 중이면 이 줄이 마커 텍스트
        Pending::Text(stamp) => {
            if line.trim().is_empty() {
                println!("입력 취소");
            } else if let Err(e) = ws.mark_text(stamp, line) {
                eprintln!("⚠️  {e}");
            }
            return Flow::Continue;
        }
        Pending::Playlist(mut items) => {
            if line.trim().is_empty() {
                match ws.update_playlist(&items) {
                    Ok(path) => println!(
                        "플레이리스트 저장 ({}개): {}",
                        ws.playlist().len(),
                        path.display()
                    ),
                    Err(e) => eprintln!("⚠️  {e}"),
                }
            } else {
                items.push(line.to_string());
                *pending = Pending::Playlist(items);
            }
            return Flow::Continue;
        }
    }

    let command = line.trim();
    if let Some(text) = command.strip_prefix(':') {
        let stamp = ws.stamp();
        if text.trim().is_empty() {
            *pending = Pending::Text(stamp);
            println!("[{}] 텍스트 입력 (빈 줄이면 취소):", stamp.format("%H:%M:%S"));
        } else if let Err(e) = ws.mark_text(stamp, text.trim()) {
            eprintln!("⚠️  {e}");
        }
        return Flow::Continue;
    }

    if let Some(rest) = command.strip_prefix("l ") {
        let (slot, text) = rest.trim().split_once(' ').unwrap_or((rest.trim(), ""));
        match slot.parse::<usize>() {
            Ok(slot) if (1..=LABEL_SLOTS).contains(&slot) => {
                if let Err(e) = ws.set_label(slot - 1, text) {
                    eprintln!("⚠️  {e}");
                }
            }
            _ => eprintln!("⚠️  슬롯은 1-{LABEL_SLOTS}"),
        }
        return Flow::Continue;
    }

    if let Some(rest) = command.strip_prefix("e ") {
        match ws.update_playlist(rest.split('|').map(str::trim)) {
            Ok(_) => println!("플레이리스트 {}개 항목", ws.playlist().len()),
            Err(e) => eprintln!("⚠️  {e}"),
        }
        return Flow::Continue;
    }

    if let Some(path) = command.strip_prefix("import ") {
        match ws.import_labels(Path::new(path.trim())) {
            Ok(()) => println!("라벨 가져옴"),
            Err(e) => eprintln!("⚠️  {e}"),
        }
        return Flow::Continue;
    }

    if let Some(path) = command.strip_prefix("export ") {
        if let Err(e) = ws.export_labels(Path::new(path.trim())) {
            eprintln!("⚠️  {e}");
        }
        return Flow::Continue;
    }

    if let Some(rest) = command.strip_prefix("set ") {
        return change_setting(&mut ws, rest, config_manager);
    }

    let markers = config_manager.get().markers;
    let result = match command {
        "" => Ok(()),
        "q" => return Flow::Quit,
        "h" | "?" => {
            print_help();
            Ok(())
        }
        "p" => ws.mark_playlist().map(|_| ()),
        "n" => {
            ws.advance_playlist();
            Ok(())
        }
        "b" => {
            ws.retreat_playlist();
            Ok(())
        }
        "e" => {
            *pending = Pending::Playlist(Vec::new());
            println!("플레이리스트 항목을 한 줄에 하나씩 입력 (빈 줄로 끝):");
            Ok(())
        }
        "-" => ws.separator().map(|_| ()),
        "u" if markers.delete_key_enabled => ws.undo().map(|removed| {
            if !removed {
                println!("삭제할 항목 없음");
            }
        }),
        "u" => {
            println!("삭제 키 비활성화됨 (set delete on)");
            Ok(())
        }
        "s" => ws
            .save_labels()
            .and_then(|_| ws.save_playlist())
            .map(|_| println!("저장 완료")),
        "t" => {
            for line in ws.log().history().lines() {
                println!("  {line}");
            }
            Ok(())
        }
        "defaults" => {
            if !load_default_labels(&mut ws, &config_manager.settings_dir()) {
                eprintln!("⚠️  기본 라벨 파일 없음 ({DEFAULT_LABELS_FILE})");
            }
            Ok(())
        }
        "set" => {
            let config = config_manager.get();
            println!("autosave {}", config.autosave.interval_secs);
            println!("delete   {}", on_off(config.markers.delete_key_enabled));
            println!("funny    {}", on_off(config.markers.funny_mode));
            Ok(())
        }
        other => match other.parse::<usize>() {
            Ok(slot) if (1..=LABEL_SLOTS).contains(&slot) => ws.mark_slot(slot - 1).map(|_| ()),
            _ => {
                println!("알 수 없는 명령: {other} (h: 도움말)");
                Ok(())
            }
        },
    };

    if let Err(e) = result {
        eprintln!("⚠️  {e}");
    }
    Flow::Continue
}

/// `set <키> <값>`: 설정 파일에 저장하고 바로 반영
fn change_setting(ws: &mut Workspace, rest: &str, config_manager: &ConfigManager) -> Flow {
    let (key, value) = rest.trim().split_once(' ').unwrap_or((rest.trim(), ""));
    let value = value.trim();

    let result = match (key, value) {
        ("autosave", secs) => match secs.parse::<i64>() {
            Ok(secs) => config_manager
                .update_with(|c| c.autosave.interval_secs = secs)
                .map(|_| Flow::Reschedule(secs)),
            Err(_) => {
                eprintln!("⚠️  초 단위 정수 (0 이하면 끔)");
                return Flow::Continue;
            }
        },
        ("delete", flag) | ("funny", flag) => {
            let Some(enabled) = parse_on_off(flag) else {
                eprintln!("⚠️  on 또는 off");
                return Flow::Continue;
            };
            let updated = if key == "delete" {
                config_manager.update_with(|c| c.markers.delete_key_enabled = enabled)
            } else {
                config_manager.update_with(|c| c.markers.funny_mode = enabled)
            };
            updated.map(|config| {
                ws.set_funny_mode(config.markers.funny_mode);
                Flow::Continue
            })
        }
        _ => {
            println!("알 수 없는 설정: {key} (autosave, delete, funny)");
            return Flow::Continue;
        }
    };

    match result {
        Ok(flow) => {
            println!("설정 저장됨");
            flow
        }
        Err(e) => {
            eprintln!("⚠️  {e}");
            Flow::Continue
        }
    }
}

fn parse_on_off(value: &str) -> Option<bool> {
    match value {
        "on" | "true" | "1" => Some(true),
        "off" | "false" | "0" => Some(false),
        _ => None,
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}

fn print_event(event: &AppEvent) {
    match event {
        AppEvent::MarkerAppended(entry) => println!("+ {entry}"),
        AppEvent::MarkerUndone => println!("- 마지막 항목 삭제"),
        AppEvent::PlayheadMoved { playhead, len } => {
            println!("▶ 플레이리스트 {}/{len}", playhead + 1)
        }
        AppEvent::AutoPersisted(path) => debug!("자동 저장됨: {}", path.display()),
        AppEvent::SessionChanged { name, valid } => {
            debug!("세션 변경: {name:?} (유효: {valid})")
        }
        // 에러는 호출한 쪽과 tracing이 출력
        AppEvent::Error(_) => {}
    }
}

fn print_status(shared: &SharedWorkspace) {
    let ws = shared.lock();
    let session = ws.session();
    println!();
    println!("프로젝트: {}", session.name().unwrap_or("-"));
    if let Some(log) = ws.log().path() {
        println!("로그 파일: {}", log.display());
    }
    for (slot, label) in ws.labels().iter().enumerate() {
        let label = if label.is_empty() { "(비어 있음)" } else { label };
        println!("  [{}] {label}", slot + 1);
    }
    if let Some(current) = ws.playlist().current() {
        println!(
            "플레이리스트: {current} ({}/{})",
            ws.playlist().playhead() + 1,
            ws.playlist().len()
        );
    }
    for line in ws.log().history().lines() {
        println!("  {line}");
    }
    println!();
}

fn print_help() {
    println!("명령:");
    println!("  1-9           슬롯 라벨로 마커");
    println!("  p             플레이리스트 항목으로 마커");
    println!("  n / b         플레이리스트 다음 / 이전");
    println!("  e             플레이리스트 편집 (한 줄에 하나, 빈 줄로 끝)");
    println!("  e A | B | C   플레이리스트 한 줄로 교체");
    println!("  -             구분선");
    println!("  u             마지막 항목 삭제 (set delete on 일 때)");
    println!("  : 텍스트      자유 입력 마커 (':'만 입력하면 지금 시각으로 대기)");
    println!("  l N 텍스트    슬롯 N 라벨 변경");
    println!("  import 경로   라벨 파일 가져오기");
    println!("  export 경로   라벨 파일 내보내기");
    println!("  defaults      설정 폴더의 {DEFAULT_LABELS_FILE} 라벨 불러오기");
    println!("  set [키 값]   설정 보기/변경 (autosave 초, delete on|off, funny on|off)");
    println!("  t             최근 기록");
    println!("  s             라벨/플레이리스트 저장");
    println!("  q             종료");
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickedl_core::ports::clock::FixedClock;
    use std::fs;
    use tempfile::TempDir;

    fn shared_with_project(tmp: &TempDir) -> SharedWorkspace {
        let clock = Arc::new(FixedClock::at(20, 15, 0).unwrap());
        let mut ws = Workspace::new(
            &AppConfig::default_config(),
            clock,
            Arc::new(EventBus::default()),
        );
        ws.create_project("Console", tmp.path(), false).unwrap();
        SharedWorkspace::new(ws)
    }

    fn settings(tmp: &TempDir) -> ConfigManager {
        ConfigManager::with_path(tmp.path().join("settings").join("config.json")).unwrap()
    }

    fn log_contents(tmp: &TempDir) -> String {
        fs::read_to_string(tmp.path().join("Console").join("Console_EDL.txt")).unwrap()
    }

    #[test]
    fn args_parse_subcommands() {
        let args = Args::try_parse_from(["quickedl", "new", "Demo", "-a"]).unwrap();
        assert!(matches!(
            args.command,
            Command::New { ref name, auto_increment: true, .. } if name == "Demo"
        ));

        let args = Args::try_parse_from(["quickedl", "mark", "Demo", "Coffee", "break"]).unwrap();
        assert!(matches!(args.command, Command::Mark { ref text, .. } if text.join(" ") == "Coffee break"));

        assert!(Args::try_parse_from(["quickedl", "mark", "Demo"]).is_err());

        let args =
            Args::try_parse_from(["quickedl", "labels", "import", "Demo", "texts.txt"]).unwrap();
        assert!(matches!(
            args.command,
            Command::Labels { action: LabelsAction::Import { .. } }
        ));

        let args = Args::try_parse_from(["quickedl", "new-log"]).unwrap();
        assert!(matches!(args.command, Command::NewLog { path: None }));
    }

    #[test]
    fn console_slot_separator_and_quit() {
        let tmp = TempDir::new().unwrap();
        let shared = shared_with_project(&tmp);
        let config = settings(&tmp);
        let mut pending = Pending::default();

        assert_eq!(handle_line(&shared, "1", &config, &mut pending), Flow::Continue);
        assert_eq!(handle_line(&shared, "-", &config, &mut pending), Flow::Continue);
        assert_eq!(handle_line(&shared, "q", &config, &mut pending), Flow::Quit);

        let expected = format!("20:15:00 - Button 1\n{}\n", "-".repeat(20));
        assert_eq!(log_contents(&tmp), expected);
    }

    #[test]
    fn console_undo_respects_delete_key_setting() {
        let tmp = TempDir::new().unwrap();
        let shared = shared_with_project(&tmp);
        let config = settings(&tmp);
        let mut pending = Pending::default();

        handle_line(&shared, "2", &config, &mut pending);
        handle_line(&shared, "u", &config, &mut pending);
        assert_eq!(log_contents(&tmp), "20:15:00 - Button 2\n");

        handle_line(&shared, "set delete on", &config, &mut pending);
        assert!(config.get().markers.delete_key_enabled);
        handle_line(&shared, "u", &config, &mut pending);
        assert_eq!(log_contents(&tmp), "");
    }

    #[test]
    fn console_free_text_prompt_and_inline() {
        let tmp = TempDir::new().unwrap();
        let shared = shared_with_project(&tmp);
        let config = settings(&tmp);
        let mut pending = Pending::default();

        handle_line(&shared, ": Guest arrives", &config, &mut pending);
        handle_line(&shared, ":", &config, &mut pending);
        assert!(matches!(pending, Pending::Text(_)));
        handle_line(&shared, "Applause", &config, &mut pending);
        handle_line(&shared, ":", &config, &mut pending);
        handle_line(&shared, "   ", &config, &mut pending);
        assert!(matches!(pending, Pending::Idle));

        assert_eq!(
            log_contents(&tmp),
            "20:15:00 - Guest arrives\n20:15:00 - Applause\n"
        );
    }

    #[test]
    fn console_label_edit_then_mark() {
        let tmp = TempDir::new().unwrap();
        let shared = shared_with_project(&tmp);
        let config = settings(&tmp);
        let mut pending = Pending::default();

        handle_line(&shared, "l 3 Interview", &config, &mut pending);
        handle_line(&shared, "3", &config, &mut pending);
        handle_line(&shared, "l 10 nope", &config, &mut pending);

        assert_eq!(log_contents(&tmp), "20:15:00 - Interview\n");
        assert_eq!(shared.lock().labels().get(2), Some("Interview"));
    }

    #[test]
    fn console_playlist_edit_saves_to_project() {
        let tmp = TempDir::new().unwrap();
        let shared = shared_with_project(&tmp);
        let config = settings(&tmp);
        let mut pending = Pending::default();
        let playlist_file = tmp.path().join("Console").join("Console_PLAYLIST.txt");

        for line in ["e", "Walk-in", "Opening", ""] {
            handle_line(&shared, line, &config, &mut pending);
        }
        assert!(matches!(pending, Pending::Idle));
        assert_eq!(fs::read_to_string(&playlist_file).unwrap(), "Walk-in\nOpening\n");

        handle_line(&shared, "p", &config, &mut pending);
        assert_eq!(log_contents(&tmp), "20:15:00 - Walk-in\n");

        handle_line(&shared, "e Encore | | Bows", &config, &mut pending);
        assert_eq!(fs::read_to_string(&playlist_file).unwrap(), "Encore\nBows\n");
        assert_eq!(shared.lock().playlist().playhead(), 1);
    }

    #[test]
    fn console_settings_are_persisted() {
        let tmp = TempDir::new().unwrap();
        let shared = shared_with_project(&tmp);
        let config = settings(&tmp);
        let mut pending = Pending::default();

        assert_eq!(
            handle_line(&shared, "set autosave 60", &config, &mut pending),
            Flow::Reschedule(60)
        );
        assert_eq!(
            handle_line(&shared, "set autosave soon", &config, &mut pending),
            Flow::Continue
        );
        assert_eq!(config.get().autosave.interval_secs, 60);

        handle_line(&shared, "set funny on", &config, &mut pending);
        assert!(config.get().markers.funny_mode);
        handle_line(&shared, "4", &config, &mut pending);
        let line = log_contents(&tmp);
        let text = line.trim_end().trim_start_matches("20:15:00 - ");
        assert!(placeholder::FUNNY_ENTRIES.contains(&text), "{text}");

        let reopened = ConfigManager::with_path(config.config_path().to_path_buf()).unwrap();
        assert_eq!(reopened.get().autosave.interval_secs, 60);
        assert!(reopened.get().markers.funny_mode);
    }

    #[test]
    fn console_labels_import_export_and_defaults() {
        let tmp = TempDir::new().unwrap();
        let shared = shared_with_project(&tmp);
        let config = settings(&tmp);
        let mut pending = Pending::default();

        fs::write(config.settings_dir().join(DEFAULT_LABELS_FILE), "Host\nBand\n").unwrap();
        handle_line(&shared, "defaults", &config, &mut pending);
        assert_eq!(shared.lock().labels().get(1), Some("Band"));

        let exported = tmp.path().join("Markerlabels.txt");
        handle_line(
            &shared,
            &format!("export {}", exported.display()),
            &config,
            &mut pending,
        );
        assert_eq!(fs::read_to_string(&exported).unwrap(), "Host\nBand\n\n\n\n\n\n\n\n");

        fs::write(&exported, "Other\n").unwrap();
        handle_line(
            &shared,
            &format!("import {}", exported.display()),
            &config,
            &mut pending,
        );
        assert_eq!(shared.lock().labels().get(0), Some("Other"));
        assert_eq!(shared.lock().labels().get(1), Some(""));
    }

    #[test]
    fn default_labels_seed_new_project() {
        let tmp = TempDir::new().unwrap();
        let settings_dir = tmp.path().join("settings");
        fs::create_dir(&settings_dir).unwrap();
        fs::write(settings_dir.join(DEFAULT_LABELS_FILE), "Opening\n").unwrap();

        let mut ws = Workspace::new(
            &AppConfig::default_config(),
            Arc::new(FixedClock::at(8, 0, 0).unwrap()),
            Arc::new(EventBus::default()),
        );
        assert!(load_default_labels(&mut ws, &settings_dir));
        assert!(!load_default_labels(&mut ws, tmp.path()));

        ws.create_project("Seeded", tmp.path(), false).unwrap();
        let stored = fs::read_to_string(tmp.path().join("Seeded").join("Seeded_MARKERLABEL.txt"))
            .unwrap();
        assert!(stored.starts_with("Opening\n"));
    }

    #[test]
    fn open_project_accepts_standalone_log_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("loose.txt");
        fs::write(&path, "File created on 2024-03-01 10:00:00\n").unwrap();

        let mut ws = Workspace::new(
            &AppConfig::default_config(),
            Arc::new(FixedClock::at(8, 0, 0).unwrap()),
            Arc::new(EventBus::default()),
        );
        open_project(&mut ws, &path, &AppConfig::default_config()).unwrap();
        ws.separator().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 2);

        assert!(open_project(&mut ws, &tmp.path().join("nothing"), &AppConfig::default_config())
            .is_err());
    }
}
