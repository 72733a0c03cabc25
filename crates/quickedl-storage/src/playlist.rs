//! 플레이리스트 (큐 시트).
//!
//! 순서 있는 라벨 목록과 읽기 커서(playhead).
//! `consume`은 끝에서 멈추고 처음으로 되돌아가지 않는다.

use quickedl_core::error::CoreError;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// 항목이 없을 때 표시되는 자리 표시자
pub const PLACEHOLDER_ITEM: &str = "No Items";

/// 커서가 있는 라벨 목록
///
/// 불변식: `items`는 비어 있지 않으며 `playhead < items.len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    items: Vec<String>,
    playhead: usize,
}

impl Playlist {
    /// 자리 표시자 하나로 시작
    pub fn new() -> Self {
        Self {
            items: vec![PLACEHOLDER_ITEM.to_string()],
            playhead: 0,
        }
    }

    /// 목록 전체 교체
    ///
    /// 개행이 든 항목은 줄마다 나누고(파일은 한 줄에 한 항목) 빈 줄은 버린다.
    /// 결과가 비면 자리 표시자 하나로 대체한 뒤 커서를 범위 안으로 당긴다.
    pub fn replace_all<I, S>(&mut self, new_items: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.items = new_items
            .into_iter()
            .flat_map(|item| {
                item.as_ref()
                    .split(['\r', '\n'])
                    .filter(|line| !line.trim().is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .collect();
        if self.items.is_empty() {
            self.items.push(PLACEHOLDER_ITEM.to_string());
        }
        self.clamp_playhead();
        debug!(
            "플레이리스트 교체: {}개 항목, playhead={}",
            self.items.len(),
            self.playhead
        );
    }

    /// 커서 한 칸 앞으로 (끝이면 그대로)
    pub fn advance(&mut self) -> bool {
        if !self.can_advance() {
            return false;
        }
        self.playhead += 1;
        debug!("플레이리스트: playhead → {}", self.playhead);
        true
    }

    /// 커서 한 칸 뒤로 (처음이면 그대로)
    pub fn retreat(&mut self) -> bool {
        if !self.can_retreat() {
            return false;
        }
        self.playhead -= 1;
        debug!("플레이리스트: playhead → {}", self.playhead);
        true
    }

    /// 커서 위치로 이동 (범위 밖이면 마지막 항목)
    pub fn set_playhead(&mut self, index: usize) {
        self.playhead = index;
        self.clamp_playhead();
    }

    /// 현재 항목을 반환하고, 마지막 항목이 아니면 커서를 한 칸 전진
    pub fn consume(&mut self) -> Result<String, CoreError> {
        let item = self
            .items
            .get(self.playhead)
            .cloned()
            .ok_or(CoreError::IndexOutOfRange {
                index: self.playhead,
                len: self.items.len(),
            })?;
        self.advance();
        Ok(item)
    }

    /// 커서 아래 항목 (소비하지 않음)
    pub fn current(&self) -> Option<&str> {
        self.items.get(self.playhead).map(String::as_str)
    }

    /// 전진 가능 여부
    pub fn can_advance(&self) -> bool {
        self.playhead + 1 < self.items.len()
    }

    /// 후퇴 가능 여부
    pub fn can_retreat(&self) -> bool {
        self.playhead > 0
    }

    /// 커서 위치
    pub fn playhead(&self) -> usize {
        self.playhead
    }

    /// 전체 항목
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// 항목 수
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// 비어있는지 (자리 표시자 덕분에 항상 false)
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// 파일에서 로드 (한 줄에 항목 하나, 빈 줄 제거, 커서는 처음으로)
    pub fn load_from_file(&mut self, path: &Path) -> Result<usize, CoreError> {
        let content = fs::read_to_string(path)?;
        self.replace_all(content.lines());
        self.playhead = 0;
        info!(
            "플레이리스트 로드: {}개 항목 ({})",
            self.items.len(),
            path.display()
        );
        Ok(self.items.len())
    }

    /// 파일에 저장 (한 줄에 항목 하나, 줄마다 개행)
    pub fn save_to_file(&self, path: &Path) -> Result<(), CoreError> {
        let mut content = self.items.join("\n");
        content.push('\n');
        fs::write(path, content)?;
        info!("플레이리스트 저장: {}", path.display());
        Ok(())
    }

    fn clamp_playhead(&mut self) {
        let last = self.items.len().saturating_sub(1);
        if self.playhead > last {
            debug!("플레이리스트: playhead 재배치 {} → {}", self.playhead, last);
            self.playhead = last;
        }
    }
}

impl Default for Playlist {
    fn default() -> Self {
        Self::new()
    }
}
