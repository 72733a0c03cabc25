//! 최근 기록 캐시.
//!
//! 화면 표시용 메모리 링 버퍼. 진실 원본은 로그 파일이며,
//! 이 캐시는 파일 끝부분을 용량만큼 비추기만 한다.

use quickedl_core::models::entry::LogEntry;
use std::collections::VecDeque;

/// 최근 기록 링 버퍼 (FIFO, 최대 크기 제한)
#[derive(Debug, Clone)]
pub struct RecentHistory {
    entries: VecDeque<LogEntry>,
    max_size: usize,
}

impl RecentHistory {
    /// 새 캐시 생성
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(max_size),
            max_size,
        }
    }

    /// 항목 추가 (가득 차면 가장 오래된 항목 제거)
    pub fn push(&mut self, entry: LogEntry) {
        if self.max_size == 0 {
            return;
        }
        if self.entries.len() >= self.max_size {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// 가장 최근 항목 제거
    pub fn pop(&mut self) -> Option<LogEntry> {
        self.entries.pop_back()
    }

    /// 파일 줄 목록으로 다시 채움 (빈 줄 제외, 마지막 `max_size`개)
    pub fn reseed<I, S>(&mut self, lines: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.entries.clear();
        for line in lines {
            let line = line.as_ref();
            if line.trim().is_empty() {
                continue;
            }
            self.push(LogEntry::parse(line));
        }
        self.entries.len()
    }

    /// 오래된 순서로 순회
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &LogEntry> {
        self.entries.iter()
    }

    /// 가장 최근 항목
    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.back()
    }

    /// 표시용 줄 목록 (오래된 순서)
    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(LogEntry::to_line).collect()
    }

    /// 최대 크기
    pub fn capacity(&self) -> usize {
        self.max_size
    }

    /// 현재 항목 수
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 비어있는지
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 비우기
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
