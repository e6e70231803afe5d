//! 歷史模組
//!
//! 保存已渲染訊息行的有界環形緩衝，供回捲顯示。

use std::collections::VecDeque;

use crate::message::MessageKind;

/// 預設保留行數
pub const DEFAULT_CAPACITY: usize = 1000;

/// 一筆歷史：種類標籤與渲染後的行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub kind: MessageKind,
    pub line: String,
}

impl HistoryEntry {
    pub fn new(kind: MessageKind, line: impl Into<String>) -> Self {
        Self {
            kind,
            line: line.into(),
        }
    }
}

/// 訊息歷史緩衝
///
/// 滿了以後丟最舊的一筆，容量固定不重新配置。
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl History {
    /// 創建指定容量的歷史緩衝
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// 容量上限
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 目前筆數
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 是否為空
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 加入一筆，滿了先淘汰最舊的
    pub fn push(&mut self, entry: HistoryEntry) {
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// 由舊到新走訪全部
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// 最近 n 筆，由舊到新
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &HistoryEntry> {
        let skip = self.entries.len().saturating_sub(n);
        self.entries.iter().skip(skip)
    }

    /// 只取某一種類
    pub fn of_kind(&self, kind: MessageKind) -> impl Iterator<Item = &HistoryEntry> + '_ {
        self.entries.iter().filter(move |entry| entry.kind == kind)
    }

    /// 清空
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn collect<'a>(iter: impl Iterator<Item = &'a HistoryEntry>) -> Vec<&'a str> {
        iter.map(|entry| entry.line.as_str()).collect()
    }

    #[test]
    fn test_push_and_len() {
        let mut history = History::new(10);
        assert!(history.is_empty());

        history.push(HistoryEntry::new(MessageKind::Public, "alice: hi"));
        history.push(HistoryEntry::new(MessageKind::System, "-> ok"));
        assert_eq!(history.len(), 2);
        assert!(!history.is_empty());
    }

    #[test]
    fn test_eviction_keeps_newest() {
        let mut history = History::new(3);
        for i in 0..5 {
            history.push(HistoryEntry::new(MessageKind::Public, format!("m{}", i)));
        }

        assert_eq!(history.len(), 3);
        assert_eq!(collect(history.iter()), ["m2", "m3", "m4"]);
    }

    #[test]
    fn test_recent_returns_tail_in_order() {
        let mut history = History::new(10);
        for i in 0..5 {
            history.push(HistoryEntry::new(MessageKind::Public, format!("m{}", i)));
        }

        assert_eq!(collect(history.recent(2)), ["m3", "m4"]);
        assert_eq!(collect(history.recent(99)).len(), 5);
    }

    #[test]
    fn test_of_kind_filters() {
        let mut history = History::new(10);
        history.push(HistoryEntry::new(MessageKind::Public, "alice: hi"));
        history.push(HistoryEntry::new(MessageKind::System, "-> ok"));
        history.push(HistoryEntry::new(MessageKind::Public, "bob: yo"));

        assert_eq!(
            collect(history.of_kind(MessageKind::Public)),
            ["alice: hi", "bob: yo"]
        );
        assert_eq!(collect(history.of_kind(MessageKind::Emote)).len(), 0);
    }

    #[test]
    fn test_clear() {
        let mut history = History::new(10);
        history.push(HistoryEntry::new(MessageKind::Public, "alice: hi"));
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.capacity(), 10);
    }

    #[test]
    fn test_default_capacity() {
        let history = History::default();
        assert_eq!(history.capacity(), DEFAULT_CAPACITY);
    }
}
