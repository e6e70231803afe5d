//! 使用者模組
//!
//! 聊天室成員的身分與觀看端設定

use chrono::format::strftime::StrftimeItems;
use chrono::format::Item;
use regex::Regex;

use crate::emoji::EmojiTable;
use crate::theme::Theme;

/// 聊天室成員身分
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    name: String,
}

impl User {
    /// 創建新的使用者
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// 顯示名稱
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 更改顯示名稱
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }
}

/// 觀看端設定：決定訊息渲染時的樣式處理
#[derive(Debug, Clone, Default)]
pub struct UserConfig {
    /// 套用的主題（None 表示不上色）
    pub theme: Option<Theme>,
    /// 關鍵字高亮的正則（通常是自己的名字）
    pub highlight: Option<Regex>,
    /// 高亮命中時是否附加響鈴
    pub bell: bool,
    /// 原始模式：跳過行內標記渲染，給程式介接使用
    pub raw_mode: bool,
    /// 時間戳記格式（chrono strftime；None 表示不顯示）
    pub time_format: Option<String>,
    /// 表情符號別名表
    pub emoji: EmojiTable,
}

impl UserConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// 套用主題
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = Some(theme);
        self
    }

    /// 設定高亮正則
    pub fn with_highlight(mut self, pattern: Regex) -> Self {
        self.highlight = Some(pattern);
        self
    }

    /// 設定響鈴
    pub fn with_bell(mut self, bell: bool) -> Self {
        self.bell = bell;
        self
    }

    /// 設定原始模式
    pub fn with_raw_mode(mut self, raw: bool) -> Self {
        self.raw_mode = raw;
        self
    }

    /// 設定表情符號別名表
    pub fn with_emoji(mut self, emoji: EmojiTable) -> Self {
        self.emoji = emoji;
        self
    }

    /// 設定時間戳記格式
    ///
    /// 無效的格式在這裡就拒絕並記錄警告，渲染階段因此不必處理格式錯誤。
    pub fn with_time_format(mut self, format: impl Into<String>) -> Self {
        let format = format.into();
        if is_valid_time_format(&format) {
            self.time_format = Some(format);
        } else {
            tracing::warn!("無效的時間戳記格式: {:?}", format);
            self.time_format = None;
        }
        self
    }

    /// 建立提及高亮正則：整字匹配使用者名稱
    pub fn mention_pattern(name: &str) -> Result<Regex, regex::Error> {
        Regex::new(&format!(r"\b({})\b", regex::escape(name)))
    }
}

/// 檢查 chrono strftime 格式字串是否有效
fn is_valid_time_format(format: &str) -> bool {
    !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_rename() {
        let mut user = User::new("alice");
        assert_eq!(user.name(), "alice");
        user.set_name("bob");
        assert_eq!(user.name(), "bob");
    }

    #[test]
    fn test_builder_chain() {
        let cfg = UserConfig::new()
            .with_theme(Theme::mono())
            .with_bell(true)
            .with_raw_mode(true);

        assert_eq!(cfg.theme.as_ref().map(Theme::id), Some("mono"));
        assert!(cfg.bell);
        assert!(cfg.raw_mode);
    }

    #[test]
    fn test_mention_pattern_word_boundary() {
        let re = UserConfig::mention_pattern("alice").unwrap();
        assert!(re.is_match("hi alice!"));
        assert!(re.is_match("alice: hello"));
        assert!(!re.is_match("alices"));
        assert!(!re.is_match("malice"));
    }

    #[test]
    fn test_mention_pattern_escapes_meta() {
        let re = UserConfig::mention_pattern("a.b").unwrap();
        assert!(re.is_match("ping a.b now"));
        assert!(!re.is_match("ping axb now"));
    }

    #[test]
    fn test_valid_time_format_accepted() {
        let cfg = UserConfig::new().with_time_format("%H:%M");
        assert_eq!(cfg.time_format.as_deref(), Some("%H:%M"));
    }

    #[test]
    fn test_invalid_time_format_rejected() {
        let cfg = UserConfig::new().with_time_format("%Q%Z!!");
        assert!(cfg.time_format.is_none());
    }

    #[test]
    fn test_default_config_plain() {
        let cfg = UserConfig::default();
        assert!(cfg.theme.is_none());
        assert!(cfg.highlight.is_none());
        assert!(!cfg.bell);
        assert!(!cfg.raw_mode);
    }
}
