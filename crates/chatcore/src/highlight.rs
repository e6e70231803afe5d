//! 關鍵字高亮模組
//!
//! 在已渲染的訊息本文中標示命中的關鍵字；是否響鈴由呼叫端決定

use std::borrow::Cow;

use regex::{Captures, Regex};

use crate::theme::Theme;

/// 以主題的高亮樣式標示命中的關鍵字
///
/// 每個匹配被替換為高亮後的第一個捕獲群組（沒有群組時為整個匹配）。
/// 完全沒有命中時返回 `None`，讓呼叫端據以決定是否附加響鈴。
pub fn apply(pattern: &Regex, theme: &Theme, body: &str) -> Option<String> {
    match pattern.replace_all(body, |caps: &Captures| {
        let text = caps.get(1).map_or(&caps[0], |m| m.as_str());
        theme.highlight(text)
    }) {
        Cow::Borrowed(_) => None,
        Cow::Owned(highlighted) => Some(highlighted),
    }
}
