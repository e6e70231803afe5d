//! 表情符號別名模組
//!
//! 將 `:alias:` 形式的別名替換為 Unicode 表情符號

use lazy_static::lazy_static;
use std::collections::HashMap;

lazy_static! {
    /// 內建別名表（常用子集）
    static ref BUILTIN_ALIASES: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("smile", "😄");
        m.insert("smiley", "😃");
        m.insert("grin", "😁");
        m.insert("joy", "😂");
        m.insert("rofl", "🤣");
        m.insert("wink", "😉");
        m.insert("blush", "😊");
        m.insert("laughing", "😆");
        m.insert("sweat_smile", "😅");
        m.insert("sunglasses", "😎");
        m.insert("heart_eyes", "😍");
        m.insert("thinking", "🤔");
        m.insert("neutral_face", "😐");
        m.insert("confused", "😕");
        m.insert("cry", "😢");
        m.insert("sob", "😭");
        m.insert("angry", "😠");
        m.insert("shrug", "🤷");
        m.insert("facepalm", "🤦");
        m.insert("skull", "💀");
        m.insert("ghost", "👻");
        m.insert("poop", "💩");
        m.insert("heart", "❤️");
        m.insert("broken_heart", "💔");
        m.insert("+1", "👍");
        m.insert("thumbsup", "👍");
        m.insert("-1", "👎");
        m.insert("thumbsdown", "👎");
        m.insert("ok_hand", "👌");
        m.insert("clap", "👏");
        m.insert("pray", "🙏");
        m.insert("muscle", "💪");
        m.insert("wave", "👋");
        m.insert("eyes", "👀");
        m.insert("point_right", "👉");
        m.insert("raised_hands", "🙌");
        m.insert("fire", "🔥");
        m.insert("tada", "🎉");
        m.insert("sparkles", "✨");
        m.insert("star", "⭐");
        m.insert("zap", "⚡");
        m.insert("bulb", "💡");
        m.insert("rocket", "🚀");
        m.insert("warning", "⚠️");
        m.insert("white_check_mark", "✅");
        m.insert("x", "❌");
        m.insert("100", "💯");
        m.insert("bug", "🐛");
        m.insert("cat", "🐱");
        m.insert("dog", "🐶");
        m.insert("coffee", "☕");
        m.insert("pizza", "🍕");
        m.insert("beer", "🍺");
        m
    };
}

/// 別名允許的字元
fn is_alias_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '_' | '+' | '-')
}

/// 表情符號別名表
///
/// 內建表加上應用程式自訂的項目；自訂項目優先。
#[derive(Debug, Clone, Default)]
pub struct EmojiTable {
    custom: HashMap<String, String>,
}

impl EmojiTable {
    /// 創建只含內建別名的表
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加自訂別名
    pub fn with_alias(mut self, alias: impl Into<String>, glyph: impl Into<String>) -> Self {
        self.custom.insert(alias.into(), glyph.into());
        self
    }

    /// 批次添加自訂別名
    pub fn with_aliases<I, K, V>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (alias, glyph) in aliases {
            self.custom.insert(alias.into(), glyph.into());
        }
        self
    }

    /// 查詢別名對應的表情符號
    pub fn lookup(&self, alias: &str) -> Option<&str> {
        self.custom
            .get(alias)
            .map(String::as_str)
            .or_else(|| BUILTIN_ALIASES.get(alias).copied())
    }

    /// 將文字中的 `:alias:` 替換為表情符號
    ///
    /// 未知的別名原樣保留；候選別名的結尾冒號可以作為下一個別名的開頭。
    pub fn replace_aliases(&self, input: &str) -> String {
        let chars: Vec<char> = input.chars().collect();
        let mut result = String::with_capacity(input.len());
        let mut i = 0;

        while i < chars.len() {
            if chars[i] == ':' {
                let mut j = i + 1;
                while j < chars.len() && is_alias_char(chars[j]) {
                    j += 1;
                }
                if j > i + 1 && j < chars.len() && chars[j] == ':' {
                    let alias: String = chars[i + 1..j].iter().collect();
                    if let Some(glyph) = self.lookup(&alias) {
                        result.push_str(glyph);
                        i = j + 1;
                        continue;
                    }
                }
                result.push(':');
                i += 1;
            } else {
                result.push(chars[i]);
                i += 1;
            }
        }

        result
    }
}
