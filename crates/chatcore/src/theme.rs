//! 主題模組
//!
//! 終端機輸出的配色：使用者名稱、系統訊息與高亮顯示的上色器

use sha2::{Digest, Sha256};

use crate::ansi;
use crate::user::User;

/// 256 色前景色
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color256(pub u8);

impl Color256 {
    /// 以此顏色包裹文字，結尾恢復預設前景色
    ///
    /// 不用完整重置碼，避免吃掉外層同時生效的其他樣式。
    pub fn wrap(&self, text: &str) -> String {
        format!("{}{}{}", ansi::fg_256(self.0), text, ansi::FG_DEFAULT)
    }
}

/// 調色盤：一組可輪替使用的 256 色
#[derive(Debug, Clone)]
pub struct Palette {
    colors: Vec<u8>,
}

impl Palette {
    pub fn new(colors: Vec<u8>) -> Self {
        Self { colors }
    }

    /// 依索引取色（超出範圍時取餘數）
    pub fn get(&self, index: usize) -> Color256 {
        if self.colors.is_empty() {
            return Color256(7);
        }
        Color256(self.colors[index % self.colors.len()])
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

/// 名稱用色：216 色立方中亮度適中的部分
fn readable_colors() -> Vec<u8> {
    let mut colors = Vec::new();
    for index in 16u8..=231 {
        let offset = index - 16;
        let r = offset / 36;
        let g = (offset % 36) / 6;
        let b = offset % 6;
        // 以近似亮度篩掉過暗與過亮、在深色或淺色背景上看不清楚的顏色
        let luma = 2 * r + 3 * g + b;
        if (5..=24).contains(&luma) {
            colors.push(index);
        }
    }
    colors
}

/// 名稱的穩定雜湊值：同名必得同值，跨次執行不變
fn name_seed(name: &str) -> usize {
    let digest = Sha256::digest(name.as_bytes());
    usize::from(digest[0]) << 8 | usize::from(digest[1])
}

/// 主題：決定名稱、系統訊息與高亮的呈現方式
#[derive(Debug, Clone)]
pub struct Theme {
    id: String,
    /// 名稱配色盤（None 表示不上色）
    names: Option<Palette>,
    /// 系統訊息顏色
    sys: Option<Color256>,
    /// 高亮顯示用的轉義碼對
    highlight_on: &'static str,
    highlight_off: &'static str,
    /// Emote 訊息中含空白的名稱是否加引號
    quote_names: bool,
}

impl Theme {
    /// 彩色主題
    pub fn colors() -> Self {
        Self {
            id: "colors".to_string(),
            names: Some(Palette::new(readable_colors())),
            sys: Some(Color256(245)),
            highlight_on: ansi::INVERSE_ON,
            highlight_off: ansi::INVERSE_OFF,
            quote_names: false,
        }
    }

    /// 單色主題：不上色，高亮改用粗體
    pub fn mono() -> Self {
        Self {
            id: "mono".to_string(),
            names: None,
            sys: None,
            highlight_on: ansi::BOLD_ON,
            highlight_off: ansi::BOLD_OFF,
            quote_names: false,
        }
    }

    /// 依識別名稱查找內建主題
    pub fn by_name(id: &str) -> Option<Self> {
        match id {
            "colors" => Some(Self::colors()),
            "mono" => Some(Self::mono()),
            _ => {
                tracing::debug!("未知的主題識別名稱: {}", id);
                None
            }
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// 設定名稱引號行為
    pub fn with_quoted_names(mut self, quote: bool) -> Self {
        self.quote_names = quote;
        self
    }

    pub fn quotes_names(&self) -> bool {
        self.quote_names
    }

    /// 為使用者名稱上色；同名必得同色
    pub fn color_name(&self, user: &User) -> String {
        match &self.names {
            Some(palette) => palette.get(name_seed(user.name())).wrap(user.name()),
            None => user.name().to_string(),
        }
    }

    /// 系統訊息上色
    pub fn color_sys(&self, text: &str) -> String {
        match self.sys {
            Some(color) => color.wrap(text),
            None => text.to_string(),
        }
    }

    /// 高亮顯示
    pub fn highlight(&self, text: &str) -> String {
        format!("{}{}{}", self.highlight_on, text, self.highlight_off)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::colors()
    }
}
