//! ANSI 轉義碼模組
//!
//! 定義渲染輸出使用的 SGR/OSC 轉義序列，並提供移除轉義碼的工具

/// 完整重置（關閉所有樣式）
pub const RESET: &str = "\x1b[0m";

/// 粗體開啟
pub const BOLD_ON: &str = "\x1b[1m";
/// 粗體關閉
pub const BOLD_OFF: &str = "\x1b[22m";

/// 斜體開啟
pub const ITALIC_ON: &str = "\x1b[3m";
/// 斜體關閉
pub const ITALIC_OFF: &str = "\x1b[23m";

/// 刪除線開啟
pub const STRIKE_ON: &str = "\x1b[9m";
/// 刪除線關閉
pub const STRIKE_OFF: &str = "\x1b[29m";

/// 行內程式碼背景（256 色深綠）
pub const CODE_ON: &str = "\x1b[48;5;22m";
/// 恢復預設背景色
pub const CODE_OFF: &str = "\x1b[49m";

/// 反白開啟（高亮顯示用）
pub const INVERSE_ON: &str = "\x1b[7m";
/// 反白關閉
pub const INVERSE_OFF: &str = "\x1b[27m";

/// 恢復預設前景色
pub const FG_DEFAULT: &str = "\x1b[39m";

/// OSC 8 超連結結尾（空 URL 表示連結結束）
pub const HYPERLINK_END: &str = "\x1b]8;;\x1b\\";

/// 終端機響鈴
pub const BEL: char = '\x07';

/// 產生 256 色前景轉義碼
pub fn fg_256(index: u8) -> String {
    format!("\x1b[38;5;{}m", index)
}

/// 產生 OSC 8 超連結開頭
pub fn hyperlink_start(url: &str) -> String {
    format!("\x1b]8;;{}\x1b\\", url)
}

/// 移除字串中的 ANSI 轉義碼
///
/// 處理 CSI 序列（`ESC [` 到終結位元組）、OSC 序列（`ESC ]` 到
/// `ESC \` 或 BEL）與其他兩字元序列；響鈴位元組一併丟棄。
pub fn strip_ansi(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\x1b' {
            match chars.peek() {
                Some('[') => {
                    chars.next();
                    // 參數與中介位元組直到終結位元組 (0x40..=0x7e)
                    for ch in chars.by_ref() {
                        if ('\x40'..='\x7e').contains(&ch) {
                            break;
                        }
                    }
                }
                Some(']') => {
                    chars.next();
                    // OSC 內容直到 ST (ESC \) 或 BEL
                    let mut prev_esc = false;
                    for ch in chars.by_ref() {
                        if ch == '\x07' || (prev_esc && ch == '\\') {
                            break;
                        }
                        prev_esc = ch == '\x1b';
                    }
                }
                Some(_) => {
                    chars.next();
                }
                None => {}
            }
        } else if c != '\x07' {
            result.push(c);
        }
    }

    result
}
