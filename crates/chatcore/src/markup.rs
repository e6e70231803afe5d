//! 行內標記渲染模組
//!
//! 將輕量行內標記（粗體、斜體、刪除線、行內程式碼、連結、反斜線跳脫）
//! 轉換為 ANSI 轉義序列。單趟掃描，狀態只存在於單次呼叫內；
//! 畸形輸入一律降級為字面輸出，輸出保證以重置碼結尾。

use bitflags::bitflags;
use lazy_static::lazy_static;
use regex::Regex;

use crate::ansi;

// 哨兵字元：佔用私有使用區 U+E000..U+E006，絕不出現在輸出中。
// 連結替換與雙字元標記的預替換先把多字元結構壓成單一哨兵，
// 掃描器再依上下文決定切換樣式或還原為原始文字。
const LINK_OPEN: char = '\u{e000}';
const LINK_CLOSE: char = '\u{e001}';
const BOLD_STARS: char = '\u{e002}';
const BOLD_UNDERS: char = '\u{e003}';
const STRIKE_TILDES: char = '\u{e004}';
const ESCAPED_STARS: char = '\u{e005}';
const ESCAPED_UNDERS: char = '\u{e006}';

const SENTINEL_FIRST: char = '\u{e000}';
const SENTINEL_LAST: char = '\u{e006}';

lazy_static! {
    /// 連結語法 `[文字](網址)`；網址不得包含空白或右括號
    static ref LINK_RE: Regex = Regex::new(r"\[([^\]]+)\]\(([^) ]+)\)").unwrap();
    /// 連結替換模板：URL 區段、曝露在外的顯示文字、結束區段
    static ref LINK_SUB: String = format!(
        "{LINK_OPEN}\x1b]8;;${{2}}\x1b\\{LINK_CLOSE}${{1}}{LINK_OPEN}{}{LINK_CLOSE}",
        ansi::HYPERLINK_END
    );
}

bitflags! {
    /// 掃描中同時生效的樣式範圍
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Span: u8 {
        const BOLD = 1 << 0;
        const ITALIC = 1 << 1;
        const STRIKE = 1 << 2;
        const CODE = 1 << 3;
    }
}

/// 渲染行內標記為帶 ANSI 轉義碼的文字
///
/// 不會失敗：無法解讀的標記以字面形式輸出，未閉合的樣式由
/// 結尾的重置碼統一關閉。輸出必定以 `ESC [0m` 結尾。
pub fn render(body: &str) -> String {
    let sanitized = sanitize(body);
    let linked = protect_links(&sanitized);
    let substituted = substitute_markers(&linked);
    scan(&substituted)
}

fn is_sentinel(c: char) -> bool {
    (SENTINEL_FIRST..=SENTINEL_LAST).contains(&c)
}

/// 移除原始輸入中的哨兵字元
///
/// 哨兵佔用私有使用區；外部輸入不應包含它們，出現時直接丟棄，
/// 避免與內部標記混淆。
fn sanitize(body: &str) -> String {
    if body.chars().any(is_sentinel) {
        tracing::warn!("輸入含有保留的私有使用區字元，已移除");
        body.chars().filter(|c| !is_sentinel(*c)).collect()
    } else {
        body.to_string()
    }
}

/// 將連結語法替換為受保護的 OSC 8 超連結區段
///
/// 顯示文字留在兩段保護區之間，仍會經過後續的標記掃描。
fn protect_links(body: &str) -> String {
    LINK_RE.replace_all(body, LINK_SUB.as_str()).into_owned()
}

/// 預替換：跳脫的雙字元標記與成對的雙字元標記換成哨兵
///
/// 先處理跳脫形式，避免 `\**` 的星號被當成粗體標記。
fn substitute_markers(body: &str) -> String {
    body.replace("\\**", &ESCAPED_STARS.to_string())
        .replace("\\__", &ESCAPED_UNDERS.to_string())
        .replace("**", &BOLD_STARS.to_string())
        .replace("__", &BOLD_UNDERS.to_string())
        .replace("~~", &STRIKE_TILDES.to_string())
}

/// 標記類字元：原始單字元標記與成對標記哨兵
///
/// 相鄰的標記彼此視為邊界，讓 `**_文字_**` 這類巢狀寫法成立。
fn is_marker(c: char) -> bool {
    matches!(c, '*' | '_' | BOLD_STARS | BOLD_UNDERS | STRIKE_TILDES)
}

/// 只在閉合側視為邊界的結尾標點
fn is_trailing_punct(c: char) -> bool {
    matches!(c, '.' | ',' | ';' | ':')
}

/// 開啟樣式的邊界條件：前面是行首、空白或另一個標記，後面緊跟非空白
fn opens_span(chars: &[char], i: usize) -> bool {
    let prev_ok = i == 0 || chars[i - 1].is_whitespace() || is_marker(chars[i - 1]);
    let next_ok = matches!(chars.get(i + 1), Some(n) if !n.is_whitespace());
    prev_ok && next_ok
}

/// 閉合樣式的邊界條件：前面緊貼非空白，後面是行尾、空白、結尾標點或另一個標記
fn closes_span(chars: &[char], i: usize) -> bool {
    let prev_ok = i > 0 && !chars[i - 1].is_whitespace();
    let next_ok = match chars.get(i + 1) {
        None => true,
        Some(n) => n.is_whitespace() || is_trailing_punct(*n) || is_marker(*n),
    };
    prev_ok && next_ok
}

/// 程式碼區開啟條件：前面是行首或空白，且下一個字元不是反引號
fn opens_code(chars: &[char], i: usize) -> bool {
    let prev_ok = i == 0 || chars[i - 1].is_whitespace();
    let next_ok = chars.get(i + 1) != Some(&'`');
    prev_ok && next_ok
}

/// 將哨兵還原為原始文字；一般字元原樣輸出
fn push_literal(out: &mut String, c: char) {
    match c {
        BOLD_STARS | ESCAPED_STARS => out.push_str("**"),
        BOLD_UNDERS | ESCAPED_UNDERS => out.push_str("__"),
        STRIKE_TILDES => out.push_str("~~"),
        LINK_OPEN | LINK_CLOSE => {}
        _ => out.push(c),
    }
}

/// 單趟掃描：依序處理跳脫、保護區、程式碼區與樣式切換
fn scan(body: &str) -> String {
    let chars: Vec<char> = body.chars().collect();
    let mut out = String::with_capacity(body.len() + 16);
    let mut spans = Span::empty();
    let mut escaping = false;
    let mut in_link = false;

    for i in 0..chars.len() {
        let c = chars[i];

        // 1. 反斜線之後的字元
        if escaping {
            escaping = false;
            match c {
                '*' | '_' | '~' | '`' | '\\' => out.push(c),
                LINK_OPEN => {
                    out.push('\\');
                    in_link = true;
                }
                _ => {
                    out.push('\\');
                    push_literal(&mut out, c);
                }
            }
            continue;
        }

        // 2. 連結保護區：原樣通過，內部哨兵還原為原始文字
        if in_link {
            if c == LINK_CLOSE {
                in_link = false;
            } else {
                push_literal(&mut out, c);
            }
            continue;
        }
        if c == LINK_OPEN {
            in_link = true;
            continue;
        }

        // 3. 程式碼區：除了關閉的反引號，一切字面輸出
        if spans.contains(Span::CODE) {
            if c == '`' {
                out.push_str(ansi::CODE_OFF);
                spans.remove(Span::CODE);
            } else {
                push_literal(&mut out, c);
            }
            continue;
        }

        match c {
            '\\' => escaping = true,
            '`' if opens_code(&chars, i) => {
                out.push_str(ansi::CODE_ON);
                spans.insert(Span::CODE);
            }
            // 刪除線：無邊界條件，直接切換
            STRIKE_TILDES => {
                if spans.contains(Span::STRIKE) {
                    out.push_str(ansi::STRIKE_OFF);
                    spans.remove(Span::STRIKE);
                } else {
                    out.push_str(ansi::STRIKE_ON);
                    spans.insert(Span::STRIKE);
                }
            }
            // 粗體：成對標記哨兵，受邊界條件約束
            BOLD_STARS | BOLD_UNDERS => {
                if !spans.contains(Span::BOLD) && opens_span(&chars, i) {
                    out.push_str(ansi::BOLD_ON);
                    spans.insert(Span::BOLD);
                } else if spans.contains(Span::BOLD) && closes_span(&chars, i) {
                    out.push_str(ansi::BOLD_OFF);
                    spans.remove(Span::BOLD);
                } else {
                    push_literal(&mut out, c);
                }
            }
            // 斜體：單字元標記，邊界條件與粗體相同
            '*' | '_' => {
                if !spans.contains(Span::ITALIC) && opens_span(&chars, i) {
                    out.push_str(ansi::ITALIC_ON);
                    spans.insert(Span::ITALIC);
                } else if spans.contains(Span::ITALIC) && closes_span(&chars, i) {
                    out.push_str(ansi::ITALIC_OFF);
                    spans.remove(Span::ITALIC);
                } else {
                    out.push(c);
                }
            }
            ESCAPED_STARS => out.push_str("**"),
            ESCAPED_UNDERS => out.push_str("__"),
            _ => out.push(c),
        }
    }

    // 結尾殘留的反斜線以字面輸出
    if escaping {
        out.push('\\');
    }

    out.push_str(ansi::RESET);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_reset_always_appended() {
        for input in ["", "plain", "*x*", "**x", "`y", "\\", "[a](b)"] {
            assert!(render(input).ends_with("\x1b[0m"), "input: {:?}", input);
        }
    }

    #[test]
    fn test_plain_text_passthrough() {
        assert_eq!(render("hello world"), "hello world\x1b[0m");
    }

    #[test]
    fn test_single_marker_emphasis() {
        assert_eq!(render("*bold*"), "\x1b[3mbold\x1b[23m\x1b[0m");
        assert_eq!(render("_word_"), "\x1b[3mword\x1b[23m\x1b[0m");
    }

    #[test]
    fn test_intraword_markers_stay_literal() {
        assert_eq!(render("a*b*c"), "a*b*c\x1b[0m");
        assert_eq!(render("snake_case_name"), "snake_case_name\x1b[0m");
    }

    #[test]
    fn test_emphasis_mid_sentence() {
        assert_eq!(render("a *b* c"), "a \x1b[3mb\x1b[23m c\x1b[0m");
    }

    #[test]
    fn test_double_markers_bold() {
        assert_eq!(render("**text**"), "\x1b[1mtext\x1b[22m\x1b[0m");
    }

    #[test]
    fn test_double_marker_fungibility() {
        assert_eq!(render("**text**"), render("__text__"));
    }

    #[test]
    fn test_strikethrough_toggles_anywhere() {
        assert_eq!(render("a~~b~~c"), "a\x1b[9mb\x1b[29mc\x1b[0m");
    }

    #[test]
    fn test_nested_bold_italic() {
        assert_eq!(
            render("**_text_**"),
            "\x1b[1m\x1b[3mtext\x1b[23m\x1b[22m\x1b[0m"
        );
    }

    #[test]
    fn test_nested_italic_bold() {
        assert_eq!(
            render("_**text**_"),
            "\x1b[3m\x1b[1mtext\x1b[22m\x1b[23m\x1b[0m"
        );
    }

    #[test]
    fn test_trailing_punctuation_closes() {
        assert_eq!(render("*x*."), "\x1b[3mx\x1b[23m.\x1b[0m");
        assert_eq!(render("**done**,"), "\x1b[1mdone\x1b[22m,\x1b[0m");
    }

    #[test]
    fn test_space_padded_markers_literal() {
        assert_eq!(render("a ** b"), "a ** b\x1b[0m");
    }

    #[test]
    fn test_unclosed_span_ended_by_reset() {
        assert_eq!(render("**abc"), "\x1b[1mabc\x1b[0m");
        assert_eq!(render("*abc"), "\x1b[3mabc\x1b[0m");
    }

    #[test]
    fn test_code_span_suppresses_markup() {
        assert_eq!(
            render("`*not bold*`"),
            "\x1b[48;5;22m*not bold*\x1b[49m\x1b[0m"
        );
    }

    #[test]
    fn test_code_span_restores_double_markers() {
        assert_eq!(render("`**x**`"), "\x1b[48;5;22m**x**\x1b[49m\x1b[0m");
        assert_eq!(render("`a~~b~~`"), "\x1b[48;5;22ma~~b~~\x1b[49m\x1b[0m");
    }

    #[test]
    fn test_double_backtick_literal() {
        assert_eq!(render("``"), "``\x1b[0m");
    }

    #[test]
    fn test_code_needs_leading_boundary() {
        assert_eq!(render("a`b`"), "a`b`\x1b[0m");
    }

    #[test]
    fn test_backslash_inert_inside_code() {
        assert_eq!(render("`a\\b`"), "\x1b[48;5;22ma\\b\x1b[49m\x1b[0m");
    }

    #[test]
    fn test_escaped_markers() {
        assert_eq!(render("\\*literal\\*"), "*literal*\x1b[0m");
        assert_eq!(render("\\~\\`\\\\"), "~`\\\x1b[0m");
    }

    #[test]
    fn test_escaped_double_markers() {
        assert_eq!(render("\\**x\\**"), "**x**\x1b[0m");
        assert_eq!(render("\\__x\\__"), "__x__\x1b[0m");
    }

    #[test]
    fn test_escaped_double_marker_inside_code() {
        assert_eq!(render("`a\\**b`"), "\x1b[48;5;22ma**b\x1b[49m\x1b[0m");
    }

    #[test]
    fn test_trailing_backslash_literal() {
        assert_eq!(render("abc\\"), "abc\\\x1b[0m");
        assert_eq!(render("\\"), "\\\x1b[0m");
    }

    #[test]
    fn test_backslash_before_plain_char() {
        assert_eq!(render("\\a"), "\\a\x1b[0m");
    }

    #[test]
    fn test_link_hyperlink_output() {
        assert_eq!(
            render("[click](http://x)"),
            "\x1b]8;;http://x\x1b\\click\x1b]8;;\x1b\\\x1b[0m"
        );
    }

    #[test]
    fn test_link_inside_sentence() {
        let out = render("see [docs](http://d) now");
        assert!(out.starts_with("see \x1b]8;;http://d\x1b\\docs"));
        assert!(out.contains("\x1b]8;;\x1b\\ now"));
    }

    #[test]
    fn test_link_url_with_double_unders_survives() {
        let out = render("[x](http://a/__init__.py)");
        assert!(out.contains("http://a/__init__.py"));
    }

    #[test]
    fn test_link_wrapped_in_emphasis() {
        let out = render("*[x](http://u)*");
        assert!(out.starts_with("\x1b[3m"));
        assert!(out.ends_with("\x1b[23m\x1b[0m"));
    }

    #[test]
    fn test_link_display_text_styled() {
        let out = render("[a *b* c](http://u)");
        assert!(out.contains("\x1b[3mb\x1b[23m"));
    }

    #[test]
    fn test_incomplete_link_literal() {
        assert_eq!(render("[x](unclosed"), "[x](unclosed\x1b[0m");
        assert_eq!(render("[x]"), "[x]\x1b[0m");
    }

    #[test]
    fn test_link_url_no_spaces() {
        assert_eq!(render("[x](a b)"), "[x](a b)\x1b[0m");
    }

    #[test]
    fn test_sentinel_input_sanitized() {
        assert_eq!(render("a\u{e002}b"), "ab\x1b[0m");
        assert_eq!(render("\u{e000}\u{e001}"), "\x1b[0m");
    }

    #[test]
    fn test_strike_wrapping_emphasis() {
        assert_eq!(
            render("~~*x*~~"),
            "\x1b[9m\x1b[3mx\x1b[23m\x1b[29m\x1b[0m"
        );
    }

    #[test]
    fn test_bold_and_code_in_sequence() {
        assert_eq!(
            render("**a** `b`"),
            "\x1b[1ma\x1b[22m \x1b[48;5;22mb\x1b[49m\x1b[0m"
        );
    }

    #[test]
    fn test_no_sentinel_ever_leaks() {
        let inputs = [
            "**__~~`[]()\\",
            "\\**\\__`~~`",
            "[a](b) ** _ ~~",
            "\u{e003}\u{e005}",
        ];
        for input in inputs {
            let out = render(input);
            assert!(
                !out.chars().any(|c| ('\u{e000}'..='\u{e006}').contains(&c)),
                "input: {:?}",
                input
            );
        }
    }

    #[test]
    fn test_strip_recovers_plain_text() {
        assert_eq!(
            ansi::strip_ansi(&render("**a** *b* ~~c~~ `d` [e](http://x)")),
            "a b c d e"
        );
        assert!(!ansi::strip_ansi(&render("**mixed** `styles`")).contains('\x1b'));
    }
}
