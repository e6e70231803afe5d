//! 訊息模組
//!
//! 聊天訊息的種類、建構、指令解析與渲染組合。
//! 每種訊息決定自己的前綴、收發對象與上色方式；前綴在渲染時
//! 套用，不寫進本文。

use std::fmt;

use chrono::{DateTime, Local};

use crate::ansi;
use crate::highlight;
use crate::markup;
use crate::theme::Theme;
use crate::user::{User, UserConfig};

/// 訊息種類標籤
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Public,
    Emote,
    Private,
    System,
    Announce,
    Motd,
    Command,
}

/// 共用的渲染組合：標記渲染、高亮、名稱裝飾與時間戳記
fn render_message_for(
    prefix: &str,
    from: &User,
    sep: &str,
    msg: &Msg,
    theme: Option<&Theme>,
    cfg: Option<&UserConfig>,
    do_highlight: bool,
) -> String {
    let mut body = msg.body().to_string();

    if let Some(cfg) = cfg {
        if !cfg.raw_mode {
            body = markup::render(&cfg.emoji.replace_aliases(&body));
        }

        if do_highlight {
            if let (Some(theme), Some(pattern)) = (theme, cfg.highlight.as_ref()) {
                if let Some(highlighted) = highlight::apply(pattern, theme, &body) {
                    body = highlighted;
                    if cfg.bell {
                        body.push(ansi::BEL);
                    }
                }
            }
        }
    }

    let name = match theme {
        Some(theme) => theme.color_name(from),
        None => from.name().to_string(),
    };

    let mut line = format!("{}{}{}{}", prefix, name, sep, body);

    if let Some(cfg) = cfg {
        if let Some(format) = &cfg.time_format {
            line = format!("[{}] {}", msg.timestamp().format(format), line);
        }
    }

    line
}

/// 訊息基底：本文與建立時間
#[derive(Debug, Clone)]
pub struct Msg {
    body: String,
    timestamp: DateTime<Local>,
}

impl Msg {
    /// 創建新的基底訊息
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            timestamp: Local::now(),
        }
    }

    /// 訊息本文
    pub fn body(&self) -> &str {
        &self.body
    }

    /// 建立時間
    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    /// 無裝飾渲染：本文原樣返回
    pub fn render(&self, _theme: Option<&Theme>) -> String {
        self.body.clone()
    }
}

impl fmt::Display for Msg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.body)
    }
}

/// 公開訊息：聊天室內所有人可見
#[derive(Debug, Clone)]
pub struct PublicMsg {
    msg: Msg,
    from: User,
    original_from: User,
}

impl PublicMsg {
    pub fn new(body: impl Into<String>, from: User) -> Self {
        Self {
            msg: Msg::new(body),
            original_from: from.clone(),
            from,
        }
    }

    /// 設定改名前的原始身分（轉送別名訊息時使用）
    pub fn with_original_from(mut self, original_from: User) -> Self {
        self.original_from = original_from;
        self
    }

    pub fn body(&self) -> &str {
        self.msg.body()
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        self.msg.timestamp()
    }

    pub fn from(&self) -> &User {
        &self.from
    }

    /// 改名前的原始身分；未設定時即為發送者
    pub fn original_from(&self) -> &User {
        &self.original_from
    }

    /// 嘗試將本文解析為指令
    ///
    /// 以 `/` 開頭者視為指令；`//` 是跳脫慣例，不是指令。
    pub fn parse_command(&self) -> Option<CommandMsg> {
        let body = self.body();
        if !body.starts_with('/') || body.starts_with("//") {
            return None;
        }

        let mut fields = body.split_whitespace();
        let command = fields.next()?.to_string();
        let args: Vec<String> = fields.map(str::to_string).collect();

        Some(CommandMsg {
            public: self.clone(),
            command,
            args,
        })
    }

    /// 以主題渲染：只做名稱裝飾，本文原樣
    pub fn render(&self, theme: Option<&Theme>) -> String {
        render_message_for("", &self.from, ": ", &self.msg, theme, None, true)
    }

    /// 為特定觀看端渲染：含標記渲染、高亮與響鈴
    pub fn render_for(&self, cfg: &UserConfig) -> String {
        render_message_for(
            "",
            &self.from,
            ": ",
            &self.msg,
            cfg.theme.as_ref(),
            Some(cfg),
            true,
        )
    }

    /// 為訊息作者本人渲染：名稱改用方括號，不做高亮
    pub fn render_self(&self, cfg: &UserConfig) -> String {
        render_message_for(
            "[",
            &self.from,
            "] ",
            &self.msg,
            cfg.theme.as_ref(),
            Some(cfg),
            false,
        )
    }
}

impl fmt::Display for PublicMsg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.from.name(), self.body())
    }
}

/// 動作訊息（/me）
#[derive(Debug, Clone)]
pub struct EmoteMsg {
    msg: Msg,
    from: User,
    original_from: User,
}

impl EmoteMsg {
    pub fn new(body: impl Into<String>, from: User) -> Self {
        Self {
            msg: Msg::new(body),
            original_from: from.clone(),
            from,
        }
    }

    /// 設定改名前的原始身分
    pub fn with_original_from(mut self, original_from: User) -> Self {
        self.original_from = original_from;
        self
    }

    pub fn body(&self) -> &str {
        self.msg.body()
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        self.msg.timestamp()
    }

    pub fn from(&self) -> &User {
        &self.from
    }

    /// 改名前的原始身分；未設定時即為發送者
    pub fn original_from(&self) -> &User {
        &self.original_from
    }

    /// 以主題渲染；主題要求時，含空白的名稱會加上引號
    pub fn render(&self, theme: Option<&Theme>) -> String {
        let mut name = match theme {
            Some(theme) => theme.color_name(&self.from),
            None => self.from.name().to_string(),
        };
        if theme.map_or(false, Theme::quotes_names)
            && self.from.name().contains(char::is_whitespace)
        {
            name = format!("\"{}\"", name);
        }
        format!("** {} {}", name, self.body())
    }
}

impl fmt::Display for EmoteMsg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "** {} {}", self.from.name(), self.body())
    }
}

/// 私人訊息
#[derive(Debug, Clone)]
pub struct PrivateMsg {
    msg: Msg,
    from: User,
    to: User,
}

impl PrivateMsg {
    pub fn new(body: impl Into<String>, from: User, to: User) -> Self {
        Self {
            msg: Msg::new(body),
            from,
            to,
        }
    }

    pub fn body(&self) -> &str {
        self.msg.body()
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        self.msg.timestamp()
    }

    pub fn from(&self) -> &User {
        &self.from
    }

    /// 私訊不經轉送，原始身分恆等於發送者
    pub fn original_from(&self) -> &User {
        &self.from
    }

    pub fn to(&self) -> &User {
        &self.to
    }

    pub fn render(&self, theme: Option<&Theme>) -> String {
        render_message_for("[PM from ", &self.from, "] ", &self.msg, theme, None, true)
    }
}

impl fmt::Display for PrivateMsg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[PM from {}] {}", self.from.name(), self.body())
    }
}

/// 系統訊息：給特定使用者的操作回饋
#[derive(Debug, Clone)]
pub struct SystemMsg {
    msg: Msg,
    to: Option<User>,
}

impl SystemMsg {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            msg: Msg::new(body),
            to: None,
        }
    }

    /// 創建定向系統訊息
    pub fn to_user(body: impl Into<String>, to: User) -> Self {
        Self {
            msg: Msg::new(body),
            to: Some(to),
        }
    }

    pub fn body(&self) -> &str {
        self.msg.body()
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        self.msg.timestamp()
    }

    pub fn to(&self) -> Option<&User> {
        self.to.as_ref()
    }

    pub fn render(&self, theme: Option<&Theme>) -> String {
        let line = format!("-> {}", self.body());
        match theme {
            Some(theme) => theme.color_sys(&line),
            None => line,
        }
    }
}

impl fmt::Display for SystemMsg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "-> {}", self.body())
    }
}

/// 佈告訊息：廣播給所有人的系統通知
#[derive(Debug, Clone)]
pub struct AnnounceMsg {
    msg: Msg,
}

impl AnnounceMsg {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            msg: Msg::new(body),
        }
    }

    pub fn body(&self) -> &str {
        self.msg.body()
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        self.msg.timestamp()
    }

    pub fn render(&self, theme: Option<&Theme>) -> String {
        let line = format!(" * {}", self.body());
        match theme {
            Some(theme) => theme.color_sys(&line),
            None => line,
        }
    }
}

impl fmt::Display for AnnounceMsg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, " * {}", self.body())
    }
}

/// 每日訊息（MOTD）
#[derive(Debug, Clone)]
pub struct MotdMsg {
    msg: Msg,
}

impl MotdMsg {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            msg: Msg::new(body),
        }
    }

    pub fn body(&self) -> &str {
        self.msg.body()
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        self.msg.timestamp()
    }

    pub fn render(&self, theme: Option<&Theme>) -> String {
        let line = format!(" {}", self.body());
        match theme {
            Some(theme) => theme.color_sys(&line),
            None => line,
        }
    }
}

impl fmt::Display for MotdMsg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, " {}", self.body())
    }
}

/// 指令訊息：以 `/` 開頭的輸入解析結果
#[derive(Debug, Clone)]
pub struct CommandMsg {
    public: PublicMsg,
    command: String,
    args: Vec<String>,
}

impl CommandMsg {
    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn body(&self) -> &str {
        self.public.body()
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        self.public.timestamp()
    }

    pub fn from(&self) -> &User {
        self.public.from()
    }

    pub fn original_from(&self) -> &User {
        self.public.original_from()
    }

    pub fn render(&self, theme: Option<&Theme>) -> String {
        self.public.render(theme)
    }
}

impl fmt::Display for CommandMsg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.public.fmt(f)
    }
}

/// 聊天訊息：封閉的種類集合
///
/// 渲染以單一函式比對標籤完成，不經虛擬分派。
#[derive(Debug, Clone)]
pub enum Message {
    Public(PublicMsg),
    Emote(EmoteMsg),
    Private(PrivateMsg),
    System(SystemMsg),
    Announce(AnnounceMsg),
    Motd(MotdMsg),
    Command(CommandMsg),
}

impl Message {
    /// 種類標籤
    pub fn kind(&self) -> MessageKind {
        match self {
            Message::Public(_) => MessageKind::Public,
            Message::Emote(_) => MessageKind::Emote,
            Message::Private(_) => MessageKind::Private,
            Message::System(_) => MessageKind::System,
            Message::Announce(_) => MessageKind::Announce,
            Message::Motd(_) => MessageKind::Motd,
            Message::Command(_) => MessageKind::Command,
        }
    }

    /// 訊息本文
    pub fn body(&self) -> &str {
        match self {
            Message::Public(m) => m.body(),
            Message::Emote(m) => m.body(),
            Message::Private(m) => m.body(),
            Message::System(m) => m.body(),
            Message::Announce(m) => m.body(),
            Message::Motd(m) => m.body(),
            Message::Command(m) => m.body(),
        }
    }

    /// 建立時間
    pub fn timestamp(&self) -> DateTime<Local> {
        match self {
            Message::Public(m) => m.timestamp(),
            Message::Emote(m) => m.timestamp(),
            Message::Private(m) => m.timestamp(),
            Message::System(m) => m.timestamp(),
            Message::Announce(m) => m.timestamp(),
            Message::Motd(m) => m.timestamp(),
            Message::Command(m) => m.timestamp(),
        }
    }

    /// 發送者（系統類訊息沒有）
    pub fn from(&self) -> Option<&User> {
        match self {
            Message::Public(m) => Some(m.from()),
            Message::Emote(m) => Some(m.from()),
            Message::Private(m) => Some(m.from()),
            Message::Command(m) => Some(m.from()),
            Message::System(_) | Message::Announce(_) | Message::Motd(_) => None,
        }
    }

    /// 改名前的原始身分（系統類訊息沒有）
    pub fn original_from(&self) -> Option<&User> {
        match self {
            Message::Public(m) => Some(m.original_from()),
            Message::Emote(m) => Some(m.original_from()),
            Message::Private(m) => Some(m.original_from()),
            Message::Command(m) => Some(m.original_from()),
            Message::System(_) | Message::Announce(_) | Message::Motd(_) => None,
        }
    }

    /// 收件者（私訊與定向系統訊息才有）
    pub fn to(&self) -> Option<&User> {
        match self {
            Message::Private(m) => Some(m.to()),
            Message::System(m) => m.to(),
            _ => None,
        }
    }

    /// 指令名稱（僅指令訊息）
    pub fn command(&self) -> Option<&str> {
        match self {
            Message::Command(m) => Some(m.command()),
            _ => None,
        }
    }

    /// 指令參數（僅指令訊息）
    pub fn args(&self) -> Option<&[String]> {
        match self {
            Message::Command(m) => Some(m.args()),
            _ => None,
        }
    }

    /// 以主題渲染
    pub fn render(&self, theme: Option<&Theme>) -> String {
        match self {
            Message::Public(m) => m.render(theme),
            Message::Emote(m) => m.render(theme),
            Message::Private(m) => m.render(theme),
            Message::System(m) => m.render(theme),
            Message::Announce(m) => m.render(theme),
            Message::Motd(m) => m.render(theme),
            Message::Command(m) => m.render(theme),
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Public(m) => m.fmt(f),
            Message::Emote(m) => m.fmt(f),
            Message::Private(m) => m.fmt(f),
            Message::System(m) => m.fmt(f),
            Message::Announce(m) => m.fmt(f),
            Message::Motd(m) => m.fmt(f),
            Message::Command(m) => m.fmt(f),
        }
    }
}

/// 解析使用者輸入為訊息
///
/// 指令優先；`//` 開頭表示跳脫，去掉一個 `/` 後當作一般訊息。
pub fn parse_input(body: &str, from: &User) -> Message {
    let msg = PublicMsg::new(body, from.clone());
    if let Some(command) = msg.parse_command() {
        return Message::Command(command);
    }

    let trimmed = body.trim_start();
    if let Some(escaped) = trimmed.strip_prefix('/') {
        return Message::Public(PublicMsg::new(escaped, from.clone()));
    }

    Message::Public(msg)
}
