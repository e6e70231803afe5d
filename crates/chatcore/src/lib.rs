//! Chat Core Library
//!
//! 提供終端聊天的核心功能：
//! - `ansi`: ANSI 控制碼常數與工具
//! - `emoji`: 表情符號別名替換
//! - `markup`: 行內標記渲染
//! - `theme`: 配色主題
//! - `user`: 使用者與觀看端設定
//! - `highlight`: 提及高亮
//! - `message`: 訊息模型與渲染組合
//! - `history`: 訊息歷史緩衝區
//! - `transcript`: 逐字稿記錄

pub mod ansi;
pub mod emoji;
pub mod highlight;
pub mod history;
pub mod markup;
pub mod message;
pub mod theme;
pub mod transcript;
pub mod user;

pub use emoji::EmojiTable;
pub use history::{History, HistoryEntry};
pub use message::{
    parse_input, AnnounceMsg, CommandMsg, EmoteMsg, Message, MessageKind, MotdMsg, Msg,
    PrivateMsg, PublicMsg, SystemMsg,
};
pub use theme::{Color256, Palette, Theme};
pub use transcript::{Transcript, TranscriptError, TranscriptFormat};
pub use user::{User, UserConfig};
