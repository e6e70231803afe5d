//! 終端聊天前端
//!
//! 讀取 stdin 的每一行，解析指令並以 chatcore 渲染輸出。

mod config;

use std::io::{self, BufRead};
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chatcore::theme::Theme;
use chatcore::{
    parse_input, AnnounceMsg, CommandMsg, EmoteMsg, History, HistoryEntry, Message, MotdMsg,
    PrivateMsg, SystemMsg, Transcript, User, UserConfig,
};

use config::ProfileConfig;

/// chatcli - 終端聊天客戶端
#[derive(Parser)]
#[command(name = "chatcli")]
#[command(version, about, long_about = None)]
struct Cli {
    /// 暱稱（覆蓋設定檔）
    #[arg(long, value_name = "NAME")]
    name: Option<String>,

    /// 主題識別名稱（colors 或 mono）
    #[arg(long, value_name = "THEME")]
    theme: Option<String>,

    /// 設定檔路徑
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// 關閉提及響鈴
    #[arg(long)]
    no_bell: bool,

    /// 原樣顯示（不渲染標記與表情）
    #[arg(long)]
    raw: bool,

    /// 時間戳記格式（strftime）
    #[arg(long, value_name = "FORMAT")]
    time_format: Option<String>,
}

const HELP: &[&str] = &[
    "/me <action>         send an emote",
    "/msg <nick> <body>   send a private message",
    "/motd [text]         show or set the message of the day",
    "/theme [colors|mono] show or switch the theme",
    "/history [n]         replay the last n lines",
    "/record [path]       start recording a transcript",
    "/stop                stop recording",
    "/quit                leave",
];

fn main() -> Result<(), config::ConfigError> {
    // 初始化日誌，寫到 stderr 以免混入聊天輸出
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(ProfileConfig::config_path);
    let mut profile = ProfileConfig::load(&config_path)?;

    // CLI 旗標覆蓋設定檔
    if let Some(name) = cli.name {
        profile.name = name;
    }
    if let Some(theme) = cli.theme {
        profile.theme = theme;
    }
    if cli.no_bell {
        profile.bell = false;
    }
    if cli.raw {
        profile.raw_mode = true;
    }
    if let Some(format) = cli.time_format {
        profile.time_format = Some(format);
    }

    let mut session = Session::new(&profile);
    session.run()?;

    Ok(())
}

/// 單人 REPL 會話
struct Session {
    user: User,
    cfg: UserConfig,
    history: History,
    transcript: Transcript,
    motd: String,
}

impl Session {
    fn new(profile: &ProfileConfig) -> Self {
        Self {
            user: User::new(profile.name.clone()),
            cfg: profile.to_user_config(),
            history: History::default(),
            transcript: Transcript::new(),
            motd: "welcome to chatcli, /help lists commands".to_string(),
        }
    }

    fn run(&mut self) -> io::Result<()> {
        self.emit(&Message::Announce(AnnounceMsg::new(format!(
            "{} joined",
            self.user.name()
        ))));
        self.emit(&Message::Motd(MotdMsg::new(self.motd.clone())));

        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            match parse_input(&line, &self.user) {
                Message::Command(cmd) => {
                    if !self.dispatch(&cmd) {
                        break;
                    }
                }
                message => self.emit(&message),
            }
        }

        if self.transcript.is_recording() {
            if let Err(e) = self.transcript.stop() {
                tracing::warn!("停止逐字稿失敗: {}", e);
            }
        }

        Ok(())
    }

    /// 處理一條指令；返回 false 表示離開
    fn dispatch(&mut self, cmd: &CommandMsg) -> bool {
        match cmd.command() {
            "/me" => {
                let body = cmd.args().join(" ");
                self.emit(&Message::Emote(EmoteMsg::new(body, self.user.clone())));
            }
            "/msg" => match cmd.args() {
                [to, body @ ..] if !body.is_empty() => {
                    let pm = PrivateMsg::new(body.join(" "), self.user.clone(), User::new(to));
                    self.emit(&Message::Private(pm));
                }
                _ => self.system("usage: /msg <nick> <body>"),
            },
            "/motd" => {
                if !cmd.args().is_empty() {
                    self.motd = cmd.args().join(" ");
                }
                self.emit(&Message::Motd(MotdMsg::new(self.motd.clone())));
            }
            "/theme" => match cmd.args().first() {
                Some(id) => match Theme::by_name(id) {
                    Some(theme) => {
                        self.cfg.theme = Some(theme);
                        self.system(format!("theme set to {}", id));
                    }
                    None => self.system(format!("unknown theme: {}", id)),
                },
                None => {
                    let current = self.cfg.theme.as_ref().map_or("none", Theme::id);
                    self.system(format!("theme: {}", current));
                }
            },
            "/history" => {
                let n = cmd
                    .args()
                    .first()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(10);
                for entry in self.history.recent(n) {
                    println!("{}", entry.line);
                }
            }
            "/record" => {
                let path = cmd
                    .args()
                    .first()
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(Transcript::default_filename()));
                match self.transcript.start(&path) {
                    Ok(()) => self.system(format!("recording to {}", path.display())),
                    Err(e) => self.system(format!("record failed: {}", e)),
                }
            }
            "/stop" => {
                if !self.transcript.is_recording() {
                    self.system("not recording");
                } else {
                    match self.transcript.stop() {
                        Ok(()) => self.system("recording stopped"),
                        Err(e) => self.system(format!("stop failed: {}", e)),
                    }
                }
            }
            "/help" => {
                for line in HELP {
                    self.system(*line);
                }
            }
            "/quit" => {
                self.system("bye");
                return false;
            }
            other => self.system(format!("unknown command: {}", other)),
        }

        true
    }

    /// 以定向系統訊息回饋
    fn system(&mut self, body: impl Into<String>) {
        let msg = SystemMsg::to_user(body, self.user.clone());
        self.emit(&Message::System(msg));
    }

    /// 渲染、入歷史、寫逐字稿、印出
    fn emit(&mut self, message: &Message) {
        let line = match message {
            Message::Public(msg) => msg.render_self(&self.cfg),
            message => message.render(self.cfg.theme.as_ref()),
        };

        self.history
            .push(HistoryEntry::new(message.kind(), line.clone()));

        if self.transcript.is_recording() {
            if let Err(e) = self.transcript.write_line(&line) {
                tracing::warn!("寫入逐字稿失敗: {}", e);
            }
        }

        println!("{}", line);
    }
}
