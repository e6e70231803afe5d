//! 逐字稿模組
//!
//! 將已渲染的聊天行記錄到檔案

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use thiserror::Error;

use crate::ansi;

/// 逐字稿錯誤
#[derive(Debug, Error)]
pub enum TranscriptError {
    #[error("IO 錯誤: {0}")]
    Io(#[from] io::Error),

    #[error("逐字稿未開啟")]
    NotRecording,
}

/// 逐字稿格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TranscriptFormat {
    /// 純文字（移除 ANSI 控制碼）
    #[default]
    Plain,
    /// 原樣保留 ANSI 控制碼
    Ansi,
}

/// 逐字稿記錄器
pub struct Transcript {
    /// 逐字稿檔案路徑
    path: Option<PathBuf>,
    /// 緩衝寫入器
    writer: Option<BufWriter<File>>,
    /// 逐字稿格式
    format: TranscriptFormat,
    /// 是否正在記錄
    recording: bool,
}

impl Transcript {
    /// 創建新的逐字稿記錄器
    pub fn new() -> Self {
        Self {
            path: None,
            writer: None,
            format: TranscriptFormat::default(),
            recording: false,
        }
    }

    /// 設置逐字稿格式
    pub fn set_format(&mut self, format: TranscriptFormat) {
        self.format = format;
    }

    /// 獲取逐字稿格式
    pub fn format(&self) -> TranscriptFormat {
        self.format
    }

    /// 是否正在記錄
    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// 獲取逐字稿檔案路徑
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// 開始記錄到指定檔案
    pub fn start(&mut self, path: impl AsRef<Path>) -> Result<(), TranscriptError> {
        let path = path.as_ref();

        // 確保目錄存在
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;

        self.writer = Some(BufWriter::new(file));
        self.path = Some(path.to_path_buf());
        self.recording = true;

        tracing::info!("開始記錄逐字稿: {}", path.display());

        Ok(())
    }

    /// 停止記錄
    pub fn stop(&mut self) -> Result<(), TranscriptError> {
        if !self.recording {
            return Ok(());
        }

        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }

        self.writer = None;
        self.recording = false;

        tracing::info!("停止記錄逐字稿");

        Ok(())
    }

    /// 記錄一行已渲染的訊息
    pub fn write_line(&mut self, line: &str) -> Result<(), TranscriptError> {
        if !self.recording {
            return Err(TranscriptError::NotRecording);
        }

        let writer = self.writer.as_mut().ok_or(TranscriptError::NotRecording)?;

        match self.format {
            TranscriptFormat::Plain => {
                writeln!(writer, "{}", ansi::strip_ansi(line))?;
            }
            TranscriptFormat::Ansi => {
                writeln!(writer, "{}", line)?;
            }
        }

        Ok(())
    }

    /// 刷新緩衝區
    pub fn flush(&mut self) -> Result<(), TranscriptError> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }

    /// 以當下時間產生預設檔名
    pub fn default_filename() -> String {
        format!("chat-{}.log", Local::now().format("%Y%m%d-%H%M%S"))
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Transcript {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}
