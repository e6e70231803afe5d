//! 設定檔持久化模組
//!
//! 單一 Profile 的聊天偏好：暱稱、主題、高亮樣板與表情別名。

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use chatcore::theme::Theme;
use chatcore::{EmojiTable, UserConfig};

/// 設定檔錯誤
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO 錯誤: {0}")]
    Io(#[from] std::io::Error),

    #[error("設定檔解析失敗: {0}")]
    Parse(#[from] serde_json::Error),
}

/// 聊天偏好設定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileConfig {
    /// 暱稱
    #[serde(default = "default_name")]
    pub name: String,
    /// 主題識別名稱（colors 或 mono）
    #[serde(default = "default_theme")]
    pub theme: String,
    /// 自訂高亮樣板；省略時以暱稱提及為準
    #[serde(default)]
    pub highlight: Option<String>,
    /// 被提及時響鈴
    #[serde(default = "default_true")]
    pub bell: bool,
    /// 原樣顯示（不渲染標記與表情）
    #[serde(default)]
    pub raw_mode: bool,
    /// 時間戳記格式（strftime）
    #[serde(default)]
    pub time_format: Option<String>,
    /// 自訂表情別名
    #[serde(default)]
    pub emojis: HashMap<String, String>,
}

fn default_name() -> String {
    "guest".to_string()
}

fn default_theme() -> String {
    "colors".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            theme: default_theme(),
            highlight: None,
            bell: true,
            raw_mode: false,
            time_format: None,
            emojis: HashMap::new(),
        }
    }
}

impl ProfileConfig {
    /// 預設設定檔路徑
    pub fn config_path() -> PathBuf {
        config_dir().join("config.json")
    }

    /// 從檔案載入設定；檔案不存在時返回預設值
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// 儲存設定到檔案
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// 轉換為渲染用的觀看端設定
    pub fn to_user_config(&self) -> UserConfig {
        let highlight = match &self.highlight {
            Some(pattern) => match regex::Regex::new(pattern) {
                Ok(re) => Some(re),
                Err(e) => {
                    tracing::warn!("高亮樣板無效，改用暱稱提及: {}", e);
                    UserConfig::mention_pattern(&self.name).ok()
                }
            },
            None => UserConfig::mention_pattern(&self.name).ok(),
        };

        let emoji = EmojiTable::new()
            .with_aliases(self.emojis.iter().map(|(k, v)| (k.as_str(), v.as_str())));

        let mut cfg = UserConfig::new()
            .with_theme(Theme::by_name(&self.theme).unwrap_or_default())
            .with_bell(self.bell)
            .with_raw_mode(self.raw_mode)
            .with_emoji(emoji);

        if let Some(re) = highlight {
            cfg = cfg.with_highlight(re);
        }
        if let Some(format) = &self.time_format {
            cfg = cfg.with_time_format(format.clone());
        }

        cfg
    }
}

/// 獲取設定目錄
pub fn config_dir() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("chatcli")
    } else {
        PathBuf::from(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ProfileConfig::default();

        assert_eq!(config.name, "guest");
        assert_eq!(config.theme, "colors");
        assert!(config.highlight.is_none());
        assert!(config.bell);
        assert!(!config.raw_mode);
        assert!(config.emojis.is_empty());
    }

    #[test]
    fn test_serialization_roundtrip() {
        let mut config = ProfileConfig::default();
        config.name = "alice".to_string();
        config.emojis.insert("wave".to_string(), "👋".to_string());

        let json = serde_json::to_string(&config).unwrap();
        let deserialized: ProfileConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.name, "alice");
        assert_eq!(deserialized.emojis.get("wave").map(String::as_str), Some("👋"));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: ProfileConfig = serde_json::from_str(r#"{"name": "bob"}"#).unwrap();
        assert_eq!(config.name, "bob");
        assert_eq!(config.theme, "colors");
        assert!(config.bell);
    }

    #[test]
    fn test_load_missing_returns_default() {
        let path = std::env::temp_dir().join("chatcli_no_such_config.json");
        let _ = fs::remove_file(&path);

        let config = ProfileConfig::load(&path).unwrap();
        assert_eq!(config.name, "guest");
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join("chatcli_test_config.json");
        let _ = fs::remove_file(&path);

        let mut config = ProfileConfig::default();
        config.name = "carol".to_string();
        config.theme = "mono".to_string();
        config.save(&path).unwrap();

        let loaded = ProfileConfig::load(&path).unwrap();
        assert_eq!(loaded.name, "carol");
        assert_eq!(loaded.theme, "mono");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_malformed_errors() {
        let path = std::env::temp_dir().join("chatcli_bad_config.json");
        fs::write(&path, "not json").unwrap();

        assert!(matches!(
            ProfileConfig::load(&path),
            Err(ConfigError::Parse(_))
        ));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_to_user_config() {
        let mut config = ProfileConfig::default();
        config.name = "alice".to_string();
        config.emojis.insert("wave".to_string(), "👋".to_string());

        let cfg = config.to_user_config();
        assert_eq!(cfg.theme.as_ref().map(Theme::id), Some("colors"));
        assert!(cfg.bell);
        assert!(!cfg.raw_mode);
        assert_eq!(cfg.emoji.lookup("wave"), Some("👋"));

        // 未指定高亮樣板時以暱稱提及為準
        let pattern = cfg.highlight.unwrap();
        assert!(pattern.is_match("hey alice!"));
        assert!(!pattern.is_match("hey malice!"));
    }

    #[test]
    fn test_invalid_highlight_falls_back_to_mention() {
        let mut config = ProfileConfig::default();
        config.name = "alice".to_string();
        config.highlight = Some("(unclosed".to_string());

        let cfg = config.to_user_config();
        assert!(cfg.highlight.unwrap().is_match("alice"));
    }

    #[test]
    fn test_unknown_theme_falls_back_to_colors() {
        let mut config = ProfileConfig::default();
        config.theme = "sepia".to_string();

        let cfg = config.to_user_config();
        assert_eq!(cfg.theme.as_ref().map(Theme::id), Some("colors"));
    }
}
