use crate::error::{BatikScanError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_ENDPOINT: &str = "http://18.214.158.188:8888/predict";
pub const ENDPOINT_ENV: &str = "BATIKSCAN_ENDPOINT";

/// 実行時パーミッションの扱い
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PermissionPolicy {
    #[default]
    Allow,
    Deny,
    Ask,
}

impl std::str::FromStr for PermissionPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "allow" | "grant" => Ok(PermissionPolicy::Allow),
            "deny" => Ok(PermissionPolicy::Deny),
            "ask" | "prompt" => Ok(PermissionPolicy::Ask),
            _ => Err(format!("Unknown permission policy: {}. Use allow, deny, or ask", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub endpoint: String,
    /// 未設定ならタイムアウトなし
    pub timeout_seconds: Option<u64>,
    /// `{output}` を撮影先パスに置換して実行
    pub camera_command: Option<String>,
    pub media_library_permission: PermissionPolicy,
    pub camera_permission: PermissionPolicy,
    /// 端末表示のバー幅（文字数）
    pub bar_cells: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.into(),
            timeout_seconds: None,
            camera_command: None,
            media_library_permission: PermissionPolicy::Allow,
            camera_permission: PermissionPolicy::Ask,
            bar_cells: 30,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_env();
        Ok(config)
    }

    /// 環境変数を優先
    pub fn apply_env(&mut self) {
        self.apply_endpoint_override(std::env::var(ENDPOINT_ENV).ok());
    }

    /// 空文字列は無視
    pub fn apply_endpoint_override(&mut self, endpoint: Option<String>) {
        if let Some(endpoint) = endpoint {
            if !endpoint.trim().is_empty() {
                self.endpoint = endpoint;
            }
        }
    }

    /// `batikscan config` 用の読み込み。壊れたファイルはデフォルトから作り直す
    pub fn load_for_edit(path: &Path) -> Result<Self> {
        match Self::load_from(path) {
            Err(BatikScanError::JsonParse(e)) => {
                tracing::warn!(path = %path.display(), error = %e, "config file is corrupted, starting from defaults");
                Ok(Self::default())
            }
            other => other,
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| BatikScanError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("batikscan").join("config.json"))
    }

    pub fn set_endpoint(&mut self, endpoint: String) -> Result<()> {
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(BatikScanError::Config(format!("URLが不正です: {}", endpoint)));
        }
        self.endpoint = endpoint;
        Ok(())
    }

    /// 空文字列で解除
    pub fn set_camera_command(&mut self, command: String) {
        self.camera_command = if command.trim().is_empty() { None } else { Some(command) };
    }
}
