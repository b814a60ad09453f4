//! RetrieveConfig - 取得フローの設定
//!
//! 設定はフローの途中で参照しに行かず、呼び出し時に明示的に渡します。
//! JSON ファイルのキーは camelCase（`storeDefaultLocator` など）。

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// How the locator is obtained when neither an argument nor a default is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractiveMode {
    /// 自由入力で locator を尋ねる
    #[default]
    Prompt,
    /// container → key の二段階選択
    Discover,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RetrieveConfig {
    /// 設定されていればプロンプトを出さずにこの locator を使う
    #[serde(rename = "storeDefaultLocator", skip_serializing_if = "Option::is_none")]
    pub default_locator: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential_profile: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// ホスト起動時に一度だけ実行する（エラーは黙って捨てる）
    pub auto_run_on_startup: bool,

    pub interactive: InteractiveMode,

    /// 一時ファイルの置き場所。未設定ならシステムの temp dir。
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp_dir: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl RetrieveConfig {
    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// 空白のみの default は未設定として扱う
    pub fn default_locator(&self) -> Option<&str> {
        self.default_locator
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn temp_dir(&self) -> PathBuf {
        self.temp_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}
