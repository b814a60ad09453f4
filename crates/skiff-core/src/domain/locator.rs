//! Locator - オブジェクトの所在を表す文字列の検証
//!
//! `scheme://container/key-path` 形式のみを受け付けます。
//! 検証は純粋に構文的で、到達可能性は確認しません（subprocess も起動しない）。

use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::ValidationError;

/// LocatorScheme はストアの scheme 名（`s3` など）
///
/// prefix は `<scheme>://` になります。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocatorScheme(String);

impl LocatorScheme {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let name = name.trim_end_matches("://").to_string();
        Self(name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `s3://` のような prefix
    pub fn prefix(&self) -> String {
        format!("{}://", self.0)
    }

    /// container と key から locator を組み立てる（discovery 用）
    pub fn locator_for(&self, container: &str, key: &str) -> String {
        format!("{}{}/{}", self.prefix(), container, key)
    }
}

impl Default for LocatorScheme {
    fn default() -> Self {
        Self::new("s3")
    }
}

impl fmt::Display for LocatorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A validated `scheme://container/key-path` string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locator {
    raw: String,
    container_end: usize,
    prefix_len: usize,
}

impl Locator {
    /// 文字列を検証して Locator を作る
    ///
    /// # エラー
    /// - 空文字・空白のみ: `ValidationError::Empty`
    /// - prefix 不一致: `ValidationError::MissingScheme`
    /// - container / key が空: `MissingContainer` / `MissingKey`
    pub fn parse(input: &str, scheme: &LocatorScheme) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty);
        }

        let prefix = scheme.prefix();
        let Some(rest) = trimmed.strip_prefix(prefix.as_str()) else {
            return Err(ValidationError::MissingScheme {
                expected: prefix,
                input: trimmed.to_string(),
            });
        };

        let (container, key) = rest.split_once('/').unwrap_or((rest, ""));
        if container.is_empty() {
            return Err(ValidationError::MissingContainer(trimmed.to_string()));
        }
        if key.is_empty() {
            return Err(ValidationError::MissingKey(trimmed.to_string()));
        }

        Ok(Self {
            raw: trimmed.to_string(),
            prefix_len: prefix.len(),
            container_end: prefix.len() + container.len(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn container(&self) -> &str {
        &self.raw[self.prefix_len..self.container_end]
    }

    /// container 以降の key-path（先頭の `/` は含まない）
    pub fn key(&self) -> &str {
        &self.raw[self.container_end + 1..]
    }

    /// key の末尾セグメント。`dir/` のように `/` で終わる場合は空文字列。
    pub fn basename(&self) -> &str {
        self.key().rsplit('/').next().unwrap_or_default()
    }

    /// basename の拡張子（小文字化はしない）
    pub fn extension(&self) -> Option<&str> {
        let name = self.basename();
        match name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => Some(ext),
            _ => None,
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.raw.fmt(f)
    }
}
