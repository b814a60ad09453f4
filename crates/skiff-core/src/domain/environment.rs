//! TransferEnv - subprocess に上書きする環境変数
//!
//! 呼び出しごとに設定から作り直します。未設定・空文字のフィールドは
//! 変数自体を省略します（空文字をセットしない）。

use std::collections::BTreeMap;

/// Environment overrides layered on top of the host process environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferEnv {
    vars: BTreeMap<String, String>,
}

impl TransferEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// 値が空白のみなら何もしない
    pub fn set_if_present(&mut self, name: impl Into<String>, value: Option<&str>) {
        if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
            self.vars.insert(name.into(), value.to_string());
        }
    }

    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}
