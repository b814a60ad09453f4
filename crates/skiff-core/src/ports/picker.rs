//! Picker port - 対話的な選択・入力
//!
//! `None` はユーザーのキャンセルを表します（エラーではない）。

use async_trait::async_trait;

#[async_trait]
pub trait Picker: Send + Sync {
    /// `options` から 1 つ選ばせる
    async fn pick(&self, title: &str, options: &[String]) -> Option<String>;

    /// 自由入力。`placeholder` は入力例の表示用。
    async fn input(&self, title: &str, placeholder: &str) -> Option<String>;
}
