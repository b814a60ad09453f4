//! RetrieverBuilder - Retriever の構築とワイヤリング
//!
//! # 学習ポイント
//! - Builder パターンの実装
//! - 起動時検証（Fail-fast 設計）
//! - 開発体験の改善（明確なエラーメッセージ）

use std::sync::Arc;

use crate::domain::{LocatorScheme, StoreDialect};
use crate::ports::{Notifier, Picker, ProcessRunner, Viewer};

use super::retriever::Retriever;

/// RetrieverBuilder は Retriever を構築
///
/// # 使用例
/// ```ignore
/// let retriever = RetrieverBuilder::new()
///     .runner(Arc::new(TokioProcessRunner::new()))
///     .picker(Arc::new(TerminalPicker::stdio()))
///     .viewer(Arc::new(CommandViewer::new(None)))
///     .notifier(Arc::new(ConsoleNotifier))
///     .build()?;
/// ```
///
/// # Fail-fast 設計
/// - 4 つの port が全て設定されているかを build() 時にチェック
/// - 不足があれば BuildError を返す
pub struct RetrieverBuilder {
    runner: Option<Arc<dyn ProcessRunner>>,
    picker: Option<Arc<dyn Picker>>,
    viewer: Option<Arc<dyn Viewer>>,
    notifier: Option<Arc<dyn Notifier>>,
    dialect: StoreDialect,
}

/// BuildError は Retriever 構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Missing ports: {0:?}. These ports must be wired before build().")]
    MissingPorts(Vec<&'static str>),
}

impl RetrieverBuilder {
    /// 新しい RetrieverBuilder を作成（方言は AWS CLI）
    pub fn new() -> Self {
        Self {
            runner: None,
            picker: None,
            viewer: None,
            notifier: None,
            dialect: StoreDialect::aws(),
        }
    }

    pub fn runner(mut self, runner: Arc<dyn ProcessRunner>) -> Self {
        self.runner = Some(runner);
        self
    }

    pub fn picker(mut self, picker: Arc<dyn Picker>) -> Self {
        self.picker = Some(picker);
        self
    }

    pub fn viewer(mut self, viewer: Arc<dyn Viewer>) -> Self {
        self.viewer = Some(viewer);
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn dialect(mut self, dialect: StoreDialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// 実行するストア CLI のパス（既定は `aws`）
    pub fn program(mut self, program: impl Into<String>) -> Self {
        self.dialect = self.dialect.with_program(program);
        self
    }

    pub fn scheme(mut self, scheme: LocatorScheme) -> Self {
        self.dialect = self.dialect.with_scheme(scheme);
        self
    }

    /// RetrieverBuilder を構築して Retriever を生成
    ///
    /// # 検証
    /// - runner / picker / viewer / notifier が全て設定されているかチェック
    /// - 不足があれば BuildError::MissingPorts を返す
    pub fn build(self) -> Result<Retriever, BuildError> {
        let mut missing_ports = Vec::new();
        if self.runner.is_none() {
            missing_ports.push("runner");
        }
        if self.picker.is_none() {
            missing_ports.push("picker");
        }
        if self.viewer.is_none() {
            missing_ports.push("viewer");
        }
        if self.notifier.is_none() {
            missing_ports.push("notifier");
        }

        match (self.runner, self.picker, self.viewer, self.notifier) {
            (Some(runner), Some(picker), Some(viewer), Some(notifier)) => Ok(Retriever::new(
                runner,
                picker,
                viewer,
                notifier,
                self.dialect,
            )),
            _ => Err(BuildError::MissingPorts(missing_ports)),
        }
    }
}

impl Default for RetrieverBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impls::{RecordingNotifier, RecordingViewer, ScriptedPicker, ScriptedRunner};

    #[test]
    fn test_build_success() {
        let retriever = RetrieverBuilder::new()
            .runner(Arc::new(ScriptedRunner::new()))
            .picker(Arc::new(ScriptedPicker::new()))
            .viewer(Arc::new(RecordingViewer::new()))
            .notifier(Arc::new(RecordingNotifier::new()))
            .scheme(LocatorScheme::new("store"))
            .program("/usr/local/bin/aws")
            .build()
            .unwrap();
        assert_eq!(retriever.dialect().scheme.as_str(), "store");
        assert_eq!(retriever.dialect().program, "/usr/local/bin/aws");
    }

    #[test]
    fn test_build_missing_ports() {
        let result = RetrieverBuilder::new()
            .runner(Arc::new(ScriptedRunner::new()))
            .notifier(Arc::new(RecordingNotifier::new()))
            .build();
        assert!(matches!(
            result,
            Err(BuildError::MissingPorts(missing)) if missing == vec!["picker", "viewer"]
        ));
    }

    #[test]
    fn test_build_reports_every_missing_port() {
        let err = RetrieverBuilder::default().build().err().unwrap();
        assert_eq!(
            err.to_string(),
            r#"Missing ports: ["runner", "picker", "viewer", "notifier"]. These ports must be wired before build()."#
        );
    }
}
