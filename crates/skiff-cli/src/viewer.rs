//! CommandViewer - 外部コマンドでファイルを開く
//!
//! コマンドが無ければパスを stdout に出すだけです（パイプで他のツールに渡せる）。

use std::path::Path;

use async_trait::async_trait;
use skiff_core::domain::ViewerError;
use skiff_core::ports::{ContentHint, ViewHandle, Viewer};
use tokio::process::Command;

use crate::TRACING_TARGET_VIEWER;

/// 子プロセスに渡すコンテンツ種別の環境変数
pub const CONTENT_HINT_VAR: &str = "SKIFF_CONTENT_TYPE";

pub struct CommandViewer {
    command: Option<Vec<String>>,
}

impl CommandViewer {
    /// `command` は空白区切り（例: `"less -S"`）。ファイルパスは末尾に追加される。
    pub fn new(command: Option<&str>) -> Self {
        let command = command
            .map(|c| c.split_whitespace().map(str::to_string).collect::<Vec<_>>())
            .filter(|parts| !parts.is_empty());
        Self { command }
    }
}

#[async_trait]
impl Viewer for CommandViewer {
    async fn open(&self, path: &Path, hint: ContentHint) -> Result<ViewHandle, ViewerError> {
        let handle = ViewHandle {
            path: path.to_path_buf(),
            hint,
        };
        let Some((program, args)) = self.command.as_deref().and_then(<[String]>::split_first)
        else {
            println!("{}", path.display());
            return Ok(handle);
        };

        let mut command = Command::new(program);
        command.args(args).arg(path);
        if let Some(language) = hint.language_id() {
            command.env(CONTENT_HINT_VAR, language);
        }
        tracing::debug!(
            target: TRACING_TARGET_VIEWER,
            program = %program,
            path = %path.display(),
            "opening viewer"
        );

        let status = command.status().await.map_err(|e| ViewerError {
            path: path.to_path_buf(),
            message: format!("failed to start {program}: {e}"),
        })?;
        if !status.success() {
            return Err(ViewerError {
                path: path.to_path_buf(),
                message: format!("{program} exited with {status}"),
            });
        }
        Ok(handle)
    }
}
