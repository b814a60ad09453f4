//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **TokioProcessRunner**: 本番用の ProcessRunner（tokio::process）
//! - **Scripted***: テスト・開発用の台本実装
//!
//! 端末向けの Picker / Viewer / Notifier は `skiff-cli` 側にあります。

pub mod scripted;
pub mod tokio_process;

pub use self::scripted::{
    OpenedView, PickerRequest, RecordingNotifier, RecordingViewer, ScriptedPicker,
    ScriptedRunner, StreamScript,
};
pub use self::tokio_process::TokioProcessRunner;
