//! Ports - 抽象化レイヤー
//!
//! 取得パイプラインが外部に依存する部分（ストア CLI、ビューア、
//! 選択 UI、通知）を trait として切り出します。
//! 実装は `impls`（本番用・テスト用）と `skiff-cli` にあります。

pub mod notifier;
pub mod picker;
pub mod process_runner;
pub mod viewer;

pub use self::notifier::Notifier;
pub use self::picker::Picker;
pub use self::process_runner::{ProcessRunner, Sink};
pub use self::viewer::{ContentHint, ViewHandle, Viewer};
