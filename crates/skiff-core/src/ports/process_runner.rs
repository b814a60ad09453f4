//! ProcessRunner port - 外部 CLI の起動
//!
//! # 2 つの呼び出し方
//! - `run`: stdout を全てメモリに溜める（小さな JSON 応答専用）
//! - `stream`: stdout を sink に流し込む（オブジェクト本体用）
//!
//! # 実装
//! - **TokioProcessRunner**: tokio::process（本番用）
//! - **ScriptedRunner**: 応答を台本で返す（テスト用）

use async_trait::async_trait;
use tokio::io::AsyncWrite;

use crate::domain::{CommandSpec, ProcessError, TransferError};

/// Writable destination for streamed stdout.
pub type Sink<'a> = dyn AsyncWrite + Send + Unpin + 'a;

/// ProcessRunner は外部コマンドを実行する
///
/// 環境変数はホストプロセスのものを引き継ぎ、`CommandSpec::env` で上書きします
/// （キーが衝突したら上書き側が勝つ）。
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// stdout を全て読み込んで返す
    ///
    /// 非ゼロ終了は `ProcessError::Exit`（stderr 付き）、
    /// 起動失敗は `ProcessError::Spawn`。
    async fn run(&self, command: &CommandSpec) -> Result<Vec<u8>, ProcessError>;

    /// stdout を chunk ごとに `sink` へ書き込み、書けたバイト数を返す
    ///
    /// - 1 chunk を書き終えるまで次を読まない（backpressure）
    /// - sink への書き込みに失敗したら subprocess を kill してエラーを返す
    /// - 終了後に sink を flush / shutdown する
    /// - 非ゼロ終了は、書き込み済みのバイト数に関係なく `TransferError::Exit`
    async fn stream(
        &self,
        command: &CommandSpec,
        sink: &mut Sink<'_>,
    ) -> Result<u64, TransferError>;
}
