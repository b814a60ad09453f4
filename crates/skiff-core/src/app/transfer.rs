//! ObjectTransfer - 1 オブジェクトをローカルファイルへストリーミング
//!
//! # 一時ファイルのライフサイクル
//! 1. 転送開始時に空ファイルを排他的に作成（`create_new`）
//! 2. chunk が届くたびに追記
//! 3. 失敗したら即削除（削除エラーは握りつぶす）
//! 4. 成功したら残す（呼び出し側・ビューアが使う）

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};
use ulid::Ulid;

use crate::domain::{Locator, RetrieveError, StoreDialect, TransferEnv, TransferError};
use crate::observability::TRACING_TARGET_TRANSFER;
use crate::ports::ProcessRunner;

const MAX_STEM_CHARS: usize = 96;
/// これより長い拡張子は拡張子として扱わない（ファイル名長の上限対策）
const MAX_EXTENSION_CHARS: usize = 16;

pub struct ObjectTransfer {
    runner: Arc<dyn ProcessRunner>,
    dialect: StoreDialect,
    temp_dir: PathBuf,
}

impl ObjectTransfer {
    pub fn new(runner: Arc<dyn ProcessRunner>, dialect: StoreDialect) -> Self {
        Self {
            runner,
            dialect,
            temp_dir: std::env::temp_dir(),
        }
    }

    pub fn with_temp_dir(mut self, temp_dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = temp_dir.into();
        self
    }

    /// `locator` を `destination` にダウンロードし、書き込んだバイト数を返す
    ///
    /// 失敗時は `destination` を削除してから元のエラーを返します。
    pub async fn fetch(
        &self,
        locator: &Locator,
        destination: &Path,
        env: &TransferEnv,
    ) -> Result<u64, TransferError> {
        let command = self.dialect.copy_to_stdout(locator, env);

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(destination)
            .await
            .map_err(|source| TransferError::Destination {
                path: destination.to_path_buf(),
                source,
            })?;

        match self.runner.stream(&command, &mut file).await {
            Ok(bytes) => {
                info!(
                    target: TRACING_TARGET_TRANSFER,
                    locator = %locator,
                    path = %destination.display(),
                    bytes,
                    "object downloaded"
                );
                Ok(bytes)
            }
            Err(err) => {
                // 書き込み中の操作を終わらせてから消す
                let _ = file.flush().await;
                drop(file);
                discard_partial(destination).await;
                Err(err)
            }
        }
    }

    /// 入力を検証し、一時ディレクトリのユニークなパスへダウンロードする
    ///
    /// 生の文字列を受け取る検証込みの入口です。検証に失敗した場合は subprocess を
    /// 起動しません。`Retriever` は検証と転送を別の状態として記録するので、
    /// `Locator::parse` の後に `fetch_locator_to_temp` を直接呼びます。
    pub async fn fetch_to_temp(
        &self,
        input: &str,
        env: &TransferEnv,
    ) -> Result<PathBuf, RetrieveError> {
        let locator = Locator::parse(input, &self.dialect.scheme)?;
        Ok(self.fetch_locator_to_temp(&locator, env).await?)
    }

    pub async fn fetch_locator_to_temp(
        &self,
        locator: &Locator,
        env: &TransferEnv,
    ) -> Result<PathBuf, TransferError> {
        let destination = temp_path_for(locator, &self.temp_dir);
        self.fetch(locator, &destination, env).await?;
        Ok(destination)
    }
}

/// `<stem>-<ULID>.<ext>` 形式の一時ファイルパス
///
/// 拡張子を末尾に残すので、ビューアの自動判定が効きます。
/// stem は 96 文字、拡張子は 16 文字までで、ファイル名は常に 255 バイトに収まる。
pub fn temp_path_for(locator: &Locator, dir: &Path) -> PathBuf {
    let name = sanitize(locator.basename());
    let (stem, ext) = match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => {
            (stem, (ext.len() <= MAX_EXTENSION_CHARS).then_some(ext))
        }
        _ => (name.as_str(), None),
    };
    let stem: String = stem.chars().take(MAX_STEM_CHARS).collect();
    let stem = if stem.is_empty() { "object".to_string() } else { stem };

    let suffix = Ulid::new();
    let file_name = match ext {
        Some(ext) => format!("{stem}-{suffix}.{ext}"),
        None => format!("{stem}-{suffix}"),
    };
    dir.join(file_name)
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

async fn discard_partial(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => debug!(
            target: TRACING_TARGET_TRANSFER,
            path = %path.display(),
            "removed partial download"
        ),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => debug!(
            target: TRACING_TARGET_TRANSFER,
            path = %path.display(),
            error = %err,
            "could not remove partial download"
        ),
    }
}
