//! Scripted ports - テスト・開発用の台本どおりに動く実装
//!
//! # 含まれる実装
//! - **ScriptedRunner**: 応答を台本で返し、起動回数を数える
//! - **ScriptedPicker**: 選択・入力の答えを順番に返す
//! - **RecordingViewer**: open されたパスと内容を記録
//! - **RecordingNotifier**: 通知メッセージを記録

use std::collections::VecDeque;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::domain::{CommandSpec, ExitReason, ProcessError, TransferError, ViewerError};
use crate::ports::{ContentHint, Notifier, Picker, ProcessRunner, Sink, ViewHandle, Viewer};

/// What a scripted transfer writes and how it exits.
#[derive(Debug, Clone)]
pub struct StreamScript {
    pub chunks: Vec<Vec<u8>>,
    pub exit_code: i32,
    pub stderr: String,
}

impl StreamScript {
    pub fn success(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            chunks: vec![bytes.into()],
            exit_code: 0,
            stderr: String::new(),
        }
    }

    /// `partial` を書いた後に非ゼロで終了する
    pub fn failure(partial: impl Into<Vec<u8>>, exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            chunks: vec![partial.into()],
            exit_code,
            stderr: stderr.into(),
        }
    }

    pub fn with_chunk(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.chunks.push(bytes.into());
        self
    }
}

fn not_scripted(program: &str) -> ProcessError {
    ProcessError::Spawn {
        program: program.to_string(),
        source: io::Error::new(io::ErrorKind::NotFound, "no scripted response"),
    }
}

/// ScriptedRunner は subprocess を起動せずに台本の応答を返す
///
/// `spawn_count()` で「起動されたはずの回数」を確認できます。
#[derive(Default)]
pub struct ScriptedRunner {
    queries: Mutex<VecDeque<Result<Vec<u8>, ProcessError>>>,
    transfers: Mutex<VecDeque<StreamScript>>,
    calls: Mutex<Vec<CommandSpec>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_query(&self, stdout: impl Into<Vec<u8>>) -> &Self {
        self.queries.lock().unwrap().push_back(Ok(stdout.into()));
        self
    }

    pub fn push_query_error(&self, error: ProcessError) -> &Self {
        self.queries.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn push_transfer(&self, script: StreamScript) -> &Self {
        self.transfers.lock().unwrap().push_back(script);
        self
    }

    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.lock().unwrap().clone()
    }

    pub fn spawn_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn record(&self, command: &CommandSpec) {
        self.calls.lock().unwrap().push(command.clone());
    }
}

#[async_trait]
impl ProcessRunner for ScriptedRunner {
    async fn run(&self, command: &CommandSpec) -> Result<Vec<u8>, ProcessError> {
        self.record(command);
        let next = self.queries.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Err(not_scripted(&command.program)))
    }

    async fn stream(
        &self,
        command: &CommandSpec,
        sink: &mut Sink<'_>,
    ) -> Result<u64, TransferError> {
        self.record(command);
        let script = self.transfers.lock().unwrap().pop_front();
        let script = script.ok_or_else(|| not_scripted(&command.program))?;

        let mut written = 0u64;
        for chunk in &script.chunks {
            sink.write_all(chunk).await.map_err(TransferError::Sink)?;
            written += chunk.len() as u64;
        }
        let closed: io::Result<()> = async {
            sink.flush().await?;
            sink.shutdown().await
        }
        .await;

        if script.exit_code != 0 {
            return Err(TransferError::Exit {
                status: ExitReason(Some(script.exit_code)),
                stderr: script.stderr,
            });
        }
        closed.map_err(TransferError::Sink)?;
        Ok(written)
    }
}

/// One interaction the picker was asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerRequest {
    Pick { title: String, options: Vec<String> },
    Input { title: String },
}

/// ScriptedPicker は答えを順番に返す。答えが尽きたらキャンセル扱い。
#[derive(Default)]
pub struct ScriptedPicker {
    answers: Mutex<VecDeque<Option<String>>>,
    requests: Mutex<Vec<PickerRequest>>,
}

impl ScriptedPicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answering<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        let picker = Self::new();
        picker
            .answers
            .lock()
            .unwrap()
            .extend(answers.into_iter().map(|a| a.map(Into::into)));
        picker
    }

    pub fn requests(&self) -> Vec<PickerRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn next_answer(&self) -> Option<String> {
        self.answers.lock().unwrap().pop_front().flatten()
    }
}

#[async_trait]
impl Picker for ScriptedPicker {
    async fn pick(&self, title: &str, options: &[String]) -> Option<String> {
        self.requests.lock().unwrap().push(PickerRequest::Pick {
            title: title.to_string(),
            options: options.to_vec(),
        });
        self.next_answer()
    }

    async fn input(&self, title: &str, _placeholder: &str) -> Option<String> {
        self.requests.lock().unwrap().push(PickerRequest::Input {
            title: title.to_string(),
        });
        self.next_answer()
    }
}

/// A view the recording viewer was asked to open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenedView {
    pub path: PathBuf,
    pub hint: ContentHint,
    /// open 時点のファイル内容
    pub contents: Vec<u8>,
}

#[derive(Default)]
pub struct RecordingViewer {
    opened: Mutex<Vec<OpenedView>>,
    failure: Option<String>,
}

impl RecordingViewer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 常に失敗するビューア
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            opened: Mutex::default(),
            failure: Some(message.into()),
        }
    }

    pub fn opened(&self) -> Vec<OpenedView> {
        self.opened.lock().unwrap().clone()
    }
}

#[async_trait]
impl Viewer for RecordingViewer {
    async fn open(&self, path: &Path, hint: ContentHint) -> Result<ViewHandle, ViewerError> {
        if let Some(message) = &self.failure {
            return Err(ViewerError {
                path: path.to_path_buf(),
                message: message.clone(),
            });
        }
        let contents = tokio::fs::read(path).await.map_err(|e| ViewerError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        self.opened.lock().unwrap().push(OpenedView {
            path: path.to_path_buf(),
            hint,
            contents,
        });
        Ok(ViewHandle {
            path: path.to_path_buf(),
            hint,
        })
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    infos: Mutex<Vec<String>>,
    errors: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn infos(&self) -> Vec<String> {
        self.infos.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn info(&self, message: &str) {
        self.infos.lock().unwrap().push(message.to_string());
    }

    fn error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_runner_replays_queries_in_order() {
        let runner = ScriptedRunner::new();
        runner.push_query("first").push_query("second");

        let cmd = CommandSpec::new("aws");
        assert_eq!(runner.run(&cmd).await.unwrap(), b"first");
        assert_eq!(runner.run(&cmd).await.unwrap(), b"second");
        assert!(matches!(runner.run(&cmd).await, Err(ProcessError::Spawn { .. })));
        assert_eq!(runner.spawn_count(), 3);
    }

    #[tokio::test]
    async fn scripted_transfer_writes_chunks_before_failing() {
        let runner = ScriptedRunner::new();
        runner.push_transfer(StreamScript::failure("a,", 2, "Access Denied").with_chunk("b\n"));

        let mut sink = Vec::new();
        let err = runner
            .stream(&CommandSpec::new("aws"), &mut sink)
            .await
            .unwrap_err();
        assert_eq!(sink, b"a,b\n");
        assert_eq!(err.stderr(), Some("Access Denied"));
    }

    #[tokio::test]
    async fn picker_cancels_when_answers_run_out() {
        let picker = ScriptedPicker::answering([Some("b")]);
        let options = vec!["a".to_string(), "b".to_string()];
        assert_eq!(picker.pick("container", &options).await.as_deref(), Some("b"));
        assert_eq!(picker.input("locator", "s3://").await, None);
        assert_eq!(picker.requests().len(), 2);
    }
}
