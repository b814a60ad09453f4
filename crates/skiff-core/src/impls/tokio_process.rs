//! TokioProcessRunner - tokio::process による ProcessRunner 実装
//!
//! # 学習ポイント
//! - stdout を chunk 単位で読み、sink に書き終えてから次を読む（backpressure）
//! - stderr は別タスクで drain する（pipe が詰まって子プロセスが止まらないように）
//! - `kill_on_drop(true)`: future が drop されたら子プロセスも kill される

use std::io;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::domain::{CommandSpec, ExitReason, ProcessError, TransferError};
use crate::observability::TRACING_TARGET_PROCESS;
use crate::ports::{ProcessRunner, Sink};

const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Spawns real subprocesses, one per call.
#[derive(Debug, Clone)]
pub struct TokioProcessRunner {
    chunk_size: usize,
}

impl TokioProcessRunner {
    pub fn new() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// pipe から一度に読む最大バイト数
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
        }
    }

    fn spawn(spec: &CommandSpec) -> Result<Child, ProcessError> {
        Command::new(&spec.program)
            .args(&spec.args)
            .envs(spec.env.iter())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ProcessError::Spawn {
                program: spec.program.clone(),
                source,
            })
    }
}

impl Default for TokioProcessRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn run(&self, command: &CommandSpec) -> Result<Vec<u8>, ProcessError> {
        debug!(
            target: TRACING_TARGET_PROCESS,
            command = %command,
            env_overrides = command.env.len(),
            "running query"
        );

        let child = Self::spawn(command)?;
        let output = child
            .wait_with_output()
            .await
            .map_err(|source| ProcessError::Io {
                program: command.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ProcessError::Exit {
                program: command.program.clone(),
                status: output.status.into(),
                stderr: stderr_text(&output.stderr),
            });
        }

        debug!(
            target: TRACING_TARGET_PROCESS,
            program = %command.program,
            bytes = output.stdout.len(),
            "query finished"
        );
        Ok(output.stdout)
    }

    async fn stream(
        &self,
        command: &CommandSpec,
        sink: &mut Sink<'_>,
    ) -> Result<u64, TransferError> {
        debug!(
            target: TRACING_TARGET_PROCESS,
            command = %command,
            env_overrides = command.env.len(),
            "starting transfer"
        );

        let mut child = Self::spawn(command)?;
        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| TransferError::Pipe(io::Error::other("stdout was not captured")))?;
        let stderr_task = child.stderr.take().map(drain_stderr);

        let written = match pump(&mut stdout, sink, self.chunk_size).await {
            Ok(written) => written,
            Err(err) => {
                warn!(
                    target: TRACING_TARGET_PROCESS,
                    program = %command.program,
                    error = %err,
                    "transfer aborted, killing subprocess"
                );
                if let Err(kill_err) = child.start_kill() {
                    debug!(target: TRACING_TARGET_PROCESS, error = %kill_err, "kill failed");
                }
                let _ = child.wait().await;
                if let Some(task) = stderr_task {
                    task.abort();
                }
                return Err(err);
            }
        };
        drop(stdout);

        let status = child.wait().await.map_err(TransferError::Pipe)?;
        let stderr = match stderr_task {
            Some(task) => task.await.unwrap_or_default(),
            None => String::new(),
        };
        let closed = close(sink).await;

        if !status.success() {
            return Err(TransferError::Exit {
                status: ExitReason::from(status),
                stderr,
            });
        }
        closed.map_err(TransferError::Sink)?;

        debug!(
            target: TRACING_TARGET_PROCESS,
            program = %command.program,
            bytes = written,
            "transfer finished"
        );
        Ok(written)
    }
}

/// pipe → sink の順次コピー。1 chunk ずつ書き終えてから次を読む。
async fn pump<R>(reader: &mut R, sink: &mut Sink<'_>, chunk_size: usize) -> Result<u64, TransferError>
where
    R: AsyncRead + Unpin,
{
    let mut buf = vec![0u8; chunk_size];
    let mut written = 0u64;
    loop {
        let n = reader.read(&mut buf).await.map_err(TransferError::Pipe)?;
        if n == 0 {
            return Ok(written);
        }
        sink.write_all(&buf[..n]).await.map_err(TransferError::Sink)?;
        written += n as u64;
    }
}

async fn close(sink: &mut Sink<'_>) -> io::Result<()> {
    sink.flush().await?;
    sink.shutdown().await
}

fn drain_stderr<R>(mut stderr: R) -> JoinHandle<String>
where
    R: AsyncRead + Send + Unpin + 'static,
{
    tokio::spawn(async move {
        let mut buf = Vec::new();
        // 読み切れなかった分は診断用テキストから落ちるだけ
        let _ = stderr.read_to_end(&mut buf).await;
        stderr_text(&buf)
    })
}

fn stderr_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).trim().to_string()
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use std::time::Duration;

    use tokio::io::AsyncWrite;

    use crate::domain::TransferEnv;

    fn sh(script: &str) -> CommandSpec {
        CommandSpec::new("sh").arg("-c").arg(script)
    }

    /// 書き込みを常に失敗させる sink
    struct BrokenSink;

    impl AsyncWrite for BrokenSink {
        fn poll_write(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            _buf: &[u8],
        ) -> Poll<io::Result<usize>> {
            Poll::Ready(Err(io::Error::other("disk full")))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    #[tokio::test]
    async fn run_returns_stdout() {
        let runner = TokioProcessRunner::new();
        let out = runner.run(&sh(r#"printf '{"Buckets":[]}'"#)).await.unwrap();
        assert_eq!(out, br#"{"Buckets":[]}"#);
    }

    #[tokio::test]
    async fn run_reports_exit_status_and_stderr() {
        let runner = TokioProcessRunner::new();
        let err = runner.run(&sh("echo boom >&2; exit 3")).await.unwrap_err();
        match err {
            ProcessError::Exit { status, stderr, .. } => {
                assert_eq!(status.code(), Some(3));
                assert_eq!(stderr, "boom");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn missing_binary_is_a_spawn_failure() {
        let runner = TokioProcessRunner::new();
        let err = runner
            .run(&CommandSpec::new("skiff-test-no-such-binary"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProcessError::Spawn { .. }));

        let mut sink = Vec::new();
        let err = runner
            .stream(&CommandSpec::new("skiff-test-no-such-binary"), &mut sink)
            .await
            .unwrap_err();
        assert!(matches!(err, TransferError::Process(ProcessError::Spawn { .. })));
    }

    #[tokio::test]
    async fn env_overrides_win_over_inherited_values() {
        let runner = TokioProcessRunner::new();
        let env = TransferEnv::new().with_var("HOME", "/skiff-home");
        let out = runner
            .run(&sh(r#"printf %s "$HOME""#).env(env))
            .await
            .unwrap();
        assert_eq!(out, b"/skiff-home");
    }

    #[tokio::test]
    async fn stream_writes_every_byte_in_order() {
        let runner = TokioProcessRunner::with_chunk_size(3);
        let mut sink = Vec::new();
        let written = runner
            .stream(&sh(r#"printf 'a,b\n1,2\n'; printf '3,4\n'"#), &mut sink)
            .await
            .unwrap();
        assert_eq!(written, 12);
        assert_eq!(sink, b"a,b\n1,2\n3,4\n");
    }

    #[tokio::test]
    async fn stream_fails_on_non_zero_exit_after_partial_output() {
        let runner = TokioProcessRunner::new();
        let mut sink = Vec::new();
        let err = runner
            .stream(&sh(r#"printf 'a,b\n'; echo 'Access Denied' >&2; exit 2"#), &mut sink)
            .await
            .unwrap_err();

        assert_eq!(sink, b"a,b\n");
        assert_eq!(err.stderr(), Some("Access Denied"));
        assert!(matches!(err, TransferError::Exit { status, .. } if status.code() == Some(2)));
    }

    #[tokio::test]
    async fn sink_failure_kills_the_producer() {
        let runner = TokioProcessRunner::new();
        let mut sink = BrokenSink;
        // `yes` は止めない限り終わらないので、kill されなければ timeout する
        let result = tokio::time::timeout(
            Duration::from_secs(10),
            runner.stream(&CommandSpec::new("yes"), &mut sink),
        )
        .await
        .expect("subprocess was not killed");

        let err = result.unwrap_err();
        assert!(matches!(err, TransferError::Sink(_)));
        assert!(err.to_string().contains("disk full"));
    }
}
