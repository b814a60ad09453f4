//! Errors - エラー型と分類
//!
//! パイプラインの段階ごとにエラー型を分け、最上位の `RetrieveError` で束ねます。
//! ユーザーに見せるのは `Display` の 1 メッセージだけです（リトライはしない）。

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// ErrorKind はエラーの運用分類
///
/// - Validation: locator の構文エラー（subprocess は起動していない）
/// - Process: subprocess を起動できなかった
/// - Transfer: 転送中の失敗（非ゼロ終了、sink 書き込み失敗）
/// - Discovery: 一覧取得やデコードの失敗
/// - Viewer: ビューアでの表示に失敗
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Process,
    Transfer,
    Discovery,
    Viewer,
}

/// How a subprocess ended.
///
/// `None` means the process was terminated by a signal and has no exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitReason(pub Option<i32>);

impl ExitReason {
    pub fn code(&self) -> Option<i32> {
        self.0
    }
}

impl From<std::process::ExitStatus> for ExitReason {
    fn from(status: std::process::ExitStatus) -> Self {
        Self(status.code())
    }
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(code) => write!(f, "exit code {code}"),
            None => f.write_str("termination by signal"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("locator is empty")]
    Empty,

    #[error("locator must start with `{expected}`: {input}")]
    MissingScheme { expected: String, input: String },

    #[error("locator has no container: {0}")]
    MissingContainer(String),

    #[error("locator has no object key: {0}")]
    MissingKey(String),
}

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("`{program}` failed with {status}: {stderr}")]
    Exit {
        program: String,
        status: ExitReason,
        stderr: String,
    },

    #[error("i/o error while running `{program}`: {source}")]
    Io {
        program: String,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Error)]
pub enum TransferError {
    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error("transfer failed with {status}: {stderr}")]
    Exit { status: ExitReason, stderr: String },

    #[error("failed to read transfer output: {0}")]
    Pipe(#[source] io::Error),

    #[error("failed to write local file: {0}")]
    Sink(#[source] io::Error),

    #[error("failed to create {}: {source}", path.display())]
    Destination {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl TransferError {
    /// subprocess の stderr（あれば）
    pub fn stderr(&self) -> Option<&str> {
        match self {
            Self::Exit { stderr, .. } => Some(stderr),
            Self::Process(ProcessError::Exit { stderr, .. }) => Some(stderr),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("failed to list {what}: {source}")]
    Query {
        what: &'static str,
        #[source]
        source: ProcessError,
    },

    #[error("unexpected {what} listing: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
#[error("viewer could not open {}: {message}", path.display())]
pub struct ViewerError {
    pub path: PathBuf,
    pub message: String,
}

/// RetrieveError は取得フロー全体のエラー
#[derive(Debug, Error)]
pub enum RetrieveError {
    #[error("invalid locator: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Transfer(#[from] TransferError),

    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error(transparent)]
    Viewer(#[from] ViewerError),
}

impl RetrieveError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Transfer(TransferError::Process(ProcessError::Spawn { .. })) => {
                ErrorKind::Process
            }
            Self::Transfer(_) => ErrorKind::Transfer,
            Self::Discovery(DiscoveryError::Query {
                source: ProcessError::Spawn { .. },
                ..
            }) => ErrorKind::Process,
            Self::Discovery(_) => ErrorKind::Discovery,
            Self::Viewer(_) => ErrorKind::Viewer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transfer_exit_message_carries_stderr() {
        let err = RetrieveError::from(TransferError::Exit {
            status: ExitReason(Some(2)),
            stderr: "Access Denied".to_string(),
        });
        assert_eq!(err.kind(), ErrorKind::Transfer);
        assert_eq!(err.to_string(), "transfer failed with exit code 2: Access Denied");
    }

    #[test]
    fn spawn_failure_is_classified_as_process() {
        let spawn = || ProcessError::Spawn {
            program: "aws".to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };

        let err = RetrieveError::from(TransferError::from(spawn()));
        assert_eq!(err.kind(), ErrorKind::Process);
        assert!(err.to_string().contains("failed to start `aws`"));

        let err = RetrieveError::from(DiscoveryError::Query {
            what: "containers",
            source: spawn(),
        });
        assert_eq!(err.kind(), ErrorKind::Process);
    }

    #[test]
    fn validation_message_is_descriptive() {
        let err = RetrieveError::from(ValidationError::Empty);
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.to_string(), "invalid locator: locator is empty");
    }

    #[test]
    fn signal_exit_has_no_code() {
        assert_eq!(ExitReason(None).to_string(), "termination by signal");
        assert_eq!(ExitReason(Some(1)).code(), Some(1));
    }
}
