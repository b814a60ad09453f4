//! Retriever - 取得フローのオーケストレーション
//!
//! # フロー
//! 1. locator を解決（引数 → 設定の既定値 → 対話）
//! 2. 一時ファイルへ転送
//! 3. ビューアで開く
//! 4. 成功を通知
//!
//! 失敗はユーザーに 1 メッセージだけ表示して終了します（リトライなし）。
//! キャンセルはエラーではなく、Idle に戻るだけです。

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::{
    InteractiveMode, Locator, RetrievalState, RetrieveConfig, RetrieveError, StoreDialect,
    TransferEnv,
};
use crate::observability::TRACING_TARGET_RETRIEVE;
use crate::ports::{ContentHint, Notifier, Picker, ProcessRunner, ViewHandle, Viewer};

use super::discovery::Discovery;
use super::transfer::ObjectTransfer;

/// Result of one `retrieve` call that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetrieveOutcome {
    Opened {
        locator: Locator,
        path: PathBuf,
        view: ViewHandle,
    },
    Cancelled,
}

impl RetrieveOutcome {
    /// フロー終了時の状態（Done または Idle）
    pub fn state(&self) -> RetrievalState {
        match self {
            Self::Opened { .. } => RetrievalState::Done,
            Self::Cancelled => RetrievalState::Idle,
        }
    }
}

/// 状態遷移を記録するだけの小さなヘルパー
struct Flow {
    state: RetrievalState,
}

impl Flow {
    fn new() -> Self {
        Self {
            state: RetrievalState::Idle,
        }
    }

    fn advance(&mut self, next: RetrievalState) {
        debug_assert!(!self.state.is_terminal(), "flow already finished in {}", self.state);
        debug_assert!(
            self.state.can_advance_to(next),
            "invalid transition {} -> {}",
            self.state,
            next
        );
        debug!(target: TRACING_TARGET_RETRIEVE, from = %self.state, to = %next, "state changed");
        self.state = next;
    }
}

pub struct Retriever {
    runner: Arc<dyn ProcessRunner>,
    picker: Arc<dyn Picker>,
    viewer: Arc<dyn Viewer>,
    notifier: Arc<dyn Notifier>,
    dialect: StoreDialect,
}

impl Retriever {
    pub fn new(
        runner: Arc<dyn ProcessRunner>,
        picker: Arc<dyn Picker>,
        viewer: Arc<dyn Viewer>,
        notifier: Arc<dyn Notifier>,
        dialect: StoreDialect,
    ) -> Self {
        Self {
            runner,
            picker,
            viewer,
            notifier,
            dialect,
        }
    }

    pub fn dialect(&self) -> &StoreDialect {
        &self.dialect
    }

    /// Retrieve one object and open it in the viewer.
    ///
    /// `locator` が空なら `config` の既定値、それも無ければ対話で決めます。
    pub async fn retrieve(
        &self,
        locator: Option<&str>,
        config: &RetrieveConfig,
    ) -> Result<RetrieveOutcome, RetrieveError> {
        let mut flow = Flow::new();
        flow.advance(RetrievalState::ResolvingLocator);

        let env = self.dialect.environment(config);
        let raw = match self.resolve_locator(locator, config, &env).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                flow.advance(RetrievalState::Idle);
                debug!(target: TRACING_TARGET_RETRIEVE, "retrieval cancelled by user");
                return Ok(RetrieveOutcome::Cancelled);
            }
            Err(err) => return Err(self.fail(&mut flow, err)),
        };
        let locator = match Locator::parse(&raw, &self.dialect.scheme) {
            Ok(locator) => locator,
            Err(err) => return Err(self.fail(&mut flow, err.into())),
        };

        flow.advance(RetrievalState::Transferring);
        let transfer = ObjectTransfer::new(self.runner.clone(), self.dialect.clone())
            .with_temp_dir(config.temp_dir());
        let path = match transfer.fetch_locator_to_temp(&locator, &env).await {
            Ok(path) => path,
            Err(err) => return Err(self.fail(&mut flow, err.into())),
        };

        flow.advance(RetrievalState::Opening);
        let hint = ContentHint::for_locator(&locator);
        let view = match self.viewer.open(&path, hint).await {
            Ok(view) => view,
            Err(err) => return Err(self.fail(&mut flow, err.into())),
        };

        flow.advance(RetrievalState::Done);
        self.notifier.info(&format!("Opened {locator}"));
        Ok(RetrieveOutcome::Opened {
            locator,
            path,
            view,
        })
    }

    /// ホスト起動時のフック
    ///
    /// `auto_run_on_startup` が true のときだけ一度実行し、エラーは呼び出し側に返さない。
    pub async fn run_on_startup(&self, config: &RetrieveConfig) -> Option<RetrieveOutcome> {
        if !config.auto_run_on_startup {
            return None;
        }
        match self.retrieve(None, config).await {
            Ok(outcome) => Some(outcome),
            Err(err) => {
                debug!(target: TRACING_TARGET_RETRIEVE, error = %err, "startup retrieval failed");
                None
            }
        }
    }

    /// `Ok(None)` はキャンセル
    async fn resolve_locator(
        &self,
        explicit: Option<&str>,
        config: &RetrieveConfig,
        env: &TransferEnv,
    ) -> Result<Option<String>, RetrieveError> {
        if let Some(explicit) = explicit.map(str::trim).filter(|s| !s.is_empty()) {
            return Ok(Some(explicit.to_string()));
        }
        if let Some(default) = config.default_locator() {
            debug!(target: TRACING_TARGET_RETRIEVE, locator = default, "using configured default");
            return Ok(Some(default.to_string()));
        }

        match config.interactive {
            InteractiveMode::Prompt => {
                let placeholder = format!("{}bucket/path/to/file.csv", self.dialect.scheme.prefix());
                let entered = self.picker.input("Object locator", &placeholder).await;
                Ok(entered
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty()))
            }
            InteractiveMode::Discover => self.discover(env).await,
        }
    }

    async fn discover(&self, env: &TransferEnv) -> Result<Option<String>, RetrieveError> {
        let discovery = Discovery::new(self.runner.clone(), self.dialect.clone());

        let containers = discovery.list_containers(env).await?;
        if containers.is_empty() {
            self.notifier.info("No containers found");
            return Ok(None);
        }
        let Some(container) = self.picker.pick("Select a container", &containers).await else {
            return Ok(None);
        };

        let keys = discovery.list_keys(&container, env).await?;
        if keys.is_empty() {
            self.notifier.info(&format!("No objects found in {container}"));
            return Ok(None);
        }
        let Some(key) = self.picker.pick("Select an object", &keys).await else {
            return Ok(None);
        };

        Ok(Some(self.dialect.scheme.locator_for(&container, &key)))
    }

    fn fail(&self, flow: &mut Flow, err: RetrieveError) -> RetrieveError {
        flow.advance(RetrievalState::Failed);
        warn!(
            target: TRACING_TARGET_RETRIEVE,
            kind = ?err.kind(),
            error = %err,
            "retrieval failed"
        );
        self.notifier.error(&err.to_string());
        err
    }
}
