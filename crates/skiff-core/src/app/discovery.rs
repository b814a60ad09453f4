//! Discovery - container と key の一覧取得
//!
//! どちらも buffered `run` による 1 回の問い合わせで、1 ページ目だけを見ます。

use std::sync::Arc;

use tracing::debug;

use crate::domain::{ContainerPage, DiscoveryError, KeyPage, StoreDialect, TransferEnv};
use crate::observability::TRACING_TARGET_DISCOVERY;
use crate::ports::ProcessRunner;

pub struct Discovery {
    runner: Arc<dyn ProcessRunner>,
    dialect: StoreDialect,
}

impl Discovery {
    pub fn new(runner: Arc<dyn ProcessRunner>, dialect: StoreDialect) -> Self {
        Self { runner, dialect }
    }

    /// container 名を応答順に返す
    pub async fn list_containers(&self, env: &TransferEnv) -> Result<Vec<String>, DiscoveryError> {
        const WHAT: &str = "containers";

        let stdout = self
            .runner
            .run(&self.dialect.list_containers(env))
            .await
            .map_err(|source| DiscoveryError::Query { what: WHAT, source })?;
        let names = ContainerPage::from_slice(&stdout)
            .map_err(|source| DiscoveryError::Decode { what: WHAT, source })?
            .into_names();

        debug!(target: TRACING_TARGET_DISCOVERY, count = names.len(), "listed containers");
        Ok(names)
    }

    /// `container` 内の key を返す。空の container なら空の Vec（エラーではない）。
    pub async fn list_keys(
        &self,
        container: &str,
        env: &TransferEnv,
    ) -> Result<Vec<String>, DiscoveryError> {
        const WHAT: &str = "keys";

        let stdout = self
            .runner
            .run(&self.dialect.list_keys(container, env))
            .await
            .map_err(|source| DiscoveryError::Query { what: WHAT, source })?;
        let keys = KeyPage::from_slice(&stdout)
            .map_err(|source| DiscoveryError::Decode { what: WHAT, source })?
            .into_keys();

        debug!(
            target: TRACING_TARGET_DISCOVERY,
            container,
            count = keys.len(),
            "listed keys"
        );
        Ok(keys)
    }
}
