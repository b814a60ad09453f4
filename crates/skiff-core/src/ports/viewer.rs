//! Viewer port - ローカルファイルの表示
//!
//! ビューアの自動判定が効かない場合に備えて、locator の拡張子から
//! `ContentHint` を渡します。

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::domain::{Locator, ViewerError};

/// Content-type hint passed along with the local path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentHint {
    /// ビューア側の自動判定に任せる
    Auto,
    /// 表形式データ（delimiter 付き）
    Tabular { delimiter: char },
}

impl ContentHint {
    pub fn for_locator(locator: &Locator) -> Self {
        match locator.extension().map(str::to_ascii_lowercase).as_deref() {
            Some("csv") => Self::Tabular { delimiter: ',' },
            Some("tsv") | Some("tab") => Self::Tabular { delimiter: '\t' },
            _ => Self::Auto,
        }
    }

    /// ビューアに渡す言語 ID 風の名前
    pub fn language_id(&self) -> Option<&'static str> {
        match self {
            Self::Auto => None,
            Self::Tabular { delimiter: '\t' } => Some("tsv"),
            Self::Tabular { .. } => Some("csv"),
        }
    }
}

/// Handle to an opened view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewHandle {
    pub path: PathBuf,
    pub hint: ContentHint,
}

#[async_trait]
pub trait Viewer: Send + Sync {
    async fn open(&self, path: &Path, hint: ContentHint) -> Result<ViewHandle, ViewerError>;
}
