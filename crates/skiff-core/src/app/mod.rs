//! App - アプリケーション層
//!
//! このモジュールは、ports を組み合わせて取得フローを実装します。
//!
//! # 主要コンポーネント
//! - **RetrieverBuilder**: Retriever の構築とワイヤリング
//! - **Retriever**: locator 解決 → 転送 → 表示のオーケストレーション
//! - **ObjectTransfer**: 1 オブジェクトのストリーミングダウンロード
//! - **Discovery**: container / key の一覧取得

pub mod builder;
pub mod discovery;
pub mod retriever;
pub mod transfer;

// 主要な型を再エクスポート
pub use self::builder::{BuildError, RetrieverBuilder};
pub use self::discovery::Discovery;
pub use self::retriever::{RetrieveOutcome, Retriever};
pub use self::transfer::{ObjectTransfer, temp_path_for};
