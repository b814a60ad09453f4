//! Notifier port - ユーザーへのメッセージ表示
//!
//! 成功時は一時的なステータス、失敗時はエラーメッセージを 1 つだけ出します。

pub trait Notifier: Send + Sync {
    fn info(&self, message: &str);

    fn error(&self, message: &str);
}
