//! Terminal ports - stdin/stderr による選択と、console への通知

use async_trait::async_trait;
use skiff_core::ports::{Notifier, Picker};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stderr, Stdin};
use tokio::sync::Mutex;

use crate::TRACING_TARGET_TERMINAL;

#[derive(Debug, PartialEq, Eq)]
enum Choice {
    Cancel,
    Selected(String),
    Invalid,
}

/// 番号または選択肢そのものを受け付ける。空行はキャンセル。
fn parse_choice(line: &str, options: &[String]) -> Choice {
    let line = line.trim();
    if line.is_empty() {
        return Choice::Cancel;
    }
    if let Ok(n) = line.parse::<usize>() {
        return match n.checked_sub(1).and_then(|i| options.get(i)) {
            Some(option) => Choice::Selected(option.clone()),
            None => Choice::Invalid,
        };
    }
    match options.iter().find(|o| o.as_str() == line) {
        Some(option) => Choice::Selected(option.clone()),
        None => Choice::Invalid,
    }
}

/// TerminalPicker は選択肢を番号付きで出力し、1 行ずつ読む
///
/// EOF と空行はキャンセル扱いです。
pub struct TerminalPicker<R, W> {
    input: Mutex<R>,
    output: Mutex<W>,
}

impl TerminalPicker<BufReader<Stdin>, Stderr> {
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stderr())
    }
}

impl<R, W> TerminalPicker<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(input: R, output: W) -> Self {
        Self {
            input: Mutex::new(input),
            output: Mutex::new(output),
        }
    }

    async fn write(&self, text: &str) -> std::io::Result<()> {
        let mut output = self.output.lock().await;
        output.write_all(text.as_bytes()).await?;
        output.flush().await
    }

    /// `None` は EOF または読み込みエラー
    async fn read_line(&self) -> Option<String> {
        let mut line = String::new();
        match self.input.lock().await.read_line(&mut line).await {
            Ok(0) => None,
            Ok(_) => Some(line),
            Err(err) => {
                tracing::warn!(target: TRACING_TARGET_TERMINAL, error = %err, "failed to read input");
                None
            }
        }
    }

    async fn prompt(&self, text: &str) -> Option<String> {
        if let Err(err) = self.write(text).await {
            tracing::warn!(target: TRACING_TARGET_TERMINAL, error = %err, "failed to write prompt");
            return None;
        }
        self.read_line().await
    }
}

#[async_trait]
impl<R, W> Picker for TerminalPicker<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn pick(&self, title: &str, options: &[String]) -> Option<String> {
        let mut menu = format!("{title}:\n");
        for (i, option) in options.iter().enumerate() {
            menu.push_str(&format!("  {:>3}) {option}\n", i + 1));
        }
        let question = format!("Select 1-{} (empty to cancel): ", options.len());

        let mut text = menu;
        loop {
            text.push_str(&question);
            let line = self.prompt(&text).await?;
            match parse_choice(&line, options) {
                Choice::Selected(option) => return Some(option),
                Choice::Cancel => return None,
                Choice::Invalid => text = format!("Invalid choice: {}\n", line.trim()),
            }
        }
    }

    async fn input(&self, title: &str, placeholder: &str) -> Option<String> {
        let line = self.prompt(&format!("{title} (e.g. {placeholder}): ")).await?;
        let line = line.trim();
        (!line.is_empty()).then(|| line.to_string())
    }
}

/// 成功は stdout、失敗は stderr
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn info(&self, message: &str) {
        println!("{message}");
    }

    fn error(&self, message: &str) {
        eprintln!("Error: {message}");
    }
}
