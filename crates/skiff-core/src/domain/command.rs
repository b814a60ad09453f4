//! Command - subprocess の起動内容と、ストア CLI ごとの方言
//!
//! 論理コマンド（copy / list-containers / list-keys）を具体的な argv に
//! 変換するのは `StoreDialect` の責務です。既定は AWS CLI。

use std::fmt;

use super::config::RetrieveConfig;
use super::environment::TransferEnv;
use super::locator::{Locator, LocatorScheme};

/// One external command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub env: TransferEnv,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: TransferEnv::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, env: TransferEnv) -> Self {
        self.env = env;
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// StoreDialect はストア CLI の呼び出し方を決める
///
/// # 既定（AWS CLI）
/// - copy: `aws s3 cp <locator> - --no-progress --only-show-errors`
/// - list-containers: `aws s3api list-buckets --output json`
/// - list-keys: `aws s3api list-objects-v2 --bucket <name> --no-paginate --output json`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreDialect {
    pub program: String,
    pub scheme: LocatorScheme,
    pub profile_var: String,
    pub region_var: String,
}

impl StoreDialect {
    pub fn aws() -> Self {
        Self {
            program: "aws".to_string(),
            scheme: LocatorScheme::default(),
            profile_var: "AWS_PROFILE".to_string(),
            region_var: "AWS_REGION".to_string(),
        }
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn with_scheme(mut self, scheme: LocatorScheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// 設定から subprocess 用の環境変数を組み立てる
    pub fn environment(&self, config: &RetrieveConfig) -> TransferEnv {
        let mut env = TransferEnv::new();
        env.set_if_present(&self.profile_var, config.credential_profile.as_deref());
        env.set_if_present(&self.region_var, config.region.as_deref());
        env
    }

    /// stdout にオブジェクト本体を書き出すコマンド
    pub fn copy_to_stdout(&self, locator: &Locator, env: &TransferEnv) -> CommandSpec {
        CommandSpec::new(&self.program)
            .args(["s3", "cp", locator.as_str(), "-"])
            .args(["--no-progress", "--only-show-errors"])
            .env(env.clone())
    }

    pub fn list_containers(&self, env: &TransferEnv) -> CommandSpec {
        CommandSpec::new(&self.program)
            .args(["s3api", "list-buckets", "--output", "json"])
            .env(env.clone())
    }

    /// 1 ページ目だけを取る（`--no-paginate`）
    pub fn list_keys(&self, container: &str, env: &TransferEnv) -> CommandSpec {
        CommandSpec::new(&self.program)
            .args(["s3api", "list-objects-v2", "--bucket", container])
            .args(["--no-paginate", "--output", "json"])
            .env(env.clone())
    }
}

impl Default for StoreDialect {
    fn default() -> Self {
        Self::aws()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_command_streams_to_stdout() {
        let dialect = StoreDialect::aws();
        let locator = Locator::parse("s3://bucket1/data.csv", &dialect.scheme).unwrap();
        let cmd = dialect.copy_to_stdout(&locator, &TransferEnv::new());
        assert_eq!(
            cmd.to_string(),
            "aws s3 cp s3://bucket1/data.csv - --no-progress --only-show-errors"
        );
    }

    #[test]
    fn list_commands_request_json() {
        let dialect = StoreDialect::aws().with_program("/opt/aws/bin/aws");
        let env = TransferEnv::new();
        assert_eq!(
            dialect.list_containers(&env).to_string(),
            "/opt/aws/bin/aws s3api list-buckets --output json"
        );
        assert_eq!(
            dialect.list_keys("b", &env).args,
            vec![
                "s3api",
                "list-objects-v2",
                "--bucket",
                "b",
                "--no-paginate",
                "--output",
                "json"
            ]
        );
    }

    #[test]
    fn environment_uses_dialect_variable_names() {
        let config = RetrieveConfig {
            credential_profile: Some("dev".to_string()),
            region: Some(String::new()),
            ..Default::default()
        };
        let env = StoreDialect::aws().environment(&config);
        assert_eq!(env.get("AWS_PROFILE"), Some("dev"));
        assert_eq!(env.get("AWS_REGION"), None);
    }
}
