//! CLI configuration.
//!
//! 優先順位（高い順）:
//! 1. コマンドライン引数
//! 2. `SKIFF_*` 環境変数
//! 3. `--config` の JSON ファイル
//! 4. 既定値
//!
//! ```bash
//! skiff s3://bucket/path/to/file.csv --profile dev
//! SKIFF_PROFILE=dev skiff --browse
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use skiff_core::domain::{InteractiveMode, LocatorScheme, RetrieveConfig};

use crate::TRACING_TARGET_CONFIG;

#[derive(Debug, Clone, Parser)]
#[command(name = "skiff")]
#[command(about = "Fetch one object from an object store and open it locally")]
#[command(version)]
pub struct Cli {
    /// Object locator, e.g. `s3://bucket/path/to/file.csv`.
    ///
    /// 省略時は default locator、それも無ければ対話で決めます。
    #[arg(value_name = "LOCATOR")]
    pub locator: Option<String>,

    /// JSON configuration file (camelCase keys).
    #[arg(long, env = "SKIFF_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Locator used when none is given on the command line.
    #[arg(long, env = "SKIFF_DEFAULT_LOCATOR")]
    pub default_locator: Option<String>,

    /// Credential profile passed to the store client.
    #[arg(long, env = "SKIFF_PROFILE")]
    pub profile: Option<String>,

    /// Region passed to the store client.
    #[arg(long, env = "SKIFF_REGION")]
    pub region: Option<String>,

    /// Browse containers and keys instead of typing a locator.
    #[arg(long)]
    pub browse: bool,

    /// Directory for downloaded files.
    #[arg(long, env = "SKIFF_TEMP_DIR", value_name = "DIR")]
    pub temp_dir: Option<PathBuf>,

    /// Store client executable.
    #[arg(long, env = "SKIFF_PROGRAM", default_value = "aws")]
    pub program: String,

    /// Locator scheme accepted by the store client.
    #[arg(long, env = "SKIFF_SCHEME", default_value = "s3")]
    pub scheme: String,

    /// Command used to open the downloaded file; the path is appended.
    ///
    /// 省略時はパスを stdout に出すだけ。
    #[arg(long, env = "SKIFF_VIEWER")]
    pub viewer: Option<String>,

    /// Behave like a host startup hook: run only if `autoRunOnStartup` is set.
    #[arg(long)]
    pub startup: bool,
}

impl Cli {
    /// 設定ファイルを読み、引数で上書きした RetrieveConfig を返す
    pub fn retrieve_config(&self) -> anyhow::Result<RetrieveConfig> {
        let mut config = match &self.config {
            Some(path) => RetrieveConfig::from_json_file(path)
                .with_context(|| format!("failed to load configuration from {}", path.display()))?,
            None => RetrieveConfig::default(),
        };

        if let Some(locator) = &self.default_locator {
            config.default_locator = Some(locator.clone());
        }
        if let Some(profile) = &self.profile {
            config.credential_profile = Some(profile.clone());
        }
        if let Some(region) = &self.region {
            config.region = Some(region.clone());
        }
        if let Some(temp_dir) = &self.temp_dir {
            config.temp_dir = Some(temp_dir.clone());
        }
        if self.browse {
            config.interactive = InteractiveMode::Discover;
        }

        tracing::debug!(
            target: TRACING_TARGET_CONFIG,
            default_locator = ?config.default_locator(),
            profile = ?config.credential_profile,
            region = ?config.region,
            interactive = ?config.interactive,
            auto_run_on_startup = config.auto_run_on_startup,
            "resolved configuration"
        );
        Ok(config)
    }

    pub fn scheme(&self) -> LocatorScheme {
        LocatorScheme::new(self.scheme.as_str())
    }
}
