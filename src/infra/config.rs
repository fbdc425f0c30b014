use std::net::SocketAddr;
use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

/// サーバ設定。
/// 優先順位: 既定値 < inventory.toml < 環境変数 < コマンドライン引数。
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub data_file: PathBuf,
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3000,
            data_file: PathBuf::from("inventory.json"),
            static_dir: None,
        }
    }
}

impl Settings {
    /// `data_file_arg` はコマンドライン第1引数（あれば環境変数より優先）。
    pub fn load(data_file_arg: Option<String>) -> Result<Self, ConfigError> {
        Self::builder(File::with_name("inventory.toml"), data_file_arg)?
            .build()?
            .try_deserialize()
    }

    fn builder(
        file: File<config::FileSourceFile, FileFormat>,
        data_file_arg: Option<String>,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        let defaults = Self::default();
        Config::builder()
            .set_default("host", defaults.host)?
            .set_default("port", i64::from(defaults.port))?
            .set_default("data_file", defaults.data_file.to_string_lossy().into_owned())?
            .add_source(file.format(FileFormat::Toml).required(false))
            .add_source(Environment::default().try_parsing(true))
            .set_override_option("data_file", data_file_arg)
    }

    pub fn addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}
