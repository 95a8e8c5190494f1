use crate::cli::ExportFormat;
use crate::error::{GlassEstimateError, Result};
use glass_estimate_common::layout::{DEFAULT_SHOP_NAME, DEFAULT_TERMS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// データ保存先を上書きする環境変数
pub const DATA_DIR_ENV: &str = "GLASS_ESTIMATE_DATA_DIR";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 見積書データの保存先（未設定ならOS標準のデータディレクトリ）
    pub data_dir: Option<PathBuf>,
    /// PDF見出しに入る店名
    pub shop_name: String,
    /// 画面表示用の通貨記号
    pub currency_symbol: String,
    /// 約款
    pub terms: Vec<String>,
    pub default_export_format: ExportFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            shop_name: DEFAULT_SHOP_NAME.into(),
            currency_symbol: "₹".into(),
            terms: DEFAULT_TERMS.iter().map(|t| t.to_string()).collect(),
            default_export_format: ExportFormat::Pdf,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            tracing::debug!(path = %config_path.display(), "config loaded");
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| GlassEstimateError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("glass-estimate").join("config.json"))
    }

    /// データ保存先を決める
    ///
    /// 優先順: コマンドライン引数 > 環境変数 > 設定ファイル > OS標準
    pub fn resolve_data_dir(&self, cli_override: Option<&Path>) -> Result<PathBuf> {
        if let Some(dir) = cli_override {
            return Ok(dir.to_path_buf());
        }

        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            if !dir.trim().is_empty() {
                return Ok(PathBuf::from(dir));
            }
        }

        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }

        let base = dirs::data_dir()
            .ok_or_else(|| GlassEstimateError::Config("データディレクトリが見つかりません".into()))?;
        Ok(base.join("glass-estimate"))
    }
}
