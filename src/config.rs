use crate::error::{MapperError, Result};
use crate::hierarchy::SourceFormat;
use nadana_map_common::DEFAULT_TOP_K;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 参照テーブルのパスを上書きする環境変数
pub const ENV_REFERENCE: &str = "NADANA_REFERENCE";
/// 取得件数を上書きする環境変数
pub const ENV_TOP_K: &str = "NADANA_TOP_K";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 参照テーブルのパス（未設定なら同梱サンプル）
    pub reference_path: Option<PathBuf>,
    pub source_format: SourceFormat,
    pub top_k: usize,
    /// CMS order file のヘッダ行（請求不可コード）を除外
    pub billable_only: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reference_path: None,
            source_format: SourceFormat::Csv,
            top_k: DEFAULT_TOP_K,
            billable_only: false,
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
            .ok_or_else(|| MapperError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("nadana-map").join("config.json"))
    }

    /// 参照テーブルのパス（環境変数を優先）
    pub fn reference_path(&self) -> Option<PathBuf> {
        match std::env::var(ENV_REFERENCE) {
            Ok(path) if !path.trim().is_empty() => Some(PathBuf::from(path)),
            _ => self.reference_path.clone(),
        }
    }

    /// 取得件数（環境変数を優先）
    pub fn top_k(&self) -> Result<usize> {
        match std::env::var(ENV_TOP_K) {
            Ok(value) => parse_top_k(&value),
            Err(_) => Ok(self.top_k),
        }
    }

    pub fn set_reference(&mut self, path: PathBuf) -> Result<()> {
        if !path.exists() {
            return Err(MapperError::FileNotFound(path.display().to_string()));
        }
        self.reference_path = Some(path);
        Ok(())
    }

    pub fn set_top_k(&mut self, top_k: usize) -> Result<()> {
        if top_k == 0 {
            return Err(MapperError::Config("top_k は1以上を指定してください".into()));
        }
        self.top_k = top_k;
        Ok(())
    }
}

fn parse_top_k(value: &str) -> Result<usize> {
    match value.trim().parse::<usize>() {
        Ok(k) if k >= 1 => Ok(k),
        _ => Err(MapperError::Config(format!(
            "{} が不正です: {:?}（1以上の整数）",
            ENV_TOP_K, value
        ))),
    }
}
