//! 起動時の照合コンテキスト構築
//!
//! 設定・環境変数・CLI引数から参照テーブルの場所を決め、
//! 階層ソースを読み込んで LookupContext を一度だけ作る。

use crate::config::Config;
use crate::error::Result;
use crate::hierarchy::{build_reference_table, open_source, CodeHierarchy, SourceFormat};
use indicatif::{ProgressBar, ProgressStyle};
use nadana_map_common::{LookupContext, LookupOptions, MatchKey, Normalizer};
use std::path::PathBuf;
use std::time::Duration;

/// 参照テーブルの読み込み設定
#[derive(Debug, Clone, Default)]
pub struct SourceSettings {
    /// None なら同梱サンプル
    pub path: Option<PathBuf>,
    pub format: SourceFormat,
    pub billable_only: bool,
    pub raw: bool,
    pub top_k: usize,
}

impl SourceSettings {
    /// CLI引数 > 環境変数 > 設定ファイル の順で決定
    pub fn resolve(
        config: &Config,
        reference: Option<PathBuf>,
        format: Option<SourceFormat>,
        billable_only: bool,
        raw: bool,
    ) -> Result<Self> {
        Ok(Self {
            path: reference.or_else(|| config.reference_path()),
            format: format.unwrap_or(config.source_format),
            billable_only: billable_only || config.billable_only,
            raw,
            top_k: config.top_k()?,
        })
    }
}

/// 階層ソースを開く
pub fn open(settings: &SourceSettings) -> Result<Box<dyn CodeHierarchy>> {
    open_source(settings.path.as_deref(), settings.format, settings.billable_only)
}

/// 照合コンテキストを構築
///
/// 参照テーブルが用意できなければエラー（部分的な起動はしない）。
pub fn build(source: &dyn CodeHierarchy, settings: &SourceSettings) -> Result<LookupContext> {
    let normalizer = Normalizer::default();
    let table = build_reference_table(source, &normalizer)?;

    let options = LookupOptions {
        top_k: settings.top_k,
        key: if settings.raw { MatchKey::Raw } else { MatchKey::Normalized },
    };

    Ok(LookupContext::new(table, normalizer, options))
}

/// スピナーを表示しながら読み込み
pub fn load_with_progress(settings: &SourceSettings) -> Result<(Box<dyn CodeHierarchy>, LookupContext)> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message("参照テーブルを読み込み中...");

    let loaded = open(settings).and_then(|source| {
        let context = build(source.as_ref(), settings)?;
        Ok((source, context))
    });

    match &loaded {
        Ok((source, context)) => spinner.finish_with_message(format!(
            "✔ {}件のコードを読み込み ({})",
            context.table().len(),
            source.name()
        )),
        Err(_) => spinner.finish_and_clear(),
    }

    loaded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_cli_overrides_config() {
        let config = Config {
            reference_path: Some(PathBuf::from("config.csv")),
            source_format: SourceFormat::Csv,
            top_k: 4,
            billable_only: false,
        };
        let settings = SourceSettings::resolve(
            &config,
            Some(PathBuf::from("cli.txt")),
            Some(SourceFormat::CmsOrder),
            true,
            false,
        )
        .unwrap();

        assert_eq!(settings.path, Some(PathBuf::from("cli.txt")));
        assert_eq!(settings.format, SourceFormat::CmsOrder);
        assert!(settings.billable_only);
    }

    #[test]
    fn test_build_from_bundled_sample() {
        let settings = SourceSettings {
            top_k: 3,
            ..Default::default()
        };
        let source = open(&settings).unwrap();
        let context = build(source.as_ref(), &settings).unwrap();

        let matches = context.lookup_default("type 2 diabetes without complications").unwrap();
        assert_eq!(matches.len(), 3);
        assert_eq!(matches[0].code, "E11.9");
    }

    #[test]
    fn test_build_raw_mode() {
        let settings = SourceSettings {
            raw: true,
            top_k: 1,
            ..Default::default()
        };
        let source = open(&settings).unwrap();
        let context = build(source.as_ref(), &settings).unwrap();

        assert_eq!(context.options().key, MatchKey::Raw);
        let matches = context.lookup_default("Essential (primary) hypertension").unwrap();
        assert_eq!(matches[0].code, "I10");
    }
}
