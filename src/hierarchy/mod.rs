//! 分類コード階層ソースモジュール
//!
//! 外部の階層データ（CSV / CMS order file）からコードと説明文を取得し、
//! 参照テーブルを一度だけ構築する。
//!
//! ## エラーの扱い
//! - ファイルが無い・壊れている・コードが0件 → 起動失敗
//! - 個別コードの説明文が取れない → 空文字として登録を続ける

pub mod cms_order;
pub mod csv_source;

pub use cms_order::CmsOrderHierarchy;
pub use csv_source::CsvHierarchy;

use crate::error::{MapperError, Result};
use nadana_map_common::{Normalizer, ReferenceEntry, ReferenceTable};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 同梱のサンプル参照テーブル
pub const BUNDLED_SAMPLE: &str = include_str!("../../data/icd10cm_sample.csv");

/// 階層データの提供元
pub trait CodeHierarchy {
    /// 表示用のソース名
    fn name(&self) -> &str;

    /// 全コード（ソース内の順）
    fn all_codes(&self) -> Vec<String>;

    /// コードの説明文。説明文が無ければ `Ok(None)`
    fn describe(&self, code: &str) -> Result<Option<String>>;

    /// 親コード
    fn parent(&self, _code: &str) -> Option<String> {
        None
    }

    /// ルートまでの祖先コード（近い順）
    fn ancestors(&self, code: &str) -> Vec<String> {
        let mut chain = Vec::new();
        let mut current = code.to_string();
        while let Some(parent) = self.parent(&current) {
            if parent == current || chain.contains(&parent) {
                break;
            }
            chain.push(parent.clone());
            current = parent;
        }
        chain
    }
}

/// 参照テーブルの形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceFormat {
    /// `code,description[,parent]` ヘッダ付きCSV
    #[default]
    Csv,
    /// CMS ICD-10-CM order file（固定長）
    CmsOrder,
}

impl std::str::FromStr for SourceFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(SourceFormat::Csv),
            "cms-order" | "cms" | "order" => Ok(SourceFormat::CmsOrder),
            _ => Err(format!("Unknown source format: {}. Use csv or cms-order", s)),
        }
    }
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceFormat::Csv => write!(f, "csv"),
            SourceFormat::CmsOrder => write!(f, "cms-order"),
        }
    }
}

/// 階層ソースを開く
///
/// `path` が `None` の場合は同梱サンプルを使う。
pub fn open_source(
    path: Option<&Path>,
    format: SourceFormat,
    billable_only: bool,
) -> Result<Box<dyn CodeHierarchy>> {
    let Some(path) = path else {
        tracing::warn!("参照テーブルが未設定のため同梱サンプルを使用します");
        return Ok(Box::new(CsvHierarchy::from_reader(
            BUNDLED_SAMPLE.as_bytes(),
            "bundled sample",
        )?));
    };

    if !path.exists() {
        return Err(MapperError::FileNotFound(path.display().to_string()));
    }

    tracing::info!(path = %path.display(), format = %format, "参照テーブルを読み込み");

    match format {
        SourceFormat::Csv => Ok(Box::new(CsvHierarchy::from_path(path)?)),
        SourceFormat::CmsOrder => Ok(Box::new(CmsOrderHierarchy::from_path(path, billable_only)?)),
    }
}

/// 階層ソースから参照テーブルを構築
///
/// 説明文の取得に失敗したコードは空の説明文で登録する。
pub fn build_reference_table(
    source: &dyn CodeHierarchy,
    normalizer: &Normalizer,
) -> Result<ReferenceTable> {
    let codes = source.all_codes();
    if codes.is_empty() {
        return Err(MapperError::EmptyReference(source.name().to_string()));
    }

    let mut missing = 0usize;
    let mut failed = 0usize;

    let entries: Vec<ReferenceEntry> = codes
        .into_iter()
        .map(|code| {
            let description = match source.describe(&code) {
                Ok(Some(description)) => description,
                Ok(None) => {
                    tracing::debug!(code = %code, "説明文なし");
                    missing += 1;
                    String::new()
                }
                Err(e) => {
                    tracing::debug!(code = %code, error = %e, "説明文の取得に失敗");
                    failed += 1;
                    String::new()
                }
            };
            ReferenceEntry { code, description }
        })
        .collect();

    if missing + failed > 0 {
        tracing::warn!(missing, failed, "説明文が空のコードがあります");
    }

    let table = ReferenceTable::from_entries(entries, normalizer);
    let stats = table.stats();
    if stats.duplicates_dropped > 0 {
        tracing::warn!(duplicates = stats.duplicates_dropped, "重複コードを除外しました");
    }
    tracing::info!(entries = stats.total_entries, source = source.name(), "参照テーブル構築完了");

    Ok(table)
}

/// ICD-10-CM コードに小数点を補う（E119 → E11.9）
pub fn dotted_code(code: &str) -> String {
    let code = code.trim();
    if code.len() > 3 && !code.contains('.') && code.is_ascii() {
        format!("{}.{}", &code[..3], &code[3..])
    } else {
        code.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// describe が失敗するコードを含むテスト用ソース
    struct FlakySource {
        codes: Vec<&'static str>,
        descriptions: HashMap<&'static str, &'static str>,
        broken: &'static str,
    }

    impl CodeHierarchy for FlakySource {
        fn name(&self) -> &str {
            "flaky"
        }

        fn all_codes(&self) -> Vec<String> {
            self.codes.iter().map(|c| c.to_string()).collect()
        }

        fn describe(&self, code: &str) -> Result<Option<String>> {
            if code == self.broken {
                return Err(MapperError::ReferenceLoad(format!("lookup failed: {}", code)));
            }
            Ok(self.descriptions.get(code).map(|d| d.to_string()))
        }

        fn parent(&self, code: &str) -> Option<String> {
            code.find('.').map(|i| code[..i].to_string())
        }
    }

    fn flaky() -> FlakySource {
        FlakySource {
            codes: vec!["E11", "E11.9", "X99", "Y00"],
            descriptions: HashMap::from([
                ("E11", "Type 2 diabetes mellitus"),
                ("E11.9", "Type 2 diabetes mellitus without complications"),
            ]),
            broken: "Y00",
        }
    }

    #[test]
    fn test_build_reference_table_recovers_per_entry() {
        let table = build_reference_table(&flaky(), &Normalizer::default()).unwrap();

        assert_eq!(table.len(), 4);
        assert_eq!(table.get("X99").unwrap().description, "");
        assert_eq!(table.get("Y00").unwrap().description, "");
        assert_eq!(table.stats().empty_descriptions, 2);
    }

    #[test]
    fn test_build_reference_table_empty_source() {
        let source = FlakySource {
            codes: vec![],
            descriptions: HashMap::new(),
            broken: "",
        };
        let result = build_reference_table(&source, &Normalizer::default());
        assert!(matches!(result, Err(MapperError::EmptyReference(_))));
    }

    #[test]
    fn test_ancestors() {
        let source = flaky();
        assert_eq!(source.ancestors("E11.9"), vec!["E11".to_string()]);
        assert!(source.ancestors("E11").is_empty());
    }

    #[test]
    fn test_source_format_from_str() {
        assert_eq!("csv".parse::<SourceFormat>().unwrap(), SourceFormat::Csv);
        assert_eq!("CMS-Order".parse::<SourceFormat>().unwrap(), SourceFormat::CmsOrder);
        assert_eq!("order".parse::<SourceFormat>().unwrap(), SourceFormat::CmsOrder);
        assert!("xlsx".parse::<SourceFormat>().is_err());
        assert_eq!(SourceFormat::CmsOrder.to_string(), "cms-order");
    }

    #[test]
    fn test_dotted_code() {
        assert_eq!(dotted_code("E119"), "E11.9");
        assert_eq!(dotted_code("S72001A"), "S72.001A");
        assert_eq!(dotted_code("I10"), "I10");
        assert_eq!(dotted_code("E11.9"), "E11.9");
    }

    #[test]
    fn test_open_bundled_sample() {
        let source = open_source(None, SourceFormat::Csv, false).unwrap();
        let table = build_reference_table(source.as_ref(), &Normalizer::default()).unwrap();

        assert!(table.len() > 40);
        assert_eq!(
            table.get("E11.9").map(|e| e.description.as_str()),
            Some("Type 2 diabetes mellitus without complications")
        );
        assert_eq!(source.ancestors("E11.9"), vec!["E11".to_string(), "E00-E89".to_string()]);
    }

    #[test]
    fn test_open_missing_file() {
        let result = open_source(Some(Path::new("/nonexistent/icd10.csv")), SourceFormat::Csv, false);
        assert!(matches!(result, Err(MapperError::FileNotFound(_))));
    }
}
