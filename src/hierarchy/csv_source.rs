//! CSV形式の階層ソース
//!
//! ヘッダに `code` と `description` 列が必要（大文字小文字は問わない）。
//! `parent` 列があれば階層として使う。その他の列は無視する。

use super::CodeHierarchy;
use crate::error::{MapperError, Result};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Clone)]
struct CsvRow {
    description: Option<String>,
    parent: Option<String>,
}

/// CSVから読み込んだ階層データ
#[derive(Debug, Clone)]
pub struct CsvHierarchy {
    name: String,
    /// ファイル内の順
    codes: Vec<String>,
    rows: HashMap<String, CsvRow>,
}

impl CsvHierarchy {
    /// CSVファイルから読み込み
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, &path.display().to_string())
    }

    /// 任意のリーダーから読み込み
    pub fn from_reader<R: Read>(reader: R, name: &str) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let column = |wanted: &str| {
            headers
                .iter()
                .position(|h| h.trim_start_matches('\u{feff}').eq_ignore_ascii_case(wanted))
        };

        let code_idx = column("code").ok_or_else(|| {
            MapperError::ReferenceLoad(format!("{}: 'code' 列がありません", name))
        })?;
        let desc_idx = column("description").ok_or_else(|| {
            MapperError::ReferenceLoad(format!("{}: 'description' 列がありません", name))
        })?;
        let parent_idx = column("parent");

        let mut codes = Vec::new();
        let mut rows = HashMap::new();

        for (line, record) in csv_reader.records().enumerate() {
            let record = record?;

            let code = record.get(code_idx).unwrap_or("").to_string();
            if code.is_empty() {
                // ヘッダ行の次が1行目
                tracing::debug!(line = line + 2, "コードが空の行をスキップ");
                continue;
            }

            let non_empty = |idx: usize| {
                record
                    .get(idx)
                    .filter(|value| !value.is_empty())
                    .map(|value| value.to_string())
            };

            codes.push(code.clone());
            rows.entry(code).or_insert(CsvRow {
                description: non_empty(desc_idx),
                parent: parent_idx.and_then(non_empty),
            });
        }

        Ok(Self {
            name: name.to_string(),
            codes,
            rows,
        })
    }
}

impl CodeHierarchy for CsvHierarchy {
    fn name(&self) -> &str {
        &self.name
    }

    fn all_codes(&self) -> Vec<String> {
        self.codes.clone()
    }

    fn describe(&self, code: &str) -> Result<Option<String>> {
        Ok(self.rows.get(code).and_then(|row| row.description.clone()))
    }

    fn parent(&self, code: &str) -> Option<String> {
        self.rows.get(code).and_then(|row| row.parent.clone())
    }
}
