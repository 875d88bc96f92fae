//! CMS ICD-10-CM order file の階層ソース
//!
//! 固定長レコード:
//! - 0..5   順序番号
//! - 6..13  コード（小数点なし、左詰め）
//! - 14     ヘッダフラグ（0: カテゴリ見出し, 1: 請求可能コード）
//! - 16..76 短い説明文
//! - 77..   長い説明文
//!
//! 親コードはコード末尾を削って最初に見つかったものとする（E11.9 → E11）。

use super::{dotted_code, CodeHierarchy};
use crate::error::{MapperError, Result};
use std::collections::HashMap;
use std::path::Path;

const CODE_RANGE: std::ops::Range<usize> = 6..13;
const HEADER_FLAG_POS: usize = 14;
const SHORT_DESC_RANGE: std::ops::Range<usize> = 16..76;
const LONG_DESC_START: usize = 77;

/// order file の1行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRecord {
    pub code: String,
    pub billable: bool,
    pub short_description: String,
    pub long_description: String,
}

/// 1行をパース（短すぎる行は None）
pub fn parse_order_line(line: &str) -> Option<OrderRecord> {
    let line = line.trim_end_matches(['\r', '\n']);
    if !line.is_ascii() || line.len() <= HEADER_FLAG_POS {
        return None;
    }

    let bytes = line.as_bytes();
    let well_formed = bytes[..5].iter().all(u8::is_ascii_digit)
        && bytes[5] == b' '
        && matches!(bytes[HEADER_FLAG_POS], b'0' | b'1');
    if !well_formed {
        return None;
    }

    let code = line.get(CODE_RANGE)?.trim();
    if code.is_empty() {
        return None;
    }

    let billable = bytes[HEADER_FLAG_POS] == b'1';
    let short_description = line
        .get(SHORT_DESC_RANGE.start..SHORT_DESC_RANGE.end.min(line.len()))
        .unwrap_or("")
        .trim()
        .to_string();
    let long_description = line.get(LONG_DESC_START..).unwrap_or("").trim().to_string();

    Some(OrderRecord {
        code: dotted_code(code),
        billable,
        short_description,
        long_description,
    })
}

/// order file から読み込んだ階層データ
#[derive(Debug, Clone)]
pub struct CmsOrderHierarchy {
    name: String,
    codes: Vec<String>,
    records: HashMap<String, OrderRecord>,
}

impl CmsOrderHierarchy {
    pub fn from_path(path: &Path, billable_only: bool) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str_content(&content, &path.display().to_string(), billable_only)
    }

    /// 文字列から読み込み
    ///
    /// `billable_only` が真ならカテゴリ見出し行を除外する。
    pub fn from_str_content(content: &str, name: &str, billable_only: bool) -> Result<Self> {
        let mut codes = Vec::new();
        let mut records = HashMap::new();
        let mut malformed = 0usize;

        for (line_no, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }

            let Some(record) = parse_order_line(line) else {
                tracing::debug!(line = line_no + 1, "order file の行を解析できません");
                malformed += 1;
                continue;
            };

            if billable_only && !record.billable {
                continue;
            }

            codes.push(record.code.clone());
            records.entry(record.code.clone()).or_insert(record);
        }

        if malformed > 0 {
            tracing::warn!(malformed, "解析できない行をスキップしました");
        }
        if codes.is_empty() && malformed > 0 {
            return Err(MapperError::ReferenceLoad(format!(
                "{}: order file 形式の行がありません",
                name
            )));
        }

        Ok(Self {
            name: name.to_string(),
            codes,
            records,
        })
    }
}

impl CodeHierarchy for CmsOrderHierarchy {
    fn name(&self) -> &str {
        &self.name
    }

    fn all_codes(&self) -> Vec<String> {
        self.codes.clone()
    }

    /// 長い説明文を優先し、無ければ短い説明文
    fn describe(&self, code: &str) -> Result<Option<String>> {
        Ok(self.records.get(code).and_then(|record| {
            [&record.long_description, &record.short_description]
                .into_iter()
                .find(|d| !d.is_empty())
                .cloned()
        }))
    }

    fn parent(&self, code: &str) -> Option<String> {
        let compact: String = code.chars().filter(|c| *c != '.').collect();
        if !compact.is_ascii() {
            return None;
        }
        (3..compact.len())
            .rev()
            .map(|len| dotted_code(&compact[..len]))
            .find(|candidate| self.records.contains_key(candidate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order_line(order: u32, code: &str, billable: bool, short: &str, long: &str) -> String {
        format!(
            "{:05} {:<7} {} {:<60} {}",
            order,
            code,
            if billable { 1 } else { 0 },
            short,
            long
        )
    }

    fn sample_content() -> String {
        [
            order_line(1, "E11", false, "Type 2 diabetes mellitus", "Type 2 diabetes mellitus"),
            order_line(2, "E119", true, "Type 2 diabetes mellitus w/o complications", "Type 2 diabetes mellitus without complications"),
            order_line(3, "I10", true, "Essential (primary) hypertension", "Essential (primary) hypertension"),
            order_line(4, "S72001", false, "Fracture of unsp part of neck of right femur", ""),
            order_line(5, "S72001A", true, "Fx unsp part of nk of r femr, init", "Fracture of unspecified part of neck of right femur, initial encounter for closed fracture"),
        ]
        .join("\n")
    }

    #[test]
    fn test_parse_order_line() {
        let line = order_line(2, "E119", true, "Type 2 diabetes mellitus w/o complications", "Type 2 diabetes mellitus without complications");
        let record = parse_order_line(&line).unwrap();

        assert_eq!(record.code, "E11.9");
        assert!(record.billable);
        assert_eq!(record.short_description, "Type 2 diabetes mellitus w/o complications");
        assert_eq!(record.long_description, "Type 2 diabetes mellitus without complications");
    }

    #[test]
    fn test_parse_order_line_too_short() {
        assert!(parse_order_line("00001 A00").is_none());
        assert!(parse_order_line("").is_none());
        assert!(parse_order_line("code,description,parent").is_none());
    }

    #[test]
    fn test_load_all_codes() {
        let source = CmsOrderHierarchy::from_str_content(&sample_content(), "test", false).unwrap();
        assert_eq!(source.all_codes(), vec!["E11", "E11.9", "I10", "S72.001", "S72.001A"]);
    }

    #[test]
    fn test_billable_only() {
        let source = CmsOrderHierarchy::from_str_content(&sample_content(), "test", true).unwrap();
        assert_eq!(source.all_codes(), vec!["E11.9", "I10", "S72.001A"]);
    }

    #[test]
    fn test_describe_prefers_long_description() {
        let source = CmsOrderHierarchy::from_str_content(&sample_content(), "test", false).unwrap();
        assert_eq!(
            source.describe("E11.9").unwrap().as_deref(),
            Some("Type 2 diabetes mellitus without complications")
        );
        assert_eq!(
            source.describe("S72.001").unwrap().as_deref(),
            Some("Fracture of unsp part of neck of right femur")
        );
        assert_eq!(source.describe("Z00.00").unwrap(), None);
    }

    #[test]
    fn test_parent_by_prefix() {
        let source = CmsOrderHierarchy::from_str_content(&sample_content(), "test", false).unwrap();
        assert_eq!(source.parent("E11.9").as_deref(), Some("E11"));
        assert_eq!(source.parent("S72.001A").as_deref(), Some("S72.001"));
        assert_eq!(source.ancestors("S72.001A"), vec!["S72.001".to_string()]);
        assert_eq!(source.parent("I10"), None);
    }

    #[test]
    fn test_not_an_order_file() {
        let result = CmsOrderHierarchy::from_str_content("code,description\nI10,Hypertension\n", "test", false);
        assert!(matches!(result, Err(MapperError::ReferenceLoad(_))));
    }
}
