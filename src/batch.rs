//! 一括照合モジュール
//!
//! 入力:
//! - `.json`: 文字列の配列（文字列以外の要素は空入力として扱う）
//! - それ以外: 1行1件のテキスト（空行は読み飛ばす）
//!
//! 出力はJSONレポート。

use crate::error::{MapperError, Result};
use chrono::{DateTime, Local};
use nadana_map_common::{Error, LookupContext, MatchResult};
use serde::Serialize;
use std::path::Path;

/// 一括照合の入力1件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchQuery {
    /// 入力内の位置（1始まり: 行番号または配列の要素番号）
    pub position: usize,
    pub text: String,
}

/// 照合結果1件
#[derive(Debug, Clone, Serialize)]
pub struct BatchItem {
    pub position: usize,
    pub query: String,
    pub normalized: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejected: Option<String>,
    pub matches: Vec<MatchResult>,
}

/// 一括照合レポート
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub generated_at: DateTime<Local>,
    pub source: String,
    pub top_k: usize,
    pub total: usize,
    pub rejected: usize,
    pub items: Vec<BatchItem>,
}

/// 入力ファイルを読み込み
pub fn read_queries(input: &Path) -> Result<Vec<BatchQuery>> {
    if !input.exists() {
        return Err(MapperError::FileNotFound(input.display().to_string()));
    }

    let content = std::fs::read_to_string(input)?;
    let is_json = input
        .extension()
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if is_json {
        parse_json_queries(&content)
    } else {
        Ok(parse_text_queries(&content))
    }
}

/// 1行1件のテキストを解析
pub fn parse_text_queries(content: &str) -> Vec<BatchQuery> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| BatchQuery {
            position: i + 1,
            text: line.trim().to_string(),
        })
        .collect()
}

/// JSON配列を解析（文字列以外は空文字）
pub fn parse_json_queries(content: &str) -> Result<Vec<BatchQuery>> {
    let value: serde_json::Value = serde_json::from_str(content)?;
    let items = value
        .as_array()
        .ok_or_else(|| MapperError::Config("JSON入力は配列である必要があります".into()))?;

    Ok(items
        .iter()
        .enumerate()
        .map(|(i, item)| BatchQuery {
            position: i + 1,
            text: item.as_str().unwrap_or_default().to_string(),
        })
        .collect())
}

/// 全件を照合
pub fn run_batch(
    context: &LookupContext,
    queries: &[BatchQuery],
    top_k: usize,
    source: &str,
) -> Result<BatchReport> {
    let mut items = Vec::with_capacity(queries.len());
    let mut rejected = 0;

    for query in queries {
        let normalized = context.prepare_query(&query.text);
        let item = match context.lookup(&query.text, top_k) {
            Ok(matches) => BatchItem {
                position: query.position,
                query: query.text.clone(),
                normalized,
                rejected: None,
                matches,
            },
            Err(Error::EmptyQuery) => {
                tracing::debug!(position = query.position, "空入力をスキップ");
                rejected += 1;
                BatchItem {
                    position: query.position,
                    query: query.text.clone(),
                    normalized,
                    rejected: Some(Error::EmptyQuery.to_string()),
                    matches: Vec::new(),
                }
            }
            Err(e) => return Err(e.into()),
        };
        items.push(item);
    }

    Ok(BatchReport {
        generated_at: Local::now(),
        source: source.to_string(),
        top_k,
        total: queries.len(),
        rejected,
        items,
    })
}

/// レポートを書き出し（パス省略時は標準出力）
pub fn write_report(report: &BatchReport, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, json)?;
        }
        None => println!("{}", json),
    }
    Ok(())
}
