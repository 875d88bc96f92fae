//! 結果組み立てモジュール
//!
//! 照合スコアを MatchResult にまとめ、根拠文と表示用ブロックを生成する。
//! 根拠文は固定テンプレートで、ベクトル演算などには依存しない。

use crate::error::Result;
use crate::types::{MatchResult, ReferenceEntry};
use serde::Serialize;

/// スコアの小数桁数
pub const SCORE_PRECISION: usize = 5;

/// スコアを固定桁に丸める
pub fn round_score(score: f64) -> f64 {
    let factor = 10f64.powi(SCORE_PRECISION as i32);
    (score * factor).round() / factor
}

/// 根拠文を生成
pub fn justification(description: &str, score: f64) -> String {
    format!(
        "Matched '{}' ({}%) based on fuzzy text similarity.",
        description, score
    )
}

/// 参照エントリとスコアから照合結果を作成
pub fn build_result(entry: &ReferenceEntry, score: f64) -> MatchResult {
    let score = round_score(score);
    MatchResult {
        code: entry.code.clone(),
        description: entry.description.clone(),
        score,
        justification: justification(&entry.description, score),
    }
}

/// 照合結果をMarkdownブロックに整形
pub fn assemble(query: &str, matches: &[MatchResult]) -> String {
    let mut output = format!("### 📋 Results for: **{}**\n\n", query);

    for m in matches {
        output.push_str(&format!(
            "**ICD-10 Code:** `{}`  \n**Description:** {}  \n**Fuzzy Score:** `{:.prec$}`  \n**Justification:** {}\n\n---\n",
            m.code,
            m.description,
            m.score,
            m.justification,
            prec = SCORE_PRECISION,
        ));
    }

    output
}

/// JSON出力用のレポート
#[derive(Debug, Serialize)]
struct LookupReport<'a> {
    query: &'a str,
    matches: &'a [MatchResult],
}

/// 照合結果をJSONに整形
pub fn assemble_json(query: &str, matches: &[MatchResult]) -> Result<String> {
    Ok(serde_json::to_string_pretty(&LookupReport { query, matches })?)
}
