//! 照合結果の表示
//!
//! - Markdown: 結果ブロック（見出し + 1件ごとの区切り）
//! - JSON: `{query, matches}`
//! - Text: 端末向けの簡易表示

use crate::cli::OutputFormat;
use crate::error::Result;
use nadana_map_common::{assemble, assemble_json, MatchResult, SCORE_PRECISION};

/// 空入力時のメッセージ
pub const EMPTY_QUERY_MESSAGE: &str = "❌ Please enter a diagnosis to search.";

/// 照合結果を指定形式で整形
pub fn render(query: &str, matches: &[MatchResult], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Markdown => Ok(assemble(query, matches)),
        OutputFormat::Json => Ok(assemble_json(query, matches)?),
        OutputFormat::Text => Ok(render_text(query, matches)),
    }
}

fn render_text(query: &str, matches: &[MatchResult]) -> String {
    let mut output = format!("Results for: {}\n", query);

    if matches.is_empty() {
        output.push_str("  (no matches)\n");
        return output;
    }

    for (rank, m) in matches.iter().enumerate() {
        output.push_str(&format!(
            "{:>2}. {:<9} {:>9.prec$}  {}\n    {}\n",
            rank + 1,
            m.code,
            m.score,
            if m.description.is_empty() { "(no description)" } else { m.description.as_str() },
            m.justification,
            prec = SCORE_PRECISION,
        ));
    }

    output
}
