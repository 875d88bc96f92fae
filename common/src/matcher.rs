//! ファジー照合モジュール
//!
//! クエリと全候補の説明文の token_sort_ratio を総当たりで計算し、
//! スコア上位 top_k 件を返す。索引や枝刈りは行わない。

use crate::assembler::build_result;
use crate::reference::{MatchKey, ReferenceTable};
use crate::similarity::token_sort_ratio;
use crate::types::{MatchResult, ReferenceEntry};

/// 既定の取得件数
pub const DEFAULT_TOP_K: usize = 3;

/// スコア付き候補（entries 内の位置）
#[derive(Debug, Clone, Copy, PartialEq)]
struct Scored {
    index: usize,
    score: f64,
}

/// 候補キー列から上位 top_k 件の位置とスコアを選ぶ
///
/// 同点は候補の並び順を保つ（安定ソート）。
fn rank<'a, I>(query: &str, keys: I, top_k: usize) -> Vec<Scored>
where
    I: IntoIterator<Item = &'a str>,
{
    if top_k == 0 {
        return Vec::new();
    }

    let mut scored: Vec<Scored> = keys
        .into_iter()
        .enumerate()
        .map(|(index, key)| Scored {
            index,
            score: token_sort_ratio(query, key),
        })
        .collect();

    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(top_k);
    scored
}

/// 参照エントリ列の説明文とそのまま照合
///
/// # Examples
/// ```
/// use nadana_map_common::{match_entries, ReferenceEntry};
///
/// let reference = vec![
///     ReferenceEntry::new("I10", "essential primary hypertension"),
///     ReferenceEntry::new("J45", "asthma"),
/// ];
/// let matches = match_entries("hypertension essential primary", &reference, 1);
/// assert_eq!(matches[0].code, "I10");
/// assert_eq!(matches[0].score, 100.0);
/// ```
pub fn match_entries(query: &str, reference: &[ReferenceEntry], top_k: usize) -> Vec<MatchResult> {
    let keys = reference.iter().map(|entry| entry.description.as_str());

    rank(query, keys, top_k)
        .into_iter()
        .map(|s| build_result(&reference[s.index], s.score))
        .collect()
}

/// 参照テーブルと照合
///
/// `key` で正規化済み説明文か元の説明文のどちらと比べるかを選ぶ。
pub fn match_table(query: &str, table: &ReferenceTable, top_k: usize, key: MatchKey) -> Vec<MatchResult> {
    let entries = table.entries();

    rank(query, table.keys(key), top_k)
        .into_iter()
        .map(|s| build_result(&entries[s.index], s.score))
        .collect()
}
