//! 文字列類似度
//!
//! - Indel距離（挿入・削除のみの編集距離）
//! - ratio: 正規化Indel類似度 (0-100)
//! - token_sort_ratio: トークンを整列してから ratio

/// トークンをアルファベット順に並べ替えて再結合
pub fn sort_tokens(text: &str) -> String {
    let mut tokens: Vec<&str> = text.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// 正規化Indel類似度 (0-100)
///
/// `100 * (1 - indel / (len_a + len_b))`。どちらかが空なら 0。
pub fn ratio(a: &str, b: &str) -> f64 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let total = a_chars.len() + b_chars.len();

    if a_chars.is_empty() || b_chars.is_empty() {
        return 0.0;
    }

    let distance = indel_distance(&a_chars, &b_chars);
    100.0 * (1.0 - distance as f64 / total as f64)
}

/// トークン順序に依存しない類似度 (0-100)
///
/// # Examples
/// ```
/// use nadana_map_common::similarity::token_sort_ratio;
///
/// assert_eq!(token_sort_ratio("mellitus diabetes", "diabetes mellitus"), 100.0);
/// ```
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    ratio(&sort_tokens(a), &sort_tokens(b))
}

/// Indel距離 = len_a + len_b - 2 * LCS
fn indel_distance(a: &[char], b: &[char]) -> usize {
    a.len() + b.len() - 2 * lcs_length(a, b)
}

/// 最長共通部分列の長さ（2行DP）
fn lcs_length(a: &[char], b: &[char]) -> usize {
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };

    let mut prev = vec![0usize; short.len() + 1];
    let mut curr = vec![0usize; short.len() + 1];

    for &lc in long {
        for (j, &sc) in short.iter().enumerate() {
            curr[j + 1] = if lc == sc {
                prev[j] + 1
            } else {
                curr[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[short.len()]
}
