//! テキスト正規化モジュール
//!
//! 診断名の自由記述を照合用の形式に揃える。
//!
//! ## 処理フロー
//! 1. 小文字化
//! 2. 英小文字・数字・空白・ハイフン以外を空白に置換
//! 3. 連続空白を1つに統一し前後をトリム
//! 4. トークンごとにレンマ化して空白で再結合

use crate::lemma::Lemmatizer;
use regex::Regex;

lazy_static::lazy_static! {
    static ref DISALLOWED_RE: Regex = Regex::new(r"[^a-z0-9\s-]").unwrap();
    static ref DEFAULT_NORMALIZER: Normalizer = Normalizer::default();
}

/// レンマタイザを保持する正規化器
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    lemmatizer: Lemmatizer,
}

impl Normalizer {
    pub fn new(lemmatizer: Lemmatizer) -> Self {
        Self { lemmatizer }
    }

    /// テキストを正規化
    ///
    /// # Examples
    /// ```
    /// use nadana_map_common::Normalizer;
    ///
    /// let normalizer = Normalizer::default();
    /// assert_eq!(
    ///     normalizer.normalize("Diabetes mellitus, without Complications!"),
    ///     "diabetes mellitus without complication"
    /// );
    /// ```
    pub fn normalize(&self, text: &str) -> String {
        let lowered = text.to_lowercase();
        let cleaned = DISALLOWED_RE.replace_all(&lowered, " ");

        // split_whitespace で連続空白の統一とトリムを兼ねる
        cleaned
            .split_whitespace()
            .map(|token| self.lemmatizer.lemmatize(token))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// JSON値を正規化（文字列以外は空文字）
    pub fn normalize_value(&self, value: &serde_json::Value) -> String {
        match value {
            serde_json::Value::String(text) => self.normalize(text),
            _ => String::new(),
        }
    }
}

/// 組み込み辞書でテキストを正規化
pub fn normalize(text: &str) -> String {
    DEFAULT_NORMALIZER.normalize(text)
}

/// 組み込み辞書でJSON値を正規化
pub fn normalize_value(value: &serde_json::Value) -> String {
    DEFAULT_NORMALIZER.normalize_value(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_normalized_charset(text: &str) -> bool {
        text.chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == ' ')
            && !text.contains("  ")
            && text.trim() == text
    }

    #[test]
    fn test_normalize_basic() {
        assert_eq!(normalize("Type 2 Diabetes Mellitus"), "type 2 diabetes mellitus");
        assert_eq!(normalize("  Acute   kidney\tfailure\n"), "acute kidney failure");
    }

    #[test]
    fn test_normalize_strips_punctuation() {
        assert_eq!(normalize("Hypertension, essential (primary)"), "hypertension essential primary");
        assert_eq!(normalize("COVID-19; confirmed"), "covid-19 confirmed");
        assert_eq!(normalize("Fracture of femur/hip"), "fracture of femur hip");
    }

    #[test]
    fn test_normalize_lemmatizes_tokens() {
        assert_eq!(normalize("Multiple rib fractures"), "multiple rib fracture");
        assert_eq!(normalize("Renal calculi"), "renal calculus");
    }

    #[test]
    fn test_normalize_empty_and_symbols() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
        assert_eq!(normalize("!!! ??? ..."), "");
    }

    #[test]
    fn test_normalize_non_ascii() {
        let result = normalize("Ménière's disease");
        assert!(is_normalized_charset(&result), "不正な文字: {:?}", result);
        assert!(result.ends_with("disease"));
    }

    #[test]
    fn test_normalize_idempotent() {
        let samples = [
            "Diabetes mellitus without complications",
            "Headaches, recurrent; MIGRAINES with aura",
            "Fractures of multiple ribs (left side) -- closed",
            "Ménière's disease — bilateral",
            "ÀÉÎ İstanbul ßtraße",
            "Glasses & boxes & branches",
            "Feets",
            "",
        ];

        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "冪等でない: {:?}", sample);
            assert!(is_normalized_charset(&once), "不正な文字: {:?}", once);
        }
    }

    #[test]
    fn test_normalize_value() {
        assert_eq!(normalize_value(&serde_json::json!("Renal Calculi")), "renal calculus");
        assert_eq!(normalize_value(&serde_json::json!(42)), "");
        assert_eq!(normalize_value(&serde_json::json!(null)), "");
        assert_eq!(normalize_value(&serde_json::json!(["a"])), "");
    }

    #[test]
    fn test_custom_lemmatizer() {
        let mut lemmatizer = Lemmatizer::new();
        lemmatizer.add_irregular("stomata", "stoma");
        let normalizer = Normalizer::new(lemmatizer);
        assert_eq!(normalizer.normalize("Stomata"), "stoma");
    }
}
