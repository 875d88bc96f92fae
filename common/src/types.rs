//! 照合の型定義
//!
//! CLIとライブラリ利用側で共有される型:
//! - ReferenceEntry: 参照テーブルの1行（コードと説明文）
//! - MatchResult: 照合結果（スコアと根拠文付き）

use serde::{Deserialize, Serialize};

/// 参照テーブルの1行
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceEntry {
    /// 分類コード（例: E11.9）
    pub code: String,
    /// 正式な説明文（取得できない場合は空）
    #[serde(default)]
    pub description: String,
}

impl ReferenceEntry {
    pub fn new(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
        }
    }
}

/// 照合結果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub code: String,
    pub description: String,
    /// 類似度スコア (0-100)
    pub score: f64,
    pub justification: String,
}
