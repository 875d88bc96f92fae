//! 照合コンテキスト
//!
//! 参照テーブル・正規化器・照合設定を1つにまとめた不変オブジェクト。
//! 起動時に一度だけ構築し、参照で各リクエストに渡す。

use crate::error::{Error, Result};
use crate::matcher::{match_table, DEFAULT_TOP_K};
use crate::normalizer::Normalizer;
use crate::reference::{MatchKey, ReferenceTable};
use crate::types::{MatchResult, ReferenceEntry};

/// 照合設定
#[derive(Debug, Clone, Copy)]
pub struct LookupOptions {
    /// 既定の取得件数
    pub top_k: usize,
    /// 照合キー（正規化済み / 元の説明文）
    pub key: MatchKey,
}

impl Default for LookupOptions {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            key: MatchKey::Normalized,
        }
    }
}

/// 照合コンテキスト
#[derive(Debug, Clone)]
pub struct LookupContext {
    table: ReferenceTable,
    normalizer: Normalizer,
    options: LookupOptions,
}

impl LookupContext {
    pub fn new(table: ReferenceTable, normalizer: Normalizer, options: LookupOptions) -> Self {
        Self {
            table,
            normalizer,
            options,
        }
    }

    /// エントリ列から既定設定で構築
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = ReferenceEntry>,
    {
        let normalizer = Normalizer::default();
        let table = ReferenceTable::from_entries(entries, &normalizer);
        Self::new(table, normalizer, LookupOptions::default())
    }

    pub fn table(&self) -> &ReferenceTable {
        &self.table
    }

    pub fn options(&self) -> &LookupOptions {
        &self.options
    }

    /// クエリを照合用の文字列に変換
    pub fn prepare_query(&self, raw_text: &str) -> String {
        match self.options.key {
            MatchKey::Normalized => self.normalizer.normalize(raw_text),
            MatchKey::Raw => raw_text.trim().to_string(),
        }
    }

    /// 自由記述の診断名を照合
    ///
    /// 空白のみの入力は照合せずに `Error::EmptyQuery` を返す。
    /// 正規化後に空になった入力は照合を実行する（スコアはすべて 0）。
    pub fn lookup(&self, raw_text: &str, top_k: usize) -> Result<Vec<MatchResult>> {
        if raw_text.trim().is_empty() {
            return Err(Error::EmptyQuery);
        }
        if top_k == 0 {
            return Err(Error::InvalidTopK(top_k));
        }

        let query = self.prepare_query(raw_text);
        Ok(match_table(&query, &self.table, top_k, self.options.key))
    }

    /// 既定件数で照合
    pub fn lookup_default(&self, raw_text: &str) -> Result<Vec<MatchResult>> {
        self.lookup(raw_text, self.options.top_k)
    }
}
