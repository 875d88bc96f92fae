//! コード参照テーブルモジュール
//!
//! 分類コードと説明文の対応表を保持する。起動時に一度だけ構築し、
//! 以後は読み取り専用で共有する。

use crate::normalizer::Normalizer;
use crate::types::ReferenceEntry;
use serde::Serialize;
use std::collections::HashSet;

/// 照合対象のキー
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchKey {
    /// 正規化済みの説明文
    #[default]
    Normalized,
    /// 元の説明文
    Raw,
}

/// 参照テーブルの統計情報
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReferenceStats {
    /// 登録コード数
    pub total_entries: usize,
    /// 説明文が空のコード数
    pub empty_descriptions: usize,
    /// 重複として除外したコード数
    pub duplicates_dropped: usize,
}

/// 参照テーブル（構築後は不変）
#[derive(Debug, Clone, Default)]
pub struct ReferenceTable {
    entries: Vec<ReferenceEntry>,
    /// entries と同じ順の正規化済み説明文
    normalized: Vec<String>,
    duplicates_dropped: usize,
}

impl ReferenceTable {
    /// エントリ列から構築
    ///
    /// コードは一意。重複したコードは最初の出現を採用する。
    pub fn from_entries<I>(entries: I, normalizer: &Normalizer) -> Self
    where
        I: IntoIterator<Item = ReferenceEntry>,
    {
        let mut seen = HashSet::new();
        let mut kept = Vec::new();
        let mut duplicates_dropped = 0;

        for entry in entries {
            if seen.insert(entry.code.clone()) {
                kept.push(entry);
            } else {
                duplicates_dropped += 1;
            }
        }

        let normalized = kept
            .iter()
            .map(|entry| normalizer.normalize(&entry.description))
            .collect();

        Self {
            entries: kept,
            normalized,
            duplicates_dropped,
        }
    }

    /// 全エントリを取得
    pub fn entries(&self) -> &[ReferenceEntry] {
        &self.entries
    }

    /// コードで検索
    pub fn get(&self, code: &str) -> Option<&ReferenceEntry> {
        self.entries.iter().find(|entry| entry.code == code)
    }

    /// 全コード一覧（登録順）
    pub fn codes(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.code.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 照合キーの列（登録順）
    pub fn keys(&self, key: MatchKey) -> impl Iterator<Item = &str> {
        let normalized = matches!(key, MatchKey::Normalized);
        self.entries
            .iter()
            .zip(self.normalized.iter())
            .map(move |(entry, norm)| {
                if normalized {
                    norm.as_str()
                } else {
                    entry.description.as_str()
                }
            })
    }

    pub fn stats(&self) -> ReferenceStats {
        ReferenceStats {
            total_entries: self.entries.len(),
            empty_descriptions: self
                .entries
                .iter()
                .filter(|entry| entry.description.is_empty())
                .count(),
            duplicates_dropped: self.duplicates_dropped,
        }
    }
}
