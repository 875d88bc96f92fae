//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("Please enter a diagnosis to search.")]
    EmptyQuery,

    #[error("top_k must be at least 1 (got {0})")]
    InvalidTopK(usize),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
