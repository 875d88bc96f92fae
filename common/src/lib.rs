//! NadanaMap Common Library
//!
//! 診断名の自由記述から分類コードを引く照合パイプライン（I/Oなし）
//!
//! 正規化 → ファジー照合 → 結果組み立て

pub mod types;
pub mod error;
pub mod lemma;
pub mod normalizer;
pub mod similarity;
pub mod reference;
pub mod matcher;
pub mod assembler;
pub mod lookup;

pub use types::{MatchResult, ReferenceEntry};
pub use error::{Error, Result};
pub use lemma::Lemmatizer;
pub use normalizer::{normalize, normalize_value, Normalizer};
pub use reference::{MatchKey, ReferenceStats, ReferenceTable};
pub use matcher::{match_entries, match_table, DEFAULT_TOP_K};
pub use assembler::{assemble, assemble_json, justification, SCORE_PRECISION};
pub use lookup::{LookupContext, LookupOptions};
