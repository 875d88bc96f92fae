use thiserror::Error;

#[derive(Error, Debug)]
pub enum MapperError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("参照テーブルの読み込みに失敗: {0}")]
    ReferenceLoad(String),

    #[error("参照テーブルが空です: {0}")]
    EmptyReference(String),

    #[error("CSV解析エラー: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("入力エラー: {0}")]
    Prompt(String),

    #[error(transparent)]
    Common(#[from] nadana_map_common::Error),
}

impl MapperError {
    /// 起動時の致命的エラーか（参照テーブルが用意できない）
    pub fn is_fatal_startup(&self) -> bool {
        matches!(
            self,
            MapperError::FileNotFound(_)
                | MapperError::ReferenceLoad(_)
                | MapperError::EmptyReference(_)
                | MapperError::Csv(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, MapperError>;
