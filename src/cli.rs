use crate::hierarchy::SourceFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "nadana-map")]
#[command(about = "ICD-10-CM診断名マッピングツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 参照テーブルのパス（設定ファイル・環境変数より優先）
    #[arg(long, global = true)]
    pub reference: Option<PathBuf>,

    /// 参照テーブルの形式 (csv/cms-order)
    #[arg(long, global = true)]
    pub source_format: Option<SourceFormat>,

    /// CMS order file のカテゴリ見出し行を除外
    #[arg(long, global = true)]
    pub billable_only: bool,

    /// 正規化せず元の説明文と照合（大文字小文字を区別）
    #[arg(long, global = true)]
    pub raw: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 診断名を1件照合
    Lookup {
        /// 診断名（自由記述）
        #[arg(required = true)]
        text: String,

        /// 取得件数
        #[arg(short = 'k', long, value_parser = clap::value_parser!(u32).range(1..))]
        top_k: Option<u32>,

        /// 出力形式 (markdown/json/text)
        #[arg(short, long, default_value = "markdown")]
        format: OutputFormat,
    },

    /// 対話的に照合
    Interactive {
        /// 取得件数
        #[arg(short = 'k', long, value_parser = clap::value_parser!(u32).range(1..))]
        top_k: Option<u32>,

        /// 出力形式 (markdown/json/text)
        #[arg(short, long, default_value = "markdown")]
        format: OutputFormat,
    },

    /// ファイルの診断名を一括照合してJSONを出力
    Batch {
        /// 入力ファイル（1行1件のテキスト、またはJSON配列）
        #[arg(required = true)]
        input: PathBuf,

        /// 出力JSONファイル（省略時は標準出力）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 取得件数
        #[arg(short = 'k', long, value_parser = clap::value_parser!(u32).range(1..))]
        top_k: Option<u32>,
    },

    /// コードの説明文と上位コードを表示
    Describe {
        /// 分類コード（例: E11.9）
        #[arg(required = true)]
        code: String,
    },

    /// 参照テーブルの情報を表示
    Info,

    /// 設定を表示/編集
    Config {
        /// 参照テーブルのパスを設定
        #[arg(long)]
        set_reference: Option<PathBuf>,

        /// 参照テーブルの形式を設定
        #[arg(long)]
        set_format: Option<SourceFormat>,

        /// 既定の取得件数を設定
        #[arg(long)]
        set_top_k: Option<usize>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

/// 照合結果の出力形式
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Markdown,
    Json,
    Text,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "json" => Ok(OutputFormat::Json),
            "text" | "txt" | "plain" => Ok(OutputFormat::Text),
            _ => Err(format!("Unknown format: {}. Use markdown, json, or text", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Markdown => write!(f, "markdown"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Text => write!(f, "text"),
        }
    }
}
