//! 対話式照合モジュール
//!
//! 診断名を1件ずつ入力して照合結果を表示する。

use crate::cli::OutputFormat;
use crate::error::{MapperError, Result};
use crate::output::{render, EMPTY_QUERY_MESSAGE};
use dialoguer::Input;
use nadana_map_common::{Error, LookupContext};

/// 終了コマンド
const QUIT_COMMANDS: &[&str] = &[":q", ":quit", "exit", "quit"];

/// 1回の入力に対する応答
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// 表示する文字列
    Show(String),
    /// ループ終了
    Quit,
}

/// 入力1件を処理
///
/// 空入力は照合せず案内メッセージを返す。
pub fn respond(
    context: &LookupContext,
    input: &str,
    top_k: usize,
    format: OutputFormat,
) -> Result<Reply> {
    let trimmed = input.trim();

    if QUIT_COMMANDS.contains(&trimmed) {
        return Ok(Reply::Quit);
    }

    match context.lookup(trimmed, top_k) {
        Ok(matches) => Ok(Reply::Show(render(input, &matches, format)?)),
        Err(Error::EmptyQuery) => Ok(Reply::Show(EMPTY_QUERY_MESSAGE.to_string())),
        Err(e) => Err(e.into()),
    }
}

/// 対話ループ
pub fn run_interactive(context: &LookupContext, top_k: usize, format: OutputFormat) -> Result<()> {
    println!("🩺 NadanaMap - ICD-10 Diagnosis Mapper");
    println!("操作: 診断名を入力して[Enter] / [:q]終了");
    println!("例: Diabetes mellitus without complications\n");

    loop {
        let input: String = Input::new()
            .with_prompt("Diagnosis")
            .allow_empty(true)
            .interact_text()
            .map_err(|e| MapperError::Prompt(e.to_string()))?;

        match respond(context, &input, top_k, format)? {
            Reply::Show(text) => println!("{}", text),
            Reply::Quit => break,
        }
    }

    println!("✔ 終了しました");
    Ok(())
}
