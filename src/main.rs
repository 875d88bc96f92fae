use anyhow::Context;
use clap::Parser;
use nadana_map::{batch, cli, config, context, interactive, logging, output};
use cli::{Cli, Commands};
use config::Config;
use context::SourceSettings;
use nadana_map::hierarchy::{CodeHierarchy, SourceFormat};
use nadana_map_common::{Error, LookupContext};
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = Config::load().context("設定ファイルの読み込みに失敗しました")?;

    match cli.command {
        Commands::Config { set_reference, set_format, set_top_k, show } => {
            run_config(config, set_reference, set_format, set_top_k, show)
        }
        command => {
            let settings = SourceSettings::resolve(
                &config,
                cli.reference,
                cli.source_format,
                cli.billable_only,
                cli.raw,
            )?;
            run(command, &settings)
        }
    }
}

fn run_config(
    mut config: Config,
    set_reference: Option<PathBuf>,
    set_format: Option<SourceFormat>,
    set_top_k: Option<usize>,
    show: bool,
) -> anyhow::Result<()> {
    let mut changed = false;

    if let Some(path) = set_reference {
        config.set_reference(path)?;
        changed = true;
    }
    if let Some(format) = set_format {
        config.source_format = format;
        changed = true;
    }
    if let Some(top_k) = set_top_k {
        config.set_top_k(top_k)?;
        changed = true;
    }
    if changed {
        config.save()?;
        println!("✔ 設定を保存しました: {}", Config::config_path()?.display());
    }

    if show || !changed {
        println!("設定:");
        println!(
            "  参照テーブル: {}",
            config
                .reference_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "未設定（同梱サンプル）".into())
        );
        println!("  形式: {}", config.source_format);
        println!("  取得件数: {}", config.top_k()?);
        println!("  請求可能コードのみ: {}", if config.billable_only { "有効" } else { "無効" });
    }

    Ok(())
}

/// 参照テーブルを読み込み（用意できなければ起動中止）
fn load(settings: &SourceSettings) -> anyhow::Result<(Box<dyn CodeHierarchy>, LookupContext)> {
    context::load_with_progress(settings).map_err(|e| {
        if e.is_fatal_startup() {
            tracing::error!(error = %e, "参照テーブルを用意できないため起動を中止します");
        }
        anyhow::Error::new(e).context("参照テーブルを読み込めませんでした")
    })
}

fn run(command: Commands, settings: &SourceSettings) -> anyhow::Result<()> {
    match command {
        Commands::Lookup { text, top_k, format } => {
            if text.trim().is_empty() {
                println!("{}", output::EMPTY_QUERY_MESSAGE);
                return Ok(());
            }

            let (_source, ctx) = load(settings)?;
            let top_k = top_k.map(|k| k as usize).unwrap_or(settings.top_k);

            match ctx.lookup(&text, top_k) {
                Ok(matches) => println!("{}", output::render(&text, &matches, format)?),
                Err(Error::EmptyQuery) => println!("{}", output::EMPTY_QUERY_MESSAGE),
                Err(e) => return Err(e.into()),
            }
        }

        Commands::Interactive { top_k, format } => {
            let (_source, ctx) = load(settings)?;
            let top_k = top_k.map(|k| k as usize).unwrap_or(settings.top_k);

            interactive::run_interactive(&ctx, top_k, format)?;
        }

        Commands::Batch { input, output, top_k } => {
            eprintln!("📄 nadana-map - 一括照合\n");

            // 1. 入力読み込み
            eprintln!("[1/3] 入力を読み込み中...");
            let queries = batch::read_queries(&input)?;
            eprintln!("✔ {}件の診断名を検出\n", queries.len());

            // 2. 参照テーブル
            eprintln!("[2/3] 参照テーブルを準備中...");
            let (source, ctx) = load(settings)?;
            let top_k = top_k.map(|k| k as usize).unwrap_or(settings.top_k);

            // 3. 照合
            eprintln!("\n[3/3] 照合中...");
            let report = batch::run_batch(&ctx, &queries, top_k, source.name())?;
            batch::write_report(&report, output.as_deref())?;

            eprintln!(
                "\n✅ 完了: {}件 (空入力 {}件)",
                report.total, report.rejected
            );
            if let Some(path) = output {
                eprintln!("✔ 結果を保存: {}", path.display());
            }
        }

        Commands::Describe { code } => {
            let source = context::open(settings).context("参照テーブルを読み込めませんでした")?;

            match source.describe(&code) {
                Ok(Some(description)) => println!("{}  {}", code, description),
                Ok(None) if source.all_codes().contains(&code) => println!("{}  (説明文なし)", code),
                Ok(None) => {
                    println!("コードが見つかりません: {}", code);
                    return Ok(());
                }
                Err(e) => println!("{}  (説明文の取得に失敗: {})", code, e),
            }

            for (depth, ancestor) in source.ancestors(&code).iter().enumerate() {
                let description = source.describe(ancestor).ok().flatten().unwrap_or_default();
                println!("{}└ {}  {}", "  ".repeat(depth + 1), ancestor, description);
            }
        }

        Commands::Info => {
            let (source, ctx) = load(settings)?;
            let stats = ctx.table().stats();

            println!("参照テーブル情報:");
            println!("  ソース: {}", source.name());
            println!("  形式: {}", settings.format);
            println!("  コード数: {}", stats.total_entries);
            println!("  説明文なし: {}", stats.empty_descriptions);
            println!("  重複除外: {}", stats.duplicates_dropped);
            println!("  照合キー: {}", if settings.raw { "元の説明文" } else { "正規化済み" });
            println!("  取得件数: {}", settings.top_k);
        }

        Commands::Config { set_reference, set_format, set_top_k, show } => {
            let config = Config::load()?;
            run_config(config, set_reference, set_format, set_top_k, show)?;
        }
    }

    Ok(())
}
