//! ログ初期化
//!
//! 結果は標準出力に出すため、ログは標準エラーへ書く。
//! `RUST_LOG` があればそれを優先し、無ければ `--verbose` で debug、既定は warn。

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 既定のフィルタ
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "nadana_map=debug,nadana_map_common=debug"
    } else {
        "warn"
    }
}

pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    // 二重初期化（テストなど）は無視する
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}
