// ==========================================
// 工厂提货明细表自动拆分系统 - 命令行入口
// ==========================================
// 流程: 拆分 -> (可选) 逐个产物下载FBA箱唛
// ==========================================

use clap::Parser;
use pickup_splitter::labels::{LabelAuth, LabelClientConfig, LabelSession};
use pickup_splitter::{logging, process_file, SplitOptions};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "pickup-splitter", version, about = "工厂提货明细表自动拆分(保留模板公式 + SKU/工厂配置)")]
struct Cli {
    /// 文件1: 线上取回的发货明细表
    #[arg(long)]
    source: PathBuf,

    /// 配置表(含 SKU信息 / 工厂信息 两个sheet)
    #[arg(long)]
    config: PathBuf,

    /// 模板文件(不填则找程序同目录的 工厂提货明细模板.xlsx)
    #[arg(long)]
    template: Option<PathBuf>,

    /// 输出根目录
    #[arg(long)]
    out_dir: PathBuf,

    /// 预计提货日期,如 2026-08-30 / 2026.08.30
    #[arg(long)]
    date: String,

    /// 文件名里的时间段标记(可选)
    #[arg(long, default_value = "")]
    time_tag: String,

    /// 文件名里的产品标记(可选)
    #[arg(long, default_value = "")]
    product_tag: String,

    /// 文件名前缀(姓名)
    #[arg(long, default_value = "")]
    name: String,

    /// 按工厂建二级文件夹(--split-folders false 平铺输出)
    #[arg(long, action = clap::ArgAction::Set, default_value_t = true)]
    split_folders: bool,

    /// 积加 x-auth-token,提供 token 与 cookie 时启用箱唛下载
    #[arg(long)]
    token: Option<String>,

    /// 积加 cookie
    #[arg(long)]
    cookie: Option<String>,

    /// 箱唛打印限频秒数
    #[arg(long, default_value_t = 35)]
    cooldown: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: [&str; 9] = [
        "pickup-splitter",
        "--source", "a.xlsx",
        "--config", "c.xlsx",
        "--out-dir", "out",
        "--date", "2026-08-30",
    ];

    #[test]
    fn test_split_folders_defaults_on_and_can_turn_off() {
        let cli = Cli::try_parse_from(BASE).unwrap();
        assert!(cli.split_folders);

        let mut args = BASE.to_vec();
        args.extend(["--split-folders", "false"]);
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(!cli.split_folders);

        let mut args = BASE.to_vec();
        args.extend(["--split-folders", "true"]);
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(cli.split_folders);
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{} v{}", pickup_splitter::APP_NAME, pickup_splitter::VERSION);
    tracing::info!("==================================================");

    let cli = Cli::parse();
    let opts = SplitOptions {
        source_path: cli.source,
        config_path: cli.config,
        template_path: cli.template,
        out_root: cli.out_dir,
        pickup_date: cli.date,
        time_tag: cli.time_tag,
        product_tag: cli.product_tag,
        operator_name: cli.name,
        split_supplier_folder: cli.split_folders,
    };

    let outcome = match process_file(&opts) {
        Ok(o) => o,
        Err(e) => {
            tracing::error!("拆分失败: {}", e);
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(
        "拆分完成: {} 个供应商文件, {} 个失败",
        outcome.outputs.len(),
        outcome.failures.len()
    );
    for (supplier, reason) in &outcome.failures {
        tracing::warn!("供应商「{}」未产出: {}", supplier, reason);
    }

    // 箱唛下载: 单个文件失败不影响后续文件
    if let (Some(token), Some(cookie)) = (cli.token, cli.cookie) {
        let config = LabelClientConfig {
            cooldown: Duration::from_secs(cli.cooldown),
            ..LabelClientConfig::default()
        };
        let mut session = LabelSession::new(LabelAuth { token, cookie }, config);
        for path in &outcome.outputs {
            match session.download_labels_for_file(path).await {
                Ok(Some(zip)) => tracing::info!("箱唛: {} -> {}", path.display(), zip.display()),
                Ok(None) => {}
                Err(e) => tracing::warn!("箱唛下载失败 {}: {}", path.display(), e),
            }
        }
    }

    if outcome.outputs.is_empty() && !outcome.failures.is_empty() {
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
