//! privacy-scout 命令行入口
//! scan：批量扫描URL并输出 JSON/CSV/汇总；request：处理一次边界层请求；signatures：查看签名库

use std::path::PathBuf;
use std::time::Duration;
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tokio::io::AsyncReadExt;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use privacy_scout::{
    handle_scan_request, to_csv, Category, ConfigManager, ScanMode, ScanResult, ScanSummary, Scanner,
};

#[derive(Parser)]
#[command(name = "privacy-scout")]
#[command(about = "Detect consent platforms, tag managers, tracking vendors and compliance tooling on web pages")]
#[command(version)]
struct Cli {
    /// 输出调试日志
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan URLs (arguments and/or a file with one URL per line)
    Scan {
        /// URLs to scan
        urls: Vec<String>,

        /// File with one URL per line
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Scan mode
        #[arg(short, long, value_enum, default_value_t = ModeArg::Quick)]
        mode: ModeArg,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Per-URL fetch timeout in milliseconds
        #[arg(long, default_value_t = privacy_scout::config::DEFAULT_FETCH_TIMEOUT_MS)]
        timeout_ms: u64,

        /// Extra signature file appended to the built-in catalog
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Handle one batch request body (JSON) from a file or stdin
    Request {
        /// Request file, stdin when omitted
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// List loaded signatures
    Signatures {
        /// Only this category (e.g. cmp, consentSignal, dsar)
        #[arg(short, long)]
        category: Option<Category>,

        /// Extra signature file appended to the built-in catalog
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Quick,
    Deep,
}

impl From<ModeArg> for ScanMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Quick => ScanMode::Quick,
            ModeArg::Deep => ScanMode::Deep,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Csv,
    Summary,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Scan { urls, input, mode, format, timeout_ms, catalog } => {
            let mut targets = urls;
            if let Some(path) = input {
                let content = tokio::fs::read_to_string(&path)
                    .await
                    .with_context(|| format!("读取URL文件失败：{}", path.display()))?;
                targets.extend(content.lines().map(str::to_string));
            }
            targets.retain(|url| !url.trim().is_empty());
            if targets.is_empty() {
                bail!("No URLs provided");
            }

            let mut builder = ConfigManager::custom()
                .fetch_timeout(Duration::from_millis(timeout_ms));
            if let Some(path) = catalog {
                builder = builder.extra_catalog_path(path);
            }
            let scanner = Scanner::new(builder.build()).await?;

            let mode = ScanMode::from(mode);
            let results = scan_all(&scanner, targets, mode).await;

            let output = match format {
                OutputFormat::Json => serde_json::to_string_pretty(&results)?,
                OutputFormat::Csv => to_csv(&results, mode)?,
                OutputFormat::Summary => ScanSummary::from_results(&results).to_string(),
            };
            println!("{}", output);
        }

        Commands::Request { file } => {
            let body = match file {
                Some(path) => tokio::fs::read(&path)
                    .await
                    .with_context(|| format!("读取请求文件失败：{}", path.display()))?,
                None => {
                    let mut buf = Vec::new();
                    tokio::io::stdin().read_to_end(&mut buf).await?;
                    buf
                }
            };

            let scanner = Scanner::new(ConfigManager::get_default()).await?;
            let response = handle_scan_request(&scanner, &body).await;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }

        Commands::Signatures { category, catalog } => {
            let mut builder = ConfigManager::custom();
            if let Some(path) = catalog {
                builder = builder.extra_catalog_path(path);
            }
            let scanner = Scanner::new(builder.build()).await?;

            let categories: Vec<Category> = match category {
                Some(category) => vec![category],
                None => Category::ALL.to_vec(),
            };
            for category in categories {
                let entries: Vec<_> = scanner.catalog().entries_for(category).collect();
                println!("{} ({})", category.label(), entries.len());
                for entry in entries {
                    println!("  {:<32} {} patterns", entry.name, entry.pattern_count());
                }
            }
        }
    }

    Ok(())
}

/// 日志输出到 stderr，stdout 只保留报告内容
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// 按批次上限循环调用批量扫描，直到没有剩余URL
async fn scan_all(scanner: &Scanner, urls: Vec<String>, mode: ScanMode) -> Vec<ScanResult> {
    let total = urls.len();
    let mut results = Vec::with_capacity(total);
    let mut remaining: &[String] = &urls;

    loop {
        let response = scanner.run_batch(remaining, mode).await;
        results.extend(response.results);
        info!("扫描进度：{}/{}", results.len(), total);
        if !response.has_more {
            break;
        }
        remaining = &remaining[scanner.config().batch_limit..];
        debug!("剩余{}个URL进入下一批次", remaining.len());
    }
    results
}
