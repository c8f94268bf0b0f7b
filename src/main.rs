use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use mist_parser::config::{split_dirs, Config};
use mist_parser::services::report::{render_file_report, render_summary};
use mist_parser::{logger, App};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

/// Mist_Parser 文档解析工具 - 将试卷文档转换为结构化题目
#[derive(Parser, Debug)]
#[command(name = "mist_parser", version, about)]
struct Cli {
    /// 配置文件路径（默认读取当前目录的 mist_parser.toml）
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// 显示详细日志
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 按题号锚点切分大文件
    Split(SplitArgs),
    /// 把文档转换为中间文本
    Convert(DirArgs),
    /// 调用大模型把中间文本抽取为题目 JSON
    Extract(ExtractArgs),
    /// 校验题目 JSON 文件或目录
    Check {
        /// JSON 文件或包含 JSON 文件的目录
        path: PathBuf,
    },
    /// 转换 + 抽取
    Run(RunArgs),
}

#[derive(Args, Debug)]
struct SplitArgs {
    #[command(flatten)]
    dirs: DirArgs,
    /// 每个切分片段的目标字符数
    #[arg(long)]
    chunk_size: Option<usize>,
    /// 向后查找题号的范围
    #[arg(long)]
    lookahead: Option<usize>,
}

#[derive(Args, Debug)]
struct DirArgs {
    /// 输入目录
    #[arg(long, short)]
    input: Option<PathBuf>,
    /// 输出目录
    #[arg(long, short)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ExtractArgs {
    #[command(flatten)]
    dirs: DirArgs,
    /// 答案文件搜索目录，多个目录用逗号分隔
    #[arg(long)]
    answers_dirs: Option<String>,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// 仅执行文档转换，跳过AI处理
    #[arg(long, conflicts_with = "only_ai")]
    skip_ai: bool,
    /// 仅执行AI处理，跳过文档转换
    #[arg(long)]
    only_ai: bool,
    /// 答案文件搜索目录，多个目录用逗号分隔
    #[arg(long)]
    answers_dirs: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("❌ {:#}", e);
            eprintln!("错误: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// 返回是否全部通过
async fn run(cli: Cli) -> Result<bool> {
    let mut config = Config::load(cli.config.as_deref()).context("加载配置失败")?;
    config.verbose_logging |= cli.verbose;
    logger::init(config.verbose_logging);

    match cli.command {
        Command::Split(args) => {
            if let Some(input) = args.dirs.input {
                config.input_large_dir = input;
            }
            if let Some(output) = args.dirs.output {
                config.split_output_dir = output;
            }
            config.chunk_size = args.chunk_size.unwrap_or(config.chunk_size);
            config.lookahead_range = args.lookahead.unwrap_or(config.lookahead_range);

            let stats = App::initialize(config)?.split_all().await?;
            Ok(stats.failed == 0)
        }
        Command::Convert(args) => {
            if let Some(input) = args.input {
                config.input_dir = input;
            }
            if let Some(output) = args.output {
                config.intermediate_dir = output;
            }
            let stats = App::initialize(config)?.convert_all().await?;
            Ok(stats.failed == 0)
        }
        Command::Extract(args) => {
            if let Some(input) = args.dirs.input {
                config.intermediate_dir = input;
            }
            if let Some(output) = args.dirs.output {
                config.output_dir = output;
            }
            if let Some(dirs) = args.answers_dirs {
                config.answers_dirs = split_dirs(&dirs);
            }
            let outcome = App::initialize(config)?.extract_all().await?;
            println!("{}", render_summary(&outcome.summary));
            Ok(outcome.summary.status.is_pass())
        }
        Command::Check { path } => {
            let outcome = App::new(config).check_path(&path).await?;
            for report in &outcome.reports {
                println!("{}\n", render_file_report(report));
            }
            if outcome.reports.len() > 1 {
                println!("{}", render_summary(&outcome.summary));
            }
            Ok(outcome.summary.status.is_pass())
        }
        Command::Run(args) => {
            if let Some(dirs) = args.answers_dirs {
                config.answers_dirs = split_dirs(&dirs);
            }
            App::initialize(config)?
                .run_pipeline(args.skip_ai, args.only_ai)
                .await
        }
    }
}
