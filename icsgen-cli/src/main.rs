mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "icsgen")]
#[command(about = "iCalendar (RFC 5545) 文档生成工具")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 启用详细日志
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// 生成日历并输出到标准输出
    Generate {
        /// JSON格式的日历文档
        #[arg(short, long)]
        input: Option<String>,

        /// 产品标识 (PRODID)
        #[arg(long)]
        prod_id: Option<String>,

        /// 日历名称
        #[arg(long)]
        name: Option<String>,

        /// 日历描述
        #[arg(long)]
        description: Option<String>,

        /// 时区标识，例如 Asia/Shanghai
        #[arg(short, long)]
        timezone: Option<String>,

        /// 方法 (PUBLISH, REQUEST, ...)
        #[arg(short, long)]
        method: Option<String>,

        /// 历法
        #[arg(long)]
        calendar_scale: Option<String>,
    },

    /// 显示一条内容行的折叠结果
    Fold {
        /// 未折叠的内容行
        line: String,

        /// 每行最大字节数
        #[arg(long, default_value = "75")]
        max_octets: usize,
    },

    /// 显示文本转义后的结果
    Escape {
        /// 原始文本
        text: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // 设置日志级别
    let log_level = if cli.verbose { "debug" } else { "info" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("icsgen_cli={log_level},icsgen_core={log_level}").into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Generate {
            input,
            prod_id,
            name,
            description,
            timezone,
            method,
            calendar_scale,
        } => commands::generate_command(commands::GenerateParams {
            input,
            prod_id,
            name,
            description,
            timezone,
            method,
            calendar_scale,
        }),

        Commands::Fold { line, max_octets } => commands::fold_command(&line, max_octets),

        Commands::Escape { text } => commands::escape_command(&text),
    }
}
