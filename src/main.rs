//! GitHub → Telegram relay CLI
//!
//! 接收 GitHub webhook，并把 push / workflow / check run 结果转发到 Telegram

use anyhow::Result;
use clap::{Parser, Subcommand};
use github_telegram_relay::cli::{handle_render, handle_serve, RenderArgs, ServeArgs};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "ghrelay")]
#[command(about = "GitHub webhook → Telegram 通知转发")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 启动 webhook 服务
    Serve(ServeArgs),
    /// 离线分类并渲染一个 payload（调试模板用）
    Render(RenderArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化 tracing 日志系统
    // 通过 RUST_LOG 环境变量控制日志级别，默认为 info
    // 例如: RUST_LOG=debug ghrelay serve
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("github_telegram_relay=info,ghrelay=info"));

    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => handle_serve(args).await?,
        Commands::Render(args) => handle_render(args)?,
    }

    Ok(())
}
