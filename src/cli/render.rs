// src/cli/render.rs
//! Render 命令 - 离线分类并渲染一个 webhook payload
//!
//! 用于调试模板：`ghrelay render --event workflow_run payload.json`

use crate::notification::{classify, formatter, EventEnvelope, NotificationIntent};
use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

/// Render 命令参数
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// 事件类型（x-github-event）
    #[arg(long, short)]
    pub event: String,

    /// payload JSON 文件，`-` 表示 stdin
    pub payload: PathBuf,

    /// 输出 JSON 格式
    #[arg(long)]
    pub json: bool,
}

/// Render 命令输出
#[derive(Debug, Serialize)]
pub struct RenderOutput {
    pub intent: NotificationIntent,
    pub text: Option<String>,
}

/// 分类并渲染
pub fn render_payload(event: &str, raw: &str) -> Result<RenderOutput> {
    let payload = serde_json::from_str(raw).context("Payload is not valid JSON")?;
    let intent = classify(&EventEnvelope::new(event, payload));
    let text = formatter::format(&intent).map(|m| m.text);
    Ok(RenderOutput { intent, text })
}

/// 处理 render 命令
pub fn handle_render(args: RenderArgs) -> Result<()> {
    let raw = if args.payload.as_os_str() == "-" {
        std::io::read_to_string(std::io::stdin()).context("Failed to read stdin")?
    } else {
        fs::read_to_string(&args.payload)
            .with_context(|| format!("Failed to read {}", args.payload.display()))?
    };

    let output = render_payload(&args.event, &raw)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        match &output.text {
            Some(text) => println!("{}", text),
            None => println!("(no message: {})", output.intent.kind()),
        }
    }

    Ok(())
}
