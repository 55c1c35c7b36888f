//! 命令行入口
//!
//! `run` 在终端里跑整个组件（控制台渲染器），
//! `report` / `export` / `clear` 操作本地事件日志。

use std::process;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use colored::Colorize;

use crate::analytics::{AnalyticsReport, EventLog};
use crate::config::AdsConfig;
use crate::errors::{DocadsError, Result};
use crate::render::{Placement, Renderer};
use crate::widget::AdsWidget;

#[derive(Parser)]
#[command(name = "docads", version, about = "Promotional banner rotation and analytics for documentation sites")]
pub struct Cli {
    /// 配置文件路径（默认探测 docads.toml）
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// 启动轮换并持续运行，Ctrl-C 退出
    Run {
        /// 页面 URL（写入统计事件）
        #[arg(long, default_value = "https://docs.example.com/")]
        page_url: String,
        /// 页面标题
        #[arg(long, default_value = "Documentation")]
        page_title: String,
    },
    /// 打印统计汇总
    Report,
    /// 导出事件日志为 JSON 文件
    Export {
        /// 输出目录（默认取配置中的 export_dir）
        #[arg(long)]
        dir: Option<String>,
    },
    /// 清空本地事件日志
    Clear,
}

/// 控制台渲染器：把广告以文本形式打到终端
struct ConsoleRenderer;

impl Renderer for ConsoleRenderer {
    fn render(&self, placement: Placement, html: &str) -> bool {
        println!("{} {}", format!("[{}]", placement).cyan().bold(), html);
        true
    }

    fn set_visible(&self, placement: Placement, visible: bool) {
        println!(
            "{} visibility -> {}",
            format!("[{}]", placement).cyan().bold(),
            visible
        );
    }
}

pub async fn run_cli() {
    if let Err(e) = run_cli_inner().await {
        eprintln!("{}", e.format_colored());
        process::exit(1);
    }
}

async fn run_cli_inner() -> Result<()> {
    let cli = Cli::parse();

    let config = match cli.config {
        Some(ref path) => AdsConfig::load_from_file(path)?,
        None => AdsConfig::load()?,
    };

    let _log_guard = crate::system::logging::init_logging(&config.logging);

    match cli.command {
        Command::Run {
            page_url,
            page_title,
        } => run_widget(config, page_url, page_title).await,
        Command::Report => print_report(&config),
        Command::Export { dir } => export_log(&config, dir),
        Command::Clear => clear_log(&config),
    }
}

async fn run_widget(config: AdsConfig, page_url: String, page_title: String) -> Result<()> {
    let context = crate::analytics::PageContext::new(page_url, page_title);
    let widget = AdsWidget::new(config, context, Arc::new(ConsoleRenderer))?;

    widget.init();
    println!("Session: {}", widget.session_id().yellow());
    println!("Rotation running, press Ctrl-C to stop");

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| DocadsError::file_operation(format!("Failed to wait for Ctrl-C: {}", e)))?;

    widget.stop();
    println!("Stopped");
    Ok(())
}

fn print_report(config: &AdsConfig) -> Result<()> {
    let log = EventLog::open(&config.analytics_file);
    log.reload()?;
    let report = AnalyticsReport::from_events(&log.load());

    println!("{}", "Analytics Report".bold().underline());
    println!("  Total events:    {}", report.total_events);
    println!("  Impressions:     {}", report.impressions);
    println!("  Clicks:          {}", report.clicks);
    println!("  Unique sessions: {}", report.unique_sessions);

    if !report.ad_performance.is_empty() {
        println!("{}", "Per-ad performance".bold());
        for (ad_id, perf) in &report.ad_performance {
            println!(
                "  {:<24} impressions={:<4} clicks={}",
                ad_id.green(),
                perf.impressions,
                perf.clicks
            );
        }
    }
    Ok(())
}

fn export_log(config: &AdsConfig, dir: Option<String>) -> Result<()> {
    let log = EventLog::open(&config.analytics_file);
    log.reload()?;
    let dir = dir.unwrap_or_else(|| config.export_dir.clone());
    let path = log.export_to(&dir)?;
    println!("Exported to {}", path.display().to_string().green());
    Ok(())
}

fn clear_log(config: &AdsConfig) -> Result<()> {
    let log = EventLog::open(&config.analytics_file);
    log.clear()?;
    // 会话标识在进程内存里，下次 run 自然是新会话
    println!("Analytics data cleared");
    Ok(())
}
