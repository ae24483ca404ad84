mod api;
mod clipboard;
mod config;
mod dashboard;
mod error;
mod models;
mod progress;
mod scheduler;
mod utils;
mod viz;

use anyhow::Result;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use crate::clipboard::{copy_with_notice, NoticeBoard, SystemClipboard};
use crate::progress::{render_progress, LoadingIndicator, ProgressView};
use crate::viz::{ChartLayout, PieChartData};

#[derive(Parser)]
#[command(name = "donation-progress", about = "Fundraising progress from a public spreadsheet")]
struct Cli {
    /// Path to the TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch the donation figures once and show the progress bar
    Progress,
    /// Fetch the current EUR/BRL exchange rate
    Rate,
    /// Render the fundraising donut chart to a PNG file
    Chart {
        #[arg(short, long, default_value = "output/donation_chart.png")]
        output: PathBuf,
        /// Viewport width the chart is laid out for
        #[arg(long, default_value_t = 1024)]
        width: u32,
    },
    /// Keep refreshing progress and exchange rate until Ctrl-C
    Watch,
    /// Copy the PIX key to the clipboard
    CopyPix,
    /// Write the effective configuration to the config path
    InitConfig,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = config::get_config_path(cli.config.as_deref());
    let config = config::load_config(&config_path)?;
    let client = config.http.build_client()?;

    match cli.command {
        Command::Progress => {
            let (figures, source) =
                api::fetch_donation_figures_or_backup(&client, &config.sheet).await;
            render_progress(&ProgressView::new(&figures, source));
        }
        Command::Rate => {
            let rate = api::fetch_rate_or_backup(
                &client,
                &config.rate,
                LoadingIndicator::spinner("Fetching exchange rate..."),
            )
            .await;
            dashboard::print_rate(&rate, None);
        }
        Command::Chart { output, width } => {
            let snapshot = dashboard::refresh(
                &client,
                &config,
                LoadingIndicator::spinner("Fetching exchange rate..."),
            )
            .await;

            if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let data = PieChartData::new(&snapshot.figures, snapshot.figure_source);
            viz::render_pie_chart(&data, ChartLayout::for_viewport(width), &output)?;

            println!(
                "Progress: {:.1}% of the goal",
                snapshot.progress.percentage
            );
            dashboard::print_rate(&snapshot.rate, Some(snapshot.goal_in_euros));
            println!("✅ Chart generated: {}", output.display());
        }
        Command::Watch => {
            let pollers = dashboard::spawn_pollers(client, Arc::new(config));
            println!("Type `pause`, `resume` or `quit` and press Enter.");

            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            let mut stdin_open = true;
            loop {
                tokio::select! {
                    signal = tokio::signal::ctrl_c() => {
                        signal?;
                        break;
                    }
                    line = lines.next_line(), if stdin_open => match line?.as_deref().map(str::trim) {
                        Some("pause") => pollers.set_visible(false),
                        Some("resume") => pollers.set_visible(true),
                        Some("quit") => break,
                        Some("") => {}
                        Some(other) => println!("Unknown command: {}", other),
                        // stdin closed, keep running until Ctrl-C
                        None => stdin_open = false,
                    },
                }
            }

            println!("Stopping...");
            let last_goal = *pollers.goal_in_euros().borrow();
            pollers.stop().await;
            if let Some(goal) = last_goal {
                println!("Last goal in euros: {}", utils::format_eur(goal));
            }
        }
        Command::CopyPix => {
            let board = NoticeBoard::default();
            let hide = copy_with_notice(
                &SystemClipboard::default(),
                &config.pix.key,
                &board,
                config.pix.notice_duration(),
            )
            .await;

            if let Some(notice) = board.current() {
                println!("{}", notice.text());
            }
            hide.await?;
        }
        Command::InitConfig => {
            config::save_config(&config, &config_path)?;
            println!("✅ Config written to {}", config_path.display());
        }
    }

    Ok(())
}
