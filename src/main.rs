mod app;
mod color;
mod config;
mod data;
mod export;
mod render;
mod state;
mod ui;

use std::path::PathBuf;

use anyhow::Result;
use app::PlaxisGraphApp;
use clap::Parser;
use config::AppConfig;
use eframe::egui;
use state::{AppState, LoadedBatch};

/// Depth-profile charts and per-stage maxima for PLAXIS 2D plate exports.
#[derive(Parser, Debug)]
#[command(name = "plaxis-graph", version)]
struct Args {
    /// Folder holding the stage exports (defaults to the configured folder).
    dir: Option<PathBuf>,

    /// JSON configuration file.
    #[arg(long, env = "PLAXIS_GRAPH_CONFIG")]
    config: Option<PathBuf>,

    /// Process the folder, write the figure and summary, print the table, exit.
    #[arg(long)]
    headless: bool,

    /// Write the effective configuration to this file and exit.
    #[arg(long, value_name = "PATH")]
    write_config: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let mut config = AppConfig::load_or_default(args.config.as_deref())?;
    if let Some(dir) = args.dir {
        config.input.dir = dir;
    }

    if let Some(path) = &args.write_config {
        config.save(path)?;
        println!("wrote {}", path.display());
        return Ok(());
    }

    if args.headless {
        return run_headless(&config);
    }

    let mut state = AppState::new(config);
    let start_dir = state.config.input.dir.clone();
    if start_dir.is_dir() {
        state.load_dir(&start_dir);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "PLAXIS2D Analysis Output",
        options,
        Box::new(|_cc| Ok(Box::new(PlaxisGraphApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("viewer failed: {e}"))
}

fn run_headless(config: &AppConfig) -> Result<()> {
    let batch = LoadedBatch::load(&config.input.dir, config)?;
    for path in batch.export(config)? {
        println!("wrote {}", path.display());
    }
    println!("{}", batch.table.to_text());
    Ok(())
}
