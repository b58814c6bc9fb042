// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

mod config;
mod demo_error;
mod interrupt;
mod matrix;
mod squares;
mod sum;

use clap::{Parser, Subcommand};
use config::DemoConfig;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "tasked-workers", about = "Range-partitioned worker pool demos")]
struct Cli {
    /// JSON config file; missing or invalid files fall back to defaults
    #[arg(long, default_value = "config.json")]
    config: String,

    /// Overrides `worker_count` from the config
    #[arg(long)]
    workers: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sums 0..count in blocks on blocking threads
    Sum {
        #[arg(long)]
        count: Option<u64>,
    },
    /// Multiplies two random matrices one cell per task on channel workers
    Matrix {
        #[arg(long)]
        rows: Option<usize>,
        #[arg(long)]
        cols: Option<usize>,
    },
    /// Squares slow items while pausing, resuming and printing progress
    Squares {
        #[arg(long)]
        count: Option<u64>,
        /// Terminates the workers after this many milliseconds
        #[arg(long)]
        terminate_after_ms: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let mut config = DemoConfig::load_or_default(&cli.config);
    if let Some(workers) = cli.workers {
        config.worker_count = workers;
    }

    println!("Configuration: {}", cli.config);
    let start = Instant::now();

    match cli.command {
        Command::Sum { count } => {
            if let Some(count) = count {
                config.sum.count = count;
            }
            sum::run(&config.sum, config.worker_count).await?;
        }
        Command::Matrix { rows, cols } => {
            if let Some(rows) = rows {
                config.matrix.rows = rows;
            }
            if let Some(cols) = cols {
                config.matrix.cols = cols;
            }
            matrix::run(&config.matrix, config.worker_count).await?;
        }
        Command::Squares {
            count,
            terminate_after_ms,
        } => {
            if let Some(count) = count {
                config.squares.count = count;
            }
            let terminate_after = terminate_after_ms.map(Duration::from_millis);
            squares::run(&config.squares, config.worker_count, terminate_after).await?;
        }
    }

    println!("\nTotal time: {:.2}s", start.elapsed().as_secs_f64());
    Ok(())
}
