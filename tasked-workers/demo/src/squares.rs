// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::config::SquaresConfig;
use crate::demo_error::DemoError;
use crate::interrupt::terminate_on_ctrl_c;
use std::time::Duration;
use tasked_workers_core::{BackendError, FnBackend, Orchestrator, ProgressEntry};
use tokio::time::sleep;
use tracing::warn;

fn append(item: u64, acc: Option<Vec<u64>>) -> Vec<u64> {
    let mut acc = acc.unwrap_or_default();
    acc.push(item);
    acc
}

/// Delay before item `item` answers, saturating instead of overflowing
fn item_delay(delay_ms_per_item: u64, item: u64) -> Duration {
    Duration::from_millis(delay_ms_per_item.saturating_mul(item))
}

fn print_progress(progress: &[ProgressEntry]) -> Result<(), DemoError> {
    println!("  progress: {}", serde_json::to_string(progress)?);
    Ok(())
}

/// Squares `0..count`, pausing once halfway through to show pause and resume
pub async fn run(
    config: &SquaresConfig,
    worker_count: usize,
    terminate_after: Option<Duration>,
) -> Result<(), DemoError> {
    let delay_ms_per_item = config.delay_ms_per_item;
    let interval = Duration::from_millis(config.progress_interval_ms.max(1));

    println!("=== SQUARES ===");
    println!("  - Items: {}", config.count);
    println!("  - Workers: {}", worker_count);

    let backend = FnBackend::new(move |item: u64, _slot_id: usize| async move {
        sleep(item_delay(delay_ms_per_item, item)).await;
        Ok::<_, BackendError>(item * item)
    });
    let items: Vec<u64> = (0..config.count).collect();
    let orchestrator = Orchestrator::new(items, worker_count, backend, append)?;
    terminate_on_ctrl_c(&orchestrator)?;

    println!("\nstatus: {}", orchestrator.status());
    print_progress(&orchestrator.progress())?;

    orchestrator.run()?;
    println!("\nstatus after run: {}", orchestrator.status());

    sleep(item_delay(delay_ms_per_item, config.count / 2)).await;
    match orchestrator.pause() {
        Ok(()) => println!("status after pause: {}", orchestrator.status()),
        Err(e) => warn!(error = %e, "pause skipped"),
    }
    print_progress(&orchestrator.progress())?;

    sleep(interval).await;
    match orchestrator.run() {
        Ok(()) => println!("status after resume: {}", orchestrator.status()),
        Err(e) => warn!(error = %e, "resume skipped"),
    }

    let printer = {
        let orchestrator = orchestrator.clone();
        tokio::spawn(async move {
            while !orchestrator.status().is_terminal() {
                if let Err(e) = print_progress(&orchestrator.progress()) {
                    warn!(error = %e, "progress printer stopped");
                    break;
                }
                sleep(interval).await;
            }
        })
    };

    if let Some(after) = terminate_after {
        let orchestrator = orchestrator.clone();
        tokio::spawn(async move {
            sleep(after).await;
            if let Err(e) = orchestrator.terminate() {
                warn!(error = %e, "scheduled terminate had no effect");
            }
        });
    }

    let squares: Vec<u64> = orchestrator
        .results_async_with(|slots| slots.into_iter().flatten().flatten().collect())
        .await?;
    printer.abort();

    println!("\n=== RESULT ({}) ===", orchestrator.status());
    println!("{:?}", squares);
    print_progress(&orchestrator.progress())?;
    Ok(())
}
