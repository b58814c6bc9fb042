// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::config::SumConfig;
use crate::demo_error::DemoError;
use crate::interrupt::terminate_on_ctrl_c;
use std::time::Instant;
use tasked_workers_core::{BackendError, BlockingFnBackend, Orchestrator, Status, TaskSource};

/// Sum of the integers in block `block` of `block_size`, clipped to `count`
fn block_sum(block: u64, block_size: u64, count: u64) -> u64 {
    let start = block * block_size;
    let end = (start + block_size).min(count);
    (start..end).sum()
}

pub async fn run(config: &SumConfig, worker_count: usize) -> Result<(), DemoError> {
    let SumConfig { count, block_size } = *config;
    let block_size = block_size.max(1);
    let blocks = count.div_ceil(block_size);

    println!("=== PARALLEL SUM ===");
    println!("  - Integers: {}", count);
    println!("  - Blocks: {} of {}", blocks, block_size);
    println!("  - Workers: {}", worker_count);

    let sequential_start = Instant::now();
    let expected: u64 = (0..blocks).map(|block| block_sum(block, block_size, count)).sum();
    println!(
        "\nSequential: {} in {:.2}ms",
        expected,
        sequential_start.elapsed().as_secs_f64() * 1000.0
    );

    let backend = BlockingFnBackend::<_, u64, u64>::new(move |block: u64, _slot_id: usize| {
        Ok::<_, BackendError>(block_sum(block, block_size, count))
    });
    let orchestrator = Orchestrator::new(
        TaskSource::lazy(blocks as usize, |index| index as u64),
        worker_count,
        backend,
        |partial: u64, acc: Option<u64>| acc.unwrap_or(0) + partial,
    )?;
    terminate_on_ctrl_c(&orchestrator)?;

    let parallel_start = Instant::now();
    orchestrator.run()?;
    let total = orchestrator
        .results_async_with(|slots| slots.into_iter().flatten().sum::<u64>())
        .await?;
    println!(
        "Parallel:   {} in {:.2}ms ({})",
        total,
        parallel_start.elapsed().as_secs_f64() * 1000.0,
        orchestrator.status()
    );

    if orchestrator.status() == Status::Completed && total != expected {
        return Err(DemoError::Mismatch(format!("{} != {}", total, expected)));
    }
    Ok(())
}
