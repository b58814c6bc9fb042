// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::config::MatrixConfig;
use crate::demo_error::DemoError;
use crate::interrupt::terminate_on_ctrl_c;
use async_trait::async_trait;
use rand::Rng;
use std::sync::Arc;
use tasked_workers_core::{BackendError, Orchestrator, Status, TaskSource};
use tasked_workers_task_channels::{ChannelBackend, SlotWorker};

type Matrix = Vec<Vec<i64>>;

/// Output cell `(row, col, value)`
type Cell = (usize, usize, i64);

/// Computes single cells of `a * b`; every slot holds its own handle to both operands
struct CellWorker {
    a: Arc<Matrix>,
    b: Arc<Matrix>,
}

#[async_trait]
impl SlotWorker for CellWorker {
    type Input = (usize, usize);
    type Output = Cell;

    async fn process(
        &mut self,
        (row, col): (usize, usize),
        _slot_id: usize,
    ) -> Result<Cell, BackendError> {
        let value = cell(&self.a, &self.b, row, col).ok_or_else(|| {
            BackendError::new(format!("cell ({}, {}) is outside the product", row, col))
        })?;
        Ok((row, col, value))
    }
}

fn cell(a: &Matrix, b: &Matrix, row: usize, col: usize) -> Option<i64> {
    let a_row = a.get(row)?;
    a_row
        .iter()
        .zip(b)
        .map(|(x, b_row)| b_row.get(col).map(|y| x * y))
        .sum()
}

fn random_matrix(rng: &mut impl Rng, rows: usize, cols: usize, max_value: i64) -> Matrix {
    (0..rows)
        .map(|_| (0..cols).map(|_| rng.random_range(-max_value..=max_value)).collect())
        .collect()
}

fn sequential_product(a: &Matrix, b: &Matrix, cols: usize) -> Option<Matrix> {
    (0..a.len())
        .map(|row| (0..cols).map(|col| cell(a, b, row, col)).collect())
        .collect()
}

fn assemble(cells: impl IntoIterator<Item = Cell>, rows: usize, cols: usize) -> Matrix {
    let mut product = vec![vec![0; cols]; rows];
    for (row, col, value) in cells {
        product[row][col] = value;
    }
    product
}

fn append(cell: Cell, acc: Option<Vec<Cell>>) -> Vec<Cell> {
    let mut acc = acc.unwrap_or_default();
    acc.push(cell);
    acc
}

pub async fn run(config: &MatrixConfig, worker_count: usize) -> Result<(), DemoError> {
    let MatrixConfig {
        rows,
        inner,
        cols,
        max_value,
    } = *config;

    let mut rng = rand::rng();
    let a = Arc::new(random_matrix(&mut rng, rows, inner, max_value));
    let b = Arc::new(random_matrix(&mut rng, inner, cols, max_value));

    println!("=== MATRIX MULTIPLICATION ===");
    println!("  - A: {}x{}", rows, inner);
    println!("  - B: {}x{}", inner, cols);
    println!("  - Cells: {}", rows * cols);
    println!("  - Workers: {}", worker_count);

    let backend = {
        let (a, b) = (Arc::clone(&a), Arc::clone(&b));
        ChannelBackend::spawn(worker_count, move |_slot_id: usize| CellWorker {
            a: Arc::clone(&a),
            b: Arc::clone(&b),
        })
    };
    let cell_count = rows * cols;
    let orchestrator = Orchestrator::new(
        TaskSource::lazy(cell_count, move |index| (index / cols.max(1), index % cols.max(1))),
        worker_count,
        backend,
        append,
    )?;
    terminate_on_ctrl_c(&orchestrator)?;

    orchestrator.run()?;
    let product = orchestrator
        .results_async_with(|slots| assemble(slots.into_iter().flatten().flatten(), rows, cols))
        .await?;

    println!("\n=== RESULT ({}) ===", orchestrator.status());
    for row in &product {
        let line: Vec<String> = row.iter().map(|value| format!("{:>7}", value)).collect();
        println!("{}", line.join(""));
    }

    if orchestrator.status() == Status::Completed {
        let expected = sequential_product(&a, &b, cols)
            .ok_or_else(|| DemoError::Mismatch("operands have inconsistent shapes".to_string()))?;
        if product != expected {
            return Err(DemoError::Mismatch("matrix product differs".to_string()));
        }
        println!("\nVerified against sequential multiplication");
    }
    Ok(())
}
