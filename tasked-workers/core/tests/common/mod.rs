// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tasked_workers_core::{BackendError, ExecutionBackend, Orchestrator, ProgressEntry};
use tokio::sync::Semaphore;

pub fn append<T>(item: T, acc: Option<Vec<T>>) -> Vec<T> {
    let mut acc = acc.unwrap_or_default();
    acc.push(item);
    acc
}

pub fn flatten<T>(slots: Vec<Option<Vec<T>>>) -> Vec<T> {
    slots.into_iter().flatten().flatten().collect()
}

/// Observation points shared between a test and its `GatedBackend`
#[derive(Clone)]
pub struct Tracker {
    pub gate: Arc<Semaphore>,
    pub started: Arc<Mutex<Vec<(usize, u64)>>>,
    pub released: Arc<Mutex<Vec<usize>>>,
}

impl Tracker {
    pub fn closed() -> Self {
        Self {
            gate: Arc::new(Semaphore::new(0)),
            started: Arc::new(Mutex::new(Vec::new())),
            released: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn open() -> Self {
        let tracker = Self::closed();
        tracker.open_gate();
        tracker
    }

    pub fn open_gate(&self) {
        self.gate.add_permits(Semaphore::MAX_PERMITS / 2);
    }

    pub fn started_inputs(&self) -> Vec<u64> {
        let mut inputs: Vec<u64> = self.started.lock().unwrap().iter().map(|(_, i)| *i).collect();
        inputs.sort_unstable();
        inputs
    }

    pub fn released_slots(&self) -> Vec<usize> {
        let mut slots = self.released.lock().unwrap().clone();
        slots.sort_unstable();
        slots
    }
}

/// Squares its input once a gate permit is available
/// Inputs below `free_below` skip the gate
pub struct GatedBackend {
    pub tracker: Tracker,
    pub free_below: u64,
}

impl GatedBackend {
    pub fn new(tracker: &Tracker) -> Self {
        Self {
            tracker: tracker.clone(),
            free_below: 0,
        }
    }

    pub fn with_free_below(tracker: &Tracker, free_below: u64) -> Self {
        Self {
            tracker: tracker.clone(),
            free_below,
        }
    }
}

#[async_trait]
impl ExecutionBackend for GatedBackend {
    type Input = u64;
    type Output = u64;

    async fn execute(&self, input: u64, slot_id: usize) -> Result<u64, BackendError> {
        self.tracker.started.lock().unwrap().push((slot_id, input));
        if input >= self.free_below {
            let permit = self
                .tracker
                .gate
                .acquire()
                .await
                .map_err(|_| BackendError::new("gate closed"))?;
            permit.forget();
        }
        Ok(input * input)
    }

    fn release(&self, slot_id: usize) {
        self.tracker.released.lock().unwrap().push(slot_id);
    }
}

pub async fn wait_until<B, V>(
    orchestrator: &Orchestrator<B, V>,
    predicate: impl Fn(&[ProgressEntry]) -> bool,
) where
    B: ExecutionBackend,
    V: Clone + Send + 'static,
{
    tokio::time::timeout(Duration::from_secs(5), async {
        while !predicate(&orchestrator.progress()) {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    })
    .await
    .expect("progress condition not reached in time");
}
