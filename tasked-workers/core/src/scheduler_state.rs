// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{
    CompletionSignal, ExecutionBackend, ProgressEntry, ResultAggregator, Status, TaskSource,
};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::runtime::Handle;

/// Everything the orchestrator and the slot drivers mutate, kept behind one lock
pub(crate) struct SchedulerState<T, U, V> {
    pub(crate) status: Status,
    pub(crate) progress: Vec<ProgressEntry>,
    pub(crate) source: TaskSource<T>,
    pub(crate) aggregator: ResultAggregator<U, V>,
    /// Captured on the first `run()`; every dispatch spawns onto it
    pub(crate) runtime: Option<Handle>,
}

pub(crate) type StateOf<B, V> =
    SchedulerState<<B as ExecutionBackend>::Input, <B as ExecutionBackend>::Output, V>;

impl<T, U, V> SchedulerState<T, U, V> {
    pub(crate) fn all_exhausted(&self) -> bool {
        self.progress.iter().all(ProgressEntry::is_exhausted)
    }
}

/// State shared between the orchestrator handle and in-flight dispatches
pub(crate) struct Shared<B: ExecutionBackend, V> {
    state: Mutex<StateOf<B, V>>,
    pub(crate) backend: B,
    pub(crate) completion: CompletionSignal,
    pub(crate) total: usize,
}

impl<B: ExecutionBackend, V> Shared<B, V> {
    pub(crate) fn new(state: StateOf<B, V>, backend: B, total: usize) -> Self {
        Self {
            state: Mutex::new(state),
            backend,
            completion: CompletionSignal::new(),
            total,
        }
    }

    /// Locks the state, recovering it if a task generator panicked while holding the lock
    pub(crate) fn lock(&self) -> MutexGuard<'_, StateOf<B, V>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
