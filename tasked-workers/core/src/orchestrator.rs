// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::range_partitioner::partition;
use crate::scheduler_state::{SchedulerState, Shared, StateOf};
use crate::slot_driver;
use crate::{
    ExecutionBackend, ProgressEntry, ResultAggregator, SchedulerError, SchedulerResult, Status,
    TaskSource,
};
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::{debug, info};

/// Orchestrator fans a task source out over a fixed number of worker slots
/// and folds every slot's outputs into one aggregate per slot
///
/// Clones are handles to the same scheduler; separate `new` calls are independent.
pub struct Orchestrator<B: ExecutionBackend, V> {
    shared: Arc<Shared<B, V>>,
}

impl<B: ExecutionBackend, V> Clone for Orchestrator<B, V> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<B: ExecutionBackend, V: Clone + Send + 'static> Orchestrator<B, V> {
    /// Partitions `source` into `worker_count` ranges; nothing is dispatched until `run()`
    pub fn new<S, R>(
        source: S,
        worker_count: usize,
        backend: B,
        reducer: R,
    ) -> SchedulerResult<Self>
    where
        S: Into<TaskSource<B::Input>>,
        R: Fn(B::Output, Option<V>) -> V + Send + 'static,
    {
        if worker_count == 0 {
            return Err(SchedulerError::InvalidConfiguration(
                "worker count must be greater than zero".to_string(),
            ));
        }

        let source = source.into();
        let total = source.len();
        if total > 0 && worker_count > total {
            debug!(total, worker_count, "more workers than tasks, trailing slots stay empty");
        }

        let progress = partition(total, worker_count)
            .into_iter()
            .map(ProgressEntry::new)
            .collect();

        let state = SchedulerState {
            status: Status::NeverStarted,
            progress,
            source,
            aggregator: ResultAggregator::new(worker_count, reducer),
            runtime: None,
        };

        debug!(total, worker_count, "scheduler created");
        Ok(Self {
            shared: Arc::new(Shared::new(state, backend, total)),
        })
    }

    pub fn worker_count(&self) -> usize {
        self.shared.lock().progress.len()
    }

    /// Number of task indices across all slots
    pub fn total(&self) -> usize {
        self.shared.total
    }

    pub fn status(&self) -> Status {
        self.shared.lock().status
    }

    /// Snapshot of every slot's progress, in slot order
    pub fn progress(&self) -> Vec<ProgressEntry> {
        self.shared.lock().progress.clone()
    }

    /// Starts the workers, or resumes them after `pause()`
    ///
    /// A no-op while already running. Must be called from within a tokio
    /// runtime the first time; every dispatch is spawned onto that runtime.
    pub fn run(&self) -> SchedulerResult<()> {
        let mut state = self.shared.lock();
        state.status.check_active()?;

        match state.status {
            Status::NeverStarted => self.start(&mut state),
            Status::Paused => {
                self.resume(&mut state);
                Ok(())
            }
            _ => {
                debug!("run requested while already running");
                Ok(())
            }
        }
    }

    /// Stops dispatching new indices; work already handed to the backend still resolves
    pub fn pause(&self) -> SchedulerResult<()> {
        let mut state = self.shared.lock();
        state.status.check_active()?;

        match state.status {
            Status::Running => {
                state.status = Status::Paused;
                info!("workers paused");
            }
            status => debug!(%status, "pause has no effect"),
        }
        Ok(())
    }

    /// Abandons all further dispatch and releases waiters with the partial results
    ///
    /// In-flight backend calls are not awaited; their results are discarded.
    pub fn terminate(&self) -> SchedulerResult<()> {
        let mut state = self.shared.lock();
        state.status.check_active()?;

        let previous = state.status;
        state.status = Status::Terminated;

        for (slot_id, entry) in state.progress.iter().enumerate() {
            if !entry.is_exhausted() {
                self.shared.backend.release(slot_id);
            }
        }
        self.shared.completion.fire();

        let finished: usize = state.progress.iter().map(ProgressEntry::completed_count).sum();
        info!(%previous, finished, total = self.shared.total, "workers terminated");
        Ok(())
    }

    fn start(&self, state: &mut StateOf<B, V>) -> SchedulerResult<()> {
        let runtime = Handle::try_current().map_err(|_| SchedulerError::RuntimeUnavailable)?;
        state.runtime = Some(runtime);
        state.status = Status::Running;
        info!(
            total = self.shared.total,
            workers = state.progress.len(),
            "workers started"
        );

        for slot_id in 0..state.progress.len() {
            let entry = state.progress[slot_id];
            if entry.is_exhausted() {
                debug!(slot_id, "empty range, nothing to dispatch");
                self.shared.backend.release(slot_id);
                continue;
            }
            slot_driver::dispatch(&self.shared, state, slot_id, entry.from);
        }

        slot_driver::complete_if_exhausted(&self.shared, state);
        Ok(())
    }

    fn resume(&self, state: &mut StateOf<B, V>) {
        state.status = Status::Running;
        info!("workers resumed");

        for slot_id in 0..state.progress.len() {
            let entry = state.progress[slot_id];
            if entry.is_idle() && !entry.is_exhausted() {
                slot_driver::dispatch(&self.shared, state, slot_id, entry.next_index());
            }
        }
    }

    /// Current per-slot aggregates; `None` for slots with no folded output yet
    pub fn results(&self) -> Vec<Option<V>> {
        self.shared.lock().aggregator.snapshot()
    }

    pub fn results_with<Z>(&self, transform: impl FnOnce(Vec<Option<V>>) -> Z) -> Z {
        transform(self.results())
    }

    /// Waits for completion or termination, then returns the aggregates
    ///
    /// Fails with the first `BackendFailure` if a dispatched unit of work failed.
    pub async fn results_async(&self) -> SchedulerResult<Vec<Option<V>>> {
        self.shared.completion.wait().await;

        let state = self.shared.lock();
        if let Some(failure) = state.aggregator.failure() {
            return Err(failure.clone());
        }
        Ok(state.aggregator.snapshot())
    }

    pub async fn results_async_with<Z>(
        &self,
        transform: impl FnOnce(Vec<Option<V>>) -> Z,
    ) -> SchedulerResult<Z> {
        self.results_async().await.map(transform)
    }
}
