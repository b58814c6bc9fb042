// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Per-slot dispatch loop
//!
//! A slot owns one range and walks it one index at a time: the next index is
//! only dispatched after the backend resolves the current one, and only while
//! the scheduler is running. Every function here runs with the scheduler
//! state locked by the caller, except the spawned backend call itself.
//! That call runs on its own task so a panicking backend surfaces as a
//! failure of its slot.

use crate::scheduler_state::{Shared, StateOf};
use crate::{BackendError, ExecutionBackend, SchedulerError, Status};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Hands `index` of `slot_id` to the backend on a fresh task
pub(crate) fn dispatch<B, V>(
    shared: &Arc<Shared<B, V>>,
    state: &mut StateOf<B, V>,
    slot_id: usize,
    index: usize,
) where
    B: ExecutionBackend,
    V: Clone + Send + 'static,
{
    let Some(runtime) = state.runtime.clone() else {
        warn!(slot_id, index, "dispatch requested before the scheduler started");
        return;
    };

    let Some(input) = state.source.take(index) else {
        let source = BackendError::new(format!("no input available for index {}", index));
        fail(shared, state, slot_id, index, source);
        return;
    };

    state.progress[slot_id].running = Some(index);
    debug!(slot_id, index, "dispatching");

    let shared = Arc::clone(shared);
    runtime.clone().spawn(async move {
        let call = {
            let shared = Arc::clone(&shared);
            runtime.spawn(async move { shared.backend.execute(input, slot_id).await })
        };
        let outcome = call.await.unwrap_or_else(|e| {
            Err(BackendError::new(format!(
                "backend task for slot {} failed: {}",
                slot_id, e
            )))
        });
        resolve(&shared, slot_id, index, outcome);
    });
}

/// Applies the backend's answer for `index` and moves the slot forward
pub(crate) fn resolve<B, V>(
    shared: &Arc<Shared<B, V>>,
    slot_id: usize,
    index: usize,
    outcome: Result<B::Output, BackendError>,
) where
    B: ExecutionBackend,
    V: Clone + Send + 'static,
{
    let mut state = shared.lock();

    if state.status.is_terminal() {
        debug!(slot_id, index, status = %state.status, "ignoring late resolution");
        return;
    }

    let output = match outcome {
        Ok(output) => output,
        Err(source) => {
            fail(shared, &mut state, slot_id, index, source);
            return;
        }
    };

    if let Err(source) = state.aggregator.fold(slot_id, output) {
        fail(shared, &mut state, slot_id, index, source);
        return;
    }
    state.progress[slot_id].finished = Some(index);
    debug!(slot_id, index, "resolved");

    let entry = state.progress[slot_id];
    if entry.is_exhausted() {
        debug!(slot_id, "slot exhausted");
        shared.backend.release(slot_id);
        complete_if_exhausted(shared, &mut state);
    } else if state.status == Status::Running {
        dispatch(shared, &mut state, slot_id, entry.next_index());
    }
}

/// Moves to `Completed` once every slot is exhausted; returns whether it did
pub(crate) fn complete_if_exhausted<B, V>(
    shared: &Shared<B, V>,
    state: &mut StateOf<B, V>,
) -> bool
where
    B: ExecutionBackend,
{
    if !state.all_exhausted() {
        return false;
    }

    state.status = Status::Completed;
    info!(total = shared.total, slots = state.progress.len(), "workers completed");
    shared.completion.fire();
    true
}

fn fail<B, V>(
    shared: &Shared<B, V>,
    state: &mut StateOf<B, V>,
    slot_id: usize,
    index: usize,
    source: BackendError,
) where
    B: ExecutionBackend,
{
    error!(slot_id, index, error = %source, "backend failed");
    state.aggregator.record_failure(SchedulerError::BackendFailure {
        slot_id,
        index,
        source,
    });
    shared.backend.release(slot_id);
    shared.completion.fire();
}
