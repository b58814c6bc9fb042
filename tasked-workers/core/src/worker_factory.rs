// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

/// Builds the worker that serves one slot of a backend
///
/// Backends call `create_worker` exactly once per slot, in slot order, when
/// they spawn their workers. The worker it returns owns that slot's inputs
/// for the whole run, so per-slot state belongs in the worker rather than in
/// the factory.
pub trait WorkerFactory<W>: Send {
    fn create_worker(&mut self, slot_id: usize) -> W;

    /// One worker per slot in `0..slot_count`
    fn create_workers(&mut self, slot_count: usize) -> Vec<W> {
        (0..slot_count).map(|slot_id| self.create_worker(slot_id)).collect()
    }
}

/// Closures taking the slot id are factories
impl<F, W> WorkerFactory<W> for F
where
    F: FnMut(usize) -> W + Send,
{
    fn create_worker(&mut self, slot_id: usize) -> W {
        self(slot_id)
    }
}
