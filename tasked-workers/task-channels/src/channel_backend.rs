// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{FnWorker, SlotWorker};
use async_trait::async_trait;
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tasked_workers_core::{BackendError, ExecutionBackend, WorkerFactory};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

type Reply<U> = oneshot::Sender<Result<U, BackendError>>;
type Job<W> = (<W as SlotWorker>::Input, Reply<<W as SlotWorker>::Output>);

/// Backend with one tokio task per slot, fed over an mpsc channel
///
/// Releasing a slot closes its channel: the worker finishes whatever it is
/// processing and exits. Later calls for that slot fail.
pub struct ChannelBackend<W: SlotWorker> {
    senders: Mutex<Vec<Option<mpsc::Sender<Job<W>>>>>,
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl<W: SlotWorker> ChannelBackend<W> {
    /// Spawns one worker per slot; must be called from within a tokio runtime
    pub fn spawn(worker_count: usize, mut factory: impl WorkerFactory<W>) -> Self {
        let mut senders = Vec::with_capacity(worker_count);
        let mut handles = Vec::with_capacity(worker_count);

        for (slot_id, worker) in factory.create_workers(worker_count).into_iter().enumerate() {
            let (tx, rx) = mpsc::channel(1);
            handles.push(tokio::spawn(run_worker(slot_id, worker, rx)));
            senders.push(Some(tx));
        }

        debug!(worker_count, "channel workers spawned");
        Self {
            senders: Mutex::new(senders),
            handles: Mutex::new(handles),
        }
    }

    pub fn worker_count(&self) -> usize {
        self.lock_senders().len()
    }

    pub fn is_released(&self, slot_id: usize) -> bool {
        self.lock_senders()
            .get(slot_id)
            .map_or(true, Option::is_none)
    }

    /// Releases every slot still open
    pub fn shutdown(&self) {
        let worker_count = self.worker_count();
        for slot_id in 0..worker_count {
            self.release(slot_id);
        }
    }

    /// Waits for every worker task to exit; only returns once all slots are released
    pub async fn join(&self) {
        let handles = {
            let mut handles = self.handles.lock().unwrap_or_else(PoisonError::into_inner);
            std::mem::take(&mut *handles)
        };
        for (slot_id, handle) in handles.into_iter().enumerate() {
            if let Err(e) = handle.await {
                warn!(slot_id, error = %e, "worker task failed");
            }
        }
    }

    fn lock_senders(&self) -> MutexGuard<'_, Vec<Option<mpsc::Sender<Job<W>>>>> {
        self.senders.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn sender(&self, slot_id: usize) -> Result<mpsc::Sender<Job<W>>, BackendError> {
        match self.lock_senders().get(slot_id) {
            None => Err(BackendError::new(format!("no worker for slot {}", slot_id))),
            Some(None) => Err(BackendError::new(format!(
                "worker for slot {} has been released",
                slot_id
            ))),
            Some(Some(sender)) => Ok(sender.clone()),
        }
    }
}

impl<F, Fut, T, U> ChannelBackend<FnWorker<F, T, U>>
where
    F: Fn(T, usize) -> Fut + Clone + Send + 'static,
    Fut: Future<Output = Result<U, BackendError>> + Send,
    T: Send + 'static,
    U: Send + 'static,
{
    /// Spawns one worker per slot, each running a clone of `callback`
    pub fn from_fn(worker_count: usize, callback: F) -> Self {
        Self::spawn(worker_count, move |_slot_id: usize| {
            FnWorker::new(callback.clone())
        })
    }
}

async fn run_worker<W: SlotWorker>(
    slot_id: usize,
    mut worker: W,
    mut rx: mpsc::Receiver<Job<W>>,
) {
    debug!(slot_id, "worker started");
    while let Some((input, reply)) = rx.recv().await {
        let outcome = worker.process(input, slot_id).await;
        if reply.send(outcome).is_err() {
            debug!(slot_id, "reply dropped by the scheduler");
        }
    }
    debug!(slot_id, "worker stopped");
}

#[async_trait]
impl<W: SlotWorker> ExecutionBackend for ChannelBackend<W> {
    type Input = W::Input;
    type Output = W::Output;

    async fn execute(&self, input: W::Input, slot_id: usize) -> Result<W::Output, BackendError> {
        let sender = self.sender(slot_id)?;
        let (reply_tx, reply_rx) = oneshot::channel();

        sender.send((input, reply_tx)).await.map_err(|_| {
            BackendError::new(format!("worker for slot {} has stopped", slot_id))
        })?;

        reply_rx.await.map_err(|_| {
            BackendError::new(format!("worker for slot {} dropped its task", slot_id))
        })?
    }

    fn release(&self, slot_id: usize) {
        if let Some(sender) = self.lock_senders().get_mut(slot_id) {
            if sender.take().is_some() {
                debug!(slot_id, "worker released");
            }
        }
    }
}
