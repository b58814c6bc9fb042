// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use async_trait::async_trait;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use thiserror::Error;

/// Failure reported by a backend for a single unit of work
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct BackendError {
    message: String,
}

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Trait for abstracting how one unit of work is executed
/// Different implementations for async closures, blocking threads, per-slot channels, etc.
#[async_trait]
pub trait ExecutionBackend: Send + Sync + 'static {
    type Input: Send + 'static;
    type Output: Send + 'static;

    /// Run one input on behalf of `slot_id`
    /// The scheduler never has more than one call in flight per slot
    async fn execute(
        &self,
        input: Self::Input,
        slot_id: usize,
    ) -> Result<Self::Output, BackendError>;

    /// Free whatever the backend holds for `slot_id`
    /// Called once the slot is exhausted, has failed, or the scheduler is terminated
    fn release(&self, _slot_id: usize) {}
}

#[async_trait]
impl<B: ExecutionBackend> ExecutionBackend for Arc<B> {
    type Input = B::Input;
    type Output = B::Output;

    async fn execute(
        &self,
        input: Self::Input,
        slot_id: usize,
    ) -> Result<Self::Output, BackendError> {
        (**self).execute(input, slot_id).await
    }

    fn release(&self, slot_id: usize) {
        (**self).release(slot_id)
    }
}

/// Backend running an async closure inline on the dispatching task
pub struct FnBackend<F, T, U> {
    callback: F,
    _marker: PhantomData<fn(T) -> U>,
}

impl<F, T, U> FnBackend<F, T, U> {
    pub fn new(callback: F) -> Self {
        Self {
            callback,
            _marker: PhantomData,
        }
    }
}

#[async_trait]
impl<F, Fut, T, U> ExecutionBackend for FnBackend<F, T, U>
where
    F: Fn(T, usize) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<U, BackendError>> + Send + 'static,
    T: Send + 'static,
    U: Send + 'static,
{
    type Input = T;
    type Output = U;

    async fn execute(&self, input: T, slot_id: usize) -> Result<U, BackendError> {
        (self.callback)(input, slot_id).await
    }
}

/// Backend running a synchronous closure on tokio's blocking pool
/// Suited to CPU-bound work that would otherwise stall the async workers
pub struct BlockingFnBackend<F, T, U> {
    callback: Arc<F>,
    _marker: PhantomData<fn(T) -> U>,
}

impl<F, T, U> BlockingFnBackend<F, T, U> {
    pub fn new(callback: F) -> Self {
        Self {
            callback: Arc::new(callback),
            _marker: PhantomData,
        }
    }
}

#[async_trait]
impl<F, T, U> ExecutionBackend for BlockingFnBackend<F, T, U>
where
    F: Fn(T, usize) -> Result<U, BackendError> + Send + Sync + 'static,
    T: Send + 'static,
    U: Send + 'static,
{
    type Input = T;
    type Output = U;

    async fn execute(&self, input: T, slot_id: usize) -> Result<U, BackendError> {
        let callback = Arc::clone(&self.callback);
        tokio::task::spawn_blocking(move || callback(input, slot_id))
            .await
            .map_err(|e| {
                BackendError::new(format!("blocking worker for slot {} failed: {}", slot_id, e))
            })?
    }
}
