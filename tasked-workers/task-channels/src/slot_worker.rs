// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use async_trait::async_trait;
use std::future::Future;
use std::marker::PhantomData;
use tasked_workers_core::BackendError;

/// Worker owned by exactly one slot
/// Processes that slot's inputs one at a time and may keep state between them
#[async_trait]
pub trait SlotWorker: Send + 'static {
    type Input: Send + 'static;
    type Output: Send + 'static;

    async fn process(
        &mut self,
        input: Self::Input,
        slot_id: usize,
    ) -> Result<Self::Output, BackendError>;
}

/// Stateless worker wrapping an async closure
pub struct FnWorker<F, T, U> {
    callback: F,
    _marker: PhantomData<fn(T) -> U>,
}

impl<F, T, U> FnWorker<F, T, U> {
    pub fn new(callback: F) -> Self {
        Self {
            callback,
            _marker: PhantomData,
        }
    }
}

#[async_trait]
impl<F, Fut, T, U> SlotWorker for FnWorker<F, T, U>
where
    F: Fn(T, usize) -> Fut + Send + 'static,
    Fut: Future<Output = Result<U, BackendError>> + Send,
    T: Send + 'static,
    U: Send + 'static,
{
    type Input = T;
    type Output = U;

    async fn process(&mut self, input: T, slot_id: usize) -> Result<U, BackendError> {
        (self.callback)(input, slot_id).await
    }
}
