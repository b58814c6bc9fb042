// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::BackendError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    /// Rejected at construction (e.g. zero workers)
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Control operation after `terminate()`
    #[error("workers have been terminated")]
    Terminated,

    /// Control operation after every slot finished
    #[error("workers have completed the task")]
    Completed,

    /// A dispatched unit of work failed; surfaced through the async results only
    #[error("slot {slot_id} failed on index {index}: {source}")]
    BackendFailure {
        slot_id: usize,
        index: usize,
        source: BackendError,
    },

    /// First `run()` happened outside a tokio runtime
    #[error("no tokio runtime available to dispatch work")]
    RuntimeUnavailable,
}

pub type SchedulerResult<T> = Result<T, SchedulerError>;
