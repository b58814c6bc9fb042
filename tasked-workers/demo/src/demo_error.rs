// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use tasked_workers_core::SchedulerError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DemoError {
    #[error("scheduler error: {0}")]
    Scheduler(#[from] SchedulerError),

    #[error("failed to install Ctrl+C handler: {0}")]
    Interrupt(#[from] ctrlc::Error),

    #[error("failed to serialize progress: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("parallel result disagrees with sequential result: {0}")]
    Mismatch(String),
}
