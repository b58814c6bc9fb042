// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Fan-out/fan-in task scheduler over a fixed number of worker slots.
//!
//! The task indices `[0, total)` are split into one contiguous range per
//! slot. Each slot walks its range sequentially through an
//! [`ExecutionBackend`], folding outputs into a per-slot aggregate, while the
//! [`Orchestrator`] exposes run/pause/terminate controls, progress and results.

mod range_partitioner;
pub use range_partitioner::{partition, IndexRange};

mod status;
pub use status::Status;

mod progress_entry;
pub use progress_entry::ProgressEntry;

mod task_source;
pub use task_source::TaskSource;

mod scheduler_error;
pub use scheduler_error::{SchedulerError, SchedulerResult};

mod execution_backend;
pub use execution_backend::{BackendError, BlockingFnBackend, ExecutionBackend, FnBackend};

mod worker_factory;
pub use worker_factory::WorkerFactory;

mod completion_signal;
pub use completion_signal::CompletionSignal;

mod result_aggregator;
pub use result_aggregator::ResultAggregator;

mod scheduler_state;
mod slot_driver;

mod orchestrator;
pub use orchestrator::Orchestrator;
