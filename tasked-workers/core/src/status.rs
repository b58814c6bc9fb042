// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{SchedulerError, SchedulerResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Global lifecycle of a scheduler instance
///
/// `Completed` and `Terminated` are terminal: no transition leaves them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "neverStarted")]
    NeverStarted,
    #[serde(rename = "isRunning")]
    Running,
    #[serde(rename = "isPaused")]
    Paused,
    #[serde(rename = "hasCompleted")]
    Completed,
    #[serde(rename = "wasTerminated")]
    Terminated,
}

impl Status {
    pub fn is_terminal(self) -> bool {
        matches!(self, Status::Completed | Status::Terminated)
    }

    /// Fails with the matching error when the status is terminal
    pub fn check_active(self) -> SchedulerResult<()> {
        match self {
            Status::Terminated => Err(SchedulerError::Terminated),
            Status::Completed => Err(SchedulerError::Completed),
            Status::NeverStarted | Status::Running | Status::Paused => Ok(()),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::NeverStarted => "neverStarted",
            Status::Running => "isRunning",
            Status::Paused => "isPaused",
            Status::Completed => "hasCompleted",
            Status::Terminated => "wasTerminated",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
