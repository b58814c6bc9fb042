// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use serde::{Deserialize, Serialize};
use std::fs;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub worker_count: usize,
    pub sum: SumConfig,
    pub matrix: MatrixConfig,
    pub squares: SquaresConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SumConfig {
    /// Integers `0..count` are summed
    pub count: u64,
    /// Integers per task
    pub block_size: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatrixConfig {
    pub rows: usize,
    pub inner: usize,
    pub cols: usize,
    pub max_value: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SquaresConfig {
    pub count: u64,
    /// Task `i` sleeps `i * delay_ms_per_item` before answering
    pub delay_ms_per_item: u64,
    pub progress_interval_ms: u64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            worker_count: 4,
            sum: SumConfig::default(),
            matrix: MatrixConfig::default(),
            squares: SquaresConfig::default(),
        }
    }
}

impl Default for SumConfig {
    fn default() -> Self {
        Self {
            count: 10_000_000,
            block_size: 1_000_000,
        }
    }
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            rows: 3,
            inner: 4,
            cols: 2,
            max_value: 12,
        }
    }
}

impl Default for SquaresConfig {
    fn default() -> Self {
        Self {
            count: 6,
            delay_ms_per_item: 10,
            progress_interval_ms: 10,
        }
    }
}

impl DemoConfig {
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: DemoConfig = serde_json::from_str(&contents)?;
        Ok(config)
    }

    pub fn load_or_default(path: &str) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(path, error = %e, "using default configuration");
                Self::default()
            }
        }
    }
}
