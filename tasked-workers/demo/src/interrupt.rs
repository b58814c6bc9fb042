// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use tasked_workers_core::{ExecutionBackend, Orchestrator};
use tracing::warn;

/// Terminates `orchestrator` on Ctrl+C so the partial results still get printed
pub fn terminate_on_ctrl_c<B, V>(orchestrator: &Orchestrator<B, V>) -> Result<(), ctrlc::Error>
where
    B: ExecutionBackend,
    V: Clone + Send + 'static,
{
    let orchestrator = orchestrator.clone();
    ctrlc::set_handler(move || {
        println!("\n\n=== Ctrl+C received, terminating workers ===");
        if let Err(e) = orchestrator.terminate() {
            warn!(error = %e, "terminate after Ctrl+C had no effect");
        }
    })
}
