// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Execution backend keeping one long-lived tokio task per slot.

mod slot_worker;
pub use slot_worker::{FnWorker, SlotWorker};

mod channel_backend;
pub use channel_backend::ChannelBackend;
