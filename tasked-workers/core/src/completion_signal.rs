// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use tokio_util::sync::CancellationToken;

/// Single-fire completion signal shared by every results waiter
/// Fired by whichever slot finishes last, by termination, or by a backend failure
#[derive(Clone, Default)]
pub struct CompletionSignal {
    token: CancellationToken,
}

impl CompletionSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Releases every waiter; returns false if the signal had already fired
    pub fn fire(&self) -> bool {
        if self.token.is_cancelled() {
            return false;
        }
        self.token.cancel();
        true
    }

    pub fn has_fired(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once the signal fires, immediately if it already has
    pub async fn wait(&self) {
        self.token.cancelled().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn fires_exactly_once() {
        let signal = CompletionSignal::new();
        assert!(!signal.has_fired());
        assert!(signal.fire());
        assert!(!signal.fire());
        assert!(signal.has_fired());
    }

    #[tokio::test]
    async fn releases_all_waiters() {
        let signal = CompletionSignal::new();
        let waiters: Vec<_> = (0..3)
            .map(|_| {
                let signal = signal.clone();
                tokio::spawn(async move { signal.wait().await })
            })
            .collect();

        tokio::task::yield_now().await;
        signal.fire();

        for waiter in waiters {
            tokio::time::timeout(Duration::from_secs(1), waiter)
                .await
                .expect("waiter should be released")
                .expect("waiter task should not panic");
        }
    }

    #[tokio::test]
    async fn late_waiter_returns_immediately() {
        let signal = CompletionSignal::new();
        signal.fire();
        tokio::time::timeout(Duration::from_millis(50), signal.wait())
            .await
            .expect("already fired signal must not block");
    }
}
