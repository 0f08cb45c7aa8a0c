//! Explicit operation deadlines.
//!
//! A [`Deadline`] travels down from the HTTP handler to the service. Each
//! layer narrows it with [`Deadline::cap`] so that the earliest budget wins,
//! and [`Deadline::run`] abandons the wrapped future once the instant passes.

use std::future::Future;
use std::time::Duration;

use tokio::time::{timeout_at, Instant};

use crate::errors::{Error, Result};

/// Point in time after which an operation is abandoned and treated as failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Deadline {
    at: Instant,
}

impl Deadline {
    /// Deadline `budget` from now.
    pub fn after(budget: Duration) -> Self {
        Self {
            at: Instant::now() + budget,
        }
    }

    /// The earlier of this deadline and `budget` from now.
    pub fn cap(self, budget: Duration) -> Self {
        self.min(Self::after(budget))
    }

    pub fn remaining(&self) -> Duration {
        self.at.saturating_duration_since(Instant::now())
    }

    pub fn is_expired(&self) -> bool {
        self.remaining().is_zero()
    }

    /// Drives `operation` until it completes or the deadline passes.
    ///
    /// On expiry the future is dropped and [`Error::Timeout`] is returned with
    /// the budget that was left when the call started.
    pub async fn run<F, T>(self, operation: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let budget = self.remaining();
        match timeout_at(self.at, operation).await {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout(budget)),
        }
    }
}
