//! Admission gate bounding simultaneous in-flight fetches

use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;

use crate::error::{HackerNewsError, Result};

/// Counting semaphore wrapper that admits at most `capacity` futures at once.
///
/// A slot is taken before the wrapped future is first polled and released
/// when it settles, whatever its output. Waiters are admitted in FIFO order.
#[derive(Debug, Clone)]
pub struct AdmissionGate {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

impl AdmissionGate {
    /// Create a gate with `capacity` slots. A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// Total number of slots
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Slots currently free
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Slots currently held
    pub fn in_flight(&self) -> usize {
        self.capacity - self.available()
    }

    /// Wait for a slot, run `fut` to completion, then release the slot.
    pub async fn admit<F: Future>(&self, fut: F) -> Result<F::Output> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| HackerNewsError::Configuration("Admission gate closed".to_string()))?;
        Ok(fut.await)
    }
}
