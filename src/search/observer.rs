// src/search/observer.rs
//! Observer contract for binary searches.
//!
//! Observers are purely presentational. The search loop reports every
//! failure they return through `tracing` and carries on, so a broken
//! terminal or a poisoned board lock can never change a search result.

use std::fmt::Debug;

use tracing::{debug, warn};

use super::step::Step;

/// Error an observer may report back to the search loop
pub type ObserverError = Box<dyn std::error::Error + Send + Sync>;

/// Receives one notification per narrowing step plus a terminal one
pub trait StepObserver<T> {
    fn on_step(&mut self, step: &Step<'_, T>) -> Result<(), ObserverError>;
}

/// Observer that ignores every notification
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl<T> StepObserver<T> for NoopObserver {
    fn on_step(&mut self, _step: &Step<'_, T>) -> Result<(), ObserverError> {
        Ok(())
    }
}

/// Emits one structured `tracing` event per step
#[derive(Debug, Clone)]
pub struct LogObserver {
    label: String,
}

impl LogObserver {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into() }
    }
}

impl<T: Debug> StepObserver<T> for LogObserver {
    fn on_step(&mut self, step: &Step<'_, T>) -> Result<(), ObserverError> {
        if step.is_final() {
            debug!(
                search = %self.label,
                value = ?step.probed(),
                "search settled"
            );
        } else {
            debug!(
                search = %self.label,
                low = step.low,
                mid = step.mid,
                high = step.high,
                probe = ?step.probed(),
                remaining = step.remaining(),
                completed = step.completed_depth(),
                total = step.total_depth(),
                "probing"
            );
        }
        Ok(())
    }
}

impl<T, F> StepObserver<T> for F
where
    F: FnMut(&Step<'_, T>),
{
    fn on_step(&mut self, step: &Step<'_, T>) -> Result<(), ObserverError> {
        self(step);
        Ok(())
    }
}

/// Both observers see every step, even when the first one fails
impl<T, A, B> StepObserver<T> for (A, B)
where
    A: StepObserver<T>,
    B: StepObserver<T>,
{
    fn on_step(&mut self, step: &Step<'_, T>) -> Result<(), ObserverError> {
        let first = self.0.on_step(step);
        let second = self.1.on_step(step);
        first.and(second)
    }
}

/// Deliver a step, logging instead of propagating observer failures
pub(crate) fn notify<T, O>(observer: &mut O, step: Step<'_, T>)
where
    O: StepObserver<T> + ?Sized,
{
    if let Err(e) = observer.on_step(&step) {
        warn!(
            low = step.low,
            mid = step.mid,
            high = step.high,
            "observer failed, continuing search: {}",
            e
        );
    }
}
