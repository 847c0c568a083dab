//! Batch scheduler bounding concurrent work against a remote site
//!
//! This module handles:
//! - Running a handler over many inputs in fixed-size concurrent windows
//! - Pausing between windows to bound burst load on the server
//! - Isolating per-item failures (errors and panics alike)
//! - Preserving input order in the returned results

use crate::config::SchedulerConfig;
use crate::CensusError;
use futures::future::join_all;
use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

/// A failed item, captured instead of aborting the batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
    pub message: String,
}

/// Result slot for one input item
pub type BatchOutcome<R> = Result<R, ItemFailure>;

/// Runs async work in sequential windows of bounded concurrency
///
/// Within a window every item runs concurrently; window N+1 never starts
/// before every item of window N has settled, so at most `window_size`
/// handler invocations are in flight at once.
#[derive(Debug, Clone)]
pub struct BatchScheduler {
    window_size: usize,
    pause: Duration,
}

impl Default for BatchScheduler {
    fn default() -> Self {
        Self::new(10, Duration::from_millis(500))
    }
}

impl BatchScheduler {
    /// Creates a scheduler; a zero window size is treated as one
    pub fn new(window_size: usize, pause: Duration) -> Self {
        Self {
            window_size: window_size.max(1),
            pause,
        }
    }

    pub fn from_config(config: &SchedulerConfig) -> Self {
        Self::new(
            config.window_size,
            Duration::from_millis(config.batch_delay_ms),
        )
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Runs `handler` over every item and returns one outcome per item, in order
    pub async fn run<T, R, F, Fut>(&self, items: Vec<T>, handler: F) -> Vec<BatchOutcome<R>>
    where
        F: Fn(T) -> Fut,
        Fut: Future<Output = Result<R, CensusError>>,
    {
        self.run_with_progress(items, handler, |_, _, _| {}).await
    }

    /// Like [`run`](Self::run), calling `on_window(index, size, failures)` after each window
    pub async fn run_with_progress<T, R, F, Fut, P>(
        &self,
        items: Vec<T>,
        handler: F,
        mut on_window: P,
    ) -> Vec<BatchOutcome<R>>
    where
        F: Fn(T) -> Fut,
        Fut: Future<Output = Result<R, CensusError>>,
        P: FnMut(usize, usize, usize),
    {
        let total = items.len();
        let mut results = Vec::with_capacity(total);
        let mut remaining = items.into_iter().peekable();
        let mut window_index = 0;

        while remaining.peek().is_some() {
            if window_index > 0 && !self.pause.is_zero() {
                tokio::time::sleep(self.pause).await;
            }

            let window: Vec<T> = remaining.by_ref().take(self.window_size).collect();
            let size = window.len();

            let futures = window
                .into_iter()
                .map(|item| AssertUnwindSafe(handler(item)).catch_unwind().map(settle::<R>));

            let window_results = join_all(futures).await;
            let failures = window_results.iter().filter(|r| r.is_err()).count();
            results.extend(window_results);

            tracing::trace!(
                "Batch window {} settled ({}/{} items done)",
                window_index,
                results.len(),
                total
            );
            on_window(window_index, size, failures);
            window_index += 1;
        }

        results
    }
}

/// Turns a caught handler result into the item's outcome slot
fn settle<R>(outcome: std::thread::Result<Result<R, CensusError>>) -> BatchOutcome<R> {
    match outcome {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(ItemFailure {
            message: e.to_string(),
        }),
        Err(panic) => Err(ItemFailure {
            message: panic_message(panic.as_ref()),
        }),
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        format!("handler panicked: {}", s)
    } else if let Some(s) = panic.downcast_ref::<String>() {
        format!("handler panicked: {}", s)
    } else {
        "handler panicked".to_string()
    }
}
