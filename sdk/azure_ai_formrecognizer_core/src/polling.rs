//! Long-running operation polling.
//!
//! Training and recognition complete asynchronously on the service. The client
//! submits the work, receives a status URL, and polls it until the operation
//! reaches a terminal state. [`OperationPoller`] is that loop as an explicit
//! state machine: `Pending → Succeeded | Failed`.
//!
//! Dropping a poller abandons the operation; nothing is sent to the service.

use crate::error::{FormRecognizerError, FormRecognizerResult};
use async_trait::async_trait;
use std::time::Duration;

/// Default interval between status checks (5 seconds).
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Error details reported by the service for a failed operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationFailure {
    pub code: String,
    pub message: String,
}

impl From<OperationFailure> for FormRecognizerError {
    fn from(failure: OperationFailure) -> Self {
        FormRecognizerError::OperationFailed {
            code: failure.code,
            message: failure.message,
        }
    }
}

/// The outcome of one status check.
#[derive(Debug, Clone, PartialEq)]
pub enum PollStatus<T> {
    /// Not started yet or still running.
    Pending,
    /// Completed with a result.
    Succeeded(T),
    /// Completed with an error.
    Failed(OperationFailure),
}

impl<T> PollStatus<T> {
    /// Returns `true` if the status is terminal (succeeded or failed).
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// Payload-free view of a poller's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationState {
    Pending,
    Succeeded,
    Failed,
}

impl<T> From<&PollStatus<T>> for OperationState {
    fn from(status: &PollStatus<T>) -> Self {
        match status {
            PollStatus::Pending => Self::Pending,
            PollStatus::Succeeded(_) => Self::Succeeded,
            PollStatus::Failed(_) => Self::Failed,
        }
    }
}

/// One server-side operation that can be asked for its status.
#[async_trait]
pub trait LongRunningOperation: Send + Sync {
    /// The value produced on success.
    type Output: Send;

    /// Fetch the current status once.
    async fn poll_once(&self) -> FormRecognizerResult<PollStatus<Self::Output>>;
}

/// Polls a [`LongRunningOperation`] at a fixed interval.
pub struct OperationPoller<O: LongRunningOperation> {
    operation: O,
    poll_interval: Duration,
    status: PollStatus<O::Output>,
}

impl<O: LongRunningOperation + std::fmt::Debug> std::fmt::Debug for OperationPoller<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperationPoller")
            .field("operation", &self.operation)
            .field("poll_interval", &self.poll_interval)
            .field("state", &self.state())
            .finish()
    }
}

impl<O: LongRunningOperation> OperationPoller<O> {
    /// Wrap an already-submitted operation.
    pub fn new(operation: O, poll_interval: Duration) -> Self {
        Self {
            operation,
            poll_interval,
            status: PollStatus::Pending,
        }
    }

    /// The wrapped operation.
    pub fn operation(&self) -> &O {
        &self.operation
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Change the interval used by [`wait`](Self::wait).
    pub fn set_poll_interval(&mut self, poll_interval: Duration) {
        self.poll_interval = poll_interval;
    }

    /// The last observed state.
    pub fn state(&self) -> OperationState {
        OperationState::from(&self.status)
    }

    /// Check the status once. Once terminal, the cached status is returned
    /// without contacting the service again.
    pub async fn poll(&mut self) -> FormRecognizerResult<&PollStatus<O::Output>> {
        if !self.status.is_terminal() {
            self.status = self.operation.poll_once().await?;
        }
        Ok(&self.status)
    }

    /// Poll until the operation reaches a terminal state and return its result.
    ///
    /// # Errors
    ///
    /// - [`FormRecognizerError::OperationFailed`] if the service reports failure.
    /// - Any transport error raised while polling, unchanged.
    pub async fn wait(self) -> FormRecognizerResult<O::Output> {
        let Self {
            operation,
            poll_interval,
            mut status,
        } = self;

        let mut attempt = 0u32;
        loop {
            match status {
                PollStatus::Succeeded(output) => {
                    tracing::debug!(attempt, "operation succeeded");
                    return Ok(output);
                }
                PollStatus::Failed(failure) => {
                    tracing::debug!(attempt, code = %failure.code, "operation failed");
                    return Err(failure.into());
                }
                PollStatus::Pending => {
                    if attempt > 0 {
                        tracing::trace!(attempt, "operation still in progress, waiting");
                        tokio::time::sleep(poll_interval).await;
                    }
                    attempt += 1;
                    status = operation.poll_once().await?;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    /// Reports `Pending` for `pending_polls` checks, then `outcome`.
    #[derive(Debug)]
    struct ScriptedOperation {
        pending_polls: u32,
        outcome: Result<u32, OperationFailure>,
        calls: Arc<AtomicU32>,
    }

    #[async_trait]
    impl LongRunningOperation for ScriptedOperation {
        type Output = u32;

        async fn poll_once(&self) -> FormRecognizerResult<PollStatus<u32>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.pending_polls {
                return Ok(PollStatus::Pending);
            }
            Ok(match &self.outcome {
                Ok(value) => PollStatus::Succeeded(*value),
                Err(failure) => PollStatus::Failed(failure.clone()),
            })
        }
    }

    fn scripted(pending_polls: u32, outcome: Result<u32, OperationFailure>) -> (ScriptedOperation, Arc<AtomicU32>) {
        let calls = Arc::new(AtomicU32::new(0));
        (
            ScriptedOperation {
                pending_polls,
                outcome,
                calls: calls.clone(),
            },
            calls,
        )
    }

    #[tokio::test]
    async fn wait_returns_result_after_pending_polls() {
        let (op, calls) = scripted(2, Ok(42));
        let poller = OperationPoller::new(op, Duration::from_millis(1));
        assert_eq!(poller.wait().await.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn wait_surfaces_failure_as_operation_failed() {
        let failure = OperationFailure {
            code: "2012".into(),
            message: "Unable to list blobs".into(),
        };
        let (op, _) = scripted(0, Err(failure));
        let err = OperationPoller::new(op, Duration::from_millis(1))
            .wait()
            .await
            .unwrap_err();
        match err {
            FormRecognizerError::OperationFailed { code, message } => {
                assert_eq!(code, "2012");
                assert_eq!(message, "Unable to list blobs");
            }
            other => panic!("expected OperationFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn poll_caches_terminal_status() {
        let (op, calls) = scripted(1, Ok(7));
        let mut poller = OperationPoller::new(op, Duration::from_millis(1));
        assert_eq!(poller.state(), OperationState::Pending);

        assert_eq!(poller.poll().await.unwrap(), &PollStatus::Pending);
        assert_eq!(poller.poll().await.unwrap(), &PollStatus::Succeeded(7));
        assert_eq!(poller.poll().await.unwrap(), &PollStatus::Succeeded(7));
        assert_eq!(poller.state(), OperationState::Succeeded);
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        // wait() reuses the cached result
        assert_eq!(poller.wait().await.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn wait_sleeps_poll_interval_between_checks() {
        let (op, _) = scripted(3, Ok(1));
        let start = tokio::time::Instant::now();
        OperationPoller::new(op, Duration::from_secs(5))
            .wait()
            .await
            .unwrap();
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(15), "{elapsed:?}");
        assert!(elapsed < Duration::from_secs(20), "{elapsed:?}");
    }

    #[test]
    fn failure_converts_to_error() {
        let err: FormRecognizerError = OperationFailure {
            code: "x".into(),
            message: "y".into(),
        }
        .into();
        assert!(err.to_string().contains("Operation failed (x): y"));
    }
}
