//! Status polling for one in-flight processing task.
//!
//! [`TaskPoller::start`] spawns a loop that queries
//! `GET /api/status/{task_id}` at a fixed cadence until a terminal
//! status arrives or the handle is cancelled. A single failed query is
//! a transport flake: it is logged and the next tick proceeds (no
//! backoff, no retry cap -- an unreachable backend polls until
//! cancelled). Ticks never overlap because each query is awaited
//! before the next tick, so a stale non-terminal response can never
//! arrive after the loop has observed a terminal one.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use fotokadr_core::{assemble, ProcessingReport};

use crate::api::{BackendApi, StatusResponse};
use crate::events::UploadEvent;

/// Message used when the backend reports completion without one.
const DEFAULT_COMPLETED_MESSAGE: &str = "Przetwarzanie zakończone pomyślnie!";

/// Message used when the backend reports failure without one.
const DEFAULT_FAILED_MESSAGE: &str = "Przetwarzanie nie powiodło się";

/// Tunable parameters for the polling loop.
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Delay between consecutive status queries.
    pub interval: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
        }
    }
}

/// Factory for polling loops. See [`TaskPoller::start`].
pub struct TaskPoller;

/// Handle to a running polling loop.
///
/// Once the handle reports stopped -- via cancellation or a terminal
/// status -- no further queries are issued for its task id.
pub struct PollerHandle {
    task_id: String,
    cancel: CancellationToken,
    join: tokio::task::JoinHandle<()>,
}

impl PollerHandle {
    /// The task this handle polls.
    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    /// Request the loop to stop. Idempotent; safe to call after the
    /// loop has already reached a terminal status.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// True once the polling loop has exited.
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Wait for the polling loop to exit.
    pub async fn stopped(self) {
        let _ = self.join.await;
    }
}

impl TaskPoller {
    /// Spawn a polling loop for `task_id`.
    ///
    /// Terminal results are broadcast on `event_tx` as
    /// [`UploadEvent::TaskCompleted`] / [`UploadEvent::TaskFailed`],
    /// each tagged with the owning task id.
    pub fn start(
        api: Arc<BackendApi>,
        task_id: String,
        config: PollerConfig,
        event_tx: broadcast::Sender<UploadEvent>,
    ) -> PollerHandle {
        let cancel = CancellationToken::new();
        let loop_cancel = cancel.clone();
        let loop_task_id = task_id.clone();

        let join = tokio::spawn(async move {
            poll_loop(api, loop_task_id, config, event_tx, loop_cancel).await;
        });

        PollerHandle {
            task_id,
            cancel,
            join,
        }
    }
}

/// Core polling loop: tick, query, dispatch, repeat until terminal or
/// cancelled.
async fn poll_loop(
    api: Arc<BackendApi>,
    task_id: String,
    config: PollerConfig,
    event_tx: broadcast::Sender<UploadEvent>,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(config.interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!(task_id = %task_id, "Polling cancelled");
                return;
            }
            _ = ticker.tick() => {}
        }

        let status = tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!(task_id = %task_id, "Polling cancelled mid-query");
                return;
            }
            result = api.status(&task_id) => result,
        };

        match status {
            Ok(response) if response.status.is_success() => {
                tracing::info!(task_id = %task_id, "Task completed");
                let _ = event_tx.send(completed_event(&task_id, response, api.base_url()));
                return;
            }
            Ok(response) if response.status.is_failure() => {
                tracing::warn!(task_id = %task_id, "Task failed");
                let _ = event_tx.send(failed_event(&task_id, response));
                return;
            }
            Ok(response) => {
                tracing::debug!(task_id = %task_id, status = ?response.status, "Task still in progress");
            }
            Err(e) => {
                // Transport flake: swallowed, next tick retries.
                tracing::warn!(task_id = %task_id, error = %e, "Status query failed, will retry");
            }
        }
    }
}

/// Build the success event from a terminal status payload.
fn completed_event(task_id: &str, response: StatusResponse, base_url: &str) -> UploadEvent {
    let report = ProcessingReport {
        message: response
            .message
            .unwrap_or_else(|| DEFAULT_COMPLETED_MESSAGE.to_string()),
        image_path: response.cropped_file_url,
        warnings: response.biometric_warnings,
        errors: response.biometric_errors,
    };

    UploadEvent::TaskCompleted {
        task_id: task_id.to_string(),
        result: assemble(report, base_url),
    }
}

/// Build the failure event from a terminal status payload.
fn failed_event(task_id: &str, response: StatusResponse) -> UploadEvent {
    let message = response
        .error_message
        .or(response.message)
        .unwrap_or_else(|| DEFAULT_FAILED_MESSAGE.to_string());

    UploadEvent::TaskFailed {
        task_id: task_id.to_string(),
        message,
        errors: response.biometric_errors,
    }
}
