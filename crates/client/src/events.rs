//! Events emitted toward the presentation layer.
//!
//! The orchestration layer never renders anything itself; it broadcasts
//! [`UploadEvent`]s over a [`tokio::sync::broadcast`] channel and the
//! presentation layer (CLI, UI, tests) decides what to show. Every
//! event carries the `task_id` it belongs to so a consumer can discard
//! results from a task that is no longer current.

use serde::Serialize;

use fotokadr_core::RenderedResult;

/// A lifecycle event for one upload/processing round.
#[derive(Debug, Clone, Serialize)]
pub enum UploadEvent {
    /// The backend accepted the upload and queued a task.
    TaskQueued {
        task_id: String,
        session_id: String,
        /// Backend acknowledgement message (e.g. "Rozpoczęto przetwarzanie").
        message: String,
    },

    /// The task reached its successful terminal status.
    TaskCompleted {
        task_id: String,
        result: RenderedResult,
    },

    /// The task reached its failed terminal status.
    TaskFailed {
        task_id: String,
        /// Human-readable failure reason from the backend.
        message: String,
        /// Structured sub-errors (biometric findings), possibly empty.
        errors: Vec<String>,
    },
}

impl UploadEvent {
    /// The task this event belongs to.
    pub fn task_id(&self) -> &str {
        match self {
            UploadEvent::TaskQueued { task_id, .. }
            | UploadEvent::TaskCompleted { task_id, .. }
            | UploadEvent::TaskFailed { task_id, .. } => task_id,
        }
    }
}
