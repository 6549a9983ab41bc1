//! Upload orchestration.
//!
//! [`UploadCoordinator`] owns the session store and the single active
//! poller. `submit` validates a candidate locally, performs one upload
//! call, and dispatches on the response shape: queued task, legacy
//! inline result, or backend rejection. Exactly one of those outcomes
//! occurs per call, and a queued task always replaces (cancels) any
//! previously active poller so only the current task can reach the
//! presentation layer.

use std::sync::Arc;

use tokio::sync::{broadcast, Mutex};

use fotokadr_core::{
    assemble, validate_upload, DocumentType, ProcessingReport, RenderedResult, ValidationError,
};

use crate::api::{BackendApi, BackendApiError, UploadResponse};
use crate::events::UploadEvent;
use crate::poller::{PollerConfig, PollerHandle, TaskPoller};
use crate::session::SessionStore;

/// Broadcast channel capacity for presentation events.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Outcome of one `submit` call that reached the backend.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// A task was queued; its terminal result will arrive as an event.
    Queued { task_id: String, session_id: String },

    /// Legacy synchronous mode: the result came back inline, no poller
    /// was started.
    Completed(RenderedResult),

    /// The backend rejected the upload; no task exists and the session
    /// was left untouched.
    Rejected { message: String },
}

/// Errors surfaced by [`UploadCoordinator::submit`].
#[derive(Debug, thiserror::Error)]
pub enum CoordinatorError {
    /// The candidate failed local validation; no network call was made.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The upload call itself failed (network or unparseable response).
    #[error("Upload submission failed: {0}")]
    Submission(#[from] BackendApiError),
}

/// Drives uploads end to end for one backend instance.
pub struct UploadCoordinator {
    api: Arc<BackendApi>,
    store: Arc<dyn SessionStore>,
    event_tx: broadcast::Sender<UploadEvent>,
    poll_config: PollerConfig,
    /// The single active poller. Replaced (and the predecessor
    /// cancelled) whenever a new task is queued.
    active_poller: Mutex<Option<PollerHandle>>,
}

impl UploadCoordinator {
    /// Create a coordinator over an API handle and a session store.
    pub fn new(
        api: Arc<BackendApi>,
        store: Arc<dyn SessionStore>,
        poll_config: PollerConfig,
    ) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            api,
            store,
            event_tx,
            poll_config,
            active_poller: Mutex::new(None),
        }
    }

    /// Subscribe to presentation events (queued / completed / failed).
    pub fn subscribe(&self) -> broadcast::Receiver<UploadEvent> {
        self.event_tx.subscribe()
    }

    /// The currently held session id, if any.
    pub fn session_id(&self) -> Option<String> {
        self.store.load()
    }

    /// Validate and submit one file for processing.
    ///
    /// Validation failures return [`CoordinatorError::Validation`]
    /// before any network traffic. On success exactly one of the
    /// [`SubmitOutcome`] variants occurs.
    pub async fn submit(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        document_type: DocumentType,
    ) -> Result<SubmitOutcome, CoordinatorError> {
        validate_upload(file_name, bytes.len() as u64)?;

        let current_session = self.store.load();
        tracing::info!(
            file_name = %file_name,
            document_type = %document_type,
            session_id = ?current_session,
            "Submitting upload",
        );

        let response = self
            .api
            .upload(bytes, file_name, document_type, current_session.as_deref())
            .await?;

        match response {
            UploadResponse::Rejected { error } => {
                tracing::warn!(file_name = %file_name, error = %error, "Upload rejected by backend");
                Ok(SubmitOutcome::Rejected { message: error })
            }

            UploadResponse::Accepted {
                session_id,
                task_id,
                message,
            } => {
                // The backend-issued id supersedes whatever was held.
                self.store.store(&session_id);

                // Queued goes out before the poller starts so terminal
                // events can never precede it.
                let _ = self.event_tx.send(UploadEvent::TaskQueued {
                    task_id: task_id.clone(),
                    session_id: session_id.clone(),
                    message,
                });
                self.replace_poller(task_id.clone()).await;

                tracing::info!(
                    task_id = %task_id,
                    session_id = %session_id,
                    "Upload accepted, polling started",
                );

                Ok(SubmitOutcome::Queued {
                    task_id,
                    session_id,
                })
            }

            UploadResponse::Processed {
                session_id,
                message,
                cropped_file_url,
            } => {
                self.store.store(&session_id);

                tracing::info!(
                    session_id = %session_id,
                    "Upload processed synchronously (legacy mode)",
                );

                let report = ProcessingReport {
                    message,
                    image_path: Some(cropped_file_url),
                    warnings: vec![],
                    errors: vec![],
                };
                Ok(SubmitOutcome::Completed(assemble(
                    report,
                    self.api.base_url(),
                )))
            }
        }
    }

    /// Cancel the active poller, if any. Idempotent.
    pub async fn shutdown(&self) {
        if let Some(poller) = self.active_poller.lock().await.take() {
            tracing::info!(task_id = %poller.task_id(), "Cancelling active poller");
            poller.cancel();
        }
    }

    // ---- private helpers ----

    /// Start a poller for `task_id`, cancelling the previous one first
    /// so two pollers can never race for the presentation state.
    async fn replace_poller(&self, task_id: String) {
        let mut active = self.active_poller.lock().await;

        if let Some(previous) = active.take() {
            tracing::info!(
                task_id = %previous.task_id(),
                "Superseded by a newer upload, cancelling stale poller",
            );
            previous.cancel();
        }

        *active = Some(TaskPoller::start(
            Arc::clone(&self.api),
            task_id,
            self.poll_config.clone(),
            self.event_tx.clone(),
        ));
    }
}
