//! Async orchestration layer for the fotokadr cropping backend.
//!
//! This crate drives the full lifecycle of one user-submitted photo:
//!
//! - [`BackendApi`] — typed reqwest wrapper over the backend HTTP surface.
//! - [`SessionStore`] — pluggable persistence for the durable session id.
//! - [`TaskPoller`] — cancellable status polling for one in-flight task.
//! - [`UploadCoordinator`] — validate, submit, and dispatch responses.
//! - [`LifecycleCleaner`] — best-effort session release on teardown.
//!
//! Presentation is external: consumers subscribe to [`UploadEvent`]s
//! via [`UploadCoordinator::subscribe`] and render what arrives.

pub mod api;
pub mod cleanup;
pub mod config;
pub mod coordinator;
pub mod events;
pub mod poller;
pub mod session;

pub use api::{BackendApi, BackendApiError, StatusResponse, UploadResponse};
pub use cleanup::LifecycleCleaner;
pub use config::ClientConfig;
pub use coordinator::{CoordinatorError, SubmitOutcome, UploadCoordinator};
pub use events::UploadEvent;
pub use poller::{PollerConfig, PollerHandle, TaskPoller};
pub use session::{FileSessionStore, MemorySessionStore, SessionStore};
