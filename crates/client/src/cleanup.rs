//! Best-effort session release on client teardown.
//!
//! The browser original fired `navigator.sendBeacon("/api/clear", ...)`
//! from an unload handler: no acknowledgment, no retry, delivery is
//! best-effort and the backend reclaims orphaned sessions on its own
//! timeout. [`LifecycleCleaner`] reproduces that contract: a detached,
//! short-timeout `POST /api/clear` fired at most once per cleaner,
//! never blocking the caller and never failing it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::api::BackendApi;
use crate::session::SessionStore;

/// Request timeout for the clear dispatch. Short so teardown is never
/// held hostage by an unreachable backend.
const CLEAR_TIMEOUT: Duration = Duration::from_secs(3);

/// Fires the session-release notification when the client goes away.
pub struct LifecycleCleaner {
    api: Arc<BackendApi>,
    store: Arc<dyn SessionStore>,
    fired: AtomicBool,
}

impl LifecycleCleaner {
    pub fn new(api: Arc<BackendApi>, store: Arc<dyn SessionStore>) -> Self {
        Self {
            api,
            store,
            fired: AtomicBool::new(false),
        }
    }

    /// Notify the backend that this client's session can be released.
    ///
    /// At most one notification is dispatched per cleaner instance;
    /// repeated calls and a missing session are both quiet no-ops. The
    /// request runs on a detached task and its outcome is only logged,
    /// so the caller can proceed with teardown immediately. The
    /// process may exit before delivery completes; that is accepted.
    pub fn notify_teardown(&self) {
        if self.fired.swap(true, Ordering::SeqCst) {
            tracing::debug!("Teardown notification already dispatched");
            return;
        }

        let Some(session_id) = self.store.load() else {
            tracing::debug!("No session held, nothing to clear");
            return;
        };

        // Dedicated short-timeout client: the main API handle carries
        // no timeouts and must not, but teardown cannot afford to hang.
        let client = reqwest::Client::builder()
            .timeout(CLEAR_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        let api = BackendApi::with_client(client, self.api.base_url().to_string());

        tracing::info!(session_id = %session_id, "Dispatching session clear");
        tokio::spawn(async move {
            match api.clear(&session_id).await {
                Ok(()) => tracing::debug!(session_id = %session_id, "Session cleared"),
                Err(e) => {
                    // Best-effort only; the backend reclaims orphans.
                    tracing::debug!(session_id = %session_id, error = %e, "Session clear not delivered");
                }
            }
        });

        self.store.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::session::MemorySessionStore;

    #[tokio::test]
    async fn clears_session_once() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/clear")
            .match_body(mockito::Matcher::Json(
                serde_json::json!({ "session_id": "s1" }),
            ))
            .with_body("{}")
            .expect(1)
            .create();

        let store: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());
        store.store("s1");

        let api = Arc::new(BackendApi::new(server.url()));
        let cleaner = LifecycleCleaner::new(api, Arc::clone(&store));

        cleaner.notify_teardown();
        // Second call must not error and must not send again.
        cleaner.notify_teardown();

        // Give the detached task time to deliver.
        tokio::time::sleep(Duration::from_millis(200)).await;
        mock.assert_async().await;
        assert_eq!(store.load(), None);
    }

    #[tokio::test]
    async fn missing_session_sends_nothing() {
        let mut server = mockito::Server::new_async().await;
        let mock = server.mock("POST", "/api/clear").expect(0).create();

        let store: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());
        let api = Arc::new(BackendApi::new(server.url()));
        let cleaner = LifecycleCleaner::new(api, store);

        cleaner.notify_teardown();
        tokio::time::sleep(Duration::from_millis(100)).await;
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn delivery_failure_is_swallowed() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/clear")
            .with_status(500)
            .with_body("boom")
            .create();

        let store: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());
        store.store("s2");

        let api = Arc::new(BackendApi::new(server.url()));
        let cleaner = LifecycleCleaner::new(api, Arc::clone(&store));

        // Must not panic or propagate; local store is cleared regardless.
        cleaner.notify_teardown();
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(store.load(), None);
    }
}
