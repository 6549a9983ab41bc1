//! Durable session identity.
//!
//! The backend issues an opaque `session_id` on the first successful
//! upload and keys all temporary resources under it. The client keeps
//! that id in a [`SessionStore`] so later runs reuse the same session.
//! Persistence is pluggable; when the durable store misbehaves the
//! pipeline keeps working with an ephemeral session and only
//! cross-run continuity is lost, so the store surface is infallible
//! and failures are logged rather than propagated.

use std::path::PathBuf;
use std::sync::Mutex;

/// Pluggable persistence for the single session identifier.
pub trait SessionStore: Send + Sync {
    /// The currently held session id, if any.
    fn load(&self) -> Option<String>;

    /// Persist a session id, replacing any previous one
    /// (last writer wins).
    fn store(&self, session_id: &str);

    /// Forget the held session id. Safe to call with none held.
    fn clear(&self);
}

/// Session store backed by a single file holding the raw id.
///
/// Survives process restarts. The id is also cached in memory, so a
/// failing filesystem only costs cross-run continuity: for the rest of
/// this run the session stays held, ephemerally.
pub struct FileSessionStore {
    path: PathBuf,
    cached: Mutex<Option<String>>,
}

impl FileSessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            cached: Mutex::new(None),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn read_file(&self) -> Option<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => {
                let id = contents.trim();
                if id.is_empty() {
                    None
                } else {
                    Some(id.to_string())
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to read session file");
                None
            }
        }
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Option<String> {
        let mut cached = self.cached.lock().expect("session lock poisoned");
        if cached.is_none() {
            *cached = self.read_file();
        }
        cached.clone()
    }

    fn store(&self, session_id: &str) {
        *self.cached.lock().expect("session lock poisoned") = Some(session_id.to_string());

        if let Some(parent) = self.path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!(path = %parent.display(), error = %e, "Failed to create session directory");
                return;
            }
        }
        if let Err(e) = std::fs::write(&self.path, session_id) {
            tracing::warn!(path = %self.path.display(), error = %e, "Failed to persist session id");
        }
    }

    fn clear(&self) {
        *self.cached.lock().expect("session lock poisoned") = None;

        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to remove session file");
            }
        }
    }
}

/// In-memory session store: the ephemeral fallback, also used in tests.
#[derive(Default)]
pub struct MemorySessionStore {
    session_id: Mutex<Option<String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Option<String> {
        self.session_id.lock().expect("session lock poisoned").clone()
    }

    fn store(&self, session_id: &str) {
        *self.session_id.lock().expect("session lock poisoned") = Some(session_id.to_string());
    }

    fn clear(&self) {
        *self.session_id.lock().expect("session lock poisoned") = None;
    }
}
