//! Backend task status vocabulary.
//!
//! The backend has reported statuses under several names across
//! revisions (`done` vs `completed`, `error` vs `failed`), so parsing
//! is tolerant: every known spelling maps to a variant and anything
//! else is carried as [`TaskStatus::Other`] and treated as
//! non-terminal, which keeps the poller running instead of failing on
//! a vocabulary mismatch.

use serde::Deserialize;

/// Status of one backend processing task.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum TaskStatus {
    /// Accepted but not yet picked up by a worker.
    Pending,
    /// Waiting in the processing queue.
    Queued,
    /// Actively being processed.
    Processing,
    /// Finished successfully.
    Completed,
    /// Finished with an error.
    Failed,
    /// A status string this client does not recognise.
    Other(String),
}

impl From<String> for TaskStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "pending" => TaskStatus::Pending,
            "queued" => TaskStatus::Queued,
            "processing" => TaskStatus::Processing,
            "completed" | "done" => TaskStatus::Completed,
            "failed" | "error" => TaskStatus::Failed,
            _ => TaskStatus::Other(raw),
        }
    }
}

impl TaskStatus {
    /// True once no further status changes will occur and polling must stop.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }

    /// True for the successful terminal status.
    pub fn is_success(&self) -> bool {
        matches!(self, TaskStatus::Completed)
    }

    /// True for the failed terminal status.
    pub fn is_failure(&self) -> bool {
        matches!(self, TaskStatus::Failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_spellings_map_to_variants() {
        assert_eq!(TaskStatus::from("done".to_string()), TaskStatus::Completed);
        assert_eq!(TaskStatus::from("completed".to_string()), TaskStatus::Completed);
        assert_eq!(TaskStatus::from("error".to_string()), TaskStatus::Failed);
        assert_eq!(TaskStatus::from("failed".to_string()), TaskStatus::Failed);
        assert_eq!(TaskStatus::from("queued".to_string()), TaskStatus::Queued);
    }

    #[test]
    fn unknown_status_is_not_terminal() {
        let status = TaskStatus::from("retrying".to_string());
        assert_eq!(status, TaskStatus::Other("retrying".to_string()));
        assert!(!status.is_terminal());
    }

    #[test]
    fn terminal_split() {
        assert!(TaskStatus::Completed.is_terminal());
        assert!(TaskStatus::Completed.is_success());
        assert!(TaskStatus::Failed.is_terminal());
        assert!(TaskStatus::Failed.is_failure());
        assert!(!TaskStatus::Processing.is_terminal());
    }

    #[test]
    fn deserializes_from_json_string() {
        let status: TaskStatus = serde_json::from_str("\"processing\"").unwrap();
        assert_eq!(status, TaskStatus::Processing);
    }
}
