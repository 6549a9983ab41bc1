//! Assembly of terminal task payloads into display-ready results.
//!
//! The backend returns resource locations relative to its own root
//! (e.g. `/api/output/{session_id}/{file}`). [`resolve_output_url`]
//! turns those into absolute, fetchable URLs against the configured
//! base, and [`assemble`] bundles the resolved URL with a classified
//! message and the pass-through biometric finding lists.

use serde::Serialize;

use crate::message::{classify, Severity};

/// Terminal payload of a finished task, as reported by the backend.
///
/// `image_path` is backend-relative (or occasionally already absolute);
/// `warnings` and `errors` carry biometric-check findings verbatim.
#[derive(Debug, Clone, Default)]
pub struct ProcessingReport {
    pub message: String,
    pub image_path: Option<String>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

/// Display-ready view of a terminal task result.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedResult {
    /// Primary human-readable message.
    pub message: String,
    /// Styling bucket derived from the message text.
    pub severity: Severity,
    /// Absolute URL of the cropped image, when one was produced.
    pub image_url: Option<String>,
    /// Biometric warnings, shown independently of the primary message.
    pub warnings: Vec<String>,
    /// Biometric errors, shown independently of the primary message.
    pub errors: Vec<String>,
}

/// Resolve a backend-relative resource path against a base URL.
///
/// Exactly one `/` separates the two parts regardless of a trailing
/// slash on `base` or a leading slash on `path`. Paths that are
/// already absolute URLs pass through unchanged.
pub fn resolve_output_url(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Build a [`RenderedResult`] from a terminal payload and the backend base URL.
pub fn assemble(report: ProcessingReport, base_url: &str) -> RenderedResult {
    let severity = classify(&report.message);
    let image_url = report
        .image_path
        .as_deref()
        .map(|path| resolve_output_url(base_url, path));

    RenderedResult {
        message: report.message,
        severity,
        image_url,
        warnings: report.warnings,
        errors: report.errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_with_single_slash() {
        assert_eq!(
            resolve_output_url("https://api.example.com", "/api/output/abc/result.jpg"),
            "https://api.example.com/api/output/abc/result.jpg"
        );
    }

    #[test]
    fn trailing_slash_on_base_does_not_duplicate() {
        assert_eq!(
            resolve_output_url("https://api.example.com/", "/api/output/abc/result.jpg"),
            "https://api.example.com/api/output/abc/result.jpg"
        );
    }

    #[test]
    fn missing_leading_slash_still_joined() {
        assert_eq!(
            resolve_output_url("https://api.example.com", "api/output/abc/result.jpg"),
            "https://api.example.com/api/output/abc/result.jpg"
        );
    }

    #[test]
    fn absolute_url_passes_through() {
        let absolute = "https://cdn.example.com/r.jpg";
        assert_eq!(resolve_output_url("https://api.example.com", absolute), absolute);
    }

    #[test]
    fn assembles_success_result() {
        let report = ProcessingReport {
            message: "Przetwarzanie zakończone pomyślnie!".to_string(),
            image_path: Some("/out/s1/r.jpg".to_string()),
            warnings: vec!["Biometric check warning: low contrast".to_string()],
            errors: vec![],
        };

        let rendered = assemble(report, "https://api.example.com");
        assert_eq!(rendered.severity, Severity::Success);
        assert_eq!(
            rendered.image_url.as_deref(),
            Some("https://api.example.com/out/s1/r.jpg")
        );
        assert_eq!(rendered.warnings.len(), 1);
        assert!(rendered.errors.is_empty());
    }

    #[test]
    fn assembles_failure_without_image() {
        let report = ProcessingReport {
            message: "Image processing failed: no face detected".to_string(),
            image_path: None,
            warnings: vec![],
            errors: vec!["No face detected in the image".to_string()],
        };

        let rendered = assemble(report, "https://api.example.com");
        assert_eq!(rendered.severity, Severity::Error);
        assert!(rendered.image_url.is_none());
        assert_eq!(rendered.errors.len(), 1);
    }
}
