//! Severity classification of user-facing backend messages.
//!
//! The backend returns free-form human-readable strings, in Polish or
//! English depending on the endpoint revision. The presentation layer
//! only needs a coarse bucket for styling, derived from keyword
//! substrings with a fixed precedence: error beats warning beats
//! success, and anything unmatched is informational.

use serde::Serialize;

/// Coarse styling bucket for a user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
    Success,
    Info,
}

/// Substrings that mark a message as an error.
const ERROR_KEYWORDS: [&str; 5] = ["error", "błąd", "failed", "nie udało", "niepowodzenie"];

/// Substrings that mark a message as a warning.
const WARNING_KEYWORDS: [&str; 3] = ["warning", "ostrzeżenie", "uwaga"];

/// Substrings that mark a message as a success.
const SUCCESS_KEYWORDS: [&str; 6] = ["success", "pomyślnie", "sukces", "completed", "done", "zakończone"];

/// Classify a message by keyword substrings, case-insensitively.
///
/// Precedence is error > warning > success; a message matching none of
/// the keyword sets is [`Severity::Info`].
pub fn classify(message: &str) -> Severity {
    let lower = message.to_lowercase();

    if ERROR_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        Severity::Error
    } else if WARNING_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        Severity::Warning
    } else if SUCCESS_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        Severity::Success
    } else {
        Severity::Info
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_keyword_english() {
        assert_eq!(classify("Error: could not process"), Severity::Error);
    }

    #[test]
    fn error_keyword_polish() {
        assert_eq!(classify("Wystąpił błąd przetwarzania"), Severity::Error);
    }

    #[test]
    fn success_keyword_polish() {
        assert_eq!(
            classify("Przetwarzanie zakończone pomyślnie!"),
            Severity::Success
        );
    }

    #[test]
    fn warning_without_error_keyword() {
        assert_eq!(
            classify("Ostrzeżenie: wykryto więcej niż jedną twarz"),
            Severity::Warning
        );
    }

    #[test]
    fn error_wins_over_warning_and_success() {
        assert_eq!(
            classify("Warning: processing failed successfully"),
            Severity::Error
        );
    }

    #[test]
    fn warning_wins_over_success() {
        assert_eq!(
            classify("Done, with a warning about lighting"),
            Severity::Warning
        );
    }

    #[test]
    fn classification_is_case_insensitive() {
        assert_eq!(classify("ERROR"), Severity::Error);
        assert_eq!(classify("Pomyślnie"), Severity::Success);
    }

    #[test]
    fn unmatched_message_is_info() {
        assert_eq!(classify("Przesyłanie i przetwarzanie danych..."), Severity::Info);
    }
}
