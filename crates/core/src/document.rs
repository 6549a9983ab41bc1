//! Document types accepted by the cropping backend.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The kind of identity document a photo is being cropped for.
///
/// Sent verbatim as the `document_type` multipart field on upload.
/// There is deliberately no `Default`: the caller always chooses one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    /// Polish ID card format (35x45 mm, national norms).
    IdCard,
    /// Passport format (35x45 mm, EU requirements).
    Passport,
}

impl DocumentType {
    /// Wire representation used by the backend (`id_card` / `passport`).
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::IdCard => "id_card",
            DocumentType::Passport => "passport",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown document type string.
#[derive(Debug, thiserror::Error)]
#[error("Unknown document type: {0:?} (expected id_card or passport)")]
pub struct UnknownDocumentType(pub String);

impl FromStr for DocumentType {
    type Err = UnknownDocumentType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id_card" => Ok(DocumentType::IdCard),
            "passport" => Ok(DocumentType::Passport),
            other => Err(UnknownDocumentType(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_round_trip() {
        assert_eq!("id_card".parse::<DocumentType>().unwrap(), DocumentType::IdCard);
        assert_eq!("passport".parse::<DocumentType>().unwrap(), DocumentType::Passport);
        assert_eq!(DocumentType::IdCard.to_string(), "id_card");
    }

    #[test]
    fn unknown_value_rejected() {
        assert!("driving_licence".parse::<DocumentType>().is_err());
        // No case folding on the wire value.
        assert!("Passport".parse::<DocumentType>().is_err());
    }
}
