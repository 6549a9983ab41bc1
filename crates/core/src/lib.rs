//! Domain types and pure logic for the fotokadr client.
//!
//! No I/O lives here: this crate models document types, local upload
//! validation, the backend task status vocabulary, user-facing message
//! classification, and assembly of terminal task payloads into
//! display-ready results.

pub mod assemble;
pub mod document;
pub mod message;
pub mod status;
pub mod validation;

pub use assemble::{assemble, resolve_output_url, ProcessingReport, RenderedResult};
pub use document::DocumentType;
pub use message::{classify, Severity};
pub use status::TaskStatus;
pub use validation::{validate_upload, ValidationError, ALLOWED_EXTENSIONS, MAX_UPLOAD_BYTES};
