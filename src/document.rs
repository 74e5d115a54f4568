//! Documents awaiting verification. This is the record type the application
//! stores in its trees and persists, one JSON file per document.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::record::{Key, Record};

/// Status given to documents that don't say otherwise.
pub const DEFAULT_STATUS: &str = "new";

/// A submitted document. Only `doc_id` matters to the trees; the rest is
/// payload. `status` is an open set of labels such as `"new"`, `"pending"`
/// or `"verified"` and is not validated here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Primary key.
    pub doc_id: Key,
    /// Short identifier of the applicant who submitted the document.
    pub applicant_id: String,
    /// File type, e.g. `"pdf"` or `"doc"`.
    pub doc_type: String,
    /// Verification state.
    #[serde(default = "default_status")]
    pub status: String,
}

fn default_status() -> String {
    DEFAULT_STATUS.to_string()
}

impl Document {
    /// Creates a document with the default status.
    pub fn new(doc_id: Key, applicant_id: impl Into<String>, doc_type: impl Into<String>) -> Self {
        Self {
            doc_id,
            applicant_id: applicant_id.into(),
            doc_type: doc_type.into(),
            status: default_status(),
        }
    }

    /// Same document with the given status.
    #[cfg(test)]
    pub(crate) fn with_status(self, status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            ..self
        }
    }
}

impl Record for Document {
    type Payload = String;

    fn key(&self) -> Key {
        self.doc_id
    }

    fn apply(&mut self, status: String) {
        self.status = status;
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "-------------------")?;
        writeln!(f, "Document ID: {}", self.doc_id)?;
        writeln!(f, "Applicant ID: {}", self.applicant_id)?;
        writeln!(f, "Document Type: {}", self.doc_type)?;
        writeln!(f, "Document Status: {}", self.status)?;
        write!(f, "-------------------")
    }
}
