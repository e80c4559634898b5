//! Diagnostic record shared by the builder (unsupported constructs, missing
//! symbols) and the solver (contradictions), modeled on the teacher's
//! `Diagnostic`/`DiagnosticRelatedInformation` pair.

use crate::Location;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticCategory {
    Error,
    Warning,
    Suggestion,
    Message,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedInformation {
    pub category: DiagnosticCategory,
    pub location: Location,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    /// Stable numeric code, analogous to the teacher's TSxxxx codes.
    pub code: u32,
    pub location: Location,
    pub message: String,
    pub related_information: Vec<RelatedInformation>,
}

impl Diagnostic {
    pub fn error(code: u32, location: Location, message: impl Into<String>) -> Self {
        Diagnostic {
            category: DiagnosticCategory::Error,
            code,
            location,
            message: message.into(),
            related_information: Vec::new(),
        }
    }

    pub fn warning(code: u32, location: Location, message: impl Into<String>) -> Self {
        Diagnostic {
            category: DiagnosticCategory::Warning,
            code,
            location,
            message: message.into(),
            related_information: Vec::new(),
        }
    }

    pub fn with_related(
        mut self,
        location: Location,
        message: impl Into<String>,
    ) -> Self {
        self.related_information.push(RelatedInformation {
            category: DiagnosticCategory::Message,
            location,
            message: message.into(),
        });
        self
    }
}

/// Diagnostic codes used by the nullability engine. Grouped the way the
/// teacher groups its `diagnostic_codes` table, one constant per distinct
/// failure described in the error-handling design.
pub mod codes {
    /// Both a nullable-path and a non-null-path reach the same node.
    pub const CONTRADICTION: u32 = 9001;
    /// The bound tree contained an operation kind the builder does not implement.
    pub const UNSUPPORTED_CONSTRUCT: u32 = 9002;
    /// An external symbol referenced from the compilation unit had no declared type.
    pub const SYMBOL_RESOLUTION_FAILURE: u32 = 9003;
}
