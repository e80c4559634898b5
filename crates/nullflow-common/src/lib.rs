//! Shared types used across all nullflow crates.
//!
//! - String identifiers for symbols and files (`Atom`)
//! - Source locations (`Span`, `Location`)
//! - The diagnostic record shared by the builder and the solver

pub mod diagnostics;
pub mod location;

pub use diagnostics::{Diagnostic, DiagnosticCategory, RelatedInformation};
pub use location::{Location, Span};
