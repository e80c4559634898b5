//! The synthetic test harness: a minimal scanner/parser front end that
//! turns one method declaration into the same `BoundNode` + symbol table
//! shape a real binder would produce, plus the path-query API the core
//! test corpus is written against.

pub mod api;
pub mod mini_lang;

pub use api::{check_paths, has_path_from_parameter_to_return_type, path_facts, CompileError, PathFacts};
pub use mini_lang::{compile, CompiledMethod};
