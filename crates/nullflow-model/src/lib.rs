//! Type system registry, the `TypeWithNode`/`Type` data model, and the
//! symbol contract the builder consumes.

pub mod registry;
pub mod symbol;
pub mod type_with_node;
pub mod types;

pub use registry::{Addition, PendingCommit, Registry};
pub use symbol::{RefKind, SymbolId, SymbolInfo, SymbolKind, SymbolTable};
pub use type_with_node::TypeWithNode;
pub use types::{Annotation, Type, TupleElement, TypeParamOwner};
