//! Symbols: the binder-provided facts the registry and builder key off of.
//!
//! This is this repository's side of the "Symbol interface" external
//! contract: kind, container, declared type/annotation, and the
//! method/parameter-specific fields needed by the registry's aliasing
//! rules.

use crate::types::{Annotation, Type};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub struct SymbolId(pub u32);

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum SymbolKind {
    Method,
    Parameter,
    Property,
    Field,
    Event,
    Local,
}

/// By-reference passing mode of a parameter.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub enum RefKind {
    #[default]
    None,
    In,
    Out,
    Ref,
    Params,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SymbolInfo {
    pub id: SymbolId,
    pub kind: SymbolKind,
    pub name: String,
    pub container: Option<SymbolId>,
    pub declared_type: Type,
    pub annotation: Annotation,
    /// Parameter ordinal (0-based); meaningless for non-parameter kinds.
    pub ordinal: u32,
    pub ref_kind: RefKind,
    /// True if this symbol comes from a referenced library rather than the
    /// current compilation unit; its `TypeWithNode` is materialised lazily
    /// from `declared_type`/`annotation` rather than required to already be
    /// registered.
    pub is_external: bool,
    /// For methods: the parameters in declaration order. For indexers
    /// (properties), the indexer's own parameters.
    pub parameters: Vec<SymbolId>,
    /// For methods: type parameter names in declaration order.
    pub type_parameters: Vec<String>,
    /// For methods: the declared return type (parameters use `declared_type`
    /// for their own type; this field is `None` for non-methods).
    pub return_type: Option<Type>,
}

impl SymbolInfo {
    pub fn new(id: SymbolId, kind: SymbolKind, name: impl Into<String>, declared_type: Type) -> Self {
        SymbolInfo {
            id,
            kind,
            name: name.into(),
            container: None,
            declared_type,
            annotation: Annotation::None,
            ordinal: 0,
            ref_kind: RefKind::None,
            is_external: false,
            parameters: Vec::new(),
            type_parameters: Vec::new(),
            return_type: None,
        }
    }

    pub fn with_container(mut self, container: SymbolId) -> Self {
        self.container = Some(container);
        self
    }

    pub fn with_ordinal(mut self, ordinal: u32) -> Self {
        self.ordinal = ordinal;
        self
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotation = annotation;
        self
    }

    pub fn with_ref_kind(mut self, ref_kind: RefKind) -> Self {
        self.ref_kind = ref_kind;
        self
    }

    pub fn external(mut self) -> Self {
        self.is_external = true;
        self
    }
}

/// All symbols known to the current build: the ones declared in the
/// compilation unit plus any external symbols referenced from it.
///
/// Serializes as a flat array of [`SymbolInfo`] (the wire format a CLI
/// caller hand-authors); `next_id` is bookkeeping `insert` derives from the
/// ids it sees, not something a caller should have to supply.
#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    symbols: FxHashMap<SymbolId, SymbolInfo>,
    next_id: u32,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a fresh [`SymbolId`] without inserting a [`SymbolInfo`] yet;
    /// useful when a symbol's id must be known before its full info (e.g. a
    /// method needs its own id to be the `container` of its parameters).
    pub fn reserve_id(&mut self) -> SymbolId {
        let id = SymbolId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn insert(&mut self, info: SymbolInfo) {
        self.next_id = self.next_id.max(info.id.0 + 1);
        self.symbols.insert(info.id, info);
    }

    pub fn get(&self, id: SymbolId) -> Option<&SymbolInfo> {
        self.symbols.get(&id)
    }
}

impl serde::Serialize for SymbolTable {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut entries: Vec<&SymbolInfo> = self.symbols.values().collect();
        entries.sort_by_key(|info| info.id.0);
        entries.serialize(serializer)
    }
}

impl<'de> serde::Deserialize<'de> for SymbolTable {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = Vec::<SymbolInfo>::deserialize(deserializer)?;
        let mut table = SymbolTable::new();
        for info in entries {
            table.insert(info);
        }
        Ok(table)
    }
}
