//! The type system registry: the single owner of the [`Graph`] and of the
//! canonical `Symbol -> TypeWithNode` map.
//!
//! The registry is **not** thread-safe: it is designed to be driven by
//! one builder at a time, with node allocation happening eagerly (the graph
//! is append-only, so this is safe) while the symbol map and syntax map are
//! only ever updated through [`Registry::flush`], which applies a
//! [`PendingCommit`] in one shot. A multi-tree caller collects one
//! `PendingCommit` per syntax tree and flushes them in a stable order (see
//! `Registry::commit_all`) so the resulting graph doesn't depend on which
//! tree happened to finish building first.

use crate::symbol::{SymbolId, SymbolKind, SymbolTable};
use crate::type_with_node::TypeWithNode;
use crate::types::{Annotation, Type, TupleElement};
use nullflow_common::diagnostics::codes;
use nullflow_common::{Diagnostic, Location};
use nullflow_graph::{Graph, NodeId, OBLIVIOUS, NON_NULL, NULLABLE};
use rustc_hash::FxHashMap;
use tracing::{trace, warn};

/// One queued change a builder wants to make visible once its tree is done.
pub enum Addition {
    SymbolType(SymbolId, TypeWithNode),
    SyntaxNode { tree: String, key: u32, node: NodeId },
    Edge {
        source: NodeId,
        target: NodeId,
        label: String,
        location: Location,
    },
}

/// The deferred queue a single builder accumulates while walking one syntax
/// tree. Nothing here is visible to
/// `Registry::get_symbol_type` or the solver until `Registry::flush` runs.
#[derive(Default)]
pub struct PendingCommit {
    pub tree_path: String,
    additions: Vec<Addition>,
}

impl PendingCommit {
    pub fn new(tree_path: impl Into<String>) -> Self {
        PendingCommit {
            tree_path: tree_path.into(),
            additions: Vec::new(),
        }
    }

    pub fn add_symbol_type(&mut self, id: SymbolId, type_with_node: TypeWithNode) {
        self.additions.push(Addition::SymbolType(id, type_with_node));
    }

    pub fn register_node(&mut self, key: u32, node: NodeId) {
        self.additions.push(Addition::SyntaxNode {
            tree: self.tree_path.clone(),
            key,
            node,
        });
    }

    pub fn add_edge(
        &mut self,
        source: NodeId,
        target: NodeId,
        label: impl Into<String>,
        location: Location,
    ) {
        self.additions.push(Addition::Edge {
            source,
            target,
            label: label.into(),
            location,
        });
    }
}

pub struct Registry {
    graph: Graph,
    symbols: SymbolTable,
    committed: FxHashMap<SymbolId, TypeWithNode>,
    syntax_map: FxHashMap<(String, u32), NodeId>,
    diagnostics: Vec<Diagnostic>,
}

impl Registry {
    pub fn new(symbols: SymbolTable) -> Self {
        Registry {
            graph: Graph::new(),
            symbols,
            committed: FxHashMap::default(),
            syntax_map: FxHashMap::default(),
            diagnostics: Vec::new(),
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Diagnostics accumulated while resolving symbols (currently just
    /// symbol-resolution failures; the builder and CLI contribute their
    /// own unsupported-construct and contradiction diagnostics).
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// `GetSymbolType`: returns the canonical `TypeWithNode` for `symbol`,
    /// applying the setter-value-parameter and indexer-parameter aliasing
    /// rules before falling back to the committed map, and materialising
    /// external symbols lazily from their declared annotation.
    pub fn get_symbol_type(&mut self, id: SymbolId) -> TypeWithNode {
        if let Some(existing) = self.committed.get(&id) {
            return existing.clone();
        }

        let info = match self.symbols.get(id) {
            Some(info) => info.clone(),
            None => {
                // No declaration reached the table at all: an external
                // reference the binder couldn't resolve (missing assembly,
                // unresolved type). Not a programming error, so fall back to
                // oblivious rather than aborting the whole build.
                let message = format!("symbol {id:?} could not be resolved; treating as oblivious");
                warn!(?id, "{message}");
                self.diagnostics.push(Diagnostic::warning(
                    codes::SYMBOL_RESOLUTION_FAILURE,
                    Location::synthetic(),
                    message,
                ));
                let leaf = TypeWithNode::leaf(Type::named("object"), OBLIVIOUS);
                self.committed.insert(id, leaf.clone());
                return leaf;
            }
        };

        if info.kind == SymbolKind::Parameter {
            if let Some(container_id) = info.container {
                let container = self.symbols.get(container_id).cloned();
                if let Some(container) = container {
                    if container.kind == SymbolKind::Property {
                        let arity = container.parameters.len() as u32;
                        if info.name == "value" && info.ordinal == arity {
                            let aliased = self.get_symbol_type(container_id);
                            self.committed.insert(id, aliased.clone());
                            return aliased;
                        }
                        if info.ordinal < arity {
                            let target = container.parameters[info.ordinal as usize];
                            let aliased = self.get_symbol_type(target);
                            self.committed.insert(id, aliased.clone());
                            return aliased;
                        }
                    }
                }
            }
        }

        if info.is_external {
            let type_with_node = self.from_type(&info.declared_type.clone(), info.annotation);
            self.committed.insert(id, type_with_node.clone());
            return type_with_node;
        }

        panic!(
            "local symbol `{}` ({:?}) queried before its declaration was bound",
            info.name, info.kind
        );
    }

    /// `FromType`: build a fresh `TypeWithNode` tree for `ty`, choosing the
    /// outer node by `annotation` and recursing through its structure.
    pub fn from_type(&mut self, ty: &Type, annotation: Annotation) -> TypeWithNode {
        self.from_type_inner(ty, annotation)
    }

    /// A declared position gets its *own* node wired to the relevant
    /// singleton, rather than the singleton's identity itself: a
    /// dereference or other per-occurrence edge on this position must only
    /// ever constrain this one declaration, never bleed into every other
    /// `T?`/`T` position in the graph by polluting the shared singleton.
    fn outer_node_for(&mut self, annotation: Annotation, debug_name: Option<String>) -> NodeId {
        match annotation {
            Annotation::Annotated => {
                let node = self.graph.alloc_node(debug_name);
                self.graph
                    .add_edge(NULLABLE, node, "annotated", Location::synthetic());
                node
            }
            Annotation::NotAnnotated => {
                let node = self.graph.alloc_node(debug_name);
                self.graph
                    .add_edge(node, NON_NULL, "not-annotated", Location::synthetic());
                node
            }
            Annotation::None => self.graph.alloc_node(debug_name),
        }
    }

    fn from_type_inner(&mut self, ty: &Type, annotation: Annotation) -> TypeWithNode {
        match ty {
            Type::Value(_) => TypeWithNode::leaf(ty.clone(), nullflow_graph::OBLIVIOUS),
            Type::NullableValue(inner) => {
                let child = self.from_type_inner(inner, Annotation::None);
                TypeWithNode::with_children(ty.clone(), nullflow_graph::OBLIVIOUS, vec![child])
            }
            Type::Named { name, type_args } => {
                let node = self.outer_node_for(annotation, Some(name.clone()));
                let children = type_args
                    .iter()
                    .map(|arg| self.from_type_inner(arg, Annotation::None))
                    .collect();
                TypeWithNode::with_children(ty.clone(), node, children)
            }
            Type::TypeParameter { name, .. } => {
                let node = self.outer_node_for(annotation, Some(name.clone()));
                TypeWithNode::leaf(ty.clone(), node)
            }
            Type::Tuple(elements) => {
                let children = elements
                    .iter()
                    .map(|TupleElement { ty, .. }| self.from_type_inner(ty, Annotation::None))
                    .collect();
                TypeWithNode::with_children(ty.clone(), nullflow_graph::OBLIVIOUS, children)
            }
            Type::Array(elem) => {
                let node = self.outer_node_for(annotation, Some("Array".into()));
                let child = self.from_type_inner(elem, Annotation::None);
                TypeWithNode::with_children(ty.clone(), node, vec![child])
            }
            Type::Sequence(elem) => {
                let node = self.outer_node_for(annotation, Some("Sequence".into()));
                let child = self.from_type_inner(elem, Annotation::None);
                TypeWithNode::with_children(ty.clone(), node, vec![child])
            }
            Type::TaskLike(inner) => {
                let node = self.outer_node_for(annotation, Some("TaskLike".into()));
                let child = self.from_type_inner(inner, Annotation::None);
                TypeWithNode::with_children(ty.clone(), node, vec![child])
            }
            Type::Function { params, ret } => {
                let node = self.outer_node_for(annotation, Some("Function".into()));
                let mut children: Vec<TypeWithNode> = params
                    .iter()
                    .map(|p| self.from_type_inner(p, Annotation::None))
                    .collect();
                children.push(self.from_type_inner(ret, Annotation::None));
                TypeWithNode::with_children(ty.clone(), node, children)
            }
        }
    }

    pub fn get_mapping(&self, tree: &str, key: u32) -> Option<NodeId> {
        self.syntax_map.get(&(tree.to_string(), key)).copied()
    }

    /// Apply one builder's deferred queue, in order. This is the only way
    /// `committed` or `syntax_map` ever change after construction.
    pub fn flush(&mut self, commit: PendingCommit) {
        trace!(tree = %commit.tree_path, additions = commit.additions.len(), "flush");
        for addition in commit.additions {
            match addition {
                Addition::SymbolType(id, type_with_node) => {
                    self.committed.insert(id, type_with_node);
                }
                Addition::SyntaxNode { tree, key, node } => {
                    self.syntax_map.insert((tree, key), node);
                }
                Addition::Edge {
                    source,
                    target,
                    label,
                    location,
                } => {
                    self.graph.add_edge(source, target, label, location);
                }
            }
        }
    }

    /// Flush several trees' pending commits in a stable, path-sorted order,
    /// so the resulting graph doesn't depend on the order concurrent
    /// builders happened to finish in.
    pub fn commit_all(&mut self, mut commits: Vec<PendingCommit>) {
        commits.sort_by(|a, b| a.tree_path.cmp(&b.tree_path));
        for commit in commits {
            self.flush(commit);
        }
    }
}
