//! Wires a JSON-encoded bound tree through the registry, builder, and
//! solver, and writes the resulting report to stdout.

use std::path::Path;

use anyhow::Context;
use nullflow_builder::{BoundNode, CancellationToken, MethodDeclaration, NonNullFlowOracle, NullabilityBuilder};
use nullflow_common::diagnostics::codes;
use nullflow_common::{Diagnostic, Location};
use nullflow_graph::solver::{self, Verdict};
use nullflow_graph::{Graph, NodeId};
use nullflow_model::{Registry, SymbolId, SymbolTable};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::args::Format;

/// The JSON payload read from `<file.json>`: one or more syntax trees'
/// worth of declared symbols, bound bodies, and the non-null-flow
/// predicate's proven locations.
#[derive(Deserialize)]
struct CliInput {
    symbols: SymbolTable,
    #[serde(default)]
    non_null_at: Vec<Location>,
    methods: Vec<MethodEntry>,
}

#[derive(Deserialize)]
struct MethodEntry {
    tree_path: String,
    /// The method's own symbol, used only to name the `return` entry in the
    /// report; not required to build the graph.
    #[serde(default)]
    method_symbol: Option<SymbolId>,
    declaration: MethodDeclaration,
}

struct JsonOracle {
    proven: FxHashSet<Location>,
}

impl NonNullFlowOracle for JsonOracle {
    fn is_non_null_at(&self, location: &Location) -> bool {
        self.proven.contains(location)
    }
}

#[derive(Serialize)]
struct InferredEntry {
    tree: String,
    role: String,
    symbol: Option<String>,
    verdict: &'static str,
}

#[derive(Serialize)]
struct Report {
    annotations: Vec<InferredEntry>,
    diagnostics: Vec<Diagnostic>,
}

fn verdict_name(v: Verdict) -> &'static str {
    match v {
        Verdict::Nullable => "nullable",
        Verdict::NonNull => "non-null",
        Verdict::Oblivious => "oblivious",
    }
}

/// The location of any edge touching `node`, arbitrarily picking the first
/// one found; contradiction diagnostics have no single originating source
/// location the way a parsed syntax error would, so this is the closest
/// available anchor.
fn location_for_node(graph: &Graph, node: NodeId) -> Location {
    graph
        .out_edges(node)
        .first()
        .or_else(|| graph.in_edges(node).first())
        .map(|&edge_id| graph.edge(edge_id).location.clone())
        .unwrap_or_else(Location::synthetic)
}

fn format_diagnostic(diag: &Diagnostic) -> String {
    format!("{:?} {}: {} ({})", diag.category, diag.code, diag.message, diag.location)
}

/// Recursively finds the first `BoundNode::Unsupported` construct, if any,
/// so the CLI can fail with exit code 2 before ever handing the tree to the
/// builder.
fn find_unsupported(node: &BoundNode) -> Option<(&'static str, Location)> {
    let boxed = |b: &BoundNode| find_unsupported(b);
    let opt = |b: &Option<Box<BoundNode>>| b.as_deref().and_then(find_unsupported);
    let many = |v: &[BoundNode]| v.iter().find_map(find_unsupported);
    let args = |v: &[nullflow_builder::bound_tree::Argument]| v.iter().find_map(|a| find_unsupported(&a.value));

    match node {
        BoundNode::Unsupported { kind, location } => return Some((kind, location.clone())),
        BoundNode::NullLiteral { .. }
        | BoundNode::NonNullReferenceLiteral { .. }
        | BoundNode::ValueLiteral { .. }
        | BoundNode::SymbolReference { .. }
        | BoundNode::ThisReference { .. }
        | BoundNode::ImplicitReceiver { .. } => {}
        BoundNode::MemberAccess { receiver, .. } => return opt(receiver),
        BoundNode::Assignment { target, value, .. } => {
            return boxed(target).or_else(|| boxed(value))
        }
        BoundNode::Call {
            receiver, arguments, ..
        } => return opt(receiver).or_else(|| args(arguments)),
        BoundNode::IndexerAccess {
            receiver, arguments, ..
        } => return boxed(receiver).or_else(|| args(arguments)),
        BoundNode::ArrayElementAccess { receiver, index, .. } => {
            return boxed(receiver).or_else(|| boxed(index))
        }
        BoundNode::ObjectCreation {
            arguments, initializer, ..
        } => {
            return args(arguments).or_else(|| initializer.iter().find_map(|(_, n)| find_unsupported(n)))
        }
        BoundNode::Conversion { operand, .. } => return boxed(operand),
        BoundNode::NullForgiving { operand, .. } => return boxed(operand),
        BoundNode::Coalesce { left, right, .. } => return boxed(left).or_else(|| boxed(right)),
        BoundNode::Conditional {
            condition,
            when_true,
            when_false,
            ..
        } => return boxed(condition).or_else(|| boxed(when_true)).or_else(|| boxed(when_false)),
        BoundNode::NullComparison { operand, .. } => return boxed(operand),
        BoundNode::ThrowExpression { operand, .. } => return boxed(operand),
        BoundNode::ArrayCreation { initializer, .. } => return many(initializer),
        BoundNode::CollectionInitializerAdd { arguments, .. } => return args(arguments),
        BoundNode::TupleLiteral { elements, .. } => {
            return elements.iter().find_map(|(_, n)| find_unsupported(n))
        }
        BoundNode::Deconstruction { targets, value, .. } => {
            return many(targets).or_else(|| boxed(value))
        }
        BoundNode::Lambda { body, .. } => return boxed(body),
        BoundNode::YieldReturn { value, .. } => return boxed(value),
        BoundNode::Await { operand, .. } => return boxed(operand),
        BoundNode::TypePattern { operand, .. } => return boxed(operand),
        BoundNode::PropertyPattern { operand, .. } => return boxed(operand),
        BoundNode::SwitchExpression { scrutinee, arms, .. } => {
            return boxed(scrutinee).or_else(|| {
                arms.iter()
                    .find_map(|arm| arm.pattern.as_ref().and_then(find_unsupported).or_else(|| find_unsupported(&arm.result)))
            })
        }
        BoundNode::AnonymousObject { members, .. } => {
            return members.iter().find_map(|(_, n)| find_unsupported(n))
        }
        BoundNode::Foreach { collection, body, .. } => {
            return boxed(collection).or_else(|| boxed(body))
        }
        BoundNode::VarLocalDeclaration { initializer, .. } => return boxed(initializer),
        BoundNode::TypedLocalDeclaration { initializer, .. } => return boxed(initializer),
        BoundNode::Return { value, .. } => return opt(value),
        BoundNode::Block { statements, .. } => return many(statements),
        BoundNode::If {
            condition,
            then_branch,
            else_branch,
            ..
        } => return boxed(condition).or_else(|| boxed(then_branch)).or_else(|| opt(else_branch)),
    }
    None
}

pub fn infer(input_path: &Path, format: Format) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(input_path)
        .with_context(|| format!("reading {}", input_path.display()))?;
    let input: CliInput =
        serde_json::from_str(&text).with_context(|| format!("parsing {} as JSON", input_path.display()))?;

    for method in &input.methods {
        if let Some((kind, location)) = find_unsupported(&method.declaration.body) {
            let diag = Diagnostic::error(
                codes::UNSUPPORTED_CONSTRUCT,
                location,
                format!("unsupported construct `{kind}` in tree `{}`", method.tree_path),
            );
            eprintln!("error: {}", format_diagnostic(&diag));
            std::process::exit(2);
        }
    }

    let oracle = JsonOracle {
        proven: input.non_null_at.into_iter().collect(),
    };
    let mut registry = Registry::new(input.symbols);
    let builder = NullabilityBuilder::new(&oracle);
    let cancellation = CancellationToken::new();

    let mut commits = Vec::with_capacity(input.methods.len());
    let mut reported: Vec<(String, String, Option<String>, nullflow_graph::NodeId)> = Vec::new();

    for method in &input.methods {
        let commit = builder
            .build_method(&mut registry, &method.tree_path, &method.declaration, &cancellation)
            .with_context(|| format!("building tree `{}`", method.tree_path))?;
        commits.push(commit);

        for (ordinal, &param) in method.declaration.parameters.iter().enumerate() {
            let name = registry.symbols().get(param).map(|s| s.name.clone());
            reported.push((method.tree_path.clone(), format!("parameter[{ordinal}]"), name, param));
        }
    }
    registry.commit_all(commits);

    let mut resolved = Vec::with_capacity(reported.len());
    for (tree, role, name, param) in reported {
        let node = registry.get_symbol_type(param).node;
        resolved.push((tree, role, name, node));
    }
    for method in &input.methods {
        let return_key = method.declaration.parameters.len() as u32;
        if let Some(node) = registry.get_mapping(&method.tree_path, return_key) {
            let name = method
                .method_symbol
                .and_then(|id| registry.symbols().get(id).map(|s| s.name.clone()));
            resolved.push((method.tree_path.clone(), "return".to_string(), name, node));
        }
    }

    let result = solver::solve(registry.graph());

    let annotations = resolved
        .iter()
        .map(|(tree, role, symbol, node)| InferredEntry {
            tree: tree.clone(),
            role: role.clone(),
            symbol: symbol.clone(),
            verdict: verdict_name(result.verdict(*node)),
        })
        .collect::<Vec<_>>();

    let mut diagnostics: Vec<Diagnostic> = registry.diagnostics().to_vec();
    let had_contradictions = !result.contradictions.is_empty();
    for node in &result.contradictions {
        let location = location_for_node(registry.graph(), *node);
        let message = match resolved.iter().find(|(_, _, _, n)| n == node) {
            Some((tree, role, symbol, _)) => format!(
                "both nullable-path and non-null-path reach {tree} {role} ({})",
                symbol.as_deref().unwrap_or("-")
            ),
            None => format!(
                "both nullable-path and non-null-path reach an internal node ({})",
                registry.graph().node(*node).debug_name.as_deref().unwrap_or("?")
            ),
        };
        diagnostics.push(Diagnostic::error(codes::CONTRADICTION, location, message));
    }

    let report = Report {
        annotations,
        diagnostics,
    };

    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        Format::Table => print_table(&report),
    }

    if had_contradictions {
        std::process::exit(1);
    }
    Ok(())
}

fn print_table(report: &Report) {
    println!("{:<30} {:<16} {:<16} {}", "TREE", "ROLE", "SYMBOL", "VERDICT");
    for entry in &report.annotations {
        println!(
            "{:<30} {:<16} {:<16} {}",
            entry.tree,
            entry.role,
            entry.symbol.as_deref().unwrap_or("-"),
            entry.verdict
        );
    }
    if !report.diagnostics.is_empty() {
        println!();
        println!("diagnostics:");
        for diag in &report.diagnostics {
            println!("  {}", format_diagnostic(diag));
        }
    }
}
