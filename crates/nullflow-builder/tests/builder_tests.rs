//! End-to-end builder tests: construct a tiny symbol table and bound tree
//! by hand, build and flush it, then check the solved graph.

use nullflow_builder::{BoundNode, MethodDeclaration, NoNonNullFlow, NullabilityBuilder};
use nullflow_builder::bound_tree::{Argument, ConversionKind};
use nullflow_builder::builder::CancellationToken;
use nullflow_common::Location;
use nullflow_graph::solver;
use nullflow_model::{Annotation, Registry, SymbolId, SymbolInfo, SymbolKind, SymbolTable, Type};

fn loc() -> Location {
    Location::synthetic()
}

fn single_parameter_method(
    param_type: Type,
    param_annotation: Annotation,
    body: BoundNode,
) -> (Registry, MethodDeclaration, SymbolId) {
    let mut symbols = SymbolTable::new();
    let param_id = symbols.reserve_id();
    symbols.insert(
        SymbolInfo::new(param_id, SymbolKind::Parameter, "s", param_type)
            .with_ordinal(0)
            .with_annotation(param_annotation),
    );
    let registry = Registry::new(symbols);
    let method = MethodDeclaration {
        parameters: vec![param_id],
        return_type: Type::named("void"),
        return_annotation: Annotation::NotAnnotated,
        body,
    };
    (registry, method, param_id)
}

#[test]
fn dereferencing_an_annotated_parameter_is_a_contradiction() {
    let body = BoundNode::MemberAccess {
        receiver: Some(Box::new(BoundNode::SymbolReference {
            symbol: SymbolId(0),
            location: loc(),
        })),
        member: SymbolId(0),
        location: loc(),
    };
    let (mut registry, method, param_id) =
        single_parameter_method(Type::named("String"), Annotation::Annotated, body);

    let oracle = NoNonNullFlow;
    let builder = NullabilityBuilder::new(&oracle);
    let cancellation = CancellationToken::new();
    let pending = builder
        .build_method(&mut registry, "m.cs", &method, &cancellation)
        .unwrap();
    registry.flush(pending);

    let param_twn = registry.get_symbol_type(param_id);

    let result = solver::solve(registry.graph());
    assert!(result.is_forced_nullable(param_twn.node));
    assert!(result.is_forced_non_null(param_twn.node));
    assert!(result.contradictions.contains(&param_twn.node));
}

#[test]
fn dereferencing_a_non_annotated_parameter_is_not_a_contradiction() {
    let body = BoundNode::MemberAccess {
        receiver: Some(Box::new(BoundNode::SymbolReference {
            symbol: SymbolId(0),
            location: loc(),
        })),
        member: SymbolId(0),
        location: loc(),
    };
    let (mut registry, method, param_id) =
        single_parameter_method(Type::named("String"), Annotation::NotAnnotated, body);

    let oracle = NoNonNullFlow;
    let builder = NullabilityBuilder::new(&oracle);
    let cancellation = CancellationToken::new();
    let pending = builder
        .build_method(&mut registry, "m.cs", &method, &cancellation)
        .unwrap();
    registry.flush(pending);

    let param_twn = registry.get_symbol_type(param_id);

    let result = solver::solve(registry.graph());
    assert!(!result.is_forced_nullable(param_twn.node));
    assert!(result.is_forced_non_null(param_twn.node));
    assert!(result.contradictions.is_empty());
}

#[test]
fn coalesce_is_non_null_when_the_right_side_is_non_null() {
    let mut symbols = SymbolTable::new();
    let a = symbols.reserve_id();
    symbols.insert(
        SymbolInfo::new(a, SymbolKind::Parameter, "a", Type::named("String"))
            .with_ordinal(0)
            .with_annotation(Annotation::Annotated),
    );
    let b = symbols.reserve_id();
    symbols.insert(
        SymbolInfo::new(b, SymbolKind::Parameter, "b", Type::named("String"))
            .with_ordinal(1)
            .with_annotation(Annotation::NotAnnotated),
    );
    let mut registry = Registry::new(symbols);

    let body = BoundNode::Return {
        value: Some(Box::new(BoundNode::Coalesce {
            left: Box::new(BoundNode::SymbolReference {
                symbol: a,
                location: loc(),
            }),
            right: Box::new(BoundNode::SymbolReference {
                symbol: b,
                location: loc(),
            }),
            location: loc(),
        })),
        location: loc(),
    };
    let method = MethodDeclaration {
        parameters: vec![a, b],
        return_type: Type::named("String"),
        return_annotation: Annotation::None,
        body,
    };

    let oracle = NoNonNullFlow;
    let builder = NullabilityBuilder::new(&oracle);
    let cancellation = CancellationToken::new();
    let pending = builder
        .build_method(&mut registry, "m.cs", &method, &cancellation)
        .unwrap();
    registry.flush(pending);

    let return_key = method.parameters.len() as u32;
    let return_node = registry
        .get_mapping("m.cs", return_key)
        .expect("return type syntax should have been registered");

    let result = solver::solve(registry.graph());
    assert!(!result.is_forced_nullable(return_node));
}

#[test]
fn unboxing_conversion_dereferences_its_operand() {
    let body = BoundNode::Conversion {
        operand: Box::new(BoundNode::SymbolReference {
            symbol: SymbolId(0),
            location: loc(),
        }),
        kind: ConversionKind::Unboxing,
        target_type: Type::Value("int".into()),
        location: loc(),
    };
    let (mut registry, method, param_id) =
        single_parameter_method(Type::named("Object"), Annotation::Annotated, body);

    let oracle = NoNonNullFlow;
    let builder = NullabilityBuilder::new(&oracle);
    let cancellation = CancellationToken::new();
    let pending = builder
        .build_method(&mut registry, "m.cs", &method, &cancellation)
        .unwrap();
    registry.flush(pending);

    let param_twn = registry.get_symbol_type(param_id);
    let result = solver::solve(registry.graph());
    assert!(result.is_forced_non_null(param_twn.node));
    assert!(result.is_forced_nullable(param_twn.node));
}

#[test]
fn collection_initializer_add_binds_like_an_ordinary_call() {
    let mut symbols = SymbolTable::new();
    let add_method = symbols.reserve_id();
    let add_param = symbols.reserve_id();
    symbols.insert(
        SymbolInfo::new(add_param, SymbolKind::Parameter, "item", Type::named("String"))
            .with_container(add_method)
            .with_ordinal(0)
            .with_annotation(Annotation::NotAnnotated)
            .external(),
    );
    symbols.insert(SymbolInfo {
        parameters: vec![add_param],
        ..SymbolInfo::new(add_method, SymbolKind::Method, "Add", Type::named("void"))
    });
    let item = symbols.reserve_id();
    symbols.insert(
        SymbolInfo::new(item, SymbolKind::Parameter, "s", Type::named("String"))
            .with_ordinal(0)
            .with_annotation(Annotation::Annotated),
    );
    let mut registry = Registry::new(symbols);

    let body = BoundNode::CollectionInitializerAdd {
        add_method,
        arguments: vec![Argument::by_value(BoundNode::SymbolReference {
            symbol: item,
            location: loc(),
        })],
        location: loc(),
    };
    let method = MethodDeclaration {
        parameters: vec![item],
        return_type: Type::named("void"),
        return_annotation: Annotation::NotAnnotated,
        body,
    };

    let oracle = NoNonNullFlow;
    let builder = NullabilityBuilder::new(&oracle);
    let cancellation = CancellationToken::new();
    let pending = builder
        .build_method(&mut registry, "m.cs", &method, &cancellation)
        .unwrap();
    registry.flush(pending);

    let item_twn = registry.get_symbol_type(item);
    let result = solver::solve(registry.graph());
    // The `Add` parameter is non-annotated, so passing the nullable `item`
    // into it is a contradiction.
    assert!(result.contradictions.contains(&item_twn.node));
}
