use nullflow_graph::{solver, NullType};
use nullflow_model::{Annotation, Registry, SymbolId, SymbolInfo, SymbolKind, SymbolTable, Type};

#[test]
fn from_type_value_is_oblivious() {
    let mut registry = Registry::new(SymbolTable::new());
    let twn = registry.from_type(&Type::Value("int".into()), Annotation::None);
    assert_eq!(
        registry.graph().node(twn.node).null_type,
        NullType::Oblivious
    );
}

#[test]
fn from_type_annotated_reference_is_nullable() {
    let mut registry = Registry::new(SymbolTable::new());
    let twn = registry.from_type(&Type::named("String"), Annotation::Annotated);
    let result = solver::solve(registry.graph());
    assert!(result.is_forced_nullable(twn.node));
    assert!(!result.is_forced_non_null(twn.node));
}

#[test]
fn from_type_not_annotated_reference_is_non_null() {
    let mut registry = Registry::new(SymbolTable::new());
    let twn = registry.from_type(&Type::named("String"), Annotation::NotAnnotated);
    let result = solver::solve(registry.graph());
    assert!(result.is_forced_non_null(twn.node));
    assert!(!result.is_forced_nullable(twn.node));
}

#[test]
fn from_type_unannotated_reference_is_fresh_inferred() {
    let mut registry = Registry::new(SymbolTable::new());
    let a = registry.from_type(&Type::named("String"), Annotation::None);
    let b = registry.from_type(&Type::named("String"), Annotation::None);
    assert_ne!(a.node, b.node, "each unannotated occurrence gets its own node");
    assert_eq!(
        registry.graph().node(a.node).null_type,
        NullType::Inferred
    );
}

#[test]
fn generic_instantiation_has_one_child_per_type_argument() {
    let mut registry = Registry::new(SymbolTable::new());
    let twn = registry.from_type(
        &Type::generic("Map", vec![Type::named("Key"), Type::named("Value")]),
        Annotation::None,
    );
    assert_eq!(twn.children.len(), 2);
}

#[test]
fn external_symbol_is_materialised_lazily() {
    let mut symbols = SymbolTable::new();
    let id = SymbolId(0);
    symbols.insert(
        SymbolInfo::new(id, SymbolKind::Method, "External.Method", Type::named("String"))
            .with_annotation(Annotation::Annotated)
            .external(),
    );
    let mut registry = Registry::new(symbols);
    let twn = registry.get_symbol_type(id);
    let result = solver::solve(registry.graph());
    assert!(result.is_forced_nullable(twn.node));
    // Querying again returns the same committed instance.
    let twn_again = registry.get_symbol_type(id);
    assert_eq!(twn_again.node, twn.node);
}

#[test]
#[should_panic(expected = "queried before its declaration was bound")]
fn local_symbol_without_prior_binding_panics() {
    let mut symbols = SymbolTable::new();
    let id = SymbolId(0);
    symbols.insert(SymbolInfo::new(id, SymbolKind::Local, "x", Type::named("String")));
    let mut registry = Registry::new(symbols);
    let _ = registry.get_symbol_type(id);
}

#[test]
fn setter_value_parameter_aliases_to_property_type() {
    let mut symbols = SymbolTable::new();
    let property_id = symbols.reserve_id();
    let value_param_id = symbols.reserve_id();
    symbols.insert(
        SymbolInfo::new(property_id, SymbolKind::Property, "Name", Type::named("String"))
            .with_annotation(Annotation::Annotated),
    );
    symbols.insert(
        SymbolInfo::new(value_param_id, SymbolKind::Parameter, "value", Type::named("String"))
            .with_container(property_id)
            .with_ordinal(0),
    );

    let mut registry = Registry::new(symbols);
    let property_type = registry.get_symbol_type(property_id);
    let value_type = registry.get_symbol_type(value_param_id);
    assert_eq!(property_type.node, value_type.node);
}

#[test]
fn indexer_accessor_parameter_aliases_to_indexer_parameter() {
    let mut symbols = SymbolTable::new();
    let indexer_id = symbols.reserve_id();
    let indexer_param_id = symbols.reserve_id();
    let accessor_param_id = symbols.reserve_id();

    symbols.insert(
        SymbolInfo::new(indexer_param_id, SymbolKind::Parameter, "key", Type::named("String"))
            .with_container(indexer_id)
            .with_ordinal(0)
            .with_annotation(Annotation::NotAnnotated),
    );
    symbols.insert(
        SymbolInfo {
            parameters: vec![indexer_param_id],
            ..SymbolInfo::new(indexer_id, SymbolKind::Property, "Item", Type::named("Value"))
        },
    );
    symbols.insert(
        SymbolInfo::new(accessor_param_id, SymbolKind::Parameter, "key", Type::named("String"))
            .with_container(indexer_id)
            .with_ordinal(0),
    );

    let mut registry = Registry::new(symbols);
    let indexer_param_type = registry.get_symbol_type(indexer_param_id);
    let accessor_param_type = registry.get_symbol_type(accessor_param_id);
    assert_eq!(indexer_param_type.node, accessor_param_type.node);
}
