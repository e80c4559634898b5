use nullflow_common::Location;
use nullflow_graph::{solve, Graph, PathQuery, Verdict, NON_NULL, NULLABLE};

#[test]
fn singletons_always_reach_themselves() {
    let graph = Graph::new();
    let query = PathQuery::new(&graph);
    assert!(query.has_path(NULLABLE, NULLABLE));
    assert!(query.has_path(NON_NULL, NON_NULL));
}

#[test]
fn assignment_is_transitive() {
    let mut graph = Graph::new();
    let a = graph.alloc_node(Some("a".into()));
    let b = graph.alloc_node(Some("b".into()));
    let c = graph.alloc_node(Some("c".into()));
    graph.add_edge(a, b, "assignment", Location::synthetic());
    graph.add_edge(b, c, "assignment", Location::synthetic());

    let query = PathQuery::new(&graph);
    assert!(query.has_path(a, c));
    assert!(!query.has_path(c, a));
}

#[test]
fn node_with_no_edges_defaults_to_non_null() {
    let mut graph = Graph::new();
    let isolated = graph.alloc_node(Some("isolated".into()));
    let result = solve(&graph);
    assert_eq!(result.verdict(isolated), Verdict::NonNull);
    assert!(!result.is_forced_nullable(isolated));
    assert!(!result.is_forced_non_null(isolated));
}

#[test]
fn node_reachable_from_nullable_is_forced_nullable() {
    let mut graph = Graph::new();
    let param = graph.alloc_node(Some("param".into()));
    graph.add_edge(NULLABLE, param, "literal-null", Location::synthetic());
    let result = solve(&graph);
    assert_eq!(result.verdict(param), Verdict::Nullable);
    assert!(result.is_forced_nullable(param));
}

#[test]
fn node_reaching_non_null_is_forced_non_null() {
    let mut graph = Graph::new();
    let receiver = graph.alloc_node(Some("receiver".into()));
    graph.add_edge(receiver, NON_NULL, "dereference", Location::synthetic());
    let result = solve(&graph);
    assert_eq!(result.verdict(receiver), Verdict::NonNull);
    assert!(result.is_forced_non_null(receiver));
}

#[test]
fn contradiction_defaults_to_nullable() {
    let mut graph = Graph::new();
    let node = graph.alloc_node(Some("contradictory".into()));
    graph.add_edge(NULLABLE, node, "literal-null", Location::synthetic());
    graph.add_edge(node, NON_NULL, "dereference", Location::synthetic());
    let result = solve(&graph);
    assert!(result.contradictions.contains(&node));
    assert_eq!(result.verdict(node), Verdict::Nullable);
}

#[test]
fn bounded_path_query_gives_up_past_the_edge_budget() {
    let mut graph = Graph::new();
    let mut prev = graph.alloc_node(None);
    let first = prev;
    for _ in 0..10 {
        let next = graph.alloc_node(None);
        graph.add_edge(prev, next, "assignment", Location::synthetic());
        prev = next;
    }
    let bounded = PathQuery::with_max_edges(&graph, 2);
    assert!(!bounded.has_path(first, prev));
    let unbounded = PathQuery::new(&graph);
    assert!(unbounded.has_path(first, prev));
}
