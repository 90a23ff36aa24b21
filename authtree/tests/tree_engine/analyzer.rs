//! AuthLevelAnalyzer: maximum attainable level over built trees.

use serde_json::{json, Value};

use authtree::{AuthLevelAnalyzer, MalformedGraphError, NodeProcessError, FAILURE, SUCCESS};

use crate::common::{build, definition, registry, Engine};

fn increment(n: i32) -> Value {
    json!({ "increment": n })
}

/// **Scenario**: Two +1 increments in a row on the only path give 2.
#[test]
fn sequential_increments_sum() {
    let engine = Engine::new();
    let registry = registry();
    let tree = build(definition(
        "t",
        "one",
        vec![
            ("one", "AuthLevelIncrement", increment(1)),
            ("two", "AuthLevelIncrement", increment(1)),
        ],
        &[("one", "outcome", "two"), ("two", "outcome", SUCCESS)],
    ));
    let level = AuthLevelAnalyzer::new(&registry, engine.trees.as_ref())
        .analyze_tree(&tree)
        .unwrap();
    assert_eq!(level, Some(2));
}

/// **Scenario**: Branches take the best path; a branch ending in FAILURE grants nothing.
#[test]
fn best_branch_wins_and_failure_is_absent() {
    let engine = Engine::new();
    let registry = registry();
    let tree = build(definition(
        "t",
        "pick",
        vec![
            ("pick", "ChoiceCollector", json!({"choices": ["low", "high", "fail"]})),
            ("low", "AuthLevelIncrement", increment(1)),
            ("high", "AuthLevelIncrement", increment(3)),
        ],
        &[
            ("pick", "low", "low"),
            ("pick", "high", "high"),
            ("pick", "fail", FAILURE),
            ("low", "outcome", SUCCESS),
            ("high", "outcome", FAILURE),
        ],
    ));
    let mut analyzer = AuthLevelAnalyzer::new(&registry, engine.trees.as_ref());
    assert_eq!(analyzer.analyze_tree(&tree).unwrap(), Some(1), "high only reaches FAILURE");
    assert_eq!(analyzer.analyze(&tree, "high").unwrap(), None);
    assert_eq!(analyzer.analyze(&tree, SUCCESS).unwrap(), Some(0));
    assert_eq!(analyzer.analyze(&tree, FAILURE).unwrap(), None);
}

/// **Scenario**: A loop with no way out is absent; the same loop with an exit is not,
/// and traversal terminates in both cases.
#[test]
fn cycles_terminate() {
    let engine = Engine::new();
    let registry = registry();
    let closed = build(definition(
        "closed",
        "a",
        vec![("a", "Decide", Value::Null), ("b", "Noop", Value::Null)],
        &[("a", "true", "b"), ("a", "false", "a"), ("b", "next", "a")],
    ));
    let open = build(definition(
        "open",
        "a",
        vec![
            ("a", "Decide", Value::Null),
            ("b", "AuthLevelIncrement", increment(2)),
        ],
        &[("a", "true", "b"), ("a", "false", SUCCESS), ("b", "outcome", "a")],
    ));
    let mut analyzer = AuthLevelAnalyzer::new(&registry, engine.trees.as_ref());
    assert_eq!(analyzer.analyze_tree(&closed).unwrap(), None);
    assert_eq!(analyzer.analyze_tree(&open).unwrap(), Some(0));
    assert_eq!(analyzer.analyze(&open, "b").unwrap(), Some(2));
}

/// **Scenario**: Analyzing from a node the tree does not have is NodeNotFound; an
/// unregistered type on a reached node is UnknownStepType.
#[test]
fn analysis_errors() {
    let engine = Engine::new();
    let registry = registry();
    let tree = build(definition(
        "t",
        "a",
        vec![("a", "Mystery", Value::Null)],
        &[("a", "next", SUCCESS)],
    ));
    let mut analyzer = AuthLevelAnalyzer::new(&registry, engine.trees.as_ref());
    assert!(matches!(
        analyzer.analyze(&tree, "ghost"),
        Err(NodeProcessError::MalformedGraph(MalformedGraphError::NodeNotFound(_)))
    ));
    assert!(matches!(
        analyzer.analyze_tree(&tree),
        Err(NodeProcessError::UnknownStepType(_))
    ));
}

/// **Scenario**: An inner tree contributes its own best level; its FAILURE counts as 0
/// because the outer tree may still wire "false" to SUCCESS.
#[test]
fn inner_tree_levels() {
    let engine = Engine::new();
    engine
        .add(definition(
            "strong",
            "inc",
            vec![("inc", "AuthLevelIncrement", increment(2))],
            &[("inc", "outcome", SUCCESS)],
        ))
        .add(definition(
            "never",
            "no",
            vec![("no", "Decide", json!({"outcome": "false"}))],
            &[("no", "true", FAILURE), ("no", "false", FAILURE)],
        ));
    let registry = registry();
    let outer = |inner: &str| {
        build(definition(
            "outer",
            "inner",
            vec![("inner", "InnerTreeEvaluator", json!({ "tree": inner }))],
            &[("inner", "true", SUCCESS), ("inner", "false", SUCCESS)],
        ))
    };
    let mut analyzer = AuthLevelAnalyzer::new(&registry, engine.trees.as_ref());
    assert_eq!(analyzer.analyze_tree(&outer("strong")).unwrap(), Some(2));
    assert_eq!(analyzer.analyze_tree(&outer("never")).unwrap(), Some(0));

    let strict = build(definition(
        "outer",
        "inner",
        vec![("inner", "InnerTreeEvaluator", json!({"tree": "never"}))],
        &[("inner", "true", SUCCESS), ("inner", "false", FAILURE)],
    ));
    assert_eq!(
        analyzer.analyze_tree(&strict).unwrap(),
        Some(0),
        "inner value is known even though only the true edge reaches SUCCESS"
    );
}

/// **Scenario**: Trees that evaluate each other are an InnerTreeCycle; a missing inner
/// tree is TreeNotFound.
#[test]
fn inner_tree_cycle_and_missing_tree() {
    let engine = Engine::new();
    let calls = |name: &str, other: &str| {
        definition(
            name,
            "inner",
            vec![("inner", "InnerTreeEvaluator", json!({ "tree": other }))],
            &[("inner", "true", SUCCESS), ("inner", "false", FAILURE)],
        )
    };
    engine.add(calls("x", "y")).add(calls("y", "x"));
    let registry = registry();
    let mut analyzer = AuthLevelAnalyzer::new(&registry, engine.trees.as_ref());

    let x = build(calls("x", "y"));
    match analyzer.analyze_tree(&x) {
        Err(NodeProcessError::MalformedGraph(MalformedGraphError::InnerTreeCycle(name))) => {
            assert_eq!(name, "x")
        }
        other => panic!("expected InnerTreeCycle, got {:?}", other),
    }

    let dangling = build(calls("z", "missing"));
    assert!(matches!(
        analyzer.analyze_tree(&dangling),
        Err(NodeProcessError::TreeNotFound { .. })
    ));
}
