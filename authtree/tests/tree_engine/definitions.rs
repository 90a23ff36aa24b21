//! Definitions from JSON, named lookups after configuration changes, and persisted state.

use serde_json::json;

use authtree::steps::builtin_registry;
use authtree::{
    Callback, ExternalRequest, JsonStateSerializer, MalformedGraphError, NodeProcessError,
    Outcome, StateSerializer, Tree, TreeDefinition, TreeResult, TreeState, SUCCESS,
};

use crate::common::{definition, Engine};

const LOGIN_JSON: &str = r#"{
  "name": "login",
  "realm": "root",
  "entryNodeId": "pick",
  "nodes": [
    {"id": "pick", "type": "ChoiceCollector", "displayName": "Factor",
     "config": {"choices": ["otp", "skip"], "prompt": "Second factor?"}},
    {"id": "otp", "type": "AuthLevelIncrement", "config": {"increment": 2}}
  ],
  "edges": [
    {"source": "pick", "outcome": "otp", "destination": "otp"},
    {"source": "otp", "outcome": "outcome", "destination": "70e691a5-1e33-4ac3-a356-e7b6d60d92e0"}
  ]
}"#;

/// **Scenario**: A JSON definition builds; outcomes its nodes declare but nobody wired
/// are reported per node.
#[test]
fn json_definition_builds_and_reports_unwired_outcomes() {
    let definition: TreeDefinition = serde_json::from_str(LOGIN_JSON).unwrap();
    let tree = Tree::from_definition(definition).unwrap();
    assert_eq!(tree.entry_node_id(), "pick");
    assert_eq!(tree.display_name_of("pick"), Some("Factor"));
    assert_eq!(tree.type_of("otp"), Some("AuthLevelIncrement"));

    let unwired = tree.unwired_outcomes(&builtin_registry()).unwrap();
    assert_eq!(unwired, vec![("pick".to_string(), "skip".to_string())]);
}

/// **Scenario**: A definition wiring the same outcome twice is rejected by the loader path.
#[test]
fn duplicate_outcome_definition_is_rejected() {
    let mut definition: TreeDefinition = serde_json::from_str(LOGIN_JSON).unwrap();
    definition.edges.push(authtree::Edge::new("pick", "otp", SUCCESS));
    match Tree::from_definition(definition) {
        Err(MalformedGraphError::DuplicateOutcome { source_id, outcome }) => {
            assert_eq!((source_id.as_str(), outcome.as_str()), ("pick", "otp"));
        }
        other => panic!("expected DuplicateOutcome, got {:?}", other),
    }
}

/// **Scenario**: A suspended state written with the JSON serializer resumes after being
/// read back, as it would across two HTTP requests.
#[tokio::test]
async fn persisted_state_resumes() {
    let engine = Engine::new();
    engine.add(serde_json::from_str(LOGIN_JSON).unwrap());
    let request = ExternalRequest::default();

    let first = engine
        .executor
        .process_named("root", "login", TreeState::initial("root", None), vec![], &request)
        .await
        .unwrap();
    assert_eq!(first.outcome(), Outcome::NeedsInput);

    let serializer = JsonStateSerializer;
    let bytes = serializer.serialize(first.state()).unwrap();
    let restored = serializer.deserialize(&bytes).unwrap();
    assert_eq!(&restored, first.state());

    let input = vec![Callback::new("ChoiceCallback", json!(null)).with_input(json!(0))];
    let done = engine
        .executor
        .process_named("root", "login", restored, input, &request)
        .await
        .unwrap();
    assert_eq!(done.outcome(), Outcome::True);
    assert_eq!(done.state().auth_level(), 2);
}

async fn run_gate(engine: &Engine) -> Result<TreeResult, NodeProcessError> {
    engine
        .executor
        .process_named(
            "root",
            "gate",
            TreeState::initial("root", None),
            vec![],
            &ExternalRequest::default(),
        )
        .await
}

/// **Scenario**: A changed definition is served only after the cached tree is invalidated.
#[tokio::test]
async fn named_lookup_sees_changes_after_invalidate() {
    let engine = Engine::new();
    engine.add(definition(
        "gate",
        "inc",
        vec![("inc", "AuthLevelIncrement", json!({"increment": 1}))],
        &[("inc", "outcome", SUCCESS)],
    ));
    assert_eq!(run_gate(&engine).await.unwrap().state().auth_level(), 1);

    engine.add(definition(
        "gate",
        "inc",
        vec![("inc", "AuthLevelIncrement", json!({"increment": 5}))],
        &[("inc", "outcome", SUCCESS)],
    ));
    assert_eq!(run_gate(&engine).await.unwrap().state().auth_level(), 1, "still cached");
    assert!(engine.trees.invalidate("root", "gate"));
    assert_eq!(run_gate(&engine).await.unwrap().state().auth_level(), 5);

    engine.add(definition("gate", "missing", vec![], &[]));
    engine.trees.invalidate_all();
    assert!(matches!(
        run_gate(&engine).await,
        Err(NodeProcessError::MalformedGraph(MalformedGraphError::EntryNotFound(_)))
    ));
}
