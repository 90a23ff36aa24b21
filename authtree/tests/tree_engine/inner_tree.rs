//! InnerTreeEvaluator end to end: suspend inside the inner tree, resume, level checks.

use serde_json::json;

use authtree::steps::{position_key, CHOICE_CALLBACK};
use authtree::{
    Callback, ExternalRequest, MalformedGraphError, NodeProcessError, Outcome, StepError,
    TreeResult, TreeState, FAILURE, SUCCESS,
};

use crate::common::{definition, Engine};

/// Outer "login": mfa (inner "otp") -true-> bonus (+1) -> SUCCESS, -false-> FAILURE.
/// Inner "otp": choose (accept / reject); accept -> +2 -> SUCCESS, reject -> FAILURE.
fn engine() -> Engine {
    let engine = Engine::new();
    engine
        .add(definition(
            "login",
            "mfa",
            vec![
                ("mfa", "InnerTreeEvaluator", json!({"tree": "otp"})),
                ("bonus", "AuthLevelIncrement", json!({"increment": 1})),
            ],
            &[
                ("mfa", "true", "bonus"),
                ("mfa", "false", FAILURE),
                ("bonus", "outcome", SUCCESS),
            ],
        ))
        .add(definition(
            "otp",
            "choose",
            vec![
                ("choose", "ChoiceCollector", json!({"choices": ["accept", "reject"]})),
                ("grant", "AuthLevelIncrement", json!({"increment": 2})),
            ],
            &[
                ("choose", "accept", "grant"),
                ("choose", "reject", FAILURE),
                ("grant", "outcome", SUCCESS),
            ],
        ));
    engine
}

async fn start(engine: &Engine, target: Option<i32>) -> Result<TreeResult, NodeProcessError> {
    engine
        .executor
        .process_named(
            "root",
            "login",
            TreeState::initial("root", target),
            vec![],
            &ExternalRequest::default(),
        )
        .await
}

async fn answer(engine: &Engine, suspended: TreeResult, choice: &str) -> TreeResult {
    let input = vec![Callback::new(CHOICE_CALLBACK, json!(null)).with_input(json!(choice))];
    engine
        .executor
        .process_named(
            "root",
            "login",
            suspended.into_state(),
            input,
            &ExternalRequest::default(),
        )
        .await
        .unwrap()
}

/// **Scenario**: The inner tree's callback surfaces from the outer node, which keeps the
/// inner position while suspended and drops it once the inner tree completes.
#[tokio::test]
async fn inner_tree_suspends_and_resumes() {
    let engine = engine();
    let first = start(&engine, None).await.unwrap();
    assert_eq!(first.outcome(), Outcome::NeedsInput);
    assert!(first.callbacks()[0].is_type(CHOICE_CALLBACK));
    assert_eq!(first.callbacks()[0].output["choices"], json!(["accept", "reject"]));
    assert_eq!(first.state().current_node_id(), Some("mfa"));
    assert_eq!(first.state().shared_state()[&position_key("mfa")]["nodeId"], "choose");

    let done = answer(&engine, first, "accept").await;
    assert_eq!(done.outcome(), Outcome::True);
    assert_eq!(done.state().auth_level(), 3);
    assert!(done.state().shared_state().get(&position_key("mfa")).is_none());
    assert_eq!(done.state().current_node_id(), Some("bonus"));
}

/// **Scenario**: Inner FAILURE is the outer "false" outcome.
#[tokio::test]
async fn inner_failure_routes_false() {
    let engine = engine();
    let first = start(&engine, None).await.unwrap();
    let done = answer(&engine, first, "reject").await;
    assert_eq!(done.outcome(), Outcome::False);
    assert_eq!(done.state().auth_level(), 0);
}

/// **Scenario**: The outer level check counts the inner tree: 3 is reachable and kept in
/// shared state across the inner run, 4 is rejected before anything runs.
#[tokio::test]
async fn target_level_accounts_for_inner_tree() {
    let engine = engine();
    let first = start(&engine, Some(3)).await.unwrap();
    assert_eq!(first.outcome(), Outcome::NeedsInput);
    assert_eq!(first.state().target_auth_level(), Some(3));

    let done = answer(&engine, first, "accept").await;
    assert_eq!(done.outcome(), Outcome::True);
    assert_eq!(done.state().target_auth_level(), Some(3));

    match start(&engine, Some(4)).await {
        Err(NodeProcessError::LevelUnreachable {
            node_id,
            max_attainable,
            ..
        }) => {
            assert_eq!(node_id, "mfa");
            assert_eq!(max_attainable, Some(3));
        }
        other => panic!("expected LevelUnreachable, got {:?}", other),
    }
}

/// **Scenario**: An answer that is not one of the choices fails the inner step; the
/// outer call reports it as a step error at the evaluator node.
#[tokio::test]
async fn invalid_choice_is_step_error() {
    let engine = engine();
    let first = start(&engine, None).await.unwrap();
    let input = vec![Callback::new(CHOICE_CALLBACK, json!(null)).with_input(json!("maybe"))];
    let err = engine
        .executor
        .process_named(
            "root",
            "login",
            first.into_state(),
            input,
            &ExternalRequest::default(),
        )
        .await
        .unwrap_err();
    match err {
        NodeProcessError::StepExecution { node_id, node_type, .. } => {
            assert_eq!(node_id, "mfa");
            assert_eq!(node_type, "InnerTreeEvaluator");
        }
        other => panic!("expected StepExecution, got {:?}", other),
    }
}

async fn process(
    engine: &Engine,
    tree: &str,
    state: TreeState,
    input: Vec<Callback>,
) -> Result<TreeResult, NodeProcessError> {
    engine
        .executor
        .process_named("root", tree, state, input, &ExternalRequest::default())
        .await
}

/// **Scenario**: Two levels of inner trees whose evaluator nodes share the id "mfa"
/// keep both positions apart and finish after one answer.
#[tokio::test]
async fn nested_inner_trees_with_shared_node_id_resume() {
    let engine = engine();
    engine
        .add(definition(
            "outer",
            "mfa",
            vec![("mfa", "InnerTreeEvaluator", json!({"tree": "mid"}))],
            &[("mfa", "true", SUCCESS), ("mfa", "false", FAILURE)],
        ))
        .add(definition(
            "mid",
            "mfa",
            vec![
                ("mfa", "InnerTreeEvaluator", json!({"tree": "otp"})),
                ("bump", "AuthLevelIncrement", json!({"increment": 1})),
            ],
            &[
                ("mfa", "true", "bump"),
                ("mfa", "false", FAILURE),
                ("bump", "outcome", SUCCESS),
            ],
        ));

    let first = process(&engine, "outer", TreeState::initial("root", None), vec![])
        .await
        .unwrap();
    assert_eq!(first.outcome(), Outcome::NeedsInput);
    let record = &first.state().shared_state()[&position_key("mfa")];
    assert_eq!(record["nodeId"], "mfa");
    assert_eq!(record["nested"][&position_key("mfa")]["nodeId"], "choose");

    let input = vec![Callback::new(CHOICE_CALLBACK, json!(null)).with_input(json!("accept"))];
    let done = process(&engine, "outer", first.into_state(), input)
        .await
        .unwrap();
    assert_eq!(done.outcome(), Outcome::True);
    assert_eq!(done.state().auth_level(), 3);
    assert!(done.state().shared_state().get(&position_key("mfa")).is_none());
}

/// Follows step errors raised by inner tree runs down to the engine error that caused them.
fn root_cause(err: &NodeProcessError) -> &NodeProcessError {
    match err {
        NodeProcessError::StepExecution {
            source: StepError::Engine(inner),
            ..
        } => root_cause(inner),
        other => other,
    }
}

/// **Scenario**: Running a tree that evaluates itself, with no target level, fails with
/// InnerTreeCycle at the evaluator instead of recursing.
#[tokio::test]
async fn self_embedding_tree_fails_at_run_time() {
    let engine = Engine::new();
    engine.add(definition(
        "loop",
        "in",
        vec![("in", "InnerTreeEvaluator", json!({"tree": "loop"}))],
        &[("in", "true", SUCCESS), ("in", "false", FAILURE)],
    ));

    let err = process(&engine, "loop", TreeState::initial("root", None), vec![])
        .await
        .unwrap_err();
    match &err {
        NodeProcessError::StepExecution { node_id, node_type, .. } => {
            assert_eq!(node_id, "in");
            assert_eq!(node_type, "InnerTreeEvaluator");
        }
        other => panic!("expected StepExecution, got {:?}", other),
    }
    assert!(matches!(
        root_cause(&err),
        NodeProcessError::MalformedGraph(MalformedGraphError::InnerTreeCycle(name)) if name == "loop"
    ));
}

/// **Scenario**: Two trees that evaluate each other fail with InnerTreeCycle naming the
/// tree that came round again.
#[tokio::test]
async fn mutually_embedding_trees_fail_at_run_time() {
    let engine = Engine::new();
    let calls = |name: &str, other: &str| {
        definition(
            name,
            "in",
            vec![("in", "InnerTreeEvaluator", json!({ "tree": other }))],
            &[("in", "true", SUCCESS), ("in", "false", FAILURE)],
        )
    };
    engine.add(calls("ping", "pong")).add(calls("pong", "ping"));

    let err = process(&engine, "ping", TreeState::initial("root", None), vec![])
        .await
        .unwrap_err();
    assert!(matches!(
        root_cause(&err),
        NodeProcessError::MalformedGraph(MalformedGraphError::InnerTreeCycle(name)) if name == "ping"
    ));
}

/// **Scenario**: Transient state written inside a completed inner tree is seen by the
/// next outer step of the same call, and still cleared on the terminal result.
#[tokio::test]
async fn inner_transient_state_reaches_outer_steps() {
    let engine = Engine::new();
    engine
        .add(definition(
            "outer",
            "collect",
            vec![
                ("collect", "InnerTreeEvaluator", json!({"tree": "inner"})),
                ("check", "Recall", json!(null)),
            ],
            &[
                ("collect", "true", "check"),
                ("collect", "false", FAILURE),
                ("check", "true", SUCCESS),
                ("check", "false", FAILURE),
            ],
        ))
        .add(definition(
            "inner",
            "keep",
            vec![("keep", "Remember", json!(null))],
            &[("keep", "next", SUCCESS)],
        ));

    let done = process(&engine, "outer", TreeState::initial("root", None), vec![])
        .await
        .unwrap();
    assert_eq!(done.outcome(), Outcome::True);
    assert!(done.state().transient_state().is_empty());
}
