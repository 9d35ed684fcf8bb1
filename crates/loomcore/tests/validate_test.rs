use loomcore::{
    validate, ConfigField, GraphModel, NodeCategory, NodeTemplate, NodeTemplateRegistry,
    Position, ValidationError, ValidationWarning,
};
use serde_json::json;

fn test_registry() -> NodeTemplateRegistry {
    let mut registry = NodeTemplateRegistry::new();
    registry.register(NodeTemplate::new(
        "trigger.manual",
        "Manual trigger",
        NodeCategory::Trigger,
    ));
    registry.register(
        NodeTemplate::new("action.send_email", "Send email", NodeCategory::Action)
            .with_field(ConfigField::text("to", "Recipient").required()),
    );
    registry.register(NodeTemplate::new(
        "action.delay",
        "Delay",
        NodeCategory::Action,
    ));
    registry
}

fn filled_email_config() -> serde_json::Map<String, serde_json::Value> {
    [("to".to_string(), json!("team@example.com"))]
        .into_iter()
        .collect()
}

#[test]
fn connected_trigger_and_action_validate_clean() {
    let registry = test_registry();
    let mut model = GraphModel::new();
    let a = model.add_node(
        registry.get("trigger.manual").unwrap(),
        Position::new(0.0, 0.0),
    );
    let b = model.add_node(
        registry.get("action.send_email").unwrap(),
        Position::new(200.0, 0.0),
    );
    model.update_node_config(b, &filled_email_config()).unwrap();
    model.add_edge(a, b, None).unwrap();

    let report = validate(&model, &registry);

    assert!(report.errors.is_empty());
    assert!(report.warnings.is_empty());
    assert!(report.is_executable());
}

#[test]
fn deleting_the_trigger_surfaces_no_trigger_and_orphan() {
    let registry = test_registry();
    let mut model = GraphModel::new();
    let a = model.add_node(
        registry.get("trigger.manual").unwrap(),
        Position::new(0.0, 0.0),
    );
    let b = model.add_node(
        registry.get("action.send_email").unwrap(),
        Position::new(200.0, 0.0),
    );
    model.update_node_config(b, &filled_email_config()).unwrap();
    model.add_edge(a, b, None).unwrap();
    model.remove_node(a);

    let report = validate(&model, &registry);

    assert!(report.errors.contains(&ValidationError::NoTriggerDefined));
    assert!(!report.is_executable());
    // B is the only node left, so the single-node exemption applies and
    // no orphan warning fires until a second node appears.
    assert!(report.warnings.is_empty());

    let c = model.add_node(
        registry.get("action.delay").unwrap(),
        Position::new(400.0, 0.0),
    );
    let report = validate(&model, &registry);
    assert!(report
        .warnings
        .contains(&ValidationWarning::OrphanNode { node_id: b }));
    assert!(report
        .warnings
        .contains(&ValidationWarning::OrphanNode { node_id: c }));
}

#[test]
fn cycle_reachable_from_trigger_is_an_error() {
    let registry = test_registry();
    let mut model = GraphModel::new();
    let t = model.add_node(
        registry.get("trigger.manual").unwrap(),
        Position::new(0.0, 0.0),
    );
    let a = model.add_node(
        registry.get("action.delay").unwrap(),
        Position::new(200.0, 0.0),
    );
    let b = model.add_node(
        registry.get("action.delay").unwrap(),
        Position::new(400.0, 0.0),
    );
    let c = model.add_node(
        registry.get("action.delay").unwrap(),
        Position::new(600.0, 0.0),
    );
    model.add_edge(t, a, None).unwrap();
    model.add_edge(a, b, None).unwrap();
    model.add_edge(b, c, None).unwrap();
    model.add_edge(c, a, None).unwrap();

    let report = validate(&model, &registry);

    assert!(report
        .errors
        .iter()
        .any(|e| matches!(e, ValidationError::CyclicGraph { .. })));
    assert!(!report.is_executable());
}

#[test]
fn two_node_cycle_is_detected() {
    let registry = test_registry();
    let mut model = GraphModel::new();
    let t = model.add_node(
        registry.get("trigger.manual").unwrap(),
        Position::new(0.0, 0.0),
    );
    let a = model.add_node(
        registry.get("action.delay").unwrap(),
        Position::new(200.0, 0.0),
    );
    model.add_edge(t, a, None).unwrap();
    model.add_edge(a, t, None).unwrap();

    let report = validate(&model, &registry);

    assert!(report
        .errors
        .iter()
        .any(|e| matches!(e, ValidationError::CyclicGraph { .. })));
}

#[test]
fn missing_required_field_names_node_and_field() {
    let registry = test_registry();
    let mut model = GraphModel::new();
    let t = model.add_node(
        registry.get("trigger.manual").unwrap(),
        Position::new(0.0, 0.0),
    );
    let b = model.add_node(
        registry.get("action.send_email").unwrap(),
        Position::new(200.0, 0.0),
    );
    model.add_edge(t, b, None).unwrap();

    let report = validate(&model, &registry);

    assert!(report.errors.contains(&ValidationError::MissingRequiredField {
        node_id: b,
        field: "to".to_string(),
    }));

    // An empty string counts as missing too.
    model
        .update_node_config(b, &[("to".to_string(), json!(""))].into_iter().collect())
        .unwrap();
    let report = validate(&model, &registry);
    assert!(!report.is_executable());

    model.update_node_config(b, &filled_email_config()).unwrap();
    let report = validate(&model, &registry);
    assert!(report.is_executable());
}

#[test]
fn empty_graph_reports_no_trigger_only() {
    let registry = test_registry();
    let model = GraphModel::new();

    let report = validate(&model, &registry);

    assert_eq!(report.errors, vec![ValidationError::NoTriggerDefined]);
    assert!(report.warnings.is_empty());
}

#[test]
fn single_node_graph_has_no_orphan_warning() {
    let registry = test_registry();
    let mut model = GraphModel::new();
    let b = model.add_node(
        registry.get("action.send_email").unwrap(),
        Position::new(0.0, 0.0),
    );
    model.update_node_config(b, &filled_email_config()).unwrap();

    let report = validate(&model, &registry);

    assert!(report.warnings.is_empty());
    assert!(report.errors.contains(&ValidationError::NoTriggerDefined));
}

#[test]
fn opaque_nodes_skip_schema_checks() {
    let registry = test_registry();
    let mut model = GraphModel::new();
    let t = model.add_node(
        registry.get("trigger.manual").unwrap(),
        Position::new(0.0, 0.0),
    );

    // Hydrating a draft with an unregistered step type yields a node the
    // registry knows nothing about; validation must not invent errors.
    let meta = loomcore::DraftMetadata::new("fwd");
    let mut draft = loomcore::to_workflow_draft(&model, &meta);
    draft.steps.push(loomcore::WorkflowStep {
        id: uuid::Uuid::new_v4(),
        step_type: "future_step".to_string(),
        name: "Future".to_string(),
        description: String::new(),
        config: Default::default(),
        position: Position::new(200.0, 0.0),
    });
    draft.connections.push(loomcore::StepConnection {
        id: uuid::Uuid::new_v4(),
        source: t,
        target: draft.steps.last().unwrap().id,
        label: None,
    });
    let (model, _, _) = loomcore::from_workflow_draft(&draft, &registry);

    let report = validate(&model, &registry);
    assert!(report
        .errors
        .iter()
        .all(|e| !matches!(e, ValidationError::MissingRequiredField { .. })));
}

#[test]
fn annotate_stamps_messages_onto_offending_nodes() {
    let registry = test_registry();
    let mut model = GraphModel::new();
    let t = model.add_node(
        registry.get("trigger.manual").unwrap(),
        Position::new(0.0, 0.0),
    );
    let b = model.add_node(
        registry.get("action.send_email").unwrap(),
        Position::new(200.0, 0.0),
    );
    model.add_edge(t, b, None).unwrap();

    let report = validate(&model, &registry);
    report.annotate(&mut model);

    let messages = &model.node(b).unwrap().data.validation_errors;
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("to"));
    assert!(model.node(t).unwrap().data.validation_errors.is_empty());

    // Fixing the field and re-annotating clears the stale message.
    model.update_node_config(b, &filled_email_config()).unwrap();
    let report = validate(&model, &registry);
    report.annotate(&mut model);
    assert!(model.node(b).unwrap().data.validation_errors.is_empty());
}
