use loomcore::{GraphModel, NodeCategory, NodeTemplate, Position};
use loomeditor::{CanvasController, Interaction, Viewport};

fn trigger_template() -> NodeTemplate {
    NodeTemplate::new("trigger.manual", "Manual trigger", NodeCategory::Trigger)
}

fn action_template() -> NodeTemplate {
    NodeTemplate::new("action.delay", "Delay", NodeCategory::Action)
}

fn controller() -> CanvasController {
    CanvasController::new(GraphModel::new())
}

#[test]
fn palette_drag_then_drop_creates_a_node_at_the_translated_point() {
    let mut canvas = controller();
    canvas.set_viewport(Viewport {
        pan_x: 100.0,
        pan_y: 50.0,
        zoom: 2.0,
    });

    canvas.begin_palette_drag(action_template());
    assert!(matches!(canvas.interaction(), Interaction::Dragging { .. }));

    let id = canvas.drop_on_canvas(Position::new(300.0, 250.0)).unwrap();

    assert_eq!(canvas.interaction(), &Interaction::Idle);
    let node = canvas.model().node(id).unwrap();
    assert_eq!(node.position, Position::new(100.0, 100.0));
    // The fresh node becomes the selection.
    assert_eq!(canvas.selection(), Some(id));
}

#[test]
fn drop_without_a_drag_does_nothing() {
    let mut canvas = controller();

    assert!(canvas.drop_on_canvas(Position::new(10.0, 10.0)).is_none());
    assert_eq!(canvas.model().node_count(), 0);
}

#[test]
fn connect_gesture_adds_an_edge_and_returns_to_idle() {
    let mut canvas = controller();
    canvas.begin_palette_drag(trigger_template());
    let a = canvas.drop_on_canvas(Position::new(0.0, 0.0)).unwrap();
    canvas.begin_palette_drag(action_template());
    let b = canvas.drop_on_canvas(Position::new(200.0, 0.0)).unwrap();

    assert!(canvas.begin_connection(a, "out"));
    assert!(matches!(canvas.interaction(), Interaction::Connecting { .. }));

    let edge = canvas.complete_connection(b);
    assert!(edge.is_some());
    assert_eq!(canvas.interaction(), &Interaction::Idle);
    assert_eq!(canvas.model().edge_count(), 1);
}

#[test]
fn rejected_connection_is_discarded_silently() {
    let mut canvas = controller();
    canvas.begin_palette_drag(trigger_template());
    let a = canvas.drop_on_canvas(Position::new(0.0, 0.0)).unwrap();

    // Self loop: the gesture ends, no edge, no error surfaced.
    assert!(canvas.begin_connection(a, "out"));
    assert!(canvas.complete_connection(a).is_none());
    assert_eq!(canvas.interaction(), &Interaction::Idle);
    assert_eq!(canvas.model().edge_count(), 0);

    // Duplicate: same outcome.
    canvas.begin_palette_drag(action_template());
    let b = canvas.drop_on_canvas(Position::new(200.0, 0.0)).unwrap();
    canvas.begin_connection(a, "out");
    canvas.complete_connection(b);
    canvas.begin_connection(a, "out");
    assert!(canvas.complete_connection(b).is_none());
    assert_eq!(canvas.model().edge_count(), 1);
}

#[test]
fn connection_from_a_deleted_node_does_not_start() {
    let mut canvas = controller();
    canvas.begin_palette_drag(trigger_template());
    let a = canvas.drop_on_canvas(Position::new(0.0, 0.0)).unwrap();
    canvas.delete_node(a);

    assert!(!canvas.begin_connection(a, "out"));
    assert_eq!(canvas.interaction(), &Interaction::Idle);
}

#[test]
fn selection_is_single_node_and_cleared_by_canvas_click() {
    let mut canvas = controller();
    canvas.begin_palette_drag(trigger_template());
    let a = canvas.drop_on_canvas(Position::new(0.0, 0.0)).unwrap();
    canvas.begin_palette_drag(action_template());
    let b = canvas.drop_on_canvas(Position::new(200.0, 0.0)).unwrap();

    canvas.select_node(a);
    assert_eq!(canvas.selection(), Some(a));
    canvas.select_node(b);
    assert_eq!(canvas.selection(), Some(b));

    canvas.click_empty_canvas();
    assert_eq!(canvas.selection(), None);
}

#[test]
fn delete_key_removes_selection_and_cascades() {
    let mut canvas = controller();
    canvas.begin_palette_drag(trigger_template());
    let a = canvas.drop_on_canvas(Position::new(0.0, 0.0)).unwrap();
    canvas.begin_palette_drag(action_template());
    let b = canvas.drop_on_canvas(Position::new(200.0, 0.0)).unwrap();
    canvas.begin_connection(a, "out");
    canvas.complete_connection(b);

    canvas.select_node(a);
    let deleted = canvas.handle_delete_key(false);

    assert_eq!(deleted, Some(a));
    assert_eq!(canvas.selection(), None);
    assert!(!canvas.model().contains_node(a));
    assert_eq!(canvas.model().edge_count(), 0);
    assert!(canvas.model().contains_node(b));
}

#[test]
fn delete_key_is_ignored_while_an_input_has_focus() {
    let mut canvas = controller();
    canvas.begin_palette_drag(trigger_template());
    let a = canvas.drop_on_canvas(Position::new(0.0, 0.0)).unwrap();
    canvas.select_node(a);

    assert_eq!(canvas.handle_delete_key(true), None);
    assert!(canvas.model().contains_node(a));
    assert_eq!(canvas.selection(), Some(a));
}

#[test]
fn delete_key_with_no_selection_is_a_noop() {
    let mut canvas = controller();
    canvas.begin_palette_drag(trigger_template());
    canvas.drop_on_canvas(Position::new(0.0, 0.0)).unwrap();
    canvas.click_empty_canvas();

    assert_eq!(canvas.handle_delete_key(false), None);
    assert_eq!(canvas.model().node_count(), 1);
}

#[test]
fn starting_a_new_gesture_replaces_the_old_one() {
    let mut canvas = controller();
    canvas.begin_palette_drag(trigger_template());
    let a = canvas.drop_on_canvas(Position::new(0.0, 0.0)).unwrap();

    canvas.begin_connection(a, "out");
    canvas.begin_palette_drag(action_template());
    assert!(matches!(canvas.interaction(), Interaction::Dragging { .. }));

    // The abandoned connect gesture leaves nothing behind.
    canvas.cancel_interaction();
    assert_eq!(canvas.interaction(), &Interaction::Idle);
    assert_eq!(canvas.model().edge_count(), 0);
}

#[test]
fn drag_node_moves_through_the_viewport_transform() {
    let mut canvas = controller();
    canvas.begin_palette_drag(action_template());
    let a = canvas.drop_on_canvas(Position::new(0.0, 0.0)).unwrap();

    canvas.set_viewport(Viewport {
        pan_x: -50.0,
        pan_y: 0.0,
        zoom: 0.5,
    });
    assert!(canvas.drag_node(a, Position::new(100.0, 30.0)));
    assert_eq!(
        canvas.model().node(a).unwrap().position,
        Position::new(300.0, 60.0)
    );
}

#[test]
fn duplicate_selection_selects_the_copy() {
    let mut canvas = controller();
    canvas.begin_palette_drag(action_template());
    let a = canvas.drop_on_canvas(Position::new(0.0, 0.0)).unwrap();
    canvas.select_node(a);

    let copy = canvas.duplicate_selection().unwrap();

    assert_ne!(copy, a);
    assert_eq!(canvas.selection(), Some(copy));
    assert_eq!(canvas.model().node_count(), 2);
}
