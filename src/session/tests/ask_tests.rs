//! Question handling tests.

use image::DynamicImage;

use super::{controller, last_text, uploaded};
use crate::annotation::AnnotationEngine;
use crate::constants::{CLEARED_MESSAGE, NO_IMAGE_MESSAGE};
use crate::model::{Rectangle, Role};
use crate::response::{
    ANALYZE_REPLY, AnnotationInstruction, IDENTIFY_REPLY, Response, ResponseEngine,
};
use crate::session::{SessionController, SessionState, StateChange};

/// Engine that always asks for the same annotation, like a remote service
/// might.
struct FixedAnnotation(Rectangle);

impl ResponseEngine for FixedAnnotation {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn evaluate(
        &self,
        _question: &str,
        _selection: Option<&Rectangle>,
        _image: Option<&DynamicImage>,
    ) -> Response {
        Response::text("Found it.").with_annotation(AnnotationInstruction::new(self.0, "thing"))
    }
}

fn fixed_controller(rect: Rectangle) -> SessionController {
    SessionController::new(Box::new(FixedAnnotation(rect)), AnnotationEngine::default())
}

#[test]
fn test_ask_without_image() {
    let c = controller();
    let t = c.ask(SessionState::new(), "analyze");
    let roles: Vec<Role> = t.state.chat.messages().iter().map(|m| m.role).collect();
    assert_eq!(roles, vec![Role::System, Role::User, Role::Assistant]);
    assert_eq!(last_text(&t.state), NO_IMAGE_MESSAGE);
    assert!(!t.state.chart.is_set());
}

#[test]
fn test_blank_question_ignored() {
    let c = controller();
    let state = uploaded(&c);
    let before = state.chat.clone();
    let t = c.ask(state, "   ");
    assert!(t.is_noop());
    assert_eq!(t.state.chat, before);
}

#[test]
fn test_question_is_trimmed() {
    let c = controller();
    let t = c.ask(uploaded(&c), "  hello  ");
    let user = &t.state.chat.messages()[1];
    assert_eq!(user.role, Role::User);
    assert_eq!(user.text, "hello");
}

#[test]
fn test_analyze_replaces_chart() {
    let c = controller();
    let state = c
        .create_selection(uploaded(&c), Rectangle::new(0, 0, 100, 100))
        .state;
    let t = c.ask(state, "analyze");
    assert!(t.changed(StateChange::Chart));
    assert!(!t.changed(StateChange::Annotation));
    assert_eq!(last_text(&t.state), ANALYZE_REPLY);
    let first = t.state.chart.data().cloned();

    let t = c.ask(t.state, "analyze again");
    assert!(t.state.chart.is_set());
    assert_eq!(t.state.chart.data().map(|d| d.len()), Some(5));
    // Seeded engine keeps drawing, so the second chart is a fresh sample
    assert_ne!(t.state.chart.data().cloned(), first);
}

#[test]
fn test_identify_twice_keeps_single_overlay() {
    let c = controller();
    let a = Rectangle::new(10, 10, 100, 100);
    let b = Rectangle::new(300, 300, 400, 400);
    let state = c.create_selection(uploaded(&c), a).state;
    let state = c.ask(state, "identify").state;
    let state = c.create_selection(state, b).state;
    let t = c.ask(state, "identify");
    assert!(t.changed(StateChange::Annotation));
    assert_eq!(last_text(&t.state), IDENTIFY_REPLY);

    let annotated = t.state.images.annotated().expect("annotated").to_rgba8();
    // Overlay for `a` is gone, overlay for `b` present
    assert_eq!(annotated.get_pixel(a.x1, 50).0, [128, 128, 128, 255]);
    assert_eq!(annotated.get_pixel(b.x1, 350).0, [0, 0, 255, 255]);
    assert_eq!(t.state.selections.history(), &[a, b]);
}

#[test]
fn test_clear_chat_idempotent() {
    let c = controller();
    let state = c.ask(uploaded(&c), "What is this?").state;
    let once = c.clear_chat(state);
    assert!(once.changed(StateChange::Transcript));
    let first = once.state.chat.clone();
    let twice = c.clear_chat(once.state);
    assert_eq!(twice.state.chat, first);
    assert_eq!(first.len(), 1);
    assert_eq!(last_text(&twice.state), CLEARED_MESSAGE);
}

#[test]
fn test_zoom_actions() {
    let c = controller();
    let t = c.zoom_in(SessionState::new());
    assert!(t.changed(StateChange::Zoom));
    assert!((t.state.zoom.factor() - 1.2).abs() < 1e-6);

    let mut state = t.state;
    for _ in 0..20 {
        state = c.zoom_out(state).state;
    }
    assert!((state.zoom.factor() - 0.5).abs() < 1e-6);
    let t = c.zoom_out(state);
    assert!(t.is_noop());

    let t = c.zoom_reset(t.state);
    assert_eq!(t.state.zoom.factor(), 1.0);
    assert!(c.zoom_reset(t.state).is_noop());
}

#[test]
fn test_out_of_bounds_annotation_rejected() {
    for rect in [
        Rectangle::new(700, 500, 5000, 9000),
        Rectangle::new(0, 0, u32::MAX, 10),
        Rectangle::new(300, 300, 100, 100),
    ] {
        let c = fixed_controller(rect);
        let t = c.ask(uploaded(&c), "identify");
        assert!(t.state.images.annotated().is_none());
        assert!(t.state.selections.history().is_empty());
        assert!(!t.changed(StateChange::Annotation));
        assert!(!t.changed(StateChange::History));

        let messages = t.state.chat.messages();
        let reply = &messages[messages.len() - 2];
        assert_eq!(reply.role, Role::Assistant);
        assert_eq!(reply.text, "Found it.");
        assert_eq!(t.state.chat.last().map(|m| m.role), Some(Role::System));
        assert!(last_text(&t.state).starts_with("Annotation not drawn. Invalid selection: "));
    }
}

#[test]
fn test_in_bounds_annotation_from_engine_recorded() {
    let rect = Rectangle::new(700, 500, 800, 600);
    let c = fixed_controller(rect);
    let t = c.ask(uploaded(&c), "identify");
    assert!(t.changed(StateChange::Annotation));
    assert_eq!(t.state.selections.history(), &[rect]);
    assert_eq!(last_text(&t.state), "Found it.");
}

#[test]
fn test_chart_renders_with_annotator_font() {
    let c = controller();
    let state = c
        .create_selection(uploaded(&c), Rectangle::new(0, 0, 100, 100))
        .state;
    let t = c.ask(state, "analyze");
    let config = crate::config::ChartConfig::default();
    let chart = t.state.chart.render(&config, c.annotator().font());
    assert!(chart.is_some());
}
