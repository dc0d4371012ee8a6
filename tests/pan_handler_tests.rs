use approx::assert_relative_eq;
use chart_interactions::ChartSurface;
use chart_interactions::core::{Offset, Viewport, ZoomScale};
use chart_interactions::extensions::InteractionEvent;
use chart_interactions::interaction::{
    InputEvent, Interaction, ModifierKey, Modifiers, PanConfig, PanHandler, PanPhase,
    PointerButton, ZoomConfig, ZoomHandler,
};

fn surface_with(config: PanConfig) -> ChartSurface {
    let mut surface = ChartSurface::new(Viewport::new(1000, 500)).expect("surface init");
    surface
        .add_interaction(PanHandler::new("pan", config).expect("pan handler"))
        .expect("register pan");
    surface
}

fn pan_phase(surface: &ChartSurface) -> PanPhase {
    surface
        .interaction("pan")
        .and_then(Interaction::as_pan)
        .map(PanHandler::phase)
        .expect("pan registered")
}

fn event_kinds(outcome: &chart_interactions::DispatchOutcome) -> Vec<&'static str> {
    outcome.events().map(InteractionEvent::kind).collect()
}

#[test]
fn drag_translates_one_to_one() {
    let mut surface = surface_with(
        PanConfig::default()
            .with_momentum(false, 0.92)
            .with_pan_padding(1.0),
    );

    let down = surface.dispatch(InputEvent::pointer_down(100.0, 100.0), 0.0);
    assert_eq!(event_kinds(&down), vec!["pan_started"]);
    assert_eq!(surface.drag_owner(), Some("pan"));
    assert_eq!(pan_phase(&surface), PanPhase::Dragging);

    surface.dispatch(InputEvent::pointer_move(130.0, 110.0), 16.0);
    let moved = surface.dispatch(InputEvent::pointer_move(150.0, 90.0), 32.0);
    assert!(moved.needs_redraw);
    assert_eq!(surface.view().translate(), Offset::new(50.0, -10.0));

    let up = surface.dispatch(InputEvent::pointer_up(150.0, 90.0), 48.0);
    assert_eq!(event_kinds(&up), vec!["pan_ended"]);
    assert_eq!(surface.drag_owner(), None);
    assert_eq!(pan_phase(&surface), PanPhase::Idle);
    assert!(!surface.has_pending_work());
}

#[test]
fn moves_without_a_drag_are_ignored() {
    let mut surface = surface_with(PanConfig::default());

    let outcome = surface.dispatch(InputEvent::pointer_move(40.0, 40.0), 0.0);

    assert!(outcome.emitted.is_empty());
    assert_eq!(surface.view().translate(), Offset::ZERO);
}

#[test]
fn only_configured_button_starts_a_drag() {
    let mut surface =
        surface_with(PanConfig::default().with_button(PointerButton::SECONDARY));

    surface.dispatch(InputEvent::pointer_down(10.0, 10.0), 0.0);
    assert_eq!(surface.drag_owner(), None);
    assert_eq!(pan_phase(&surface), PanPhase::Idle);

    surface.dispatch(
        InputEvent::pointer_down(10.0, 10.0).with_button(PointerButton::SECONDARY),
        1.0,
    );
    assert_eq!(surface.drag_owner(), Some("pan"));

    // releasing another button keeps the drag alive
    surface.dispatch(InputEvent::pointer_up(10.0, 10.0), 2.0);
    assert_eq!(pan_phase(&surface), PanPhase::Dragging);
}

#[test]
fn required_modifier_must_be_held_on_pointer_down() {
    let mut surface =
        surface_with(PanConfig::default().with_modifier_key(Some(ModifierKey::Alt)));

    surface.dispatch(InputEvent::pointer_down(10.0, 10.0), 0.0);
    assert_eq!(surface.drag_owner(), None);

    surface.dispatch(
        InputEvent::pointer_down(10.0, 10.0)
            .with_modifiers(Modifiers::only(ModifierKey::Shift)),
        1.0,
    );
    assert_eq!(surface.drag_owner(), None);

    surface.dispatch(
        InputEvent::pointer_down(10.0, 10.0).with_modifiers(Modifiers::only(ModifierKey::Alt)),
        2.0,
    );
    assert_eq!(surface.drag_owner(), Some("pan"));
    assert!(surface.modifiers().alt);
}

#[test]
fn default_zoom_suppresses_pan_when_configured() {
    let mut surface = ChartSurface::new(Viewport::new(1000, 500)).expect("surface init");
    surface
        .add_interaction(ZoomHandler::new("zoom", ZoomConfig::default()).expect("zoom"))
        .expect("register zoom");
    surface
        .add_interaction(
            PanHandler::new(
                "pan",
                PanConfig::default().with_disable_at_default_zoom(true),
            )
            .expect("pan"),
        )
        .expect("register pan");

    let outcome = surface.dispatch(InputEvent::pointer_down(200.0, 200.0), 0.0);
    assert!(outcome.emitted.is_empty());
    assert_eq!(surface.drag_owner(), None);

    surface.dispatch(InputEvent::wheel(10.0, 500.0, 250.0), 1.0);
    assert_eq!(surface.view().scale(), ZoomScale::uniform(2.0));

    surface.dispatch(InputEvent::pointer_down(200.0, 200.0), 2.0);
    assert_eq!(surface.drag_owner(), Some("pan"));
}

#[test]
fn padding_limits_overscroll_on_unzoomed_content() {
    let mut surface = surface_with(PanConfig::default().with_momentum(false, 0.92));

    surface.dispatch(InputEvent::pointer_down(0.0, 0.0), 0.0);
    surface.dispatch(InputEvent::pointer_move(500.0, -400.0), 16.0);

    // 10% of 1000 x 500
    assert_eq!(surface.view().translate(), Offset::new(100.0, -50.0));
}

#[test]
fn zoomed_content_can_travel_its_full_extent() {
    let mut surface = ChartSurface::new(Viewport::new(1000, 500)).expect("surface init");
    surface
        .add_interaction(ZoomHandler::new("zoom", ZoomConfig::default()).expect("zoom"))
        .expect("register zoom");
    surface
        .add_interaction(
            PanHandler::new(
                "pan",
                PanConfig::default()
                    .with_momentum(false, 0.92)
                    .with_pan_padding(0.0),
            )
            .expect("pan"),
        )
        .expect("register pan");

    surface.dispatch(InputEvent::wheel(10.0, 0.0, 0.0), 0.0);
    surface.dispatch(InputEvent::pointer_down(900.0, 400.0), 1.0);
    surface.dispatch(InputEvent::pointer_move(300.0, 300.0), 2.0);
    assert_eq!(surface.view().translate(), Offset::new(-600.0, -100.0));

    surface.dispatch(InputEvent::pointer_move(-900.0, -400.0), 3.0);
    assert_eq!(surface.view().translate(), Offset::new(-1000.0, -500.0));
}

#[test]
fn disabling_mid_drag_releases_ownership() {
    let mut surface = surface_with(PanConfig::default());
    surface.dispatch(InputEvent::pointer_down(0.0, 0.0), 0.0);
    assert_eq!(surface.drag_owner(), Some("pan"));

    assert!(surface.set_interaction_enabled("pan", false));

    assert_eq!(surface.drag_owner(), None);
    assert_eq!(pan_phase(&surface), PanPhase::Idle);
    assert!(!surface.has_pending_work());
}

#[test]
fn invalid_friction_is_rejected() {
    assert!(PanHandler::new("pan", PanConfig::default().with_momentum(true, 1.0)).is_err());
    assert!(PanHandler::new("pan", PanConfig::default().with_momentum(true, 0.0)).is_err());
    assert!(PanHandler::new("pan", PanConfig::default().with_pan_padding(-0.1)).is_err());
}

#[test]
fn non_finite_pointer_is_reported_not_applied() {
    let mut surface = surface_with(PanConfig::default());
    surface.dispatch(InputEvent::pointer_down(0.0, 0.0), 0.0);

    let outcome = surface.dispatch(InputEvent::pointer_move(f64::NAN, 0.0), 1.0);

    assert_eq!(outcome.error_count, 1);
    assert_relative_eq!(surface.view().translate().x, 0.0);
}
