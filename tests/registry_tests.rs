use std::cell::RefCell;
use std::rc::Rc;

use chart_interactions::core::{
    DataPoint, Offset, PointRef, RenderedGeometry, ScreenPoint, Viewport, ZoomScale,
};
use chart_interactions::interaction::{
    HoverConfig, HoverHandler, InputEvent, Interaction, InteractionConfig, InteractionHandler,
    InteractionKind, PanConfig, PanHandler, PanPhase, SelectionConfig, SelectionHandler,
    ZoomConfig, ZoomHandler,
};
use chart_interactions::render::TooltipFormatter;
use chart_interactions::{ChartSurface, ConfigError, DispatchError};

fn surface() -> ChartSurface {
    ChartSurface::new(Viewport::new(1000, 500)).expect("surface init")
}

fn free_pan(id: &str) -> PanHandler {
    PanHandler::new(
        id,
        PanConfig::default()
            .with_momentum(false, 0.9)
            .with_pan_padding(1.0),
    )
    .expect("pan handler")
}

fn pan_phase(surface: &ChartSurface, id: &str) -> PanPhase {
    surface
        .interaction(id)
        .and_then(Interaction::as_pan)
        .map(PanHandler::phase)
        .expect("pan registered")
}

#[test]
fn invalid_viewport_is_rejected() {
    let err = ChartSurface::new(Viewport::new(0, 300))
        .err()
        .expect("zero width must fail");
    assert_eq!(err, ConfigError::InvalidViewport { width: 0, height: 300 });
}

#[test]
fn duplicate_id_is_rejected_and_nothing_registered() {
    let mut surface = surface();
    surface
        .add_interaction(ZoomHandler::new("main", ZoomConfig::default()).expect("zoom"))
        .expect("first registration");

    let err = surface
        .add_interaction(free_pan("main"))
        .expect_err("duplicate id must fail");

    assert_eq!(err, ConfigError::DuplicateId("main".to_owned()));
    assert_eq!(surface.interaction_count(), 1);
    assert_eq!(
        surface.interaction("main").map(InteractionHandler::kind),
        Some(InteractionKind::Zoom)
    );
}

#[test]
fn empty_id_is_rejected() {
    let mut surface = surface();

    let err = surface
        .add_interaction(free_pan(""))
        .expect_err("empty id must fail");

    assert_eq!(err, ConfigError::EmptyId);
    assert!(surface.registry().is_empty());
}

#[test]
fn remove_tears_down_pending_work() {
    let mut surface = surface();
    surface
        .add_interaction(
            PanHandler::new("pan", PanConfig::default().with_pan_padding(1.0)).expect("pan"),
        )
        .expect("register pan");
    surface
        .add_interaction(
            HoverHandler::new("hover", HoverConfig::default().with_debounce_ms(100.0))
                .expect("hover"),
        )
        .expect("register hover");

    surface.dispatch(InputEvent::pointer_down(0.0, 0.0), 0.0);
    surface.dispatch(InputEvent::pointer_move(30.0, 0.0), 16.0);
    surface.dispatch(InputEvent::pointer_up(30.0, 0.0), 32.0);
    assert_eq!(pan_phase(&surface, "pan"), PanPhase::Coasting);
    assert!(surface.registry().iter().all(InteractionHandler::has_pending_work));

    assert!(surface.remove_interaction("pan"));
    assert!(surface.remove_interaction("hover"));
    assert!(!surface.remove_interaction("hover"));
    assert!(!surface.remove_interaction("missing"));

    assert!(!surface.has_pending_work());
    let translate = surface.view().translate();
    let outcome = surface.tick(48.0);
    assert!(outcome.emitted.is_empty());
    assert_eq!(surface.view().translate(), translate);
}

#[test]
fn later_handler_sees_earlier_mutation_in_same_dispatch() {
    let geometry = RenderedGeometry::new()
        .with_series([(ScreenPoint::new(100.0, 100.0), DataPoint::new(0.0, 0.0))]);

    let mut surface = surface();
    surface.set_geometry(geometry.clone());
    surface.add_interaction(free_pan("pan")).expect("register pan");
    surface
        .add_interaction(
            HoverHandler::new("hover", HoverConfig::default().with_max_distance(2.0))
                .expect("hover"),
        )
        .expect("register hover");

    surface.dispatch(InputEvent::pointer_down(100.0, 100.0), 0.0);
    let outcome = surface.dispatch(InputEvent::pointer_move(103.0, 100.0), 16.0);

    let order: Vec<_> = outcome
        .emitted
        .iter()
        .map(|emitted| (emitted.handler_id.as_str(), emitted.event.kind()))
        .collect();
    assert_eq!(order, vec![("pan", "panned"), ("hover", "hover_changed")]);
    assert_eq!(surface.view().hover_target(), Some(PointRef::new(0, 0)));

    // reversed registration: hover evaluates before the pan moves the view
    let mut reversed = ChartSurface::new(Viewport::new(1000, 500)).expect("surface init");
    reversed.set_geometry(geometry);
    reversed
        .add_interaction(
            HoverHandler::new("hover", HoverConfig::default().with_max_distance(2.0))
                .expect("hover"),
        )
        .expect("register hover");
    reversed.add_interaction(free_pan("pan")).expect("register pan");

    reversed.dispatch(InputEvent::pointer_down(100.0, 100.0), 0.0);
    reversed.dispatch(InputEvent::pointer_move(103.0, 100.0), 16.0);
    assert_eq!(reversed.view().hover_target(), None);

    reversed.tick(32.0);
    assert_eq!(reversed.view().hover_target(), Some(PointRef::new(0, 0)));
}

#[test]
fn only_first_pan_owns_the_gesture() {
    let mut surface = surface();
    surface.add_interaction(free_pan("pan-a")).expect("register a");
    surface.add_interaction(free_pan("pan-b")).expect("register b");

    let down = surface.dispatch(InputEvent::pointer_down(10.0, 10.0), 0.0);
    assert_eq!(down.emitted.len(), 1);
    assert_eq!(surface.drag_owner(), Some("pan-a"));
    assert_eq!(pan_phase(&surface, "pan-a"), PanPhase::Dragging);
    assert_eq!(pan_phase(&surface, "pan-b"), PanPhase::Idle);

    let moved = surface.dispatch(InputEvent::pointer_move(40.0, 20.0), 16.0);
    assert!(moved.emitted.iter().all(|emitted| emitted.handler_id == "pan-a"));
    assert_eq!(surface.view().translate(), Offset::new(30.0, 10.0));

    surface.dispatch(InputEvent::pointer_up(40.0, 20.0), 32.0);
    assert_eq!(surface.drag_owner(), None);

    // the next gesture goes to the first enabled claimer again
    assert!(surface.set_interaction_enabled("pan-a", false));
    surface.dispatch(InputEvent::pointer_down(0.0, 0.0), 48.0);
    assert_eq!(surface.drag_owner(), Some("pan-b"));
}

#[test]
fn removing_owner_mid_drag_releases_gesture() {
    let mut surface = surface();
    surface.add_interaction(free_pan("pan-a")).expect("register a");
    surface.add_interaction(free_pan("pan-b")).expect("register b");
    surface.dispatch(InputEvent::pointer_down(10.0, 10.0), 0.0);

    assert!(surface.remove_interaction("pan-a"));

    assert_eq!(surface.drag_owner(), None);
    let moved = surface.dispatch(InputEvent::pointer_move(40.0, 20.0), 16.0);
    assert!(moved.emitted.is_empty());
}

#[test]
fn handler_failure_is_isolated_and_reported() {
    let reported = Rc::new(RefCell::new(Vec::<DispatchError>::new()));
    let sink = reported.clone();

    let mut surface = surface();
    surface.set_error_sink(move |error: &DispatchError| sink.borrow_mut().push(error.clone()));
    surface.add_interaction(free_pan("pan")).expect("register pan");
    surface
        .add_interaction(HoverHandler::new("hover", HoverConfig::default()).expect("hover"))
        .expect("register hover");

    surface.dispatch(InputEvent::pointer_down(0.0, 0.0), 0.0);
    let outcome = surface.dispatch(InputEvent::pointer_move(f64::NAN, 5.0), 16.0);

    assert_eq!(outcome.error_count, 2);
    let ids: Vec<_> = reported
        .borrow()
        .iter()
        .map(|error| (error.handler_id.clone(), error.event))
        .collect();
    assert_eq!(
        ids,
        vec![
            ("pan".to_owned(), "pointer_move"),
            ("hover".to_owned(), "pointer_move")
        ]
    );
    assert_eq!(surface.view().translate(), Offset::ZERO);

    // the next event is processed normally
    let recovered = surface.dispatch(InputEvent::pointer_move(5.0, 5.0), 32.0);
    assert_eq!(recovered.error_count, 0);
    assert_eq!(surface.view().translate(), Offset::new(5.0, 5.0));
}

#[test]
fn panicking_formatter_is_isolated_and_reported() {
    let reported = Rc::new(RefCell::new(Vec::<DispatchError>::new()));
    let sink = reported.clone();

    let mut surface = surface();
    surface.set_error_sink(move |error: &DispatchError| sink.borrow_mut().push(error.clone()));
    surface.set_geometry(
        RenderedGeometry::new()
            .with_series([(ScreenPoint::new(100.0, 100.0), DataPoint::new(1.0, 2.0))]),
    );
    let formatter = TooltipFormatter::new(|_| panic!("formatter exploded"));
    surface
        .add_interaction(
            HoverHandler::new("hover", HoverConfig::default().with_tooltip_formatter(formatter))
                .expect("hover"),
        )
        .expect("register hover");
    surface.add_interaction(free_pan("pan")).expect("register pan");

    surface.dispatch(InputEvent::pointer_down(90.0, 100.0), 0.0);
    let outcome = surface.dispatch(InputEvent::pointer_move(100.0, 100.0), 16.0);

    assert_eq!(outcome.error_count, 1);
    let errors = reported.borrow();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].handler_id, "hover");
    assert_eq!(errors[0].event, "pointer_move");
    assert!(errors[0].reason.contains("handler panicked"));
    assert!(errors[0].reason.contains("formatter exploded"));
    // pan still ran after the hover failure
    assert_eq!(surface.view().translate(), Offset::new(10.0, 0.0));
}

#[test]
fn disabled_handlers_are_skipped() {
    let mut surface = surface();
    surface
        .add_interaction(ZoomHandler::new("zoom", ZoomConfig::default()).expect("zoom"))
        .expect("register zoom");

    assert!(!surface.set_interaction_enabled("missing", false));
    assert!(surface.set_interaction_enabled("zoom", false));
    surface.dispatch(InputEvent::wheel(10.0, 0.0, 0.0), 0.0);
    assert_eq!(surface.view().scale(), ZoomScale::IDENTITY);

    assert!(surface.set_interaction_enabled("zoom", true));
    surface.dispatch(InputEvent::wheel(10.0, 0.0, 0.0), 1.0);
    assert_eq!(surface.view().scale(), ZoomScale::uniform(2.0));
}

#[test]
fn config_updates_are_checked_and_diffed() {
    let mut surface = surface();
    surface
        .add_interaction(ZoomHandler::new("zoom", ZoomConfig::default()).expect("zoom"))
        .expect("register zoom");
    surface
        .add_interaction(
            SelectionHandler::new("selection", SelectionConfig::default()).expect("selection"),
        )
        .expect("register selection");

    let mismatch = surface
        .update_interaction_config("zoom", InteractionConfig::Pan(PanConfig::default()))
        .expect_err("kind mismatch");
    assert_eq!(
        mismatch,
        ConfigError::KindMismatch {
            id: "zoom".to_owned(),
            expected: "pan",
            actual: "zoom",
        }
    );

    let unknown = surface
        .update_interaction_config("missing", InteractionConfig::Zoom(ZoomConfig::default()))
        .expect_err("unknown id");
    assert_eq!(unknown, ConfigError::UnknownId("missing".to_owned()));

    let redundant = surface
        .update_interaction_config("zoom", InteractionConfig::Zoom(ZoomConfig::default()))
        .expect("same config");
    assert!(!redundant);

    let raised = surface
        .update_interaction_config(
            "zoom",
            InteractionConfig::Zoom(ZoomConfig::default().with_zoom_bounds(2.0, 8.0)),
        )
        .expect("raise min zoom");
    assert!(raised);
    assert_eq!(surface.view().min_scale(), 2.0);
    assert_eq!(surface.view().scale(), ZoomScale::uniform(2.0));

    let invalid = surface.update_interaction_config(
        "zoom",
        InteractionConfig::Zoom(ZoomConfig::default().with_zoom_bounds(9.0, 3.0)),
    );
    assert!(matches!(invalid, Err(ConfigError::InvalidConfig { .. })));
    assert_eq!(surface.view().min_scale(), 2.0);
}

#[test]
fn partial_updates_through_typed_handle() {
    let mut surface = surface();
    surface.add_interaction(free_pan("pan")).expect("register pan");

    let changed = surface
        .with_interaction_mut("pan", |interaction| {
            interaction
                .as_pan_mut()
                .map(|pan| pan.update_config(|config| config.pan_padding = 0.0))
        })
        .flatten()
        .expect("pan registered")
        .expect("valid update");

    assert!(changed);
    let config = surface.interaction("pan").map(Interaction::config);
    assert!(matches!(
        config,
        Some(InteractionConfig::Pan(PanConfig { pan_padding, .. })) if pan_padding == 0.0
    ));
}

#[test]
fn clear_detaches_everything() {
    let mut surface = surface();
    surface.add_interaction(free_pan("pan")).expect("register pan");
    surface
        .add_interaction(ZoomHandler::new("zoom", ZoomConfig::default()).expect("zoom"))
        .expect("register zoom");
    surface.dispatch(InputEvent::pointer_down(0.0, 0.0), 0.0);

    surface.clear_interactions();

    assert_eq!(surface.interaction_count(), 0);
    assert_eq!(surface.drag_owner(), None);
    assert!(surface.interaction_ids().is_empty());
}

#[test]
fn reset_view_restores_default_transform() {
    let mut surface = surface();
    surface
        .add_interaction(ZoomHandler::new("zoom", ZoomConfig::default()).expect("zoom"))
        .expect("register zoom");
    surface.dispatch(InputEvent::wheel(10.0, 300.0, 200.0), 0.0);
    assert_ne!(surface.view().translate(), Offset::ZERO);

    surface.reset_view();

    assert_eq!(surface.view().scale(), ZoomScale::IDENTITY);
    assert_eq!(surface.view().translate(), Offset::ZERO);
}

#[test]
fn timestamps_never_run_backwards() {
    let mut surface = surface();
    surface.tick(100.0);
    surface.tick(50.0);
    surface.dispatch(InputEvent::PointerLeave, f64::NAN);

    assert_eq!(surface.clock_ms(), 100.0);
}

#[test]
fn viewport_updates_are_validated() {
    let mut surface = surface();

    let err = surface
        .set_viewport(Viewport::new(0, 300))
        .expect_err("zero width must fail");
    assert_eq!(err, ConfigError::InvalidViewport { width: 0, height: 300 });
    assert_eq!(surface.viewport(), Viewport::new(1000, 500));

    surface
        .set_viewport(Viewport::new(640, 480))
        .expect("valid viewport");
    assert_eq!(surface.viewport(), Viewport::new(640, 480));
}
