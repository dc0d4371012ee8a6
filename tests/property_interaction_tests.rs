use chart_interactions::ChartSurface;
use chart_interactions::core::{
    DataPoint, Offset, PointRef, RenderedGeometry, ScreenPoint, ViewState, Viewport,
};
use chart_interactions::interaction::{
    HandlerContext, InputEvent, InteractionHandler, ModifierKey, Modifiers, PanConfig,
    PanHandler, SelectionConfig, SelectionHandler, SelectionMode, ZoomConfig, ZoomHandler,
};
use proptest::prelude::*;

proptest! {
    #[test]
    fn wheel_zoom_stays_within_bounds(
        min_zoom in 0.1f64..2.0,
        span in 0.0f64..20.0,
        speed in 0.01f64..1.0,
        deltas in proptest::collection::vec(-50.0f64..50.0, 1..24),
        anchor_x in 0.0f64..1000.0,
        anchor_y in 0.0f64..500.0
    ) {
        let max_zoom = min_zoom + span;
        let mut surface = ChartSurface::new(Viewport::new(1000, 500)).expect("surface init");
        surface
            .add_interaction(
                ZoomHandler::new(
                    "zoom",
                    ZoomConfig::default()
                        .with_speed(speed)
                        .with_zoom_bounds(min_zoom, max_zoom),
                )
                .expect("zoom handler"),
            )
            .expect("register zoom");

        for (step, delta) in deltas.into_iter().enumerate() {
            let event = InputEvent::wheel(delta, anchor_x, anchor_y);
            let outcome = surface.dispatch(event, step as f64);
            prop_assert_eq!(outcome.error_count, 0);
            let scale = surface.view().scale();
            prop_assert!(scale.x >= min_zoom && scale.x <= max_zoom);
            prop_assert!(scale.y >= min_zoom && scale.y <= max_zoom);
            prop_assert!(surface.view().translate().is_finite());
        }
    }

    #[test]
    fn coast_velocity_decays_by_friction_per_tick(
        vx in -80.0f64..80.0,
        vy in -80.0f64..80.0,
        friction in 0.5f64..0.99,
        ticks in 1usize..40
    ) {
        let config = PanConfig::default()
            .with_momentum(true, friction)
            .with_pan_padding(1_000.0);
        let mut handler = PanHandler::new("pan", config).expect("pan handler");
        let mut view = ViewState::default();
        let geometry = RenderedGeometry::new();
        let mut ctx = HandlerContext::new(&mut view, &geometry, Viewport::new(1000, 500), 0.0);

        let initial = Offset::new(vx, vy);
        prop_assume!(initial.magnitude() >= config.min_velocity);
        prop_assert!(handler.fling(initial, &mut ctx));

        let mut expected_translate = Offset::ZERO;
        for n in 1..=ticks {
            let before = handler.velocity();
            expected_translate = expected_translate + before;
            let running = handler.step_coast(&mut ctx);

            let expected_velocity = initial.magnitude() * friction.powi(n as i32);
            prop_assert!((ctx.view.translate().x - expected_translate.x).abs() <= 1e-6);
            prop_assert!((ctx.view.translate().y - expected_translate.y).abs() <= 1e-6);
            if expected_velocity < config.min_velocity * 0.999 {
                prop_assert!(!running);
                prop_assert!(!handler.has_pending_work());
                break;
            }
            if expected_velocity > config.min_velocity * 1.001 {
                prop_assert!(running);
                prop_assert!((handler.velocity().magnitude() - expected_velocity).abs() <= 1e-9);
            }
        }
    }

    #[test]
    fn multi_select_toggle_is_an_involution(
        initial in proptest::collection::vec(0usize..6, 0..6),
        target in 0usize..6
    ) {
        let mut handler = SelectionHandler::new(
            "selection",
            SelectionConfig::default().with_mode(SelectionMode::Multi),
        )
        .expect("selection handler");
        let geometry = RenderedGeometry::new().with_series(
            (0..6).map(|index| {
                let x = 100.0 * index as f64;
                (ScreenPoint::new(x, 50.0), DataPoint::new(x, 0.0))
            }),
        );
        let mut view = ViewState::default();
        let mut ctx = HandlerContext::new(&mut view, &geometry, Viewport::new(800, 100), 0.0);
        let toggle = Modifiers::only(ModifierKey::Shift);

        for index in initial {
            handler
                .handle_click(ScreenPoint::new(100.0 * index as f64, 50.0), toggle, &mut ctx)
                .expect("seed click");
        }
        let original: Vec<PointRef> = ctx.view.selection().iter().copied().collect();

        let click = ScreenPoint::new(100.0 * target as f64, 50.0);
        handler.handle_click(click, toggle, &mut ctx).expect("first toggle");
        handler.handle_click(click, toggle, &mut ctx).expect("second toggle");

        let mut restored: Vec<PointRef> = ctx.view.selection().iter().copied().collect();
        let mut expected = original;
        restored.sort();
        expected.sort();
        prop_assert_eq!(restored, expected);
    }
}
