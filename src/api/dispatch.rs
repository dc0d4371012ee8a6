use indexmap::IndexSet;
use tracing::trace;

use crate::core::PointRef;
use crate::extensions::{EmittedEvent, InteractionEvent, ListenerContext};
use crate::interaction::{HandlerContext, InputEvent, InteractionHandler};

use super::ChartSurface;
use super::registry::{DispatchReport, DispatchScope, collect};

type RedrawFingerprint = (u64, Option<PointRef>, usize);

/// What one `dispatch` or `tick` produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DispatchOutcome {
    /// Events in the order handlers emitted them.
    pub emitted: Vec<EmittedEvent>,
    /// Handler failures isolated during this call (already sent to the sink).
    pub error_count: usize,
    /// Scale, translate, hover target or selection changed.
    pub needs_redraw: bool,
}

impl DispatchOutcome {
    #[must_use]
    pub fn events(&self) -> impl Iterator<Item = &InteractionEvent> {
        self.emitted.iter().map(|emitted| &emitted.event)
    }

    #[must_use]
    pub fn contains(&self, predicate: impl Fn(&InteractionEvent) -> bool) -> bool {
        self.events().any(predicate)
    }
}

impl ChartSurface {
    /// Delivers one input event to every enabled handler in registration
    /// order.
    ///
    /// A failing handler is reported to the error sink and skipped; the rest
    /// still run. `now_ms` must come from a monotonic clock; earlier values
    /// are treated as the latest one seen.
    pub fn dispatch(&mut self, event: InputEvent, now_ms: f64) -> DispatchOutcome {
        let now_ms = self.advance_clock(now_ms);
        if let Some(modifiers) = event.modifiers() {
            self.modifiers = modifiers;
        }
        trace!(event = event.name(), now_ms, "dispatch");

        let before = self.redraw_fingerprint();
        let mut report = DispatchReport::default();
        let mut scope = DispatchScope {
            view: &mut self.view,
            geometry: &self.geometry,
            viewport: self.viewport,
            now_ms,
        };
        self.registry.dispatch(&event, &mut scope, &mut report);
        self.finish(report, before)
    }

    /// Advances animation loops and due timers by one frame.
    pub fn tick(&mut self, now_ms: f64) -> DispatchOutcome {
        let now_ms = self.advance_clock(now_ms);
        let before = self.redraw_fingerprint();
        let mut report = DispatchReport::default();
        let mut scope = DispatchScope {
            view: &mut self.view,
            geometry: &self.geometry,
            viewport: self.viewport,
            now_ms,
        };
        self.registry.tick(&mut scope, &mut report);
        self.finish(report, before)
    }

    /// Empties the selection through the first enabled selection handler so
    /// listeners observe the change.
    ///
    /// Returns `false` when nothing was selected.
    pub fn clear_selection(&mut self) -> bool {
        let before = self.redraw_fingerprint();
        let mut report = DispatchReport::default();
        let cleared = match self.registry.selection_mut() {
            Some(handler) => {
                let mut ctx = HandlerContext::new(
                    &mut self.view,
                    &self.geometry,
                    self.viewport,
                    self.clock_ms,
                );
                let cleared = handler.clear(&mut ctx);
                collect(handler.id(), ctx.into_emitted(), &mut report);
                cleared
            }
            None => self.view.replace_selection(IndexSet::new()),
        };
        self.finish(report, before);
        cleared
    }

    fn advance_clock(&mut self, now_ms: f64) -> f64 {
        if now_ms.is_finite() && now_ms > self.clock_ms {
            self.clock_ms = now_ms;
        }
        self.clock_ms
    }

    fn redraw_fingerprint(&self) -> RedrawFingerprint {
        (
            self.view.transform_revision(),
            self.view.hover_target(),
            self.view.selection().len(),
        )
    }

    fn finish(&mut self, report: DispatchReport, before: RedrawFingerprint) -> DispatchOutcome {
        for error in &report.errors {
            self.error_sink.report(error);
        }

        let selection_changed = report
            .emitted
            .iter()
            .any(|emitted| matches!(emitted.event, InteractionEvent::SelectionChanged { .. }));
        let needs_redraw = selection_changed || self.redraw_fingerprint() != before;

        if !report.emitted.is_empty() && !self.listeners.is_empty() {
            let context = self.listener_context();
            self.listeners.notify(&report.emitted, context);
        }

        DispatchOutcome {
            emitted: report.emitted,
            error_count: report.errors.len(),
            needs_redraw,
        }
    }

    fn listener_context(&self) -> ListenerContext {
        ListenerContext {
            viewport: self.viewport,
            scale: self.view.scale(),
            translate: self.view.translate(),
            hover_target: self.view.hover_target(),
            selection_len: self.view.selection().len(),
            drag_owner_active: self.registry.drag_owner().is_some(),
        }
    }
}
