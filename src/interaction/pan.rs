use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::{Offset, ScreenPoint, ViewState, Viewport};
use crate::error::{ConfigResult, DispatchError};
use crate::extensions::InteractionEvent;

use super::validation::validate_pan_config;
use super::{
    EventResponse, HandlerContext, InputEvent, InteractionHandler, InteractionKind, ModifierKey,
    Modifiers, PointerButton,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanConfig {
    /// Pointer button that starts a drag.
    pub button: PointerButton,
    /// Key that must be held when the drag starts.
    pub modifier_key: Option<ModifierKey>,
    /// Keep moving after release, decaying by `friction` per tick.
    pub momentum: bool,
    /// Per-tick velocity multiplier in `(0, 1)`.
    pub friction: f64,
    /// Coasting stops once the velocity magnitude drops below this.
    pub min_velocity: f64,
    /// Weight of the newest pointer delta in the velocity moving average.
    pub velocity_smoothing: f64,
    pub disable_at_default_zoom: bool,
    /// Allowed overscroll past the content bounds, as a viewport fraction.
    pub pan_padding: f64,
}

impl Default for PanConfig {
    fn default() -> Self {
        Self {
            button: PointerButton::PRIMARY,
            modifier_key: None,
            momentum: true,
            friction: 0.92,
            min_velocity: 0.05,
            velocity_smoothing: 0.5,
            disable_at_default_zoom: false,
            pan_padding: 0.1,
        }
    }
}

impl PanConfig {
    #[must_use]
    pub fn with_button(mut self, button: PointerButton) -> Self {
        self.button = button;
        self
    }

    #[must_use]
    pub fn with_modifier_key(mut self, modifier_key: Option<ModifierKey>) -> Self {
        self.modifier_key = modifier_key;
        self
    }

    #[must_use]
    pub fn with_momentum(mut self, momentum: bool, friction: f64) -> Self {
        self.momentum = momentum;
        self.friction = friction;
        self
    }

    #[must_use]
    pub fn with_min_velocity(mut self, min_velocity: f64) -> Self {
        self.min_velocity = min_velocity;
        self
    }

    #[must_use]
    pub fn with_velocity_smoothing(mut self, velocity_smoothing: f64) -> Self {
        self.velocity_smoothing = velocity_smoothing;
        self
    }

    #[must_use]
    pub fn with_disable_at_default_zoom(mut self, disable: bool) -> Self {
        self.disable_at_default_zoom = disable;
        self
    }

    #[must_use]
    pub fn with_pan_padding(mut self, pan_padding: f64) -> Self {
        self.pan_padding = pan_padding;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PanPhase {
    Idle,
    Dragging,
    Coasting,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PanRuntime {
    phase: PanPhase,
    velocity: Offset,
    last_pointer: Option<ScreenPoint>,
    velocity_samples: u32,
}

impl Default for PanRuntime {
    fn default() -> Self {
        Self {
            phase: PanPhase::Idle,
            velocity: Offset::ZERO,
            last_pointer: None,
            velocity_samples: 0,
        }
    }
}

/// Drag-to-translate with optional momentum after release.
#[derive(Debug, Clone, PartialEq)]
pub struct PanHandler {
    id: String,
    enabled: bool,
    config: PanConfig,
    runtime: PanRuntime,
}

impl PanHandler {
    pub fn new(id: impl Into<String>, config: PanConfig) -> ConfigResult<Self> {
        validate_pan_config(&config)?;
        Ok(Self {
            id: id.into(),
            enabled: true,
            config,
            runtime: PanRuntime::default(),
        })
    }

    #[must_use]
    pub fn config(&self) -> &PanConfig {
        &self.config
    }

    /// Replaces the config snapshot. Returns `true` when it differed.
    ///
    /// Turning momentum off stops an active coast.
    pub fn set_config(&mut self, config: PanConfig) -> ConfigResult<bool> {
        validate_pan_config(&config)?;
        if config == self.config {
            return Ok(false);
        }
        self.config = config;
        if !config.momentum && self.runtime.phase == PanPhase::Coasting {
            self.reset_runtime();
        }
        Ok(true)
    }

    pub fn update_config(&mut self, edit: impl FnOnce(&mut PanConfig)) -> ConfigResult<bool> {
        let mut next = self.config;
        edit(&mut next);
        self.set_config(next)
    }

    #[must_use]
    pub fn phase(&self) -> PanPhase {
        self.runtime.phase
    }

    #[must_use]
    pub fn velocity(&self) -> Offset {
        self.runtime.velocity
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.runtime.phase == PanPhase::Dragging
    }

    pub fn handle_pointer_down(
        &mut self,
        position: ScreenPoint,
        button: PointerButton,
        modifiers: Modifiers,
        ctx: &mut HandlerContext<'_>,
    ) -> Result<EventResponse, DispatchError> {
        if !position.is_finite() {
            return Err(self.dispatch_error("pointer_down", "pointer position must be finite"));
        }
        if self.runtime.phase == PanPhase::Coasting {
            self.reset_runtime();
            ctx.emit(InteractionEvent::PanEnded);
        }
        if !self.enabled || button != self.config.button || ctx.gesture_claimed() {
            return Ok(EventResponse::Ignored);
        }
        if self
            .config
            .modifier_key
            .is_some_and(|key| !modifiers.is_held(key))
        {
            return Ok(EventResponse::Ignored);
        }
        if self.config.disable_at_default_zoom && ctx.view.is_at_default_zoom() {
            trace!(id = %self.id, "pan suppressed at default zoom");
            return Ok(EventResponse::Ignored);
        }

        self.runtime = PanRuntime {
            phase: PanPhase::Dragging,
            velocity: Offset::ZERO,
            last_pointer: Some(position),
            velocity_samples: 0,
        };
        debug!(id = %self.id, x = position.x, y = position.y, "pan gesture claimed");
        ctx.emit(InteractionEvent::PanStarted);
        Ok(EventResponse::Claimed)
    }

    pub fn handle_pointer_move(
        &mut self,
        position: ScreenPoint,
        ctx: &mut HandlerContext<'_>,
    ) -> Result<EventResponse, DispatchError> {
        if self.runtime.phase != PanPhase::Dragging {
            return Ok(EventResponse::Ignored);
        }
        if !position.is_finite() {
            return Err(self.dispatch_error("pointer_move", "pointer position must be finite"));
        }
        let Some(last) = self.runtime.last_pointer else {
            self.runtime.last_pointer = Some(position);
            return Ok(EventResponse::Handled);
        };

        let delta = last.delta_to(position);
        self.runtime.last_pointer = Some(position);
        self.record_velocity(delta);

        let translate = clamp_translate(
            ctx.view.translate() + delta,
            ctx.view,
            ctx.viewport,
            self.config.pan_padding,
        );
        ctx.view.set_translate(translate);
        ctx.emit(InteractionEvent::Panned { translate });
        Ok(EventResponse::Handled)
    }

    pub fn handle_pointer_up(
        &mut self,
        button: PointerButton,
        ctx: &mut HandlerContext<'_>,
    ) -> Result<EventResponse, DispatchError> {
        if self.runtime.phase != PanPhase::Dragging || button != self.config.button {
            return Ok(EventResponse::Ignored);
        }
        let velocity = self.runtime.velocity;
        if self.config.momentum && velocity.magnitude() >= self.config.min_velocity {
            self.start_coast(velocity, ctx);
        } else {
            self.reset_runtime();
            debug!(id = %self.id, "pan gesture released");
            ctx.emit(InteractionEvent::PanEnded);
        }
        Ok(EventResponse::Handled)
    }

    /// Starts a coast with the given per-tick velocity, as if a drag had just
    /// been released.
    ///
    /// Returns `false` when momentum is off, the handler is disabled or a
    /// drag is in progress.
    pub fn fling(&mut self, velocity: Offset, ctx: &mut HandlerContext<'_>) -> bool {
        if !self.enabled
            || !self.config.momentum
            || self.runtime.phase == PanPhase::Dragging
            || !velocity.is_finite()
            || velocity.magnitude() < self.config.min_velocity
        {
            return false;
        }
        self.start_coast(velocity, ctx);
        true
    }

    /// Advances an active coast by one frame.
    ///
    /// Returns `true` while the coast is still running after this tick.
    pub fn step_coast(&mut self, ctx: &mut HandlerContext<'_>) -> bool {
        if self.runtime.phase != PanPhase::Coasting {
            return false;
        }
        let translate = clamp_translate(
            ctx.view.translate() + self.runtime.velocity,
            ctx.view,
            ctx.viewport,
            self.config.pan_padding,
        );
        ctx.view.set_translate(translate);
        ctx.emit(InteractionEvent::Panned { translate });

        self.runtime.velocity = self.runtime.velocity.scaled(self.config.friction);
        if self.runtime.velocity.magnitude() < self.config.min_velocity {
            self.reset_runtime();
            debug!(id = %self.id, "coast settled");
            ctx.emit(InteractionEvent::PanEnded);
            return false;
        }
        true
    }

    fn start_coast(&mut self, velocity: Offset, ctx: &mut HandlerContext<'_>) {
        self.runtime.phase = PanPhase::Coasting;
        self.runtime.velocity = velocity;
        self.runtime.last_pointer = None;
        debug!(
            id = %self.id,
            vx = velocity.x,
            vy = velocity.y,
            "coast started"
        );
        ctx.emit(InteractionEvent::CoastStarted { velocity });
    }

    fn record_velocity(&mut self, delta: Offset) {
        self.runtime.velocity = if self.runtime.velocity_samples == 0 {
            delta
        } else {
            let weight = self.config.velocity_smoothing;
            delta.scaled(weight) + self.runtime.velocity.scaled(1.0 - weight)
        };
        self.runtime.velocity_samples = self.runtime.velocity_samples.saturating_add(1);
    }

    fn reset_runtime(&mut self) {
        self.runtime = PanRuntime::default();
    }

    fn dispatch_error(&self, event: &'static str, reason: &str) -> DispatchError {
        DispatchError::new(self.id.clone(), event, reason)
    }
}

/// Clamps a translate so scaled content stays within `padding` viewport
/// fractions of its bounds on each axis.
#[must_use]
pub fn clamp_translate(
    translate: Offset,
    view: &ViewState,
    viewport: Viewport,
    padding: f64,
) -> Offset {
    let scale = view.scale();
    Offset::new(
        clamp_axis(translate.x, viewport.width_px(), scale.x, padding),
        clamp_axis(translate.y, viewport.height_px(), scale.y, padding),
    )
}

fn clamp_axis(translate: f64, extent: f64, scale: f64, padding: f64) -> f64 {
    let slack = extent - extent * scale;
    let overscroll = extent * padding;
    let low = slack.min(0.0) - overscroll;
    let high = slack.max(0.0) + overscroll;
    translate.clamp(low, high)
}

impl InteractionHandler for PanHandler {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> InteractionKind {
        InteractionKind::Pan
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool, _view: &mut ViewState) {
        self.enabled = enabled;
        if !enabled {
            self.reset_runtime();
        }
    }

    fn claims_gestures(&self) -> bool {
        true
    }

    fn owns_active_gesture(&self) -> bool {
        self.is_dragging()
    }

    fn detach(&mut self, _view: &mut ViewState) {
        self.reset_runtime();
    }

    fn handle_event(
        &mut self,
        event: &InputEvent,
        ctx: &mut HandlerContext<'_>,
    ) -> Result<EventResponse, DispatchError> {
        match *event {
            InputEvent::PointerDown {
                position,
                button,
                modifiers,
            } => self.handle_pointer_down(position, button, modifiers, ctx),
            InputEvent::PointerMove { position, .. } => self.handle_pointer_move(position, ctx),
            InputEvent::PointerUp { button, .. } => self.handle_pointer_up(button, ctx),
            _ => Ok(EventResponse::Ignored),
        }
    }

    fn on_frame(&mut self, ctx: &mut HandlerContext<'_>) -> Result<(), DispatchError> {
        self.step_coast(ctx);
        Ok(())
    }

    fn has_pending_work(&self) -> bool {
        self.runtime.phase != PanPhase::Idle
    }
}

#[cfg(test)]
mod tests {
    use super::clamp_axis;

    #[test]
    fn unzoomed_axis_only_allows_overscroll() {
        assert_eq!(clamp_axis(500.0, 1000.0, 1.0, 0.1), 100.0);
        assert_eq!(clamp_axis(-500.0, 1000.0, 1.0, 0.1), -100.0);
        assert_eq!(clamp_axis(0.0, 1000.0, 1.0, 0.0), 0.0);
    }

    #[test]
    fn zoomed_axis_allows_full_content_travel() {
        assert_eq!(clamp_axis(-900.0, 1000.0, 2.0, 0.0), -900.0);
        assert_eq!(clamp_axis(-1500.0, 1000.0, 2.0, 0.0), -1000.0);
        assert_eq!(clamp_axis(10.0, 1000.0, 2.0, 0.0), 0.0);
    }

    #[test]
    fn shrunk_content_moves_inside_viewport() {
        assert_eq!(clamp_axis(400.0, 1000.0, 0.5, 0.0), 400.0);
        assert_eq!(clamp_axis(600.0, 1000.0, 0.5, 0.0), 500.0);
    }
}
