use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::{Offset, ScreenPoint, ViewState, Viewport, ZoomScale};
use crate::error::{ConfigResult, DispatchError};
use crate::extensions::InteractionEvent;

use super::validation::validate_zoom_config;
use super::{EventResponse, HandlerContext, InputEvent, InteractionHandler, InteractionKind};

/// Axis restriction for zoom gestures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ZoomDirection {
    X,
    Y,
    #[default]
    Both,
}

impl ZoomDirection {
    #[must_use]
    fn affects_x(self) -> bool {
        matches!(self, Self::X | Self::Both)
    }

    #[must_use]
    fn affects_y(self) -> bool {
        matches!(self, Self::Y | Self::Both)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
    /// Accept wheel input.
    pub wheel: bool,
    /// Accept pinch input.
    pub pinch: bool,
    /// Wheel delta multiplier.
    pub speed: f64,
    pub direction: ZoomDirection,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Fraction of the viewport kept between the zoom anchor and each edge.
    pub zoom_padding: f64,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            wheel: true,
            pinch: true,
            speed: 0.1,
            direction: ZoomDirection::Both,
            min_zoom: 1.0,
            max_zoom: 10.0,
            zoom_padding: 0.0,
        }
    }
}

impl ZoomConfig {
    #[must_use]
    pub fn with_inputs(mut self, wheel: bool, pinch: bool) -> Self {
        self.wheel = wheel;
        self.pinch = pinch;
        self
    }

    #[must_use]
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    #[must_use]
    pub fn with_direction(mut self, direction: ZoomDirection) -> Self {
        self.direction = direction;
        self
    }

    #[must_use]
    pub fn with_zoom_bounds(mut self, min_zoom: f64, max_zoom: f64) -> Self {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self
    }

    #[must_use]
    pub fn with_zoom_padding(mut self, zoom_padding: f64) -> Self {
        self.zoom_padding = zoom_padding;
        self
    }

    #[must_use]
    pub fn clamp(&self, scale: f64) -> f64 {
        scale.clamp(self.min_zoom, self.max_zoom)
    }
}

/// Wheel and pinch driven zoom anchored at the gesture position.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoomHandler {
    id: String,
    enabled: bool,
    config: ZoomConfig,
}

impl ZoomHandler {
    pub fn new(id: impl Into<String>, config: ZoomConfig) -> ConfigResult<Self> {
        validate_zoom_config(&config)?;
        Ok(Self {
            id: id.into(),
            enabled: true,
            config,
        })
    }

    #[must_use]
    pub fn config(&self) -> &ZoomConfig {
        &self.config
    }

    /// Replaces the config snapshot. Returns `true` when it differed.
    pub fn set_config(&mut self, config: ZoomConfig) -> ConfigResult<bool> {
        validate_zoom_config(&config)?;
        if config == self.config {
            return Ok(false);
        }
        self.config = config;
        Ok(true)
    }

    /// Applies a partial edit to a copy of the current config, then replaces it.
    pub fn update_config(&mut self, edit: impl FnOnce(&mut ZoomConfig)) -> ConfigResult<bool> {
        let mut next = self.config;
        edit(&mut next);
        self.set_config(next)
    }

    pub fn handle_wheel(
        &mut self,
        delta: f64,
        pointer: ScreenPoint,
        ctx: &mut HandlerContext<'_>,
    ) -> Result<EventResponse, DispatchError> {
        if !self.enabled || !self.config.wheel {
            return Ok(EventResponse::Ignored);
        }
        if !delta.is_finite() {
            return Err(self.dispatch_error("wheel", "wheel delta must be finite"));
        }
        self.apply_factor(1.0 + delta * self.config.speed, pointer, ctx, "wheel")
    }

    pub fn handle_pinch(
        &mut self,
        scale_delta: f64,
        center: ScreenPoint,
        ctx: &mut HandlerContext<'_>,
    ) -> Result<EventResponse, DispatchError> {
        if !self.enabled || !self.config.pinch {
            return Ok(EventResponse::Ignored);
        }
        if !scale_delta.is_finite() {
            return Err(self.dispatch_error("pinch", "pinch scale delta must be finite"));
        }
        self.apply_factor(1.0 + scale_delta, center, ctx, "pinch")
    }

    /// Multiplies the affected scale components by `factor`, keeping the
    /// content under `anchor` stationary.
    ///
    /// Non-positive factors collapse to `min_zoom`.
    pub fn zoom_by(
        &self,
        factor: f64,
        anchor: ScreenPoint,
        ctx: &mut HandlerContext<'_>,
    ) -> Result<EventResponse, DispatchError> {
        self.apply_factor(factor, anchor, ctx, "zoom_by")
    }

    fn apply_factor(
        &self,
        factor: f64,
        anchor: ScreenPoint,
        ctx: &mut HandlerContext<'_>,
        event: &'static str,
    ) -> Result<EventResponse, DispatchError> {
        if !factor.is_finite() {
            return Err(self.dispatch_error(event, "zoom factor must be finite"));
        }
        if !anchor.is_finite() {
            return Err(self.dispatch_error(event, "zoom anchor must be finite"));
        }
        let factor = factor.max(0.0);
        let anchor = self.inset_anchor(anchor, ctx.viewport);

        let current = ctx.view.scale();
        let translate = ctx.view.translate();
        let direction = self.config.direction;

        let next_x = if direction.affects_x() {
            self.config.clamp(current.x * factor)
        } else {
            current.x
        };
        let next_y = if direction.affects_y() {
            self.config.clamp(current.y * factor)
        } else {
            current.y
        };
        let next_scale = ZoomScale::new(next_x, next_y);
        if next_scale == current {
            return Ok(EventResponse::Ignored);
        }

        let next_translate = Offset::new(
            anchored_translate(anchor.x, translate.x, current.x, next_x),
            anchored_translate(anchor.y, translate.y, current.y, next_y),
        );
        if !next_translate.is_finite() {
            return Err(self.dispatch_error(event, "zoom produced a non-finite translate"));
        }

        ctx.view.set_scale(next_scale);
        ctx.view.set_translate(next_translate);
        trace!(
            id = %self.id,
            scale_x = next_x,
            scale_y = next_y,
            "zoom applied"
        );
        ctx.emit(InteractionEvent::Zoomed {
            scale: next_scale,
            translate: next_translate,
        });
        Ok(EventResponse::Handled)
    }

    /// Restores the view to `min_zoom` with no translate.
    pub fn reset(&self, view: &mut ViewState) {
        view.set_min_scale(self.config.min_zoom);
        view.reset_transform();
    }

    fn inset_anchor(&self, anchor: ScreenPoint, viewport: Viewport) -> ScreenPoint {
        let padding = self.config.zoom_padding;
        if padding <= 0.0 {
            return anchor;
        }
        let width = viewport.width_px();
        let height = viewport.height_px();
        ScreenPoint::new(
            anchor.x.clamp(width * padding, width * (1.0 - padding)),
            anchor.y.clamp(height * padding, height * (1.0 - padding)),
        )
    }

    fn dispatch_error(&self, event: &'static str, reason: &str) -> DispatchError {
        DispatchError::new(self.id.clone(), event, reason)
    }
}

fn anchored_translate(anchor: f64, translate: f64, scale: f64, next_scale: f64) -> f64 {
    if scale == next_scale {
        return translate;
    }
    anchor - (anchor - translate) * (next_scale / scale)
}

impl InteractionHandler for ZoomHandler {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> InteractionKind {
        InteractionKind::Zoom
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool, _view: &mut ViewState) {
        self.enabled = enabled;
    }

    fn attach(&mut self, view: &mut ViewState) {
        view.set_min_scale(self.config.min_zoom);
        let scale = view.scale();
        view.set_scale(ZoomScale::new(
            self.config.clamp(scale.x),
            self.config.clamp(scale.y),
        ));
    }

    fn detach(&mut self, _view: &mut ViewState) {}

    fn handle_event(
        &mut self,
        event: &InputEvent,
        ctx: &mut HandlerContext<'_>,
    ) -> Result<EventResponse, DispatchError> {
        match *event {
            InputEvent::Wheel {
                delta, position, ..
            } => self.handle_wheel(delta, position, ctx),
            InputEvent::Pinch {
                scale_delta,
                center,
                ..
            } => self.handle_pinch(scale_delta, center, ctx),
            _ => Ok(EventResponse::Ignored),
        }
    }
}
