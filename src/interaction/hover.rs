use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::{Offset, PointHit, PointRef, ScreenPoint, ViewState};
use crate::error::{ConfigResult, DispatchError};
use crate::extensions::InteractionEvent;
use crate::render::{
    TooltipContext, TooltipFormatter, TooltipPayload, TooltipStyle, default_tooltip_text,
};

use super::timer::{DebounceTimer, TimerHandle};
use super::validation::validate_hover_config;
use super::{EventResponse, HandlerContext, InputEvent, InteractionHandler, InteractionKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoverConfig {
    /// Hit radius in screen pixels.
    pub max_distance: f64,
    /// Trailing debounce window; `0` looks up synchronously.
    pub debounce_ms: f64,
    pub show_tooltip: bool,
    /// Falls back to [`default_tooltip_text`] when unset.
    #[serde(skip)]
    pub tooltip_formatter: Option<TooltipFormatter>,
    pub tooltip_style: TooltipStyle,
    /// Tooltip anchor relative to the hovered point.
    pub tooltip_offset: Offset,
}

impl Default for HoverConfig {
    fn default() -> Self {
        Self {
            max_distance: 20.0,
            debounce_ms: 0.0,
            show_tooltip: true,
            tooltip_formatter: None,
            tooltip_style: TooltipStyle::default(),
            tooltip_offset: Offset::new(12.0, 12.0),
        }
    }
}

impl HoverConfig {
    #[must_use]
    pub fn with_max_distance(mut self, max_distance: f64) -> Self {
        self.max_distance = max_distance;
        self
    }

    #[must_use]
    pub fn with_debounce_ms(mut self, debounce_ms: f64) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }

    #[must_use]
    pub fn with_tooltip(mut self, show_tooltip: bool) -> Self {
        self.show_tooltip = show_tooltip;
        self
    }

    #[must_use]
    pub fn with_tooltip_formatter(mut self, formatter: TooltipFormatter) -> Self {
        self.tooltip_formatter = Some(formatter);
        self
    }

    #[must_use]
    pub fn with_tooltip_style(mut self, style: TooltipStyle) -> Self {
        self.tooltip_style = style;
        self
    }

    #[must_use]
    pub fn with_tooltip_offset(mut self, offset: Offset) -> Self {
        self.tooltip_offset = offset;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct HoverRuntime {
    timer: DebounceTimer<ScreenPoint>,
    last_emitted_target: Option<PointRef>,
    last_pointer: Option<ScreenPoint>,
    evaluated_revision: u64,
    lookups: u64,
}

/// Debounced nearest-point hover with tooltip payloads.
#[derive(Debug, Clone, PartialEq)]
pub struct HoverHandler {
    id: String,
    enabled: bool,
    config: HoverConfig,
    runtime: HoverRuntime,
}

impl HoverHandler {
    pub fn new(id: impl Into<String>, config: HoverConfig) -> ConfigResult<Self> {
        validate_hover_config(&config)?;
        Ok(Self {
            id: id.into(),
            enabled: true,
            config,
            runtime: HoverRuntime::default(),
        })
    }

    #[must_use]
    pub fn config(&self) -> &HoverConfig {
        &self.config
    }

    /// Replaces the config snapshot. Returns `true` when it differed.
    ///
    /// A pending lookup keeps its original deadline.
    pub fn set_config(&mut self, config: HoverConfig) -> ConfigResult<bool> {
        validate_hover_config(&config)?;
        if config == self.config {
            return Ok(false);
        }
        self.config = config;
        Ok(true)
    }

    pub fn update_config(&mut self, edit: impl FnOnce(&mut HoverConfig)) -> ConfigResult<bool> {
        let mut next = self.config.clone();
        edit(&mut next);
        self.set_config(next)
    }

    #[must_use]
    pub fn last_emitted_target(&self) -> Option<PointRef> {
        self.runtime.last_emitted_target
    }

    #[must_use]
    pub fn pending_timer(&self) -> Option<TimerHandle> {
        self.runtime.timer.pending_handle()
    }

    /// Number of nearest-point lookups evaluated so far.
    #[must_use]
    pub fn lookup_count(&self) -> u64 {
        self.runtime.lookups
    }

    pub fn handle_pointer_move(
        &mut self,
        position: ScreenPoint,
        ctx: &mut HandlerContext<'_>,
    ) -> Result<EventResponse, DispatchError> {
        if !self.enabled {
            return Ok(EventResponse::Ignored);
        }
        if !position.is_finite() {
            return Err(DispatchError::new(
                self.id.clone(),
                "pointer_move",
                "pointer position must be finite",
            ));
        }
        // a window that went quiet before this move still gets its lookup
        if let Some(due) = self.runtime.timer.take_due(ctx.now_ms) {
            self.lookup(due, ctx);
        }
        self.runtime.last_pointer = Some(position);
        if self.config.debounce_ms <= 0.0 {
            self.runtime.timer.cancel();
            self.lookup(position, ctx);
        } else {
            self.runtime
                .timer
                .schedule(ctx.now_ms, self.config.debounce_ms, position);
        }
        Ok(EventResponse::Handled)
    }

    pub fn handle_pointer_leave(&mut self, ctx: &mut HandlerContext<'_>) -> EventResponse {
        self.runtime.timer.cancel();
        self.runtime.last_pointer = None;
        if self.clear_target(ctx.view) {
            ctx.emit(InteractionEvent::HoverCleared);
        }
        EventResponse::Handled
    }

    fn lookup(&mut self, position: ScreenPoint, ctx: &mut HandlerContext<'_>) {
        self.runtime.lookups += 1;
        self.runtime.evaluated_revision = ctx.view.transform_revision();

        let hit = ctx
            .geometry
            .nearest_within(position, ctx.view, self.config.max_distance);
        match hit {
            Some(hit) if self.runtime.last_emitted_target == Some(hit.point) => {}
            Some(hit) => {
                trace!(
                    id = %self.id,
                    series = hit.point.series,
                    index = hit.point.index,
                    distance = hit.distance,
                    "hover target changed"
                );
                self.runtime.last_emitted_target = Some(hit.point);
                ctx.view.set_hover_target(Some(hit.point));
                let tooltip = self.config.show_tooltip.then(|| self.tooltip_for(&hit));
                ctx.emit(InteractionEvent::HoverChanged {
                    target: hit,
                    tooltip,
                });
            }
            None => {
                if self.clear_target(ctx.view) {
                    ctx.emit(InteractionEvent::HoverCleared);
                }
            }
        }
    }

    fn tooltip_for(&self, hit: &PointHit) -> TooltipPayload {
        let context = TooltipContext {
            point: hit.point,
            value: hit.value,
            screen: hit.screen,
        };
        let text = match &self.config.tooltip_formatter {
            Some(formatter) => formatter.format(&context),
            None => default_tooltip_text(&context),
        };
        TooltipPayload {
            text,
            anchor: hit.screen.offset_by(self.config.tooltip_offset),
            style: self.config.tooltip_style,
        }
    }

    fn clear_target(&mut self, view: &mut ViewState) -> bool {
        if self.runtime.last_emitted_target.take().is_none() {
            return false;
        }
        view.set_hover_target(None);
        true
    }
}

impl InteractionHandler for HoverHandler {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> InteractionKind {
        InteractionKind::Hover
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool, view: &mut ViewState) {
        self.enabled = enabled;
        if !enabled {
            self.detach(view);
        }
    }

    fn detach(&mut self, view: &mut ViewState) {
        self.runtime.timer.cancel();
        self.runtime.last_pointer = None;
        self.clear_target(view);
    }

    fn handle_event(
        &mut self,
        event: &InputEvent,
        ctx: &mut HandlerContext<'_>,
    ) -> Result<EventResponse, DispatchError> {
        match *event {
            InputEvent::PointerMove { position, .. } => self.handle_pointer_move(position, ctx),
            InputEvent::PointerLeave => Ok(self.handle_pointer_leave(ctx)),
            _ => Ok(EventResponse::Ignored),
        }
    }

    fn on_frame(&mut self, ctx: &mut HandlerContext<'_>) -> Result<(), DispatchError> {
        if let Some(position) = self.runtime.timer.take_due(ctx.now_ms) {
            self.lookup(position, ctx);
            return Ok(());
        }
        // view moved under a resting pointer
        if self.runtime.timer.is_pending()
            || self.runtime.evaluated_revision == ctx.view.transform_revision()
        {
            return Ok(());
        }
        if let Some(position) = self.runtime.last_pointer {
            self.lookup(position, ctx);
        }
        Ok(())
    }

    fn has_pending_work(&self) -> bool {
        self.runtime.timer.is_pending()
    }
}
