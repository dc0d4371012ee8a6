//! Interaction handlers and the contract the surface dispatches through.

mod events;
mod hover;
mod pan;
mod selection;
mod timer;
mod validation;
mod zoom;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{RenderedGeometry, ViewState, Viewport};
use crate::error::{ConfigError, ConfigResult, DispatchError};
use crate::extensions::InteractionEvent;

pub use events::{InputEvent, ModifierKey, Modifiers, PointerButton};
pub use hover::{HoverConfig, HoverHandler};
pub use pan::{PanConfig, PanHandler, PanPhase, clamp_translate};
pub use selection::{SelectionConfig, SelectionHandler, SelectionMode};
pub use timer::TimerHandle;
pub use zoom::{ZoomConfig, ZoomDirection, ZoomHandler};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InteractionKind {
    Zoom,
    Pan,
    Hover,
    Selection,
}

impl InteractionKind {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Zoom => "zoom",
            Self::Pan => "pan",
            Self::Hover => "hover",
            Self::Selection => "selection",
        }
    }
}

/// How a handler treated one input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResponse {
    Ignored,
    Handled,
    /// The handler took ownership of the pointer gesture started by this
    /// `PointerDown`.
    Claimed,
}

/// Per-call access to shared surface state.
///
/// Built by the surface for each handler invocation; hosts driving a handler
/// directly can build one with [`HandlerContext::new`].
pub struct HandlerContext<'a> {
    pub view: &'a mut ViewState,
    pub geometry: &'a RenderedGeometry,
    pub viewport: Viewport,
    /// Monotonic host clock in milliseconds.
    pub now_ms: f64,
    gesture_claimed: bool,
    emitted: SmallVec<[InteractionEvent; 2]>,
}

impl<'a> HandlerContext<'a> {
    pub fn new(
        view: &'a mut ViewState,
        geometry: &'a RenderedGeometry,
        viewport: Viewport,
        now_ms: f64,
    ) -> Self {
        Self {
            view,
            geometry,
            viewport,
            now_ms,
            gesture_claimed: false,
            emitted: SmallVec::new(),
        }
    }

    #[must_use]
    pub fn with_gesture_claimed(mut self, claimed: bool) -> Self {
        self.gesture_claimed = claimed;
        self
    }

    /// Whether another handler already owns the current pointer gesture.
    #[must_use]
    pub fn gesture_claimed(&self) -> bool {
        self.gesture_claimed
    }

    pub fn emit(&mut self, event: InteractionEvent) {
        self.emitted.push(event);
    }

    #[must_use]
    pub fn emitted(&self) -> &[InteractionEvent] {
        &self.emitted
    }

    pub fn into_emitted(self) -> SmallVec<[InteractionEvent; 2]> {
        self.emitted
    }
}

/// Capability shared by every interaction variant.
///
/// The surface only talks to handlers through this trait, in registration
/// order, on a single thread.
pub trait InteractionHandler {
    fn id(&self) -> &str;
    fn kind(&self) -> InteractionKind;
    fn enabled(&self) -> bool;

    /// Disabling also cancels pending timers and animation loops and
    /// releases view state the handler owns.
    fn set_enabled(&mut self, enabled: bool, view: &mut ViewState);

    /// Handlers that can own a drag gesture. While one of them owns it, the
    /// others receive no `PointerMove`/`PointerUp` for that gesture.
    fn claims_gestures(&self) -> bool {
        false
    }

    /// `true` while this handler owns an in-progress drag gesture.
    fn owns_active_gesture(&self) -> bool {
        false
    }

    /// Publishes handler-owned view constraints. Called on registration and
    /// after config changes made through the surface.
    fn attach(&mut self, view: &mut ViewState) {
        let _ = view;
    }

    /// Cancels all pending work and releases view state the handler owns.
    /// Calling it twice is harmless.
    fn detach(&mut self, view: &mut ViewState);

    fn handle_event(
        &mut self,
        event: &InputEvent,
        ctx: &mut HandlerContext<'_>,
    ) -> Result<EventResponse, DispatchError>;

    /// One animation frame / timer tick.
    fn on_frame(&mut self, ctx: &mut HandlerContext<'_>) -> Result<(), DispatchError> {
        let _ = ctx;
        Ok(())
    }

    /// `true` while a timer or animation loop is outstanding.
    fn has_pending_work(&self) -> bool {
        false
    }
}

/// Serializable config of any variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InteractionConfig {
    Zoom(ZoomConfig),
    Pan(PanConfig),
    Hover(HoverConfig),
    Selection(SelectionConfig),
}

impl InteractionConfig {
    #[must_use]
    pub fn kind(&self) -> InteractionKind {
        match self {
            Self::Zoom(_) => InteractionKind::Zoom,
            Self::Pan(_) => InteractionKind::Pan,
            Self::Hover(_) => InteractionKind::Hover,
            Self::Selection(_) => InteractionKind::Selection,
        }
    }
}

/// Closed set of interaction variants hosted by a surface.
#[derive(Debug, Clone, PartialEq)]
pub enum Interaction {
    Zoom(ZoomHandler),
    Pan(PanHandler),
    Hover(HoverHandler),
    Selection(SelectionHandler),
}

macro_rules! for_each_variant {
    ($value:expr, $handler:ident => $body:expr) => {
        match $value {
            Interaction::Zoom($handler) => $body,
            Interaction::Pan($handler) => $body,
            Interaction::Hover($handler) => $body,
            Interaction::Selection($handler) => $body,
        }
    };
}

impl Interaction {
    /// Builds a handler from a serializable config.
    pub fn from_config(id: impl Into<String>, config: InteractionConfig) -> ConfigResult<Self> {
        let id = id.into();
        Ok(match config {
            InteractionConfig::Zoom(config) => Self::Zoom(ZoomHandler::new(id, config)?),
            InteractionConfig::Pan(config) => Self::Pan(PanHandler::new(id, config)?),
            InteractionConfig::Hover(config) => Self::Hover(HoverHandler::new(id, config)?),
            InteractionConfig::Selection(config) => {
                Self::Selection(SelectionHandler::new(id, config)?)
            }
        })
    }

    #[must_use]
    pub fn config(&self) -> InteractionConfig {
        match self {
            Self::Zoom(handler) => InteractionConfig::Zoom(*handler.config()),
            Self::Pan(handler) => InteractionConfig::Pan(*handler.config()),
            Self::Hover(handler) => InteractionConfig::Hover(handler.config().clone()),
            Self::Selection(handler) => InteractionConfig::Selection(*handler.config()),
        }
    }

    /// Replaces the config snapshot, rejecting configs of another variant.
    ///
    /// Returns `true` when the config changed.
    pub fn set_config(&mut self, config: InteractionConfig) -> ConfigResult<bool> {
        let actual = self.kind();
        let expected = config.kind();
        match (self, config) {
            (Self::Zoom(handler), InteractionConfig::Zoom(config)) => handler.set_config(config),
            (Self::Pan(handler), InteractionConfig::Pan(config)) => handler.set_config(config),
            (Self::Hover(handler), InteractionConfig::Hover(config)) => {
                handler.set_config(config)
            }
            (Self::Selection(handler), InteractionConfig::Selection(config)) => {
                handler.set_config(config)
            }
            (this, _) => Err(ConfigError::KindMismatch {
                id: this.id().to_owned(),
                expected: expected.name(),
                actual: actual.name(),
            }),
        }
    }

    #[must_use]
    pub fn as_zoom_mut(&mut self) -> Option<&mut ZoomHandler> {
        match self {
            Self::Zoom(handler) => Some(handler),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_pan(&self) -> Option<&PanHandler> {
        match self {
            Self::Pan(handler) => Some(handler),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_pan_mut(&mut self) -> Option<&mut PanHandler> {
        match self {
            Self::Pan(handler) => Some(handler),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_hover(&self) -> Option<&HoverHandler> {
        match self {
            Self::Hover(handler) => Some(handler),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_hover_mut(&mut self) -> Option<&mut HoverHandler> {
        match self {
            Self::Hover(handler) => Some(handler),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_selection_mut(&mut self) -> Option<&mut SelectionHandler> {
        match self {
            Self::Selection(handler) => Some(handler),
            _ => None,
        }
    }
}

impl InteractionHandler for Interaction {
    fn id(&self) -> &str {
        for_each_variant!(self, handler => handler.id())
    }

    fn kind(&self) -> InteractionKind {
        for_each_variant!(self, handler => handler.kind())
    }

    fn enabled(&self) -> bool {
        for_each_variant!(self, handler => handler.enabled())
    }

    fn set_enabled(&mut self, enabled: bool, view: &mut ViewState) {
        for_each_variant!(self, handler => handler.set_enabled(enabled, view))
    }

    fn claims_gestures(&self) -> bool {
        for_each_variant!(self, handler => handler.claims_gestures())
    }

    fn owns_active_gesture(&self) -> bool {
        for_each_variant!(self, handler => handler.owns_active_gesture())
    }

    fn attach(&mut self, view: &mut ViewState) {
        for_each_variant!(self, handler => handler.attach(view))
    }

    fn detach(&mut self, view: &mut ViewState) {
        for_each_variant!(self, handler => handler.detach(view))
    }

    fn handle_event(
        &mut self,
        event: &InputEvent,
        ctx: &mut HandlerContext<'_>,
    ) -> Result<EventResponse, DispatchError> {
        for_each_variant!(self, handler => handler.handle_event(event, ctx))
    }

    fn on_frame(&mut self, ctx: &mut HandlerContext<'_>) -> Result<(), DispatchError> {
        for_each_variant!(self, handler => handler.on_frame(ctx))
    }

    fn has_pending_work(&self) -> bool {
        for_each_variant!(self, handler => handler.has_pending_work())
    }
}

impl From<ZoomHandler> for Interaction {
    fn from(handler: ZoomHandler) -> Self {
        Self::Zoom(handler)
    }
}

impl From<PanHandler> for Interaction {
    fn from(handler: PanHandler) -> Self {
        Self::Pan(handler)
    }
}

impl From<HoverHandler> for Interaction {
    fn from(handler: HoverHandler) -> Self {
        Self::Hover(handler)
    }
}

impl From<SelectionHandler> for Interaction {
    fn from(handler: SelectionHandler) -> Self {
        Self::Selection(handler)
    }
}
