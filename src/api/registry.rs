use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

use tracing::{debug, trace};

use crate::core::{RenderedGeometry, ViewState, Viewport};
use crate::error::{ConfigError, ConfigResult, DispatchError};
use crate::extensions::EmittedEvent;
use crate::interaction::{
    EventResponse, HandlerContext, InputEvent, Interaction, InteractionHandler, SelectionHandler,
};

/// Shared state a dispatch or tick runs against.
pub(crate) struct DispatchScope<'a> {
    pub view: &'a mut ViewState,
    pub geometry: &'a RenderedGeometry,
    pub viewport: Viewport,
    pub now_ms: f64,
}

impl DispatchScope<'_> {
    fn context(&mut self, gesture_claimed: bool) -> HandlerContext<'_> {
        HandlerContext::new(self.view, self.geometry, self.viewport, self.now_ms)
            .with_gesture_claimed(gesture_claimed)
    }
}

#[derive(Debug, Default)]
pub(crate) struct DispatchReport {
    pub emitted: Vec<EmittedEvent>,
    pub errors: Vec<DispatchError>,
}

/// Ordered collection of attached handlers.
///
/// Events reach enabled handlers in registration order. At most one handler
/// owns a drag gesture at a time: the first one that claims a `PointerDown`.
#[derive(Debug, Default)]
pub struct InteractionRegistry {
    handlers: Vec<Interaction>,
    drag_owner: Option<String>,
}

impl InteractionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler and attaches it to `view`.
    ///
    /// Empty or duplicate ids are rejected and nothing is registered.
    pub fn add(&mut self, mut handler: Interaction, view: &mut ViewState) -> ConfigResult<()> {
        let id = handler.id();
        if id.is_empty() {
            return Err(ConfigError::EmptyId);
        }
        if self.contains(id) {
            return Err(ConfigError::DuplicateId(id.to_owned()));
        }
        handler.attach(view);
        debug!(id = handler.id(), kind = handler.kind().name(), "interaction attached");
        self.handlers.push(handler);
        Ok(())
    }

    /// Detaches and drops the handler. Returns `true` when it was registered.
    pub fn remove(&mut self, id: &str, view: &mut ViewState) -> bool {
        let Some(position) = self.position(id) else {
            return false;
        };
        let mut handler = self.handlers.remove(position);
        handler.detach(view);
        if self.drag_owner.as_deref() == Some(id) {
            self.drag_owner = None;
        }
        debug!(id, "interaction detached");
        true
    }

    /// Detaches every handler, e.g. when the surface goes away.
    pub fn clear(&mut self, view: &mut ViewState) {
        for handler in &mut self.handlers {
            handler.detach(view);
        }
        self.handlers.clear();
        self.drag_owner = None;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Interaction> {
        self.handlers.iter().find(|handler| handler.id() == id)
    }

    #[must_use]
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Interaction> {
        self.handlers.iter_mut().find(|handler| handler.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Interaction> {
        self.handlers.iter()
    }

    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        self.handlers.iter().map(|handler| handler.id()).collect()
    }

    #[must_use]
    pub fn drag_owner(&self) -> Option<&str> {
        self.drag_owner.as_deref()
    }

    #[must_use]
    pub fn has_pending_work(&self) -> bool {
        self.handlers.iter().any(InteractionHandler::has_pending_work)
    }

    /// First enabled selection handler, in registration order.
    pub(crate) fn selection_mut(&mut self) -> Option<&mut SelectionHandler> {
        self.handlers
            .iter_mut()
            .filter(|handler| handler.enabled())
            .find_map(Interaction::as_selection_mut)
    }

    pub(crate) fn release_drag_owner(&mut self, id: &str) {
        if self.drag_owner.as_deref() == Some(id) {
            trace!(id, "drag ownership released");
            self.drag_owner = None;
        }
    }

    pub(crate) fn dispatch(
        &mut self,
        event: &InputEvent,
        scope: &mut DispatchScope<'_>,
        report: &mut DispatchReport,
    ) {
        self.drop_stale_owner();
        let owner_at_start = self.drag_owner.clone();

        for handler in &mut self.handlers {
            if !handler.enabled() {
                continue;
            }
            if event.continues_gesture()
                && handler.claims_gestures()
                && owner_at_start
                    .as_deref()
                    .is_some_and(|owner| owner != handler.id())
            {
                continue;
            }

            let mut ctx = scope.context(self.drag_owner.is_some());
            let result = catch_unwind(AssertUnwindSafe(|| handler.handle_event(event, &mut ctx)))
                .unwrap_or_else(|payload| Err(panic_error(handler.id(), event.name(), &*payload)));
            let emitted = ctx.into_emitted();
            collect(handler.id(), emitted, report);

            match result {
                Ok(EventResponse::Claimed) if self.drag_owner.is_none() => {
                    trace!(id = handler.id(), "drag ownership claimed");
                    self.drag_owner = Some(handler.id().to_owned());
                }
                Ok(_) => {}
                Err(err) => report.errors.push(err),
            }
        }

        self.drop_stale_owner();
    }

    pub(crate) fn tick(&mut self, scope: &mut DispatchScope<'_>, report: &mut DispatchReport) {
        for handler in &mut self.handlers {
            if !handler.enabled() {
                continue;
            }
            let mut ctx = scope.context(self.drag_owner.is_some());
            let result = catch_unwind(AssertUnwindSafe(|| handler.on_frame(&mut ctx)))
                .unwrap_or_else(|payload| Err(panic_error(handler.id(), "frame", &*payload)));
            let emitted = ctx.into_emitted();
            collect(handler.id(), emitted, report);
            if let Err(err) = result {
                report.errors.push(err);
            }
        }
        self.drop_stale_owner();
    }

    /// Ownership ends once the owner stops dragging, is disabled or is gone.
    fn drop_stale_owner(&mut self) {
        let Some(owner) = self.drag_owner.as_deref() else {
            return;
        };
        let still_dragging = self
            .handlers
            .iter()
            .find(|handler| handler.id() == owner)
            .is_some_and(|handler| handler.enabled() && handler.owns_active_gesture());
        if !still_dragging {
            trace!(id = owner, "drag ownership released");
            self.drag_owner = None;
        }
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.handlers.iter().position(|handler| handler.id() == id)
    }
}

/// Turns a handler panic into a regular dispatch failure.
fn panic_error(handler_id: &str, event: &'static str, payload: &(dyn Any + Send)) -> DispatchError {
    let message = payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_owned());
    DispatchError::new(handler_id, event, format!("handler panicked: {message}"))
}

pub(crate) fn collect<I>(handler_id: &str, emitted: I, report: &mut DispatchReport)
where
    I: IntoIterator<Item = crate::extensions::InteractionEvent>,
{
    report
        .emitted
        .extend(emitted.into_iter().map(|event| EmittedEvent {
            handler_id: handler_id.to_owned(),
            event,
        }));
}
