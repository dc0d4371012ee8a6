use serde::{Deserialize, Serialize};

use crate::core::{Offset, PointHit, PointRef, Viewport, ZoomScale};
use crate::error::{ConfigError, ConfigResult};
use crate::render::TooltipPayload;

/// Read-only state snapshot passed to listener hooks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ListenerContext {
    pub viewport: Viewport,
    pub scale: ZoomScale,
    pub translate: Offset,
    pub hover_target: Option<PointRef>,
    pub selection_len: usize,
    pub drag_owner_active: bool,
}

/// Results produced by handlers while processing input or frame ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InteractionEvent {
    Zoomed {
        scale: ZoomScale,
        translate: Offset,
    },
    PanStarted,
    Panned {
        translate: Offset,
    },
    CoastStarted {
        velocity: Offset,
    },
    PanEnded,
    HoverChanged {
        target: PointHit,
        tooltip: Option<TooltipPayload>,
    },
    HoverCleared,
    SelectionChanged {
        selection: Vec<PointRef>,
    },
}

impl InteractionEvent {
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Zoomed { .. } => "zoomed",
            Self::PanStarted => "pan_started",
            Self::Panned { .. } => "panned",
            Self::CoastStarted { .. } => "coast_started",
            Self::PanEnded => "pan_ended",
            Self::HoverChanged { .. } => "hover_changed",
            Self::HoverCleared => "hover_cleared",
            Self::SelectionChanged { .. } => "selection_changed",
        }
    }
}

/// One emitted event tagged with the id of the handler that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmittedEvent {
    pub handler_id: String,
    pub event: InteractionEvent,
}

/// Caller-supplied callback hook.
///
/// Listeners observe handler results and read surface context without
/// mutating view state directly.
pub trait InteractionListener {
    fn id(&self) -> &str;
    fn on_event(&mut self, event: &EmittedEvent, context: ListenerContext);
}

/// Listeners in registration order, keyed by their non-empty unique id.
#[derive(Default)]
pub struct ListenerSet {
    entries: Vec<Box<dyn InteractionListener>>,
}

impl ListenerSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, listener: Box<dyn InteractionListener>) -> ConfigResult<()> {
        let id = listener.id();
        if id.is_empty() {
            return Err(ConfigError::EmptyId);
        }
        if self.contains(id) {
            return Err(ConfigError::DuplicateListener(id.to_owned()));
        }
        self.entries.push(listener);
        Ok(())
    }

    /// Drops the listener with this id, keeping the others in order.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|listener| listener.id() != id);
        self.entries.len() != before
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|listener| listener.id() == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Delivers each event to every listener, event by event.
    pub fn notify(&mut self, events: &[EmittedEvent], context: ListenerContext) {
        for event in events {
            for listener in &mut self.entries {
                listener.on_event(event, context);
            }
        }
    }
}

impl std::fmt::Debug for ListenerSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|listener| listener.id()))
            .finish()
    }
}
