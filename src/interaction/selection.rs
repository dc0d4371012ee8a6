use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::{PointRef, ScreenPoint, ViewState};
use crate::error::{ConfigResult, DispatchError};
use crate::extensions::InteractionEvent;

use super::validation::validate_selection_config;
use super::{
    EventResponse, HandlerContext, InputEvent, InteractionHandler, InteractionKind, ModifierKey,
    Modifiers,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SelectionMode {
    #[default]
    Single,
    Multi,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    pub mode: SelectionMode,
    /// Held key that turns a multi-mode click into a membership toggle.
    pub multi_select_key: ModifierKey,
    /// Hit radius in screen pixels.
    pub click_radius: f64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            mode: SelectionMode::Single,
            multi_select_key: ModifierKey::Shift,
            click_radius: 10.0,
        }
    }
}

impl SelectionConfig {
    #[must_use]
    pub fn with_mode(mut self, mode: SelectionMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_multi_select_key(mut self, key: ModifierKey) -> Self {
        self.multi_select_key = key;
        self
    }

    #[must_use]
    pub fn with_click_radius(mut self, click_radius: f64) -> Self {
        self.click_radius = click_radius;
        self
    }
}

/// Click-driven selection set mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionHandler {
    id: String,
    enabled: bool,
    config: SelectionConfig,
}

impl SelectionHandler {
    pub fn new(id: impl Into<String>, config: SelectionConfig) -> ConfigResult<Self> {
        validate_selection_config(&config)?;
        Ok(Self {
            id: id.into(),
            enabled: true,
            config,
        })
    }

    #[must_use]
    pub fn config(&self) -> &SelectionConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: SelectionConfig) -> ConfigResult<bool> {
        validate_selection_config(&config)?;
        if config == self.config {
            return Ok(false);
        }
        self.config = config;
        Ok(true)
    }

    pub fn update_config(
        &mut self,
        edit: impl FnOnce(&mut SelectionConfig),
    ) -> ConfigResult<bool> {
        let mut next = self.config;
        edit(&mut next);
        self.set_config(next)
    }

    pub fn handle_click(
        &mut self,
        position: ScreenPoint,
        modifiers: Modifiers,
        ctx: &mut HandlerContext<'_>,
    ) -> Result<EventResponse, DispatchError> {
        if !self.enabled {
            return Ok(EventResponse::Ignored);
        }
        if !position.is_finite() {
            return Err(DispatchError::new(
                self.id.clone(),
                "click",
                "click position must be finite",
            ));
        }

        let hit = ctx
            .geometry
            .nearest_within(position, ctx.view, self.config.click_radius);
        let next = match hit {
            None if modifiers.any() => return Ok(EventResponse::Ignored),
            None => IndexSet::new(),
            Some(hit) => self.next_selection(ctx.view.selection(), hit.point, modifiers),
        };

        if ctx.view.replace_selection(next) {
            let selection: Vec<PointRef> = ctx.view.selection().iter().copied().collect();
            trace!(id = %self.id, len = selection.len(), "selection changed");
            ctx.emit(InteractionEvent::SelectionChanged { selection });
        }
        Ok(EventResponse::Handled)
    }

    /// Empties the selection. Returns `true` when something was selected.
    pub fn clear(&self, ctx: &mut HandlerContext<'_>) -> bool {
        if !ctx.view.replace_selection(IndexSet::new()) {
            return false;
        }
        ctx.emit(InteractionEvent::SelectionChanged {
            selection: Vec::new(),
        });
        true
    }

    fn next_selection(
        &self,
        current: &IndexSet<PointRef>,
        point: PointRef,
        modifiers: Modifiers,
    ) -> IndexSet<PointRef> {
        let toggles = self.config.mode == SelectionMode::Multi
            && modifiers.is_held(self.config.multi_select_key);
        if !toggles {
            return IndexSet::from([point]);
        }
        let mut next = current.clone();
        if !next.shift_remove(&point) {
            next.insert(point);
        }
        next
    }
}

impl InteractionHandler for SelectionHandler {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> InteractionKind {
        InteractionKind::Selection
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool, _view: &mut ViewState) {
        self.enabled = enabled;
    }

    fn detach(&mut self, _view: &mut ViewState) {}

    fn handle_event(
        &mut self,
        event: &InputEvent,
        ctx: &mut HandlerContext<'_>,
    ) -> Result<EventResponse, DispatchError> {
        match *event {
            InputEvent::Click {
                position,
                modifiers,
            } => self.handle_click(position, modifiers, ctx),
            _ => Ok(EventResponse::Ignored),
        }
    }
}
