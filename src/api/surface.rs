use tracing::debug;

use crate::core::{RenderedGeometry, ViewState, Viewport};
use crate::error::{ConfigError, ConfigResult};
use crate::extensions::{InteractionListener, ListenerSet};
use crate::interaction::{Interaction, InteractionConfig, InteractionHandler, Modifiers};

use super::error_sink::{DispatchErrorSink, TracingErrorSink};
use super::registry::InteractionRegistry;
use super::surface_config::SurfaceConfig;

/// Host-facing facade owning view state, geometry and attached handlers.
///
/// `ChartSurface` routes input events and frame ticks through its
/// [`InteractionRegistry`], forwards emitted events to listeners and isolated
/// handler failures to the error sink.
pub struct ChartSurface {
    pub(super) viewport: Viewport,
    pub(super) view: ViewState,
    pub(super) geometry: RenderedGeometry,
    pub(super) registry: InteractionRegistry,
    pub(super) listeners: ListenerSet,
    pub(super) error_sink: Box<dyn DispatchErrorSink>,
    pub(super) clock_ms: f64,
    pub(super) modifiers: Modifiers,
}

impl ChartSurface {
    pub fn new(viewport: Viewport) -> ConfigResult<Self> {
        viewport.validate()?;
        Ok(Self {
            viewport,
            view: ViewState::default(),
            geometry: RenderedGeometry::new(),
            registry: InteractionRegistry::new(),
            listeners: ListenerSet::new(),
            error_sink: Box::new(TracingErrorSink),
            clock_ms: 0.0,
            modifiers: Modifiers::NONE,
        })
    }

    /// Builds a surface and registers every configured interaction in order.
    pub fn from_config(config: SurfaceConfig) -> ConfigResult<Self> {
        let mut surface = Self::new(config.viewport)?;
        for spec in config.interactions {
            let mut interaction = Interaction::from_config(spec.id, spec.config)?;
            interaction.set_enabled(spec.enabled, &mut surface.view);
            surface.add_interaction(interaction)?;
        }
        Ok(surface)
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) -> ConfigResult<()> {
        self.viewport = viewport.validate()?;
        Ok(())
    }

    #[must_use]
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    #[must_use]
    pub fn geometry(&self) -> &RenderedGeometry {
        &self.geometry
    }

    /// Replaces the geometry used for hit-testing, typically after each render.
    pub fn set_geometry(&mut self, geometry: RenderedGeometry) {
        debug!(points = geometry.points().len(), "rendered geometry updated");
        self.geometry = geometry;
    }

    /// Modifier state from the most recent event that carried one.
    #[must_use]
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Latest timestamp seen by `dispatch` or `tick`.
    #[must_use]
    pub fn clock_ms(&self) -> f64 {
        self.clock_ms
    }

    pub fn set_error_sink(&mut self, sink: impl DispatchErrorSink + 'static) {
        self.error_sink = Box::new(sink);
    }

    /// Registers a handler under its own id; duplicate or empty ids fail and
    /// leave the surface untouched.
    pub fn add_interaction(&mut self, handler: impl Into<Interaction>) -> ConfigResult<()> {
        self.registry.add(handler.into(), &mut self.view)
    }

    /// Detaches a handler, cancelling its timers and animation loops.
    ///
    /// Returns `false` when no handler has this id.
    pub fn remove_interaction(&mut self, id: &str) -> bool {
        self.registry.remove(id, &mut self.view)
    }

    #[must_use]
    pub fn interaction(&self, id: &str) -> Option<&Interaction> {
        self.registry.get(id)
    }

    #[must_use]
    pub fn has_interaction(&self, id: &str) -> bool {
        self.registry.contains(id)
    }

    #[must_use]
    pub fn interaction_count(&self) -> usize {
        self.registry.len()
    }

    #[must_use]
    pub fn interaction_ids(&self) -> Vec<&str> {
        self.registry.ids()
    }

    #[must_use]
    pub fn registry(&self) -> &InteractionRegistry {
        &self.registry
    }

    /// Id of the handler owning the current drag gesture.
    #[must_use]
    pub fn drag_owner(&self) -> Option<&str> {
        self.registry.drag_owner()
    }

    /// `true` while any handler has a pending timer or animation loop; hosts
    /// keep requesting frames until it turns `false`.
    #[must_use]
    pub fn has_pending_work(&self) -> bool {
        self.registry.has_pending_work()
    }

    /// Enables or disables a handler. Disabling cancels its pending work.
    ///
    /// Returns `false` when no handler has this id.
    pub fn set_interaction_enabled(&mut self, id: &str, enabled: bool) -> bool {
        let Some(interaction) = self.registry.get_mut(id) else {
            return false;
        };
        interaction.set_enabled(enabled, &mut self.view);
        if enabled {
            interaction.attach(&mut self.view);
        } else {
            self.registry.release_drag_owner(id);
        }
        true
    }

    /// Replaces a handler's whole config snapshot.
    ///
    /// Returns `true` when the config changed.
    pub fn update_interaction_config(
        &mut self,
        id: &str,
        config: InteractionConfig,
    ) -> ConfigResult<bool> {
        self.with_interaction_mut(id, |interaction| interaction.set_config(config))
            .ok_or_else(|| ConfigError::UnknownId(id.to_owned()))?
    }

    /// Runs `edit` against a registered handler, then re-syncs it with the
    /// view (publishing config-derived constraints such as the minimum zoom).
    pub fn with_interaction_mut<T>(
        &mut self,
        id: &str,
        edit: impl FnOnce(&mut Interaction) -> T,
    ) -> Option<T> {
        let interaction = self.registry.get_mut(id)?;
        let output = edit(interaction);
        if interaction.enabled() {
            interaction.attach(&mut self.view);
        } else {
            interaction.detach(&mut self.view);
            self.registry.release_drag_owner(id);
        }
        Some(output)
    }

    /// Registers a listener for emitted events. Ids must be non-empty and
    /// unique among listeners.
    pub fn register_listener(
        &mut self,
        listener: Box<dyn InteractionListener>,
    ) -> ConfigResult<()> {
        self.listeners.insert(listener)
    }

    pub fn unregister_listener(&mut self, id: &str) -> bool {
        self.listeners.remove(id)
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    #[must_use]
    pub fn has_listener(&self, id: &str) -> bool {
        self.listeners.contains(id)
    }

    /// Detaches every handler.
    pub fn clear_interactions(&mut self) {
        self.registry.clear(&mut self.view);
    }

    /// Restores the default transform: minimum zoom and no translate.
    ///
    /// Hover re-evaluates on the next tick; the selection is kept.
    pub fn reset_view(&mut self) {
        self.view.reset_transform();
    }
}
