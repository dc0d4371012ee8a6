//! chart-interactions: interaction engine for rendered charts.
//!
//! The crate turns raw pointer, wheel, pinch and modifier-key input into
//! view-state mutations (zoom scale, pan offset, hover target, selection set).
//! Rendering and layout stay outside; a host feeds rendered geometry and input
//! events into a [`ChartSurface`] and reacts to the emitted events.

pub mod api;
pub mod core;
pub mod error;
pub mod extensions;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{ChartSurface, DispatchOutcome, InteractionRegistry, SurfaceConfig};
pub use error::{ConfigError, ConfigResult, DispatchError, InteractionError, InteractionResult};
