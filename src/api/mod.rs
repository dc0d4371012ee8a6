mod dispatch;
mod error_sink;
mod registry;
mod snapshot;
mod surface;
mod surface_config;

pub use dispatch::DispatchOutcome;
pub use error_sink::{DispatchErrorSink, TracingErrorSink};
pub use registry::InteractionRegistry;
pub use snapshot::{
    InteractionSnapshot, SURFACE_SNAPSHOT_JSON_SCHEMA_V1, SurfaceSnapshot,
    SurfaceSnapshotJsonContractV1,
};
pub use surface::ChartSurface;
pub use surface_config::{InteractionSpec, SurfaceConfig};
