pub mod geometry;
pub mod types;
pub mod view_state;

pub use geometry::{PointHit, RenderedGeometry, RenderedPoint};
pub use types::{DataPoint, Offset, PointRef, ScreenPoint, Viewport};
pub use view_state::{ViewState, ZoomScale};
