//! Presentation payloads handed to the host renderer.
//!
//! Drawing stays outside this crate. Handlers only describe what should be
//! shown (tooltip text, anchor and style) and the host draws it.

mod primitives;
mod tooltip;

pub use primitives::{Color, TextHAlign};
pub use tooltip::{
    TooltipContext, TooltipFormatter, TooltipPayload, TooltipStyle, default_tooltip_text,
};
