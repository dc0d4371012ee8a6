use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::core::{DataPoint, PointRef, ScreenPoint};
use crate::error::ConfigResult;

use super::{Color, TextHAlign};

/// Presentation hints forwarded with each tooltip payload.
///
/// The crate never draws tooltips; hosts read these when building their
/// overlay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TooltipStyle {
    pub background_color: Color,
    pub text_color: Color,
    pub border_color: Color,
    pub font_size_px: f64,
    pub padding_px: f64,
    pub align: TextHAlign,
}

impl Default for TooltipStyle {
    fn default() -> Self {
        Self {
            background_color: Color::rgba(0.1, 0.12, 0.16, 0.92),
            text_color: Color::rgb(0.95, 0.95, 0.95),
            border_color: Color::rgba(1.0, 1.0, 1.0, 0.2),
            font_size_px: 12.0,
            padding_px: 6.0,
            align: TextHAlign::Left,
        }
    }
}

impl TooltipStyle {
    pub fn validate(self, handler: &'static str) -> ConfigResult<()> {
        self.background_color.validate(handler)?;
        self.text_color.validate(handler)?;
        self.border_color.validate(handler)?;
        if !self.font_size_px.is_finite() || self.font_size_px <= 0.0 {
            return Err(crate::error::ConfigError::invalid(
                handler,
                "tooltip font_size_px must be finite and > 0",
            ));
        }
        if !self.padding_px.is_finite() || self.padding_px < 0.0 {
            return Err(crate::error::ConfigError::invalid(
                handler,
                "tooltip padding_px must be finite and >= 0",
            ));
        }
        Ok(())
    }
}

/// Input handed to a tooltip formatter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TooltipContext {
    pub point: PointRef,
    pub value: DataPoint,
    pub screen: ScreenPoint,
}

/// Caller-supplied tooltip text formatter.
///
/// Equality is identity of the wrapped closure, so re-applying the same
/// formatter through a config update is a no-op.
#[derive(Clone)]
pub struct TooltipFormatter(Rc<dyn Fn(&TooltipContext) -> String>);

impl TooltipFormatter {
    pub fn new(format: impl Fn(&TooltipContext) -> String + 'static) -> Self {
        Self(Rc::new(format))
    }

    #[must_use]
    pub fn format(&self, context: &TooltipContext) -> String {
        (self.0)(context)
    }
}

impl fmt::Debug for TooltipFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TooltipFormatter(..)")
    }
}

impl PartialEq for TooltipFormatter {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// Built-in tooltip text: series number plus both data coordinates.
#[must_use]
pub fn default_tooltip_text(context: &TooltipContext) -> String {
    format!(
        "Series {} #{}\nx: {}\ny: {}",
        context.point.series + 1,
        context.point.index,
        format_value(context.value.x),
        format_value(context.value.y),
    )
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

/// Tooltip ready for the host to draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipPayload {
    pub text: String,
    pub anchor: ScreenPoint,
    pub style: TooltipStyle,
}
