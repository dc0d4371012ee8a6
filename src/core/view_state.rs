use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use super::types::{Offset, PointRef, ScreenPoint};

const DEFAULT_ZOOM_EPSILON: f64 = 1e-9;

/// Per-axis zoom factors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomScale {
    pub x: f64,
    pub y: f64,
}

impl ZoomScale {
    pub const IDENTITY: ZoomScale = ZoomScale { x: 1.0, y: 1.0 };

    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn uniform(value: f64) -> Self {
        Self { x: value, y: value }
    }
}

impl Default for ZoomScale {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Mutable view data owned by the chart surface.
///
/// Handlers receive `&mut ViewState` during dispatch, so a later handler sees
/// an earlier handler's mutation within the same event. A layout point maps to
/// screen space as `layout * scale + translate` on each axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    scale: ZoomScale,
    translate: Offset,
    selection: IndexSet<PointRef>,
    hover_target: Option<PointRef>,
    min_scale: f64,
    #[serde(skip)]
    transform_revision: u64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            scale: ZoomScale::IDENTITY,
            translate: Offset::ZERO,
            selection: IndexSet::new(),
            hover_target: None,
            min_scale: 1.0,
            transform_revision: 0,
        }
    }
}

impl ViewState {
    #[must_use]
    pub fn scale(&self) -> ZoomScale {
        self.scale
    }

    #[must_use]
    pub fn translate(&self) -> Offset {
        self.translate
    }

    #[must_use]
    pub fn selection(&self) -> &IndexSet<PointRef> {
        &self.selection
    }

    #[must_use]
    pub fn hover_target(&self) -> Option<PointRef> {
        self.hover_target
    }

    /// Minimum zoom published by the attached zoom handler (`1.0` otherwise).
    #[must_use]
    pub fn min_scale(&self) -> f64 {
        self.min_scale
    }

    /// Bumped on every scale or translate change.
    #[must_use]
    pub fn transform_revision(&self) -> u64 {
        self.transform_revision
    }

    /// Returns `true` when no zoom beyond the minimum is applied on either axis.
    #[must_use]
    pub fn is_at_default_zoom(&self) -> bool {
        self.scale.x <= self.min_scale + DEFAULT_ZOOM_EPSILON
            && self.scale.y <= self.min_scale + DEFAULT_ZOOM_EPSILON
    }

    pub fn set_scale(&mut self, scale: ZoomScale) {
        if self.scale != scale {
            self.scale = scale;
            self.transform_revision += 1;
        }
    }

    pub fn set_translate(&mut self, translate: Offset) {
        if self.translate != translate {
            self.translate = translate;
            self.transform_revision += 1;
        }
    }

    pub fn set_min_scale(&mut self, min_scale: f64) {
        self.min_scale = min_scale;
    }

    pub fn set_hover_target(&mut self, target: Option<PointRef>) {
        self.hover_target = target;
    }

    /// Replaces the selection set. Returns `true` when membership or order changed.
    pub fn replace_selection(&mut self, selection: IndexSet<PointRef>) -> bool {
        if self.selection.iter().eq(selection.iter()) {
            return false;
        }
        self.selection = selection;
        true
    }

    /// Restores identity transform at the current minimum zoom.
    pub fn reset_transform(&mut self) {
        self.set_scale(ZoomScale::uniform(self.min_scale));
        self.set_translate(Offset::ZERO);
    }

    #[must_use]
    pub fn project(&self, layout: ScreenPoint) -> ScreenPoint {
        ScreenPoint::new(
            layout.x * self.scale.x + self.translate.x,
            layout.y * self.scale.y + self.translate.y,
        )
    }

    /// Inverse of [`ViewState::project`].
    #[must_use]
    pub fn unproject(&self, screen: ScreenPoint) -> ScreenPoint {
        ScreenPoint::new(
            (screen.x - self.translate.x) / self.scale.x,
            (screen.y - self.translate.y) / self.scale.y,
        )
    }
}
