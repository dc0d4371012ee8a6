use serde::{Deserialize, Serialize};

use crate::core::ScreenPoint;

/// Pointer button id using DOM numbering (0 primary, 1 middle, 2 secondary).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PointerButton(pub u16);

impl PointerButton {
    pub const PRIMARY: PointerButton = PointerButton(0);
    pub const MIDDLE: PointerButton = PointerButton(1);
    pub const SECONDARY: PointerButton = PointerButton(2);
}

impl Default for PointerButton {
    fn default() -> Self {
        Self::PRIMARY
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModifierKey {
    Shift,
    Control,
    Alt,
    Meta,
}

/// Keyboard modifier state captured with each input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub control: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        control: false,
        alt: false,
        meta: false,
    };

    #[must_use]
    pub fn with(mut self, key: ModifierKey) -> Self {
        match key {
            ModifierKey::Shift => self.shift = true,
            ModifierKey::Control => self.control = true,
            ModifierKey::Alt => self.alt = true,
            ModifierKey::Meta => self.meta = true,
        }
        self
    }

    #[must_use]
    pub fn only(key: ModifierKey) -> Self {
        Self::NONE.with(key)
    }

    #[must_use]
    pub fn is_held(self, key: ModifierKey) -> bool {
        match key {
            ModifierKey::Shift => self.shift,
            ModifierKey::Control => self.control,
            ModifierKey::Alt => self.alt,
            ModifierKey::Meta => self.meta,
        }
    }

    #[must_use]
    pub fn any(self) -> bool {
        self.shift || self.control || self.alt || self.meta
    }
}

/// Raw input delivered by the host.
///
/// Wheel `delta` is positive for zoom-in; hosts translating DOM `deltaY`
/// negate it. Pinch `scale_delta` is the relative scale change since the last
/// pinch event (`0.1` means ten percent larger).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    PointerDown {
        position: ScreenPoint,
        button: PointerButton,
        modifiers: Modifiers,
    },
    PointerMove {
        position: ScreenPoint,
        modifiers: Modifiers,
    },
    PointerUp {
        position: ScreenPoint,
        button: PointerButton,
        modifiers: Modifiers,
    },
    PointerLeave,
    Click {
        position: ScreenPoint,
        modifiers: Modifiers,
    },
    Wheel {
        delta: f64,
        position: ScreenPoint,
        modifiers: Modifiers,
    },
    Pinch {
        scale_delta: f64,
        center: ScreenPoint,
        modifiers: Modifiers,
    },
    KeyModifierChange {
        modifiers: Modifiers,
    },
}

impl InputEvent {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::PointerDown { .. } => "pointer_down",
            Self::PointerMove { .. } => "pointer_move",
            Self::PointerUp { .. } => "pointer_up",
            Self::PointerLeave => "pointer_leave",
            Self::Click { .. } => "click",
            Self::Wheel { .. } => "wheel",
            Self::Pinch { .. } => "pinch",
            Self::KeyModifierChange { .. } => "key_modifier_change",
        }
    }

    #[must_use]
    pub fn modifiers(&self) -> Option<Modifiers> {
        match *self {
            Self::PointerDown { modifiers, .. }
            | Self::PointerMove { modifiers, .. }
            | Self::PointerUp { modifiers, .. }
            | Self::Click { modifiers, .. }
            | Self::Wheel { modifiers, .. }
            | Self::Pinch { modifiers, .. }
            | Self::KeyModifierChange { modifiers } => Some(modifiers),
            Self::PointerLeave => None,
        }
    }

    /// Events that belong to a drag gesture once it has been claimed.
    #[must_use]
    pub(crate) fn continues_gesture(&self) -> bool {
        matches!(self, Self::PointerMove { .. } | Self::PointerUp { .. })
    }

    #[must_use]
    pub fn pointer_down(x: f64, y: f64) -> Self {
        Self::PointerDown {
            position: ScreenPoint::new(x, y),
            button: PointerButton::PRIMARY,
            modifiers: Modifiers::NONE,
        }
    }

    #[must_use]
    pub fn pointer_move(x: f64, y: f64) -> Self {
        Self::PointerMove {
            position: ScreenPoint::new(x, y),
            modifiers: Modifiers::NONE,
        }
    }

    #[must_use]
    pub fn pointer_up(x: f64, y: f64) -> Self {
        Self::PointerUp {
            position: ScreenPoint::new(x, y),
            button: PointerButton::PRIMARY,
            modifiers: Modifiers::NONE,
        }
    }

    #[must_use]
    pub fn click(x: f64, y: f64) -> Self {
        Self::Click {
            position: ScreenPoint::new(x, y),
            modifiers: Modifiers::NONE,
        }
    }

    #[must_use]
    pub fn wheel(delta: f64, x: f64, y: f64) -> Self {
        Self::Wheel {
            delta,
            position: ScreenPoint::new(x, y),
            modifiers: Modifiers::NONE,
        }
    }

    #[must_use]
    pub fn pinch(scale_delta: f64, x: f64, y: f64) -> Self {
        Self::Pinch {
            scale_delta,
            center: ScreenPoint::new(x, y),
            modifiers: Modifiers::NONE,
        }
    }

    /// Replaces the modifier state on events that carry one.
    #[must_use]
    pub fn with_modifiers(mut self, new_modifiers: Modifiers) -> Self {
        match &mut self {
            Self::PointerDown { modifiers, .. }
            | Self::PointerMove { modifiers, .. }
            | Self::PointerUp { modifiers, .. }
            | Self::Click { modifiers, .. }
            | Self::Wheel { modifiers, .. }
            | Self::Pinch { modifiers, .. }
            | Self::KeyModifierChange { modifiers } => *modifiers = new_modifiers,
            Self::PointerLeave => {}
        }
        self
    }

    /// Replaces the button on pointer down/up events.
    #[must_use]
    pub fn with_button(mut self, new_button: PointerButton) -> Self {
        if let Self::PointerDown { button, .. } | Self::PointerUp { button, .. } = &mut self {
            *button = new_button;
        }
        self
    }
}
