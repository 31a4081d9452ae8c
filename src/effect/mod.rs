//! Effect system with compile-time known effect variants
//!
//! Exactly one effect is active at a time. Stable, Gradient and Custom are
//! painted once when activated or when their inputs change; ColorLoop repaints
//! every frame and Sunrise repaints from its own timers.

mod color_loop;
pub mod sunrise;
mod stable;

pub use color_loop::{ColorLoopEffect, DEFAULT_COLOR_LOOP_CYCLE};
pub use stable::ColorParams;
pub use sunrise::{SunriseAnimator, SunriseConfig};

const EFFECT_NAME_STABLE: &str = "stable";
const EFFECT_NAME_GRADIENT: &str = "gradient";
const EFFECT_NAME_CUSTOM: &str = "custom";
const EFFECT_NAME_SUNRISE: &str = "sunrise";
const EFFECT_NAME_COLOR_LOOP: &str = "colorloop";

const EFFECT_ID_STABLE: u8 = 0;
const EFFECT_ID_GRADIENT: u8 = 1;
const EFFECT_ID_CUSTOM: u8 = 2;
const EFFECT_ID_SUNRISE: u8 = 3;
const EFFECT_ID_COLOR_LOOP: u8 = 4;

/// Known effect ids that can be requested.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum EffectId {
    Stable = EFFECT_ID_STABLE,
    Gradient = EFFECT_ID_GRADIENT,
    Custom = EFFECT_ID_CUSTOM,
    Sunrise = EFFECT_ID_SUNRISE,
    ColorLoop = EFFECT_ID_COLOR_LOOP,
}

impl EffectId {
    pub fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            EFFECT_ID_STABLE => Self::Stable,
            EFFECT_ID_GRADIENT => Self::Gradient,
            EFFECT_ID_CUSTOM => Self::Custom,
            EFFECT_ID_SUNRISE => Self::Sunrise,
            EFFECT_ID_COLOR_LOOP => Self::ColorLoop,
            _ => return None,
        })
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stable => EFFECT_NAME_STABLE,
            Self::Gradient => EFFECT_NAME_GRADIENT,
            Self::Custom => EFFECT_NAME_CUSTOM,
            Self::Sunrise => EFFECT_NAME_SUNRISE,
            Self::ColorLoop => EFFECT_NAME_COLOR_LOOP,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            EFFECT_NAME_STABLE => Some(Self::Stable),
            EFFECT_NAME_GRADIENT => Some(Self::Gradient),
            EFFECT_NAME_CUSTOM => Some(Self::Custom),
            EFFECT_NAME_SUNRISE => Some(Self::Sunrise),
            EFFECT_NAME_COLOR_LOOP => Some(Self::ColorLoop),
            _ => None,
        }
    }

    /// Whether the effect paints from the commanded color
    ///
    /// A color, white or brightness command while any other effect runs
    /// switches back to Stable.
    pub const fn owns_color(self) -> bool {
        matches!(self, Self::Stable | Self::Gradient)
    }
}

/// Effect slot - enum containing the active effect and its own state
#[derive(Debug, Clone, Default)]
pub enum EffectSlot {
    /// Single solid color
    #[default]
    Stable,
    /// Positional gradient of the solid color
    Gradient,
    /// Custom buffer shown verbatim
    Custom,
    /// Timed wake-up animation
    Sunrise(SunriseAnimator),
    /// Rotating hue
    ColorLoop(ColorLoopEffect),
}

impl EffectSlot {
    /// Get the effect ID for external observation
    pub const fn id(&self) -> EffectId {
        match self {
            Self::Stable => EffectId::Stable,
            Self::Gradient => EffectId::Gradient,
            Self::Custom => EffectId::Custom,
            Self::Sunrise(_) => EffectId::Sunrise,
            Self::ColorLoop(_) => EffectId::ColorLoop,
        }
    }

    pub const fn sunrise(&self) -> Option<&SunriseAnimator> {
        match self {
            Self::Sunrise(animator) => Some(animator),
            _ => None,
        }
    }
}
