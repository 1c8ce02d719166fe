//! Animation presets.
//!
//! A preset bundles hidden, shown and exit values with a default timing
//! curve. The set is closed: unknown names are rejected when a presence is
//! built, so a typo surfaces as an error instead of an element that silently
//! never appears.
//!
//! Built-in presets:
//! - fadeIn
//! - fadeInUp / fadeInDown / fadeInLeft / fadeInRight
//! - slideUp / slideDown
//! - scaleIn
//! - pop

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::easing::{AnimatedProps, Easing, VisualState};
use crate::error::Error;

/// Distance travelled by directional presets.
const TRAVEL: f32 = 20.0;

/// Timing for one transition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Timing {
    pub duration: Duration,
    pub delay: Duration,
    pub easing: Easing,
}

impl Timing {
    pub const fn new(duration_ms: u64, easing: Easing) -> Self {
        Self {
            duration: Duration::from_millis(duration_ms),
            delay: Duration::ZERO,
            easing,
        }
    }
}

/// Full definition of a preset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PresetSpec {
    pub initial: VisualState,
    pub target: VisualState,
    pub exit: VisualState,
    pub props: AnimatedProps,
    pub timing: Timing,
}

/// Named animation presets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AnimationPreset {
    FadeIn,
    FadeInUp,
    FadeInDown,
    FadeInLeft,
    FadeInRight,
    SlideUp,
    SlideDown,
    ScaleIn,
    Pop,
}

impl AnimationPreset {
    pub const ALL: [Self; 9] = [
        Self::FadeIn,
        Self::FadeInUp,
        Self::FadeInDown,
        Self::FadeInLeft,
        Self::FadeInRight,
        Self::SlideUp,
        Self::SlideDown,
        Self::ScaleIn,
        Self::Pop,
    ];

    /// Look up a preset by name.
    ///
    /// Case, `-` and `_` are ignored, so `fade-in-up`, `fade_in_up` and
    /// `fadeInUp` all resolve to [`AnimationPreset::FadeInUp`].
    pub fn from_name(name: &str) -> Result<Self, Error> {
        let key: String = name
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();
        match key.as_str() {
            "fadein" => Ok(Self::FadeIn),
            "fadeinup" => Ok(Self::FadeInUp),
            "fadeindown" => Ok(Self::FadeInDown),
            "fadeinleft" => Ok(Self::FadeInLeft),
            "fadeinright" => Ok(Self::FadeInRight),
            "slideup" => Ok(Self::SlideUp),
            "slidedown" => Ok(Self::SlideDown),
            "scalein" => Ok(Self::ScaleIn),
            "pop" => Ok(Self::Pop),
            _ => Err(Error::configuration(format!(
                "unknown animation preset `{name}` (expected one of: {})",
                preset_names().join(", ")
            ))),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::FadeIn => "fadeIn",
            Self::FadeInUp => "fadeInUp",
            Self::FadeInDown => "fadeInDown",
            Self::FadeInLeft => "fadeInLeft",
            Self::FadeInRight => "fadeInRight",
            Self::SlideUp => "slideUp",
            Self::SlideDown => "slideDown",
            Self::ScaleIn => "scaleIn",
            Self::Pop => "pop",
        }
    }

    pub fn spec(self) -> PresetSpec {
        let fade = AnimatedProps::OPACITY;
        let fade_x = AnimatedProps::OPACITY | AnimatedProps::TRANSLATE_X;
        let fade_y = AnimatedProps::OPACITY | AnimatedProps::TRANSLATE_Y;
        let hidden_at = |x: f32, y: f32| VisualState::new(0.0, x, y, 1.0);

        match self {
            Self::FadeIn => PresetSpec {
                initial: VisualState::HIDDEN,
                target: VisualState::VISIBLE,
                exit: VisualState::HIDDEN,
                props: fade,
                timing: Timing::new(300, Easing::EaseOut),
            },
            Self::FadeInUp => PresetSpec {
                initial: hidden_at(0.0, TRAVEL),
                target: VisualState::VISIBLE,
                exit: hidden_at(0.0, -TRAVEL),
                props: fade_y,
                timing: Timing::new(400, Easing::EaseOut),
            },
            Self::FadeInDown => PresetSpec {
                initial: hidden_at(0.0, -TRAVEL),
                target: VisualState::VISIBLE,
                exit: hidden_at(0.0, TRAVEL),
                props: fade_y,
                timing: Timing::new(400, Easing::EaseOut),
            },
            Self::FadeInLeft => PresetSpec {
                initial: hidden_at(-TRAVEL, 0.0),
                target: VisualState::VISIBLE,
                exit: hidden_at(-TRAVEL, 0.0),
                props: fade_x,
                timing: Timing::new(400, Easing::EaseOut),
            },
            Self::FadeInRight => PresetSpec {
                initial: hidden_at(TRAVEL, 0.0),
                target: VisualState::VISIBLE,
                exit: hidden_at(TRAVEL, 0.0),
                props: fade_x,
                timing: Timing::new(400, Easing::EaseOut),
            },
            // Slides stay opaque and travel a full step
            Self::SlideUp => PresetSpec {
                initial: VisualState::new(1.0, 0.0, TRAVEL * 5.0, 1.0),
                target: VisualState::VISIBLE,
                exit: VisualState::new(1.0, 0.0, TRAVEL * 5.0, 1.0),
                props: AnimatedProps::TRANSLATE_Y,
                timing: Timing::new(350, Easing::EaseInOut),
            },
            Self::SlideDown => PresetSpec {
                initial: VisualState::new(1.0, 0.0, -TRAVEL * 5.0, 1.0),
                target: VisualState::VISIBLE,
                exit: VisualState::new(1.0, 0.0, -TRAVEL * 5.0, 1.0),
                props: AnimatedProps::TRANSLATE_Y,
                timing: Timing::new(350, Easing::EaseInOut),
            },
            Self::ScaleIn => PresetSpec {
                initial: VisualState::new(0.0, 0.0, 0.0, 0.8),
                target: VisualState::VISIBLE,
                exit: VisualState::new(0.0, 0.0, 0.0, 0.8),
                props: AnimatedProps::OPACITY | AnimatedProps::SCALE,
                timing: Timing::new(250, Easing::EaseOut),
            },
            Self::Pop => PresetSpec {
                initial: VisualState::new(0.0, 0.0, 0.0, 0.5),
                target: VisualState::VISIBLE,
                exit: VisualState::new(0.0, 0.0, 0.0, 0.5),
                props: AnimatedProps::OPACITY | AnimatedProps::SCALE,
                timing: Timing::new(300, Easing::CubicBezier(0.34, 1.56, 0.64, 1.0)),
            },
        }
    }
}

impl fmt::Display for AnimationPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AnimationPreset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

impl TryFrom<String> for AnimationPreset {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_name(&value)
    }
}

impl From<AnimationPreset> for String {
    fn from(preset: AnimationPreset) -> Self {
        preset.name().to_string()
    }
}

/// List all preset names.
pub fn preset_names() -> Vec<&'static str> {
    AnimationPreset::ALL.iter().map(|p| p.name()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_round_trip() {
        for preset in AnimationPreset::ALL {
            assert_eq!(AnimationPreset::from_name(preset.name()).unwrap(), preset);
        }
    }

    #[test]
    fn test_name_normalization() {
        assert_eq!(AnimationPreset::from_name("fade-in-up").unwrap(), AnimationPreset::FadeInUp);
        assert_eq!(AnimationPreset::from_name("FADE_IN").unwrap(), AnimationPreset::FadeIn);
        assert_eq!("scaleIn".parse::<AnimationPreset>().unwrap(), AnimationPreset::ScaleIn);
    }

    #[test]
    fn test_unknown_preset_is_configuration_error() {
        let err = AnimationPreset::from_name("wobble").unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
        assert!(err.to_string().contains("wobble"));
    }

    #[test]
    fn test_every_preset_ends_visible() {
        for preset in AnimationPreset::ALL {
            assert_eq!(preset.spec().target, VisualState::VISIBLE, "{preset}");
            assert!(!preset.spec().props.is_empty());
        }
    }

    #[test]
    fn test_serde_rejects_unknown() {
        #[derive(Deserialize)]
        struct Holder {
            preset: AnimationPreset,
        }
        let ok: Holder = serde_json::from_str(r#"{"preset":"pop"}"#).unwrap();
        assert_eq!(ok.preset, AnimationPreset::Pop);
        assert!(serde_json::from_str::<Holder>(r#"{"preset":"nope"}"#).is_err());
    }
}
