//! Easing curves and animated visual values.

use bitflags::bitflags;

// =============================================================================
// EASING
// =============================================================================

/// Timing curve mapping linear progress to eased progress.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Easing {
    Linear,
    EaseIn,
    #[default]
    EaseOut,
    EaseInOut,
    /// CSS-style cubic bezier with control points (x1, y1, x2, y2).
    CubicBezier(f32, f32, f32, f32),
}

impl Easing {
    /// Eased progress for linear progress `t` (clamped to `[0, 1]`).
    ///
    /// The result may leave `[0, 1]` for overshooting beziers.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => cubic_bezier(0.42, 0.0, 1.0, 1.0, t),
            Self::EaseOut => cubic_bezier(0.0, 0.0, 0.58, 1.0, t),
            Self::EaseInOut => cubic_bezier(0.42, 0.0, 0.58, 1.0, t),
            Self::CubicBezier(x1, y1, x2, y2) => cubic_bezier(x1, y1, x2, y2, t),
        }
    }
}

fn bezier_component(p1: f32, p2: f32, s: f32) -> f32 {
    let inv = 1.0 - s;
    3.0 * inv * inv * s * p1 + 3.0 * inv * s * s * p2 + s * s * s
}

fn bezier_slope(p1: f32, p2: f32, s: f32) -> f32 {
    let inv = 1.0 - s;
    3.0 * inv * inv * p1 + 6.0 * inv * s * (p2 - p1) + 3.0 * s * s * (1.0 - p2)
}

/// Solve the curve parameter for `x` with Newton iterations, falling back to
/// bisection where the slope is flat.
fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, x: f32) -> f32 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }

    let mut s = x;
    for _ in 0..8 {
        let err = bezier_component(x1, x2, s) - x;
        if err.abs() < 1e-5 {
            return bezier_component(y1, y2, s);
        }
        let slope = bezier_slope(x1, x2, s);
        if slope.abs() < 1e-6 {
            break;
        }
        s -= err / slope;
    }

    let (mut lo, mut hi) = (0.0f32, 1.0f32);
    s = x;
    for _ in 0..32 {
        let value = bezier_component(x1, x2, s);
        if (value - x).abs() < 1e-5 {
            break;
        }
        if value < x {
            lo = s;
        } else {
            hi = s;
        }
        s = (lo + hi) / 2.0;
    }
    bezier_component(y1, y2, s)
}

// =============================================================================
// VISUAL STATE
// =============================================================================

bitflags! {
    /// Properties a preset animates. Unflagged properties jump straight to
    /// their destination value.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct AnimatedProps: u8 {
        const OPACITY = 1 << 0;
        const TRANSLATE_X = 1 << 1;
        const TRANSLATE_Y = 1 << 2;
        const SCALE = 1 << 3;
    }
}

/// Rendered values of an animated element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisualState {
    pub opacity: f32,
    /// Horizontal offset in pixels (or cells for terminal hosts).
    pub offset_x: f32,
    pub offset_y: f32,
    pub scale: f32,
}

impl Default for VisualState {
    fn default() -> Self {
        Self::VISIBLE
    }
}

impl VisualState {
    pub const VISIBLE: Self = Self { opacity: 1.0, offset_x: 0.0, offset_y: 0.0, scale: 1.0 };
    pub const HIDDEN: Self = Self { opacity: 0.0, offset_x: 0.0, offset_y: 0.0, scale: 1.0 };

    pub const fn new(opacity: f32, offset_x: f32, offset_y: f32, scale: f32) -> Self {
        Self { opacity, offset_x, offset_y, scale }
    }

    /// Interpolate toward `to` by eased progress `t`, for flagged properties only.
    pub fn lerp(&self, to: &Self, t: f32, props: AnimatedProps) -> Self {
        let mix = |flag: AnimatedProps, a: f32, b: f32| {
            if props.contains(flag) { a + (b - a) * t } else { b }
        };
        Self {
            opacity: mix(AnimatedProps::OPACITY, self.opacity, to.opacity).clamp(0.0, 1.0),
            offset_x: mix(AnimatedProps::TRANSLATE_X, self.offset_x, to.offset_x),
            offset_y: mix(AnimatedProps::TRANSLATE_Y, self.offset_y, to.offset_y),
            scale: mix(AnimatedProps::SCALE, self.scale, to.scale),
        }
    }
}
