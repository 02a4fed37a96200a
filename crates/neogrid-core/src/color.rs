//! 8-bit RGB colors as pushed to addressable LEDs.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An 8-bit-per-channel RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Off.
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// Full white.
    pub const WHITE: Self = Self::new(255, 255, 255);
    /// Red.
    pub const RED: Self = Self::new(255, 0, 0);
    /// Green.
    pub const GREEN: Self = Self::new(0, 255, 0);
    /// Blue.
    pub const BLUE: Self = Self::new(0, 0, 255);
    /// Yellow.
    pub const YELLOW: Self = Self::new(255, 255, 0);
    /// Cyan.
    pub const CYAN: Self = Self::new(0, 255, 255);
    /// Magenta.
    pub const MAGENTA: Self = Self::new(255, 0, 255);
    /// Orange.
    pub const ORANGE: Self = Self::new(255, 165, 0);

    /// Creates a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Scales every channel by `factor` (clamped to `[0, 1]`).
    pub fn scale(self, factor: f32) -> Self {
        let f = factor.clamp(0.0, 1.0);
        Self::new(
            (self.r as f32 * f) as u8,
            (self.g as f32 * f) as u8,
            (self.b as f32 * f) as u8,
        )
    }

    /// Linear interpolation towards `other`; `t` is clamped to `[0, 1]`.
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Self::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }

    /// Adds `delta` to every channel, saturating at 0 and 255.
    pub fn offset(self, delta: i16) -> Self {
        let shift = |c: u8| (c as i16 + delta).clamp(0, 255) as u8;
        Self::new(shift(self.r), shift(self.g), shift(self.b))
    }

    /// Returns true for a fully dark color.
    pub fn is_black(self) -> bool {
        self == Self::BLACK
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

/// Classic NeoPixel rainbow wheel: red → green → blue → red over 0..256.
///
/// Positions wrap modulo 256.
pub fn wheel(pos: u32) -> Rgb {
    let pos = (pos % 256) as u8;
    match pos {
        0..=84 => Rgb::new(255 - pos * 3, pos * 3, 0),
        85..=169 => {
            let p = pos - 85;
            Rgb::new(0, 255 - p * 3, p * 3)
        }
        _ => {
            let p = pos - 170;
            Rgb::new(p * 3, 0, 255 - p * 3)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wheel_anchors() {
        assert_eq!(wheel(0), Rgb::RED);
        assert_eq!(wheel(85), Rgb::GREEN);
        assert_eq!(wheel(170), Rgb::BLUE);
        assert_eq!(wheel(256), wheel(0));
    }

    #[test]
    fn test_scale_and_offset() {
        assert_eq!(Rgb::new(200, 100, 50).scale(0.5), Rgb::new(100, 50, 25));
        assert_eq!(Rgb::new(250, 10, 100).offset(20), Rgb::new(255, 30, 120));
        assert_eq!(Rgb::new(250, 10, 100).offset(-20), Rgb::new(230, 0, 80));
    }

    #[test]
    fn test_lerp_endpoints() {
        let a = Rgb::new(0, 100, 200);
        let b = Rgb::new(200, 100, 0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Rgb::new(100, 100, 100));
    }
}
