//! Packed ARGB color values and channel-wise interpolation.

use embedded_graphics::pixelcolor::Rgb888;

use crate::geometry::Fx;

/// A packed 0xAARRGGBB color, the format switch palettes are configured in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Argb(pub u32);

impl Argb {
    pub const fn new(argb: u32) -> Self {
        Self(argb)
    }

    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn blue(self) -> u8 {
        self.0 as u8
    }

    pub const fn from_channels(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self(((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    /// Drops the alpha channel; the switch composites opaquely back-to-front.
    pub const fn rgb888(self) -> Rgb888 {
        Rgb888::new(self.red(), self.green(), self.blue())
    }
}

/// Channel-wise linear interpolation between two colors, rounded to nearest.
///
/// `interpolate(0, a, b) == a` and `interpolate(1, a, b) == b` exactly.
/// Fractions outside [0, 1] extrapolate; callers clamp beforehand.
pub fn interpolate(fraction: Fx, start: Argb, end: Argb) -> Argb {
    Argb::from_channels(
        lerp_channel(fraction, start.alpha(), end.alpha()),
        lerp_channel(fraction, start.red(), end.red()),
        lerp_channel(fraction, start.green(), end.green()),
        lerp_channel(fraction, start.blue(), end.blue()),
    )
}

fn lerp_channel(fraction: Fx, start: u8, end: u8) -> u8 {
    let delta = end as i32 - start as i32;
    let offset: i32 = (Fx::from_num(delta) * fraction).round().to_num();
    (start as i32 + offset).clamp(0, 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fx(v: f32) -> Fx {
        Fx::from_num(v)
    }

    #[test]
    fn endpoints_are_exact() {
        let a = Argb::new(0xFF3C4145);
        let b = Argb::new(0xFF9EE3FB);
        assert_eq!(interpolate(fx(0.0), a, b), a);
        assert_eq!(interpolate(fx(1.0), a, b), b);
    }

    #[test]
    fn midpoint_rounds_to_nearest() {
        let a = Argb::new(0xFF000000);
        let b = Argb::new(0xFF0000FF);
        // 255 / 2 = 127.5 rounds away from zero.
        assert_eq!(interpolate(fx(0.5), a, b), Argb::new(0xFF000080));
    }

    #[test]
    fn channels_are_monotonic() {
        let a = Argb::new(0xFFE1C348);
        let b = Argb::new(0xFFE3E7C7);
        let mut prev = a;
        for step in 0..=20 {
            let f = Fx::from_num(step) / Fx::from_num(20);
            let c = interpolate(f, a, b);
            assert!(c.red() >= prev.red());
            assert!(c.green() >= prev.green());
            assert!(c.blue() >= prev.blue());
            prev = c;
        }
        assert_eq!(prev, b);
    }

    #[test]
    fn channel_accessors_unpack() {
        let c = Argb::new(0x80FFDF6D);
        assert_eq!(c.alpha(), 0x80);
        assert_eq!(c.red(), 0xFF);
        assert_eq!(c.green(), 0xDF);
        assert_eq!(c.blue(), 0x6D);
        assert_eq!(Argb::from_channels(0x80, 0xFF, 0xDF, 0x6D), c);
    }
}
