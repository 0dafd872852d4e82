//! Switch palette, timing and sizing configuration.

use crate::color::Argb;
use crate::geometry::{Fx, FX_HALF, FX_ONE};

/// Track fill when the switch is on (day sky).
pub const DEFAULT_SWITCH_ON_COLOR: Argb = Argb::new(0xFF9EE3FB);
/// Track outer stroke when on.
pub const DEFAULT_SWITCH_ON_STROKE_COLOR: Argb = Argb::new(0xFF86C3D7);
/// Track fill when the switch is off (night sky).
pub const DEFAULT_SWITCH_OFF_COLOR: Argb = Argb::new(0xFF3C4145);
/// Track outer stroke when off.
pub const DEFAULT_SWITCH_OFF_STROKE_COLOR: Argb = Argb::new(0xFF1C1C1C);
/// Spot fill when on (sun).
pub const DEFAULT_SPOT_ON_COLOR: Argb = Argb::new(0xFFE1C348);
/// Spot inner highlight when on.
pub const DEFAULT_SPOT_ON_COLOR_IN: Argb = Argb::new(0xFFFFDF6D);
/// Spot fill when off (moon).
pub const DEFAULT_SPOT_OFF_COLOR: Argb = Argb::new(0xFFE3E7C7);
/// Spot inner highlight when off.
pub const DEFAULT_SPOT_OFF_COLOR_IN: Argb = Argb::new(0xFFFFFFFF);

pub const DEFAULT_DURATION_MS: u32 = 300;
pub const DEFAULT_SPOT_PADDING_DP: i32 = 6;

pub(crate) const INTRINSIC_WIDTH_DP: i32 = 120;
pub(crate) const INTRINSIC_HEIGHT_DP: i32 = INTRINSIC_WIDTH_DP / 2;
pub(crate) const THUMB_BORDER_DP: i32 = 4;
// Empirical stroke geometry, in dp: 2.4 inset, 3.6 width.
pub(crate) const STROKE_INSET_DP: Fx = Fx::from_bits(157_286);
pub(crate) const STROKE_WIDTH_DP: Fx = Fx::from_bits(235_930);

/// Colors, spot padding and sweep duration for one switch instance.
///
/// Built once at construction; individual fields are replaced afterwards
/// through the widget's setters, each of which requests a redraw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VisualConfig {
    pub switch_on_color: Argb,
    pub switch_off_color: Argb,
    pub switch_on_stroke_color: Argb,
    pub switch_off_stroke_color: Argb,
    pub spot_on_color: Argb,
    pub spot_on_color_in: Argb,
    pub spot_off_color: Argb,
    pub spot_off_color_in: Argb,
    /// Padding between track edge and spot, in dp.
    pub spot_padding: i32,
    /// Sweep duration in milliseconds.
    pub duration_ms: u32,
    /// Device density: pixels per dp.
    pub density: Fx,
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            switch_on_color: DEFAULT_SWITCH_ON_COLOR,
            switch_off_color: DEFAULT_SWITCH_OFF_COLOR,
            switch_on_stroke_color: DEFAULT_SWITCH_ON_STROKE_COLOR,
            switch_off_stroke_color: DEFAULT_SWITCH_OFF_STROKE_COLOR,
            spot_on_color: DEFAULT_SPOT_ON_COLOR,
            spot_on_color_in: DEFAULT_SPOT_ON_COLOR_IN,
            spot_off_color: DEFAULT_SPOT_OFF_COLOR,
            spot_off_color_in: DEFAULT_SPOT_OFF_COLOR_IN,
            spot_padding: DEFAULT_SPOT_PADDING_DP,
            duration_ms: DEFAULT_DURATION_MS,
            density: FX_ONE,
        }
    }
}

/// Pixel-space sizing derived from a [`VisualConfig`], recomputed per frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Metrics {
    /// Track width in px.
    pub width: i32,
    /// Track height in px.
    pub height: i32,
    /// Spot padding in px.
    pub spot_padding: i32,
    density: Fx,
}

impl Metrics {
    pub fn from_config(config: &VisualConfig) -> Self {
        let mut m = Self {
            width: 0,
            height: 0,
            spot_padding: 0,
            density: config.density,
        };
        m.width = m.dp(INTRINSIC_WIDTH_DP);
        m.height = m.dp(INTRINSIC_HEIGHT_DP);
        m.spot_padding = m.dp(config.spot_padding);
        m
    }

    /// dp to whole pixels, round-half-up.
    pub fn dp(&self, dp: i32) -> i32 {
        (Fx::from_num(dp) * self.density + FX_HALF).int().to_num()
    }

    /// dp to fractional pixels, carrying the same half-pixel bias.
    pub fn dp_fx(&self, dp: Fx) -> Fx {
        dp * self.density + FX_HALF
    }

    /// dp to whole-pixel Fx, same rounding as [`Metrics::dp`].
    pub fn dp_round(&self, dp: Fx) -> Fx {
        (dp * self.density + FX_HALF).int()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_at_density_one() {
        let m = Metrics::from_config(&VisualConfig::default());
        assert_eq!(m.width, 120);
        assert_eq!(m.height, 60);
        assert_eq!(m.spot_padding, 6);
    }

    #[test]
    fn dp_scales_and_rounds() {
        let config = VisualConfig {
            density: Fx::from_num(2.5),
            ..VisualConfig::default()
        };
        let m = Metrics::from_config(&config);
        assert_eq!(m.width, 300);
        assert_eq!(m.height, 150);
        // 6 * 2.5 = 15
        assert_eq!(m.spot_padding, 15);
        // 9 * 2.5 + 0.5 = 23.0
        assert_eq!(m.dp(9), 23);
    }
}
