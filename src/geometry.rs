//! Progress-driven switch geometry.
//!
//! Every shape the renderer draws is a pure function of a normalized progress
//! value plus the pixel [`Metrics`]. Values are computed fresh per frame in
//! `I16F16` fixed point and discarded; nothing here holds state.
//!
//! The piecewise breakpoints (0.35, 0.6, 0.65, 2/3, 0.8, 0.9) are empirically
//! tuned easing constants. Changing them changes the animation's character.

use embedded_graphics::prelude::{Point, Size};
use embedded_graphics::primitives::Rectangle;
use fixed::types::I16F16;

use crate::config::{Metrics, THUMB_BORDER_DP};

pub type Fx = I16F16;

pub const FX_ZERO: Fx = Fx::from_bits(0);
pub const FX_HALF: Fx = Fx::from_bits(1 << 15);
pub const FX_ONE: Fx = Fx::from_bits(1 << 16);
pub(crate) const FX_TWO: Fx = Fx::from_bits(2 << 16);
pub(crate) const FX_PI: Fx = Fx::from_bits(205_887);
const FX_TAU: Fx = Fx::from_bits(411_775);
const FX_PI_2: Fx = Fx::from_bits(102_944);

/// On-sweep shade switches formula at 0.35 of its scaled progress.
pub(crate) const SHADE_ON_BREAK: Fx = Fx::from_bits(22_938);
/// Off-sweep shade switches formula at 0.65 of its scaled progress.
pub(crate) const SHADE_OFF_BREAK: Fx = Fx::from_bits(42_598);
/// Past 2/3 of the off sweep the thumb is pinned at the off end.
pub(crate) const THUMB_PIN_BREAK: Fx = Fx::from_bits(43_691);
/// Cloud and stars only appear past this point of their sweep.
pub(crate) const DECOR_THRESHOLD: Fx = Fx::from_bits(39_322);
/// Star radii grow until here, then shrink back.
pub(crate) const STAR_PEAK: Fx = Fx::from_bits(52_429);
/// Cloud stops expanding and settles from here on.
pub(crate) const CLOUD_SETTLE: Fx = Fx::from_bits(58_982);
/// Thumb and shade progress run at 3/2 of the sweep progress.
pub(crate) const SWEEP_GAIN: Fx = Fx::from_bits(98_304);

#[inline]
pub(crate) fn fx_i32(v: i32) -> Fx {
    Fx::from_num(v)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PointFx {
    pub x: Fx,
    pub y: Fx,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RectFx {
    pub left: Fx,
    pub top: Fx,
    pub right: Fx,
    pub bottom: Fx,
}

impl RectFx {
    pub const fn new(left: Fx, top: Fx, right: Fx, bottom: Fx) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn center(&self) -> PointFx {
        PointFx {
            x: (self.left + self.right) / FX_TWO,
            y: (self.top + self.bottom) / FX_TWO,
        }
    }

    pub fn inset(&self, d: Fx) -> Self {
        Self {
            left: self.left + d,
            top: self.top + d,
            right: self.right - d,
            bottom: self.bottom - d,
        }
    }

    /// Nearest-pixel rectangle; degenerate extents collapse to zero size.
    pub fn to_rect(&self) -> Rectangle {
        let left: i32 = self.left.round().to_num();
        let top: i32 = self.top.round().to_num();
        let right: i32 = self.right.round().to_num();
        let bottom: i32 = self.bottom.round().to_num();
        Rectangle::new(
            Point::new(left, top),
            Size::new((right - left).max(0) as u32, (bottom - top).max(0) as u32),
        )
    }
}

/// A rounded rectangle with one shared corner radius.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RoundRectFx {
    pub rect: RectFx,
    pub radius: Fx,
}

/// One orbiting decoration dot: a filled disc with a smaller core disc.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Dot {
    pub center: PointFx,
    pub radius: Fx,
    pub core_radius: Fx,
}

/// One star of the night-sky cluster.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Star {
    pub center: PointFx,
    pub radius: Fx,
}

/// Track body. At `pos == 0` this is the full switch; increasing `pos`
/// shrinks it symmetrically toward the center.
pub fn track_rect(m: &Metrics, pos: Fx) -> RoundRectFx {
    let w = fx_i32(m.width);
    let h = fx_i32(m.height);
    let left = w * pos;
    let top = h * pos;
    let rect = RectFx::new(left, top, w - left, h - top);
    RoundRectFx {
        radius: (rect.bottom - rect.top) / FX_TWO,
        rect,
    }
}

/// Thumb bounding square, sliding from the off end (`pos == 0`) to the on end
/// (`pos == 1`). Progress is clamped to 1 so overdriven sweep values cannot
/// push the thumb past the track.
pub fn thumb_rect(m: &Metrics, pos: Fx) -> RectFx {
    let pos = pos.min(FX_ONE);
    let pad = fx_i32(m.spot_padding);
    let oh = fx_i32(m.height - 2 * m.spot_padding);
    let left = pad + fx_i32(m.width - m.height) * pos;
    RectFx::new(left, pad, left + oh, pad + oh)
}

/// Inner highlight: thumb inset uniformly by the border width.
pub fn thumb_inner_rect(m: &Metrics, thumb: &RectFx) -> RectFx {
    thumb.inset(fx_i32(m.dp(THUMB_BORDER_DP)))
}

/// Track-colored overlay trailing the thumb on the on sweep. The formula
/// changes at 0.35 of the (already scaled) progress, which reads as the shade
/// catching up with the thumb rather than tracking it linearly.
pub fn shade_on_rect(m: &Metrics, pos: Fx) -> RoundRectFx {
    let pad = fx_i32(m.spot_padding);
    let travel = fx_i32(m.width - m.height);
    let oh = fx_i32(m.height - 2 * m.spot_padding);
    let (left, right) = if pos < SHADE_ON_BREAK {
        (FX_ZERO, pad + travel * pos + oh)
    } else {
        let lead = pad + travel * pos * FX_TWO / fx_i32(3);
        (lead, lead + oh)
    };
    let rect = RectFx::new(left, pad, right, pad + oh);
    RoundRectFx {
        radius: oh / FX_TWO,
        rect,
    }
}

/// Counterpart overlay for the off sweep, switching formula at 0.65.
pub fn shade_off_rect(m: &Metrics, pos: Fx) -> RoundRectFx {
    let pad = fx_i32(m.spot_padding);
    let w = fx_i32(m.width);
    let travel = fx_i32(m.width - m.height);
    let oh = fx_i32(m.height - 2 * m.spot_padding);
    let (left, right) = if pos > SHADE_OFF_BREAK {
        (pad + travel * pos, w - pad)
    } else {
        let lead = pad + travel * (FX_TWO * pos + FX_ONE) / fx_i32(3);
        (lead, lead + oh)
    };
    let rect = RectFx::new(left, pad, right, pad + oh);
    RoundRectFx {
        radius: oh / FX_TWO,
        rect,
    }
}

/// The three moon dots, orbiting the thumb center with phase-shifted angular
/// sweeps. `pos` runs 0..1 over the visible part of the off sweep.
pub fn orbit_dots(m: &Metrics, pos: Fx, thumb: &RectFx) -> [Dot; 3] {
    let center = thumb.center();
    let pi_3 = FX_PI / fx_i32(3);
    let pi_5_12 = FX_PI * fx_i32(5) / fx_i32(12);
    let pi_16_12 = FX_PI * fx_i32(16) / fx_i32(12);

    let dot = |anchor_dp: i32, angle: Fx, radius_dp: i32, core_dp: i32| {
        let anchor = thumb.right - fx_i32(m.dp(anchor_dp));
        let orbit = anchor - center.x;
        let (sin, cos) = sin_cos(angle);
        Dot {
            center: PointFx {
                x: anchor - orbit + orbit * cos,
                y: center.y - orbit * sin,
            },
            radius: fx_i32(m.dp(radius_dp)),
            core_radius: fx_i32(m.dp(core_dp)),
        }
    };

    [
        dot(9, pos * pi_3, 7, 3),
        dot(7, pi_5_12 + pos * pi_5_12, 5, 1),
        dot(9, pi_16_12 + pos * pi_5_12, 5, 1),
    ]
}

/// Cloud destination rectangle: expands until 0.9 of the sweep, then settles
/// back slightly for a "pop" without true spline easing.
pub fn cloud_rect(m: &Metrics, pos: Fx) -> RectFx {
    let cx = fx_i32(m.width / 2);
    let cy = fx_i32(m.height / 2);
    if pos <= CLOUD_SETTLE {
        let t = m.dp_round(pos * fx_i32(10) - fx_i32(6));
        RectFx::new(
            cx - fx_i32(m.dp(18)) - t,
            cy - fx_i32(m.dp(4)) - t,
            cx + fx_i32(m.dp(18)) + t,
            cy + fx_i32(m.dp(20)) + t,
        )
    } else {
        let t = m.dp_round(FX_TWO * (pos * fx_i32(10) - fx_i32(9)));
        RectFx::new(
            cx - fx_i32(m.dp(22)) + t,
            cy - fx_i32(m.dp(8)) + t,
            cx + fx_i32(m.dp(22)) - t,
            cy + fx_i32(m.dp(24)) - t,
        )
    }
}

/// The seven-star night cluster. Anchor points are fixed fractions of the
/// track size; radii breathe with the sweep, peaking at 0.8. The radii are
/// raw pixels, not dp.
pub fn star_cluster(m: &Metrics, pos: Fx) -> [Star; 7] {
    let w = fx_i32(m.width);
    let h = fx_i32(m.height);
    let at = |wn: i32, wd: i32, hn: i32, hd: i32| PointFx {
        x: w * fx_i32(wn) / fx_i32(wd),
        y: h * fx_i32(hn) / fx_i32(hd),
    };
    let centers = [
        at(1, 2, 1, 5),
        at(3, 4, 1, 5),
        at(5, 8, 2, 5),
        at(27, 40, 3, 5),
        at(5, 6, 9, 20),
        at(4, 5, 7, 10),
        at(11, 20, 3, 4),
    ];

    let t = if pos > STAR_PEAK {
        fx_i32(10) - fx_i32(10) * pos
    } else {
        fx_i32(10) * pos - fx_i32(6)
    };
    let grow = FX_TWO * t;
    let radii = [
        fx_i32(6) + grow,
        fx_i32(5) + grow,
        fx_i32(5) + grow,
        fx_i32(4) + grow,
        fx_i32(8) - grow,
        fx_i32(7) - grow,
        fx_i32(7) - grow,
    ];

    let mut stars = [Star::default(); 7];
    for (star, (center, radius)) in stars.iter_mut().zip(centers.into_iter().zip(radii)) {
        *star = Star {
            center,
            radius: radius.max(FX_ZERO),
        };
    }
    stars
}

/// Polynomial sine/cosine after wrapping to [-pi, pi] and folding into the
/// [-pi/2, pi/2] quadrant. Worst-case error is under half a percent, well
/// below a pixel at switch scale.
pub(crate) fn sin_cos(angle: Fx) -> (Fx, Fx) {
    let x = wrap_pi(angle);
    let (x, cos_sign) = if x > FX_PI_2 {
        (FX_PI - x, -FX_ONE)
    } else if x < -FX_PI_2 {
        (-FX_PI - x, -FX_ONE)
    } else {
        (x, FX_ONE)
    };
    let x2 = x * x;
    let x3 = x2 * x;
    let sin = x - x3 / fx_i32(6) + (x3 * x2) / fx_i32(120);
    let cos = FX_ONE - x2 / FX_TWO + (x2 * x2) / fx_i32(24);
    (sin, cos * cos_sign)
}

fn wrap_pi(mut angle: Fx) -> Fx {
    while angle > FX_PI {
        angle -= FX_TAU;
    }
    while angle < -FX_PI {
        angle += FX_TAU;
    }
    angle
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VisualConfig;

    fn metrics() -> Metrics {
        Metrics::from_config(&VisualConfig::default())
    }

    fn fx(v: f32) -> Fx {
        Fx::from_num(v)
    }

    #[test]
    fn track_at_zero_is_full_body() {
        let m = metrics();
        let rr = track_rect(&m, FX_ZERO);
        assert_eq!(rr.rect, RectFx::new(fx(0.0), fx(0.0), fx(120.0), fx(60.0)));
        assert_eq!(rr.radius, fx(30.0));
    }

    #[test]
    fn track_shrinks_symmetrically() {
        let m = metrics();
        let rr = track_rect(&m, fx(0.25));
        assert_eq!(rr.rect.left, fx(30.0));
        assert_eq!(rr.rect.right, fx(90.0));
        assert_eq!(rr.rect.top, fx(15.0));
        assert_eq!(rr.rect.bottom, fx(45.0));
    }

    #[test]
    fn thumb_slides_monotonically_within_bounds() {
        let m = metrics();
        let low = fx_i32(m.spot_padding);
        let high = low + fx_i32(m.width - m.height);
        let mut prev = FX_ZERO;
        for step in 0..=32 {
            let pos = fx_i32(step) / fx_i32(32);
            let rect = thumb_rect(&m, pos);
            assert!(rect.left >= low && rect.left <= high);
            assert!(rect.left >= prev);
            assert_eq!(rect.right - rect.left, rect.bottom - rect.top);
            prev = rect.left;
        }
    }

    #[test]
    fn thumb_progress_is_clamped() {
        let m = metrics();
        assert_eq!(thumb_rect(&m, fx(1.5)), thumb_rect(&m, FX_ONE));
    }

    #[test]
    fn shade_on_switches_formula_at_break() {
        let m = metrics();
        let before = shade_on_rect(&m, fx(0.34));
        assert_eq!(before.rect.left, FX_ZERO);
        let after = shade_on_rect(&m, fx(0.36));
        assert!(after.rect.left > FX_ZERO);
        assert_eq!(after.rect.right - after.rect.left, fx(48.0));
    }

    #[test]
    fn shade_off_pins_to_track_edge_past_break() {
        let m = metrics();
        let late = shade_off_rect(&m, fx(0.9));
        assert_eq!(late.rect.right, fx(114.0));
        let early = shade_off_rect(&m, fx(0.3));
        assert_eq!(early.rect.right - early.rect.left, fx(48.0));
    }

    #[test]
    fn settled_star_radii_match_rest_pose() {
        let m = metrics();
        let stars = star_cluster(&m, FX_ONE);
        let radii: Vec<i32> = stars.iter().map(|s| s.radius.round().to_num()).collect();
        assert_eq!(radii, vec![6, 5, 5, 4, 8, 7, 7]);
    }

    #[test]
    fn first_dot_starts_at_its_anchor() {
        let m = metrics();
        let thumb = thumb_rect(&m, FX_ONE);
        let dots = orbit_dots(&m, FX_ZERO, &thumb);
        // cos(0) folds the orbit term away entirely.
        assert_eq!(dots[0].center.x.round(), thumb.right - fx_i32(m.dp(9)));
        assert_eq!(dots[0].center.y, thumb.center().y);
    }

    #[test]
    fn cloud_rest_pose_is_centered() {
        let m = metrics();
        let rect = cloud_rect(&m, FX_ONE);
        let center = rect.center();
        assert_eq!(center.x, fx(60.0));
        // vertical center carries the fixed 8dp downward bias of the art.
        assert_eq!(center.y, fx(38.0));
    }

    #[test]
    fn sin_cos_tracks_reference_trig() {
        for step in -24..=24 {
            let angle = step as f32 * 0.25;
            let (sin, cos) = sin_cos(Fx::from_num(angle));
            let sin_err = (sin.to_num::<f32>() - angle.sin()).abs();
            let cos_err = (cos.to_num::<f32>() - angle.cos()).abs();
            assert!(sin_err < 0.02, "sin({angle}) err {sin_err}");
            assert!(cos_err < 0.03, "cos({angle}) err {cos_err}");
        }
    }

    #[test]
    fn rect_conversion_rounds_to_pixels() {
        let r = RectFx::new(fx(1.4), fx(2.6), fx(11.5), fx(12.4));
        let px = r.to_rect();
        assert_eq!(px.top_left, Point::new(1, 3));
        assert_eq!(px.size, Size::new(11, 9));
    }
}
