//! Frame rendering.
//!
//! One ordered pass per frame: track fill, shade (animating only), thumb,
//! inner highlight, decorations, outer stroke. Later draws composite over
//! earlier ones, which is what makes the shade/thumb layering read as a
//! single sliding sun or moon. Rendering never mutates widget state; drawing
//! errors from the target propagate out.

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{
    Circle, Ellipse, PrimitiveStyle, PrimitiveStyleBuilder, RoundedRectangle,
};

use crate::color::{interpolate, Argb};
use crate::config::{Metrics, VisualConfig, STROKE_INSET_DP, STROKE_WIDTH_DP};
use crate::geometry::{
    cloud_rect, fx_i32, orbit_dots, shade_off_rect, shade_on_rect, star_cluster, thumb_inner_rect,
    thumb_rect, track_rect, Dot, Fx, PointFx, RectFx, RoundRectFx, Star, DECOR_THRESHOLD, FX_ONE,
    FX_ZERO, SWEEP_GAIN, THUMB_PIN_BREAK,
};
use crate::sprite::CloudArt;
use crate::state::SwitchState;

pub(crate) fn render<D>(
    target: &mut D,
    config: &VisualConfig,
    m: &Metrics,
    state: SwitchState,
    pos: Fx,
    cloud: &CloudArt<'_>,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    match state {
        SwitchState::On => render_on(target, config, m, cloud),
        SwitchState::Off => render_off(target, config, m),
        SwitchState::AnimatingToOn => render_to_on(target, config, m, pos, cloud),
        SwitchState::AnimatingToOff => render_to_off(target, config, m, pos),
    }
}

fn render_on<D>(
    target: &mut D,
    config: &VisualConfig,
    m: &Metrics,
    cloud: &CloudArt<'_>,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    fill_round_rect(target, &track_rect(m, FX_ZERO), config.switch_on_color)?;

    let thumb = thumb_rect(m, FX_ONE);
    fill_oval(target, &thumb, config.spot_on_color)?;
    fill_oval(target, &thumb_inner_rect(m, &thumb), config.spot_on_color_in)?;
    cloud.blit_scaled(target, cloud_rect(m, FX_ONE))?;

    stroke_track(target, m, config.switch_on_stroke_color)
}

fn render_off<D>(target: &mut D, config: &VisualConfig, m: &Metrics) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    fill_round_rect(target, &track_rect(m, FX_ZERO), config.switch_off_color)?;

    let thumb = thumb_rect(m, FX_ZERO);
    fill_oval(target, &thumb, config.spot_off_color)?;
    fill_oval(target, &thumb_inner_rect(m, &thumb), config.spot_off_color_in)?;
    draw_dots(
        target,
        &orbit_dots(m, FX_ONE, &thumb),
        config.spot_off_color,
        config.spot_off_color_in,
    )?;
    draw_stars(target, &star_cluster(m, FX_ONE), config.spot_off_color_in)?;

    stroke_track(target, m, config.switch_off_stroke_color)
}

fn render_to_on<D>(
    target: &mut D,
    config: &VisualConfig,
    m: &Metrics,
    pos: Fx,
    cloud: &CloudArt<'_>,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    fill_round_rect(target, &track_rect(m, FX_ZERO), config.switch_on_color)?;

    // Thumb and shade run ahead of the sweep; the clamp in the thumb formula
    // holds them at the on end for the last third.
    let scaled = pos * SWEEP_GAIN;
    let spot = interpolate(pos, config.spot_off_color, config.spot_on_color);
    let spot_in = interpolate(pos, config.spot_off_color_in, config.spot_on_color_in);

    fill_round_rect(target, &shade_on_rect(m, scaled), spot)?;
    let thumb = thumb_rect(m, scaled);
    fill_oval(target, &thumb, spot)?;
    fill_oval(target, &thumb_inner_rect(m, &thumb), spot_in)?;
    if pos > DECOR_THRESHOLD {
        cloud.blit_scaled(target, cloud_rect(m, pos))?;
    }

    let stroke = interpolate(
        pos,
        config.switch_off_stroke_color,
        config.switch_on_stroke_color,
    );
    stroke_track(target, m, stroke)
}

fn render_to_off<D>(
    target: &mut D,
    config: &VisualConfig,
    m: &Metrics,
    pos: Fx,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    fill_round_rect(target, &track_rect(m, FX_ZERO), config.switch_off_color)?;

    let back = FX_ONE - pos * SWEEP_GAIN;
    let spot = interpolate(pos, config.spot_on_color, config.spot_off_color);
    let spot_in = interpolate(pos, config.spot_on_color_in, config.spot_off_color_in);

    fill_round_rect(target, &shade_off_rect(m, back), spot)?;
    let thumb = if pos > THUMB_PIN_BREAK {
        thumb_rect(m, FX_ZERO)
    } else {
        thumb_rect(m, back)
    };
    fill_oval(target, &thumb, spot)?;
    fill_oval(target, &thumb_inner_rect(m, &thumb), spot_in)?;

    let dot_pos = if pos > THUMB_PIN_BREAK {
        FX_ONE
    } else {
        pos * SWEEP_GAIN
    };
    draw_dots(
        target,
        &orbit_dots(m, dot_pos, &thumb),
        config.spot_off_color,
        config.spot_off_color_in,
    )?;
    if pos > DECOR_THRESHOLD {
        draw_stars(target, &star_cluster(m, pos), config.spot_off_color_in)?;
    }

    let stroke = interpolate(
        pos,
        config.switch_on_stroke_color,
        config.switch_off_stroke_color,
    );
    stroke_track(target, m, stroke)
}

fn fill_round_rect<D>(target: &mut D, rr: &RoundRectFx, color: Argb) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    let radius = rr.radius.round().to_num::<i32>().max(0) as u32;
    RoundedRectangle::with_equal_corners(rr.rect.to_rect(), Size::new(radius, radius))
        .into_styled(PrimitiveStyle::with_fill(color.rgb888()))
        .draw(target)
}

fn fill_oval<D>(target: &mut D, rect: &RectFx, color: Argb) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    let px = rect.to_rect();
    Ellipse::new(px.top_left, px.size)
        .into_styled(PrimitiveStyle::with_fill(color.rgb888()))
        .draw(target)
}

fn fill_circle<D>(target: &mut D, center: PointFx, radius: Fx, color: Argb) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    let diameter = (radius * fx_i32(2)).round().to_num::<i32>().max(0) as u32;
    let center = Point::new(center.x.round().to_num(), center.y.round().to_num());
    Circle::with_center(center, diameter)
        .into_styled(PrimitiveStyle::with_fill(color.rgb888()))
        .draw(target)
}

fn draw_dots<D>(target: &mut D, dots: &[Dot], color: Argb, core: Argb) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    for dot in dots {
        fill_circle(target, dot.center, dot.radius, color)?;
        fill_circle(target, dot.center, dot.core_radius, core)?;
    }
    Ok(())
}

fn draw_stars<D>(target: &mut D, stars: &[Star], color: Argb) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    for star in stars {
        fill_circle(target, star.center, star.radius, color)?;
    }
    Ok(())
}

fn stroke_track<D>(target: &mut D, m: &Metrics, color: Argb) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    let inset = m.dp_fx(STROKE_INSET_DP);
    let rect = RectFx::new(
        inset,
        inset,
        fx_i32(m.width) - inset,
        fx_i32(m.height) - inset,
    );
    let radius = ((rect.bottom - rect.top) / fx_i32(2)).round().to_num::<i32>().max(0) as u32;
    let width = m.dp_fx(STROKE_WIDTH_DP).round().to_num::<i32>().max(1) as u32;
    let style = PrimitiveStyleBuilder::new()
        .stroke_color(color.rgb888())
        .stroke_width(width)
        .build();
    RoundedRectangle::with_equal_corners(rect.to_rect(), Size::new(radius, radius))
        .into_styled(style)
        .draw(target)
}
