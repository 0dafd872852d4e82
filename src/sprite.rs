//! Cloud decoration bitmap.
//!
//! The art itself is a host-supplied resource; this crate only wraps the
//! resolved pixels. A bad dimension/len pairing is a configuration error and
//! is rejected at construction, before anything can draw.

use core::fmt;

use embedded_graphics::prelude::{DrawTarget, Pixel, Point};
use embedded_graphics::pixelcolor::Rgb888;

use crate::color::Argb;
use crate::geometry::RectFx;

const OPAQUE_THRESHOLD: u8 = 128;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpriteError {
    DimensionMismatch { expected: usize, actual: usize },
    EmptyBitmap,
}

impl fmt::Display for SpriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DimensionMismatch { expected, actual } => {
                write!(f, "cloud bitmap holds {actual} pixels, dimensions need {expected}")
            }
            Self::EmptyBitmap => write!(f, "cloud bitmap has zero extent"),
        }
    }
}

impl std::error::Error for SpriteError {}

/// Borrowed ARGB8888 cloud art (row-major, one `u32` per pixel).
#[derive(Clone, Copy, Debug)]
pub struct CloudArt<'a> {
    data: &'a [u32],
    width: u32,
    height: u32,
}

impl<'a> CloudArt<'a> {
    pub fn new(data: &'a [u32], width: u32, height: u32) -> Result<Self, SpriteError> {
        if width == 0 || height == 0 {
            return Err(SpriteError::EmptyBitmap);
        }
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(SpriteError::DimensionMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn pixel(&self, x: u32, y: u32) -> Argb {
        Argb::new(self.data[(y * self.width + x) as usize])
    }

    /// Nearest-neighbour blit of the whole bitmap into `dest`. Pixels below
    /// the opacity threshold are skipped so the track shows through.
    pub(crate) fn blit_scaled<D>(&self, target: &mut D, dest: RectFx) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb888>,
    {
        let dest = dest.to_rect();
        let (dw, dh) = (dest.size.width, dest.size.height);
        if dw == 0 || dh == 0 {
            return Ok(());
        }
        let pixels = (0..dh).flat_map(move |dy| {
            (0..dw).filter_map(move |dx| {
                let sx = dx * self.width / dw;
                let sy = dy * self.height / dh;
                let argb = self.pixel(sx, sy);
                if argb.alpha() < OPAQUE_THRESHOLD {
                    return None;
                }
                Some(Pixel(
                    Point::new(dest.top_left.x + dx as i32, dest.top_left.y + dy as i32),
                    argb.rgb888(),
                ))
            })
        });
        target.draw_iter(pixels)
    }
}
