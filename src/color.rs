
//! Conversion between interleaved RGB bytes and the three working planes.
//!
//! Uses the full-range BT.601 coefficients, with the chroma zero point at 128.
//! This is the boundary where samples become bytes: planes are rounded to
//! whole byte values on the way in, and clamped and truncated on the way out.
//! The lossy round trip itself never clamps.

use crate::channel::Channel;
use crate::math::Vec2;
use crate::error::{Error, Result};


/// Coefficients of the forward transform, RGB to Y'CbCr.
mod forward {
    pub const Y_R: f32 = 0.299;
    pub const Y_G: f32 = 0.587;
    pub const Y_B: f32 = 0.114;

    pub const CB_R: f32 = -0.168_736;
    pub const CB_G: f32 = -0.331_264;
    pub const CB_B: f32 = 0.5;

    pub const CR_R: f32 = 0.5;
    pub const CR_G: f32 = -0.418_688;
    pub const CR_B: f32 = -0.081_312;
}

/// Coefficients of the inverse transform, Y'CbCr to RGB.
mod inverse {
    pub const R_CR: f32 = 1.402;
    pub const G_CB: f32 = -0.344_136;
    pub const G_CR: f32 = -0.714_136;
    pub const B_CB: f32 = 1.772;
}

/// The chroma value of gray pixels.
pub const CHROMA_OFFSET: f32 = 128.0;


/// Convert R'G'B' to Y'CbCr. All values are in `0 ..= 255`.
#[inline]
pub fn rgb_to_ycbcr(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let y = forward::Y_R * r + forward::Y_G * g + forward::Y_B * b;
    let cb = CHROMA_OFFSET + forward::CB_R * r + forward::CB_G * g + forward::CB_B * b;
    let cr = CHROMA_OFFSET + forward::CR_R * r + forward::CR_G * g + forward::CR_B * b;
    (y, cb, cr)
}

/// Convert Y'CbCr to R'G'B'. The result is not clamped.
#[inline]
pub fn ycbcr_to_rgb(y: f32, cb: f32, cr: f32) -> (f32, f32, f32) {
    let cb = cb - CHROMA_OFFSET;
    let cr = cr - CHROMA_OFFSET;

    let r = y + inverse::R_CR * cr;
    let g = y + inverse::G_CB * cb + inverse::G_CR * cr;
    let b = y + inverse::B_CB * cb;
    (r, g, b)
}

/// Clamp to the byte range, then drop the fractional part.
/// Not-a-number becomes zero.
#[inline]
pub fn clamp_to_byte(value: f32) -> u8 {
    // `as` truncates toward zero and maps NaN to zero
    value.clamp(0.0, 255.0) as u8
}

/// Round to the nearest integer, halves up, and clamp to the byte range.
/// Used for the planes converted from RGB, which hold whole byte values.
#[inline]
pub fn round_to_byte(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}


/// The three working planes of an image. All planes have the same size.
#[derive(Debug, Clone, PartialEq)]
pub struct YCbCrPlanes {

    /// The luma plane.
    pub y: Channel,

    /// The blue-difference chroma plane.
    pub cb: Channel,

    /// The red-difference chroma plane.
    pub cr: Channel,
}

impl YCbCrPlanes {

    /// Returns a shape error if the planes differ in size.
    pub fn new(y: Channel, cb: Channel, cr: Channel) -> Result<Self> {
        if y.size() != cb.size() || y.size() != cr.size() {
            return Err(Error::shape("all planes of an image must have the same size"));
        }

        Ok(YCbCrPlanes { y, cb, cr })
    }

    /// The width and height shared by all planes.
    pub fn size(&self) -> Vec2<usize> { self.y.size() }

    /// Split interleaved 8-bit RGB pixels, row after row, into the three planes.
    /// Every plane sample is rounded to a whole byte value.
    /// Returns a shape error if the byte count does not match the size.
    pub fn from_rgb(size: Vec2<usize>, rgb: &[u8]) -> Result<Self> {
        if rgb.len() != size.area() * 3 {
            return Err(Error::shape(format!(
                "image of size {}x{} requires {} rgb bytes, but has {}",
                size.width(), size.height(), size.area() * 3, rgb.len()
            )));
        }

        let pixel_count = size.area();
        let mut y = Vec::with_capacity(pixel_count);
        let mut cb = Vec::with_capacity(pixel_count);
        let mut cr = Vec::with_capacity(pixel_count);

        for pixel in rgb.chunks_exact(3) {
            let (luma, blue, red) = rgb_to_ycbcr(
                f32::from(pixel[0]), f32::from(pixel[1]), f32::from(pixel[2])
            );

            y.push(f32::from(round_to_byte(luma)));
            cb.push(f32::from(round_to_byte(blue)));
            cr.push(f32::from(round_to_byte(red)));
        }

        Ok(YCbCrPlanes {
            y: Channel::new(size, y)?,
            cb: Channel::new(size, cb)?,
            cr: Channel::new(size, cr)?,
        })
    }

    /// Recombine the planes into interleaved 8-bit RGB pixels,
    /// clamping and truncating each sample.
    pub fn to_rgb(&self) -> Vec<u8> {
        let mut rgb = Vec::with_capacity(self.size().area() * 3);

        let planes = self.y.samples().iter().zip(self.cb.samples()).zip(self.cr.samples());
        for ((&y, &cb), &cr) in planes {
            let (r, g, b) = ycbcr_to_rgb(y, cb, cr);
            rgb.extend_from_slice(&[clamp_to_byte(r), clamp_to_byte(g), clamp_to_byte(b)]);
        }

        rgb
    }
}
