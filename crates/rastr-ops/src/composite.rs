//! Layer blending.
//!
//! Separable blend modes combined with source-over compositing on
//! non-premultiplied 8-bit RGBA:
//!
//! ```text
//! as  = src.a * opacity
//! Cs' = (1 - ab) * Cs + ab * B(Cb, Cs)
//! ao  = as + ab * (1 - as)
//! Co  = (as * Cs' + ab * Cb * (1 - as)) / ao
//! ```
//!
//! With [`BlendMode::Normal`], `B(Cb, Cs) = Cs` and this is plain source-over.
//!
//! # Example
//!
//! ```rust
//! use rastr_ops::composite::{BlendMode, blend_pixel};
//!
//! let bg = [0, 0, 255, 255];
//! let fg = [255, 0, 0, 255];
//! assert_eq!(blend_pixel(bg, fg, BlendMode::Normal, 1.0), [255, 0, 0, 255]);
//! assert_eq!(blend_pixel(bg, fg, BlendMode::Multiply, 1.0), [0, 0, 0, 255]);
//! ```

pub use rastr_core::BlendMode;
use rastr_core::RgbaImage;
use tracing::trace;

use crate::parallel::for_each_row;

/// `Cb * Cs`
#[inline]
pub fn multiply(cb: f32, cs: f32) -> f32 {
    cb * cs
}

/// `Cb + Cs - Cb * Cs`
#[inline]
pub fn screen(cb: f32, cs: f32) -> f32 {
    cb + cs - cb * cs
}

/// Hard light with the layers swapped: the backdrop picks multiply or screen.
#[inline]
pub fn overlay(cb: f32, cs: f32) -> f32 {
    if cb <= 0.5 {
        2.0 * cs * cb
    } else {
        1.0 - 2.0 * (1.0 - cs) * (1.0 - cb)
    }
}

/// Blend function `B(Cb, Cs)` for a mode, on normalized channels.
#[inline]
pub fn blend_channel(mode: BlendMode, cb: f32, cs: f32) -> f32 {
    match mode {
        BlendMode::Normal => cs,
        BlendMode::Multiply => multiply(cb, cs),
        BlendMode::Screen => screen(cb, cs),
        BlendMode::Overlay => overlay(cb, cs),
    }
}

#[inline]
fn to_unit(v: u8) -> f32 {
    v as f32 / 255.0
}

#[inline]
fn to_byte(v: f32) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Composites one source pixel over a backdrop pixel.
///
/// `opacity` multiplies the source alpha and is clamped to [0, 1].
pub fn blend_pixel(dst: [u8; 4], src: [u8; 4], mode: BlendMode, opacity: f32) -> [u8; 4] {
    let opacity = if opacity.is_nan() { 1.0 } else { opacity.clamp(0.0, 1.0) };
    let a_s = to_unit(src[3]) * opacity;
    if a_s <= 0.0 {
        return dst;
    }
    if mode == BlendMode::Normal && src[3] == 255 && opacity >= 1.0 {
        return src;
    }

    let a_b = to_unit(dst[3]);
    let a_o = a_s + a_b * (1.0 - a_s);
    let mut out = [0u8; 4];
    for c in 0..3 {
        let cb = to_unit(dst[c]);
        let cs = to_unit(src[c]);
        let mixed = (1.0 - a_b) * cs + a_b * blend_channel(mode, cb, cs);
        out[c] = to_byte((a_s * mixed + a_b * cb * (1.0 - a_s)) / a_o);
    }
    out[3] = to_byte(a_o);
    out
}

/// Draws `src` onto `canvas` with its top-left corner at (`dx`, `dy`).
///
/// Parts of `src` outside the canvas are clipped; offsets may be negative.
pub fn draw_image(canvas: &mut RgbaImage, src: &RgbaImage, dx: i64, dy: i64, mode: BlendMode, opacity: f32) {
    let (cw, ch) = (canvas.width() as i64, canvas.height() as i64);
    let (sw, sh) = (src.width() as i64, src.height() as i64);

    let x0 = dx.max(0);
    let x1 = (dx + sw).min(cw);
    let y0 = dy.max(0);
    let y1 = (dy + sh).min(ch);
    if x0 >= x1 || y0 >= y1 {
        trace!(dx, dy, sw, sh, cw, ch, "draw_image: fully clipped");
        return;
    }
    trace!(dx, dy, sw, sh, %mode, opacity, "draw_image");

    let src_data = src.as_bytes();
    for_each_row(canvas.as_bytes_mut(), cw as usize * 4, |y, row| {
        let y = y as i64;
        if y < y0 || y >= y1 {
            return;
        }
        let src_row = ((y - dy) * sw) as usize;
        for x in x0..x1 {
            let si = (src_row + (x - dx) as usize) * 4;
            let di = x as usize * 4;
            let s = [src_data[si], src_data[si + 1], src_data[si + 2], src_data[si + 3]];
            let d = [row[di], row[di + 1], row[di + 2], row[di + 3]];
            row[di..di + 4].copy_from_slice(&blend_pixel(d, s, mode, opacity));
        }
    });
}
