//! Procedural gradient pattern.

use super::surface::{FrameSurface, Pixel};

/// Pattern value for one pixel: blue follows the column, green the row, red is 0
#[inline]
pub fn gradient_pixel(x: u32, y: u32, phase_x: i32, phase_y: i32) -> Pixel {
    // Truncating to u8 is the mod-256 wrap, negative phases included
    let blue = x.wrapping_add(phase_x as u32) as u8;
    let green = y.wrapping_add(phase_y as u32) as u8;
    Pixel::rgb(0, green, blue)
}

/// Fill every visible pixel of the surface with the gradient at the given phase.
///
/// Writes stay inside each row's `width` pixels, so any pitch padding is left
/// as it was. A surface without memory is left alone.
pub fn render_gradient(surface: &mut FrameSurface, phase_x: i32, phase_y: i32) {
    for y in 0..surface.height() {
        for (x, pixel) in surface.row_mut(y).iter_mut().enumerate() {
            *pixel = gradient_pixel(x as u32, y, phase_x, phase_y);
        }
    }
}
