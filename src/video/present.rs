//! Full-surface stretch copy into a host display area.
//!
//! The core only decides the source and destination rectangles; how pixels
//! are filtered while scaling belongs to the `PresentTarget`.

use std::path::Path;

use log::debug;

use super::surface::{FrameSurface, Pixel};
use crate::error::OutputError;

/// Axis-aligned rectangle in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn sized(width: u32, height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Source and destination of one present call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlitRects {
    pub src: Rect,
    pub dst: Rect,
}

/// Rectangles for stretching the whole surface over a `dest_width x dest_height` area.
///
/// `None` when either side is empty, in which case presenting is a no-op.
pub fn blit_rects(
    surface: &FrameSurface,
    dest_width: u32,
    dest_height: u32,
) -> Option<BlitRects> {
    let src = Rect::sized(surface.width(), surface.height());
    let dst = Rect::sized(dest_width, dest_height);
    if !surface.is_live() || src.is_empty() || dst.is_empty() {
        return None;
    }
    Some(BlitRects { src, dst })
}

/// Host display surface that receives presented frames
pub trait PresentTarget {
    /// Current destination size in pixels
    fn size(&self) -> (u32, u32);

    /// Copy `rects.src` of `surface` onto `rects.dst`, scaling as needed
    fn stretch_blit(&mut self, surface: &FrameSurface, rects: BlitRects);
}

/// Present the surface onto the target's full area; returns the rectangles used
pub fn present(surface: &FrameSurface, target: &mut dyn PresentTarget) -> Option<BlitRects> {
    let (dest_width, dest_height) = target.size();
    let rects = blit_rects(surface, dest_width, dest_height)?;
    target.stretch_blit(surface, rects);
    Some(rects)
}

/// In-memory display with nearest-neighbour scaling
#[derive(Debug, Default)]
pub struct SoftwareTarget {
    width: u32,
    height: u32,
    pixels: Vec<Pixel>,
    presents: u64,
}

impl SoftwareTarget {
    pub fn new(width: u32, height: u32) -> Self {
        let mut target = Self::default();
        target.resize(width, height);
        target
    }

    /// Follow a host window resize; contents are cleared
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.pixels = vec![Pixel::default(); width as usize * height as usize];
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Pixel> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y as usize * self.width as usize + x as usize])
    }

    /// Number of frames presented so far
    pub fn presents(&self) -> u64 {
        self.presents
    }

    /// Contents as tightly packed RGBA8 bytes (alpha forced opaque)
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|p| [p.red, p.green, p.blue, 255])
            .collect()
    }

    /// Save contents as a PNG image
    pub fn save_png(&self, path: &Path) -> Result<(), OutputError> {
        image::save_buffer(
            path,
            &self.to_rgba8(),
            self.width,
            self.height,
            image::ColorType::Rgba8,
        )?;
        Ok(())
    }
}

/// Map a destination offset onto a source span of `src_len` pixels
fn scale(offset: u32, src_len: u32, dst_len: u32) -> u32 {
    (offset as u64 * src_len as u64 / dst_len as u64) as u32
}

impl PresentTarget for SoftwareTarget {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn stretch_blit(&mut self, surface: &FrameSurface, rects: BlitRects) {
        let BlitRects { src, dst } = rects;
        let src_fits = src.x.checked_add(src.width).is_some_and(|end| end <= surface.width())
            && src.y.checked_add(src.height).is_some_and(|end| end <= surface.height());
        if !surface.is_live() || src.is_empty() || dst.is_empty() || !src_fits {
            debug!(
                "Ignored blit of {:?} from a {}x{} surface",
                rects,
                surface.width(),
                surface.height()
            );
            return;
        }
        let x_end = dst.x.saturating_add(dst.width).min(self.width);
        let y_end = dst.y.saturating_add(dst.height).min(self.height);

        for dy in dst.y..y_end {
            // Nearest source row, rounding toward the top-left
            let sy = scale(dy - dst.y, src.height, dst.height) + src.y;
            let src_row = surface.row(sy);
            let dst_row = dy as usize * self.width as usize;
            for dx in dst.x..x_end {
                let sx = scale(dx - dst.x, src.width, dst.width) + src.x;
                self.pixels[dst_row + dx as usize] = src_row[sx as usize];
            }
        }

        self.presents += 1;
        debug!(
            "Presented {}x{} -> {}x{}",
            src.width, src.height, dst.width, dst.height
        );
    }
}
