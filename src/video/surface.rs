//! Owned pixel memory and its (re)allocation on resize.

use bytemuck::{Pod, Zeroable};
use log::{debug, warn};

use crate::error::PipelineError;
use crate::params::ReleaseOrder;

/// Bytes per pixel: blue, green, red and one unused high byte
pub const BYTES_PER_PIXEL: usize = 4;

/// One XRGB8888 pixel as it sits in memory (little-endian 0x00RRGGBB)
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Pixel {
    pub blue: u8,
    pub green: u8,
    pub red: u8,
    pub unused: u8,
}

impl Pixel {
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self {
            blue,
            green,
            red,
            unused: 0,
        }
    }

    /// Packed 0x00RRGGBB value
    pub fn to_xrgb(self) -> u32 {
        u32::from_le_bytes([self.blue, self.green, self.red, 0])
    }
}

/// Top-down 32-bit pixel buffer with an explicit row stride
#[derive(Debug, Default)]
pub struct FrameSurface {
    width: u32,
    height: u32,
    /// Bytes between the start of one row and the next
    pitch: usize,
    memory: Vec<Pixel>,
}

impl FrameSurface {
    /// Surface with no memory; rendering and presenting skip it
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pitch(&self) -> usize {
        self.pitch
    }

    /// True while the surface owns pixel memory
    pub fn is_live(&self) -> bool {
        !self.memory.is_empty()
    }

    /// Size of the pixel memory in bytes (`pitch * height`)
    pub fn byte_len(&self) -> usize {
        self.memory.len() * BYTES_PER_PIXEL
    }

    /// Raw pixel memory, row 0 first
    pub fn bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.memory)
    }

    fn stride(&self) -> usize {
        self.pitch / BYTES_PER_PIXEL
    }

    /// Visible pixels of row `y`; padding past `width` is excluded
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`. Use [`FrameSurface::pixel`] for checked access.
    pub fn row(&self, y: u32) -> &[Pixel] {
        let start = y as usize * self.stride();
        &self.memory[start..start + self.width as usize]
    }

    /// Mutable visible pixels of row `y`
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    pub fn row_mut(&mut self, y: u32) -> &mut [Pixel] {
        let start = y as usize * self.stride();
        let width = self.width as usize;
        &mut self.memory[start..start + width]
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Pixel> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.memory[y as usize * self.stride() + x as usize])
    }

    /// Write one pixel; out-of-bounds coordinates are ignored and return false
    pub fn set_pixel(&mut self, x: u32, y: u32, red: u8, green: u8, blue: u8) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let index = y as usize * self.stride() + x as usize;
        self.memory[index] = Pixel::rgb(red, green, blue);
        true
    }
}

/// Reallocates surface memory on resize and counts allocations
#[derive(Debug, Default)]
pub struct SurfaceAllocator {
    release_order: ReleaseOrder,
    allocations: u64,
    releases: u64,
}

impl SurfaceAllocator {
    pub fn new(release_order: ReleaseOrder) -> Self {
        Self {
            release_order,
            ..Self::default()
        }
    }

    pub fn allocations(&self) -> u64 {
        self.allocations
    }

    pub fn releases(&self) -> u64 {
        self.releases
    }

    /// Give the surface fresh zeroed memory for `width x height` pixels.
    ///
    /// Zero dimensions leave the surface untouched. On allocation failure the
    /// surface is empty under `BeforeAlloc` and unchanged under `AfterAlloc`.
    pub fn resize(
        &mut self,
        surface: &mut FrameSurface,
        width: u32,
        height: u32,
    ) -> Result<(), PipelineError> {
        if width == 0 || height == 0 {
            return Err(PipelineError::InvalidDimensions { width, height });
        }

        let pixel_count = (width as usize).checked_mul(height as usize);
        let byte_len = pixel_count.and_then(|count| count.checked_mul(BYTES_PER_PIXEL));

        if self.release_order == ReleaseOrder::BeforeAlloc {
            self.release(surface);
        }

        // A size past the address space fails like any other allocation
        let (Some(pixel_count), Some(byte_len)) = (pixel_count, byte_len) else {
            warn!("Surface of {}x{} pixels exceeds addressable memory", width, height);
            return Err(PipelineError::AllocationFailure {
                what: "frame surface",
                bytes: usize::MAX,
            });
        };
        let pitch = width as usize * BYTES_PER_PIXEL;

        let mut memory = Vec::new();
        if memory.try_reserve_exact(pixel_count).is_err() {
            warn!("Surface allocation of {} bytes failed", byte_len);
            return Err(PipelineError::AllocationFailure {
                what: "frame surface",
                bytes: byte_len,
            });
        }
        memory.resize(pixel_count, Pixel::default());

        if self.release_order == ReleaseOrder::AfterAlloc {
            self.release(surface);
        }

        surface.width = width;
        surface.height = height;
        surface.pitch = pitch;
        surface.memory = memory;
        self.allocations += 1;

        debug!(
            "Surface resized to {}x{} (pitch {}, {} bytes)",
            width, height, pitch, byte_len
        );
        Ok(())
    }

    /// Drop the surface's memory, if any
    pub fn release(&mut self, surface: &mut FrameSurface) {
        if surface.is_live() {
            *surface = FrameSurface::empty();
            self.releases += 1;
        }
    }
}
