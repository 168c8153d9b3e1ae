//! Software framebuffer: allocation, procedural pattern and presentation.

mod pattern;
mod present;
mod record;
mod surface;

// Re-export public types
pub use pattern::{gradient_pixel, render_gradient};
pub use present::{blit_rects, present, BlitRects, PresentTarget, Rect, SoftwareTarget};
pub use record::FrameRecorder;
pub use surface::{FrameSurface, Pixel, SurfaceAllocator, BYTES_PER_PIXEL};
