//! Property-based invariant tests for the frame surface and pattern.
//!
//! Verifies:
//! 1. A resized surface has pitch `width * 4` and `pitch * height` bytes.
//! 2. Fresh memory is zeroed.
//! 3. Rendering is a pure function of (x, y, phase).
//! 4. Invalid dimensions never disturb a live surface.
//! 5. Presentation stretches the whole surface over the whole target.

use blitwave::params::ReleaseOrder;
use blitwave::video::{
    blit_rects, gradient_pixel, render_gradient, FrameSurface, Rect, SurfaceAllocator,
};
use proptest::prelude::*;

fn live_surface(width: u32, height: u32) -> FrameSurface {
    let mut surface = FrameSurface::empty();
    SurfaceAllocator::default()
        .resize(&mut surface, width, height)
        .unwrap();
    surface
}

proptest! {
    #[test]
    fn resize_sets_pitch_and_length(width in 1u32..=256, height in 1u32..=256) {
        let surface = live_surface(width, height);
        prop_assert_eq!(surface.pitch(), width as usize * 4);
        prop_assert_eq!(surface.byte_len(), surface.pitch() * height as usize);
        prop_assert_eq!(surface.bytes().len(), surface.byte_len());
        prop_assert!(surface.bytes().iter().all(|&b| b == 0));
    }
}

proptest! {
    #[test]
    fn render_is_deterministic(
        width in 1u32..=64,
        height in 1u32..=64,
        phase_x in any::<i32>(),
        phase_y in any::<i32>(),
    ) {
        let mut first = live_surface(width, height);
        let mut second = live_surface(width, height);
        render_gradient(&mut first, phase_x, phase_y);
        render_gradient(&mut second, 7, 7);
        render_gradient(&mut second, phase_x, phase_y);
        prop_assert_eq!(first.bytes(), second.bytes());

        let (x, y) = (width - 1, height - 1);
        prop_assert_eq!(first.pixel(x, y), Some(gradient_pixel(x, y, phase_x, phase_y)));
    }
}

proptest! {
    #[test]
    fn invalid_resize_keeps_surface(
        width in 1u32..=64,
        height in 1u32..=64,
        zero_width in any::<bool>(),
        allocate_first in any::<bool>(),
    ) {
        let order = if allocate_first {
            ReleaseOrder::AfterAlloc
        } else {
            ReleaseOrder::BeforeAlloc
        };
        let mut allocator = SurfaceAllocator::new(order);
        let mut surface = FrameSurface::empty();
        allocator.resize(&mut surface, width, height).unwrap();
        render_gradient(&mut surface, 3, 5);
        let before = surface.bytes().to_vec();

        let (w, h) = if zero_width { (0, height) } else { (width, 0) };
        prop_assert!(allocator.resize(&mut surface, w, h).is_err());
        prop_assert_eq!(surface.bytes(), &before[..]);
        prop_assert_eq!(allocator.allocations(), 1);
    }
}

proptest! {
    #[test]
    fn blit_covers_whole_target(
        width in 1u32..=512,
        height in 1u32..=512,
        dest_width in 0u32..=2048,
        dest_height in 0u32..=2048,
    ) {
        let surface = live_surface(width, height);
        match blit_rects(&surface, dest_width, dest_height) {
            Some(rects) => {
                prop_assert_eq!(rects.src, Rect::sized(width, height));
                prop_assert_eq!(rects.dst, Rect::sized(dest_width, dest_height));
            }
            None => prop_assert!(dest_width == 0 || dest_height == 0),
        }
    }
}
