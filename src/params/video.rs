//! Frame surface parameters.

/// When the previous pixel allocation is released during a resize
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReleaseOrder {
    /// Free first: lower peak memory, surface is empty if allocation fails
    #[default]
    BeforeAlloc,

    /// Free after the new block is reserved: previous surface survives a failure
    AfterAlloc,
}

/// Frame surface configuration
#[derive(Debug, Clone)]
pub struct SurfaceConfig {
    /// Surface width requested before the first tick (pixels)
    pub initial_width: u32,

    /// Surface height requested before the first tick (pixels)
    pub initial_height: u32,

    /// Horizontal pattern phase added every tick (pixels)
    pub phase_step_x: i32,

    /// Vertical pattern phase added every tick (pixels)
    pub phase_step_y: i32,

    /// Allocation ordering used on resize
    pub release_order: ReleaseOrder,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            initial_width: 1280,
            initial_height: 720,
            phase_step_x: 1,
            phase_step_y: 2,
            release_order: ReleaseOrder::BeforeAlloc,
        }
    }
}
