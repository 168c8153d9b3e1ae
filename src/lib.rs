//! Blitwave library - software framebuffer and streaming tone generator

pub mod audio;
pub mod cli;
pub mod error;
pub mod params;
pub mod pipeline;
pub mod video;
