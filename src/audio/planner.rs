//! Writable-region planning for a circular buffer chased by a play cursor.
//!
//! Pure arithmetic: no device access, so every case is testable offline.

use std::cmp::Ordering;

use super::ring::Region;

/// Regions to fill this tick, in write order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WritePlan {
    /// Write cursor already sits on the play cursor; nothing to write
    Idle,

    /// One span that does not cross the end of the buffer
    Contiguous(Region),

    /// Tail of the buffer first, then the head up to the play cursor
    Wrapped(Region, Region),
}

impl WritePlan {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Regions in the order they must be filled
    pub fn regions(&self) -> impl Iterator<Item = Region> {
        let (first, second) = match *self {
            Self::Idle => (None, None),
            Self::Contiguous(region) => (Some(region), None),
            Self::Wrapped(tail, head) => (Some(tail), Some(head)),
        };
        first.into_iter().chain(second)
    }

    pub fn total_bytes(&self) -> usize {
        self.regions().map(|region| region.size).sum()
    }
}

/// Plan the bytes between `lock_offset` and the consumer's `play_cursor`.
///
/// The play cursor is reduced modulo `capacity` and aligned down to a frame
/// boundary, so every planned region is a whole number of frames. Equal
/// cursors mean the consumer has not advanced and nothing is written.
pub fn plan_write(
    lock_offset: usize,
    play_cursor: usize,
    capacity: usize,
    bytes_per_frame: usize,
) -> WritePlan {
    if capacity == 0 || bytes_per_frame == 0 {
        return WritePlan::Idle;
    }
    let align = |offset: usize| {
        let offset = offset % capacity;
        offset - offset % bytes_per_frame
    };
    let lock = align(lock_offset);
    let play = align(play_cursor);

    match lock.cmp(&play) {
        Ordering::Equal => WritePlan::Idle,
        Ordering::Less => WritePlan::Contiguous(Region::new(lock, play - lock)),
        Ordering::Greater => {
            let tail = Region::new(lock, capacity - lock);
            if play == 0 {
                WritePlan::Contiguous(tail)
            } else {
                WritePlan::Wrapped(tail, Region::new(0, play))
            }
        }
    }
}
