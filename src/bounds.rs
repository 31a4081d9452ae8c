//! Sun disk geometry
//!
//! All positions are signed so that bounds falling off either end of the
//! strip can be detected before anything is written.

/// Span of the sun disk on the strip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiskBounds {
    /// First pixel of the disk
    pub start: i32,
    /// Disk width in pixels, always even
    pub width: i32,
}

impl DiskBounds {
    /// Disk of `width` pixels centered on a strip of `len` pixels
    ///
    /// Odd widths are rounded down to the next even number.
    pub const fn centered(len: i32, width: i32) -> Self {
        let width = if width % 2 != 0 { width - 1 } else { width };
        Self {
            start: len / 2 - width / 2,
            width,
        }
    }

    /// One past the last pixel of the disk
    pub const fn end(self) -> i32 {
        self.start + self.width
    }

    /// Soft edge pixel left of the disk
    pub const fn left_edge(self) -> i32 {
        self.start - 1
    }

    /// Soft edge pixel right of the disk
    pub const fn right_edge(self) -> i32 {
        self.end()
    }

    /// Whether the disk itself lies on a strip of `len` pixels
    pub const fn fits(self, len: i32) -> bool {
        self.start >= 0 && self.end() <= len
    }

    /// Whether both edge pixels lie on a strip of `len` pixels
    pub const fn edges_fit(self, len: i32) -> bool {
        self.left_edge() >= 0 && self.right_edge() < len
    }

    /// Whether pixel `i` belongs to the disk
    pub const fn contains(self, i: i32) -> bool {
        i >= self.start && i < self.end()
    }
}

/// Convert a signed pixel position to a slice index on a strip of `len`
pub const fn pixel_index(position: i32, len: usize) -> Option<usize> {
    if position < 0 {
        return None;
    }
    #[allow(clippy::cast_sign_loss)]
    let index = position as usize;
    if index < len { Some(index) } else { None }
}
