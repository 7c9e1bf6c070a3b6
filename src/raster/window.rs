//! Pixel window structure for bounding a scan
//!
//! The coordinates are in cells and follow the image convention where
//! (0,0) is the top-left cell of the raster.

/// Rectangular block of cells, always inside the raster it was computed for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelWindow {
    /// Column of the top-left cell
    pub x: usize,

    /// Row of the top-left cell
    pub y: usize,

    /// Width of the window in cells
    pub width: usize,

    /// Height of the window in cells
    pub height: usize,
}

impl PixelWindow {
    /// Create a new window
    pub fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        PixelWindow { x, y, width, height }
    }

    /// Column immediately to the right of the window (exclusive)
    pub fn end_x(&self) -> usize {
        self.x + self.width
    }

    /// Row immediately below the window (exclusive)
    pub fn end_y(&self) -> usize {
        self.y + self.height
    }
}
