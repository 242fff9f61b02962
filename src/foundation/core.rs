use crate::foundation::error::{PsfError, PsfResult};

/// Number of coefficients stored per spline cell (`4 * 4 * 4`).
pub const COEFFS_PER_CELL: usize = 64;

/// Cell counts of a coefficient tensor along x, y and z.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Dims3 {
    /// Cells along x.
    pub nx: usize,
    /// Cells along y.
    pub ny: usize,
    /// Cells along z.
    pub nz: usize,
}

impl Dims3 {
    /// Create validated dimensions; every axis must hold at least one cell.
    pub fn new(nx: usize, ny: usize, nz: usize) -> PsfResult<Self> {
        let dims = Self { nx, ny, nz };
        dims.check()?;
        Ok(dims)
    }

    /// Fail with [`PsfError::InvalidDimension`] if any axis is zero.
    ///
    /// Consumers re-run this on values that may have been built as struct literals.
    pub fn check(self) -> PsfResult<()> {
        let Self { nx, ny, nz } = self;
        if nx == 0 || ny == 0 || nz == 0 {
            return Err(PsfError::invalid_dimension(format!(
                "tensor dimensions must be >= 1, got ({nx}, {ny}, {nz})"
            )));
        }
        Ok(())
    }

    /// Total number of cells.
    pub fn cell_count(self) -> PsfResult<usize> {
        self.nx
            .checked_mul(self.ny)
            .and_then(|v| v.checked_mul(self.nz))
            .ok_or_else(|| PsfError::invalid_dimension("tensor cell count overflows usize"))
    }

    /// Total number of scalar coefficients (`cells * 64`).
    pub fn coeff_len(self) -> PsfResult<usize> {
        self.cell_count()?
            .checked_mul(COEFFS_PER_CELL)
            .ok_or_else(|| PsfError::invalid_dimension("tensor coefficient count overflows usize"))
    }

    /// Linear cell index in x-fastest order. Callers must pass in-range indices.
    pub(crate) fn cell_index(self, ix: usize, iy: usize, iz: usize) -> usize {
        ix + self.nx * (iy + self.ny * iz)
    }
}

/// ROI edge lengths in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct RoiSize {
    /// Pixels along x (row length).
    pub x: usize,
    /// Pixels along y (row count).
    pub y: usize,
}

impl RoiSize {
    /// Create a validated ROI size; both edges must be at least one pixel.
    pub fn new(x: usize, y: usize) -> PsfResult<Self> {
        let size = Self { x, y };
        size.check()?;
        Ok(size)
    }

    /// Fail with [`PsfError::InvalidDimension`] if either edge is zero.
    pub fn check(self) -> PsfResult<()> {
        if self.x == 0 || self.y == 0 {
            return Err(PsfError::invalid_dimension(format!(
                "roi size must be >= 1, got {}x{}",
                self.x, self.y
            )));
        }
        Ok(())
    }

    /// Fail unless the ROI is square. The evaluator currently only supports square ROIs.
    pub fn require_square(self) -> PsfResult<()> {
        if self.x != self.y {
            return Err(PsfError::invalid_argument(format!(
                "roi size must be square, got {}x{}",
                self.x, self.y
            )));
        }
        Ok(())
    }

    /// Pixels per ROI.
    pub fn pixel_count(self) -> usize {
        self.x * self.y
    }

    /// Values needed to hold `n` ROIs back to back.
    pub fn stack_len(self, n: usize) -> PsfResult<usize> {
        self.pixel_count()
            .checked_mul(n)
            .ok_or_else(|| PsfError::invalid_argument("roi stack size overflows usize"))
    }
}

/// Shape of the frame stack produced by a frame render.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct FrameCanvas {
    /// Frame width in pixels (row length).
    pub width: usize,
    /// Frame height in pixels (row count).
    pub height: usize,
    /// Number of frames in the stack.
    pub n_frames: usize,
}

impl FrameCanvas {
    /// Create a validated canvas. Width and height must be non-zero; `n_frames` may be zero.
    pub fn new(width: usize, height: usize, n_frames: usize) -> PsfResult<Self> {
        let canvas = Self {
            width,
            height,
            n_frames,
        };
        canvas.check()?;
        Ok(canvas)
    }

    /// Fail with [`PsfError::InvalidArgument`] for a zero side or a frame too large to address.
    pub fn check(self) -> PsfResult<()> {
        let Self { width, height, .. } = self;
        if width == 0 || height == 0 {
            return Err(PsfError::invalid_argument(format!(
                "frame size must be >= 1, got {width}x{height}"
            )));
        }
        if width.checked_mul(height).is_none() {
            return Err(PsfError::invalid_argument(format!(
                "frame size {width}x{height} overflows usize"
            )));
        }
        Ok(())
    }

    /// Pixels in a single frame. Only meaningful once [`FrameCanvas::check`] has passed.
    pub fn frame_len(self) -> usize {
        self.width * self.height
    }

    /// Pixels across the whole stack.
    pub fn pixel_count(self) -> PsfResult<usize> {
        self.width
            .checked_mul(self.height)
            .and_then(|v| v.checked_mul(self.n_frames))
            .ok_or_else(|| PsfError::invalid_argument("frame stack size overflows usize"))
    }

    /// Return `true` when `frame_index` addresses a frame of this stack.
    pub fn contains_frame(self, frame_index: i64) -> bool {
        frame_index >= 0 && (frame_index as u64) < self.n_frames as u64
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
