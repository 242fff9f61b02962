use crate::foundation::core::RoiSize;
use crate::foundation::error::{PsfError, PsfResult};
use crate::model::emitter::Emitter;
use crate::spline::eval::SplineEvaluator;

/// Renders one emitter into a fixed-size patch.
///
/// Pixel `(px, py)` samples the spline at
/// `(x - rx/2 + px + 0.5, y - ry/2 + py + 0.5, z)` and is scaled by the photon count. Output
/// is row-major with `py` as the row: `roi[py * rx + px]`.
#[derive(Clone, Copy, Debug)]
pub struct RoiRenderer<'a> {
    spline: SplineEvaluator<'a>,
    size: RoiSize,
}

impl<'a> RoiRenderer<'a> {
    /// Fails with [`PsfError::InvalidDimension`] for an empty ROI and
    /// [`PsfError::InvalidArgument`] for a non-square one.
    pub fn new(spline: SplineEvaluator<'a>, size: RoiSize) -> PsfResult<Self> {
        size.check()?;
        size.require_square()?;
        Ok(Self { spline, size })
    }

    /// ROI edge lengths.
    pub fn size(&self) -> RoiSize {
        self.size
    }

    /// The evaluator used for sampling.
    pub fn spline(&self) -> SplineEvaluator<'a> {
        self.spline
    }

    /// Render `emitter` into `out`, overwriting it. `out` must hold exactly one ROI.
    pub fn render_into(&self, emitter: &Emitter, out: &mut [f32]) -> PsfResult<()> {
        if out.len() != self.size.pixel_count() {
            return Err(PsfError::invalid_argument(format!(
                "roi buffer has {} pixels, expected {}",
                out.len(),
                self.size.pixel_count()
            )));
        }

        let x0 = emitter.x - self.size.x as f32 / 2.0 + 0.5;
        let y0 = emitter.y - self.size.y as f32 / 2.0 + 0.5;
        for (py, row) in out.chunks_exact_mut(self.size.x).enumerate() {
            let yc = y0 + py as f32;
            for (px, v) in row.iter_mut().enumerate() {
                *v = emitter.phot * self.spline.evaluate(x0 + px as f32, yc, emitter.z)?;
            }
        }
        Ok(())
    }

    /// Render `emitter` into a freshly allocated ROI.
    pub fn render(&self, emitter: &Emitter) -> PsfResult<Vec<f32>> {
        let mut out = vec![0.0f32; self.size.pixel_count()];
        self.render_into(emitter, &mut out)?;
        Ok(out)
    }
}

/// One rendered ROI per emitter, stored back to back.
#[derive(Clone, Debug, PartialEq)]
pub struct RoiStack {
    /// Edge lengths shared by every ROI.
    pub size: RoiSize,
    /// `len() * size.x * size.y` values, ROI after ROI.
    pub data: Vec<f32>,
}

impl RoiStack {
    /// Number of ROIs.
    pub fn len(&self) -> usize {
        self.data.len() / self.size.pixel_count()
    }

    /// Return `true` when the stack holds no ROI.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Pixels of ROI `i`.
    pub fn roi(&self, i: usize) -> Option<&[f32]> {
        self.data.chunks_exact(self.size.pixel_count()).nth(i)
    }

    /// Pixel `(px, py)` of ROI `i`.
    pub fn get(&self, i: usize, px: usize, py: usize) -> Option<f32> {
        if px >= self.size.x || py >= self.size.y {
            return None;
        }
        self.roi(i).map(|roi| roi[py * self.size.x + px])
    }

    /// Iterate over ROIs in emitter order.
    pub fn iter(&self) -> std::slice::ChunksExact<'_, f32> {
        self.data.chunks_exact(self.size.pixel_count())
    }

    /// Flat buffer of `n * rx * ry` values.
    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/roi.rs"]
mod tests;
