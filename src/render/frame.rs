use crate::foundation::core::FrameCanvas;
use crate::foundation::error::{PsfError, PsfResult};
use crate::model::emitter::FrameEmitter;
use crate::render::roi::RoiRenderer;

/// How an emitter's ROI footprint overlaps its destination frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Footprint {
    /// Every ROI pixel lands inside the frame.
    Inside(Clip),
    /// Some ROI pixels fall off the frame edge and are dropped.
    Clipped(Clip),
    /// No ROI pixel lands inside the frame.
    Outside,
}

impl Footprint {
    /// Overlap rectangle, unless the footprint is entirely outside.
    pub fn clip(self) -> Option<Clip> {
        match self {
            Footprint::Inside(c) | Footprint::Clipped(c) => Some(c),
            Footprint::Outside => None,
        }
    }
}

/// Overlap of an ROI with a frame, in both coordinate systems.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Clip {
    /// Overlap along x.
    pub x: Span,
    /// Overlap along y.
    pub y: Span,
}

/// One-axis overlap: `len` pixels starting at `roi_start` in the ROI and `frame_start` in the
/// frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Span {
    /// First overlapping ROI pixel.
    pub roi_start: usize,
    /// Frame pixel that receives `roi_start`.
    pub frame_start: usize,
    /// Overlapping pixel count, always > 0.
    pub len: usize,
}

fn clip_axis(anchor: i32, roi_len: usize, frame_len: usize) -> Option<Span> {
    let anchor = i64::from(anchor);
    let lo = (-anchor).max(0);
    let hi = (frame_len as i64 - anchor).min(roi_len as i64);
    if lo >= hi {
        return None;
    }
    Some(Span {
        roi_start: lo as usize,
        frame_start: (anchor + lo) as usize,
        len: (hi - lo) as usize,
    })
}

/// Counters collected while composing a frame stack.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameStats {
    /// Emitters in the request.
    pub emitters_total: u64,
    /// Emitters whose ROI landed completely inside their frame.
    pub emitters_inside: u64,
    /// Emitters that contributed only part of their ROI.
    pub emitters_clipped: u64,
    /// Emitters that contributed nothing.
    pub emitters_outside: u64,
    /// ROI pixels added into frames.
    pub pixels_accumulated: u64,
}

impl FrameStats {
    pub(crate) fn record(&mut self, footprint: Footprint) {
        self.emitters_total += 1;
        match footprint {
            Footprint::Inside(_) => self.emitters_inside += 1,
            Footprint::Clipped(_) => self.emitters_clipped += 1,
            Footprint::Outside => self.emitters_outside += 1,
        }
    }
}

/// Accumulates emitter ROIs into a stack of frames.
///
/// ROI pixel `(px, py)` of an emitter anchored at `(pixel_x, pixel_y)` is added to frame pixel
/// `(pixel_x + px, pixel_y + py)` of frame `frame_index`. Frames are row-major,
/// `frame[y * width + x]`. Sums are carried in `f64` and narrowed once at the end.
#[derive(Clone, Copy, Debug)]
pub struct FrameComposer<'a> {
    roi: RoiRenderer<'a>,
    canvas: FrameCanvas,
}

impl<'a> FrameComposer<'a> {
    /// Create a composer drawing with `roi` into `canvas`.
    pub fn new(roi: RoiRenderer<'a>, canvas: FrameCanvas) -> Self {
        Self { roi, canvas }
    }

    /// ROI renderer used for every emitter.
    pub fn roi(&self) -> &RoiRenderer<'a> {
        &self.roi
    }

    /// Destination stack shape.
    pub fn canvas(&self) -> FrameCanvas {
        self.canvas
    }

    /// Check the canvas and every emitter's frame index. Runs before any rendering.
    pub fn validate(&self, emitters: &[FrameEmitter]) -> PsfResult<()> {
        self.canvas.check()?;
        if let Some((i, e)) = emitters
            .iter()
            .enumerate()
            .find(|(_, e)| !self.canvas.contains_frame(i64::from(e.frame_index)))
        {
            return Err(PsfError::invalid_argument(format!(
                "emitter {i} targets frame {} but only {} frames were requested",
                e.frame_index, self.canvas.n_frames
            )));
        }
        Ok(())
    }

    /// Classify the overlap of `emitter`'s ROI with the frame.
    pub fn footprint(&self, emitter: &FrameEmitter) -> Footprint {
        let size = self.roi.size();
        let (Some(x), Some(y)) = (
            clip_axis(emitter.pixel_x, size.x, self.canvas.width),
            clip_axis(emitter.pixel_y, size.y, self.canvas.height),
        ) else {
            return Footprint::Outside;
        };
        let clip = Clip { x, y };
        if x.len == size.x && y.len == size.y {
            Footprint::Inside(clip)
        } else {
            Footprint::Clipped(clip)
        }
    }

    /// Zeroed `f64` accumulator for the whole stack.
    pub(crate) fn zeroed_accumulator(&self) -> PsfResult<Vec<f64>> {
        Ok(vec![0.0f64; self.canvas.pixel_count()?])
    }

    /// Add the overlapping part of `roi` into `frame` (one frame, not the whole stack).
    /// Returns the number of pixels added.
    pub(crate) fn accumulate(&self, clip: Clip, roi: &[f32], frame: &mut [f64]) -> u64 {
        let rx = self.roi.size().x;
        let width = self.canvas.width;
        for r in 0..clip.y.len {
            let src = (clip.y.roi_start + r) * rx + clip.x.roi_start;
            let dst = (clip.y.frame_start + r) * width + clip.x.frame_start;
            for (d, s) in frame[dst..dst + clip.x.len]
                .iter_mut()
                .zip(&roi[src..src + clip.x.len])
            {
                *d += f64::from(*s);
            }
        }
        (clip.x.len * clip.y.len) as u64
    }

    /// Narrow the accumulator into the output stack.
    pub(crate) fn finish(&self, acc: Vec<f64>) -> FrameStack {
        FrameStack {
            canvas: self.canvas,
            data: acc.into_iter().map(|v| v as f32).collect(),
        }
    }
}

/// Rendered frames, stored back to back.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameStack {
    /// Stack shape.
    pub canvas: FrameCanvas,
    /// `n_frames * width * height` values, frame after frame, each row-major.
    pub data: Vec<f32>,
}

impl FrameStack {
    /// Pixels of frame `i`.
    pub fn frame(&self, i: usize) -> Option<&[f32]> {
        self.data.chunks_exact(self.canvas.frame_len()).nth(i)
    }

    /// Pixel `(x, y)` of frame `i`.
    pub fn get(&self, i: usize, x: usize, y: usize) -> Option<f32> {
        if x >= self.canvas.width || y >= self.canvas.height {
            return None;
        }
        self.frame(i).map(|f| f[y * self.canvas.width + x])
    }

    /// Sum over all pixels of frame `i`, in `f64`.
    pub fn frame_sum(&self, i: usize) -> Option<f64> {
        self.frame(i)
            .map(|f| f.iter().map(|v| f64::from(*v)).sum())
    }

    /// Flat buffer of `n_frames * width * height` values.
    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
