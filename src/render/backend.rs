use crate::foundation::error::PsfResult;
use crate::model::emitter::{Emitter, FrameEmitter};
use crate::render::frame::{FrameComposer, FrameStack, FrameStats};
use crate::render::roi::{RoiRenderer, RoiStack};

/// Distributes an emitter batch over compute.
///
/// Implementations must produce the same numbers: ROIs are bit-identical across backends and
/// frames agree up to floating-point accumulation order. A failing call returns no output.
pub trait RenderBackend: Send + Sync {
    /// Which strategy this is.
    fn kind(&self) -> BackendKind;

    /// Render one ROI per emitter, in emitter order.
    fn render_rois(&self, roi: &RoiRenderer<'_>, emitters: &[Emitter]) -> PsfResult<RoiStack>;

    /// Render every emitter into its frame and return the finished stack.
    fn render_frames(
        &self,
        composer: &FrameComposer<'_>,
        emitters: &[FrameEmitter],
    ) -> PsfResult<(FrameStack, FrameStats)>;
}

/// Available backend kinds.
///
/// - `Sequential` renders one emitter after another and is the reference.
/// - `Parallel` spreads emitters over a dedicated rayon pool.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Single-threaded reference backend.
    #[default]
    Sequential,
    /// Per-emitter parallel backend.
    Parallel,
}

/// Backend tuning. Ignored by [`BackendKind::Sequential`].
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BackendOpts {
    /// Worker thread count. `None` uses rayon defaults; `Some(0)` is rejected.
    pub threads: Option<usize>,
    /// Emitters handled per scheduled task. `0` is treated as `1`.
    pub chunk_size: usize,
}

impl Default for BackendOpts {
    fn default() -> Self {
        Self {
            threads: None,
            chunk_size: 64,
        }
    }
}

/// Create a rendering backend implementation.
pub fn create_backend(kind: BackendKind, opts: &BackendOpts) -> PsfResult<Box<dyn RenderBackend>> {
    match kind {
        BackendKind::Sequential => Ok(Box::new(crate::render::sequential::SequentialBackend)),
        BackendKind::Parallel => Ok(Box::new(crate::render::parallel::ParallelBackend::new(
            opts,
        )?)),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/backend.rs"]
mod tests;
