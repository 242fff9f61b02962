use crate::foundation::error::PsfResult;
use crate::model::emitter::{Emitter, FrameEmitter};
use crate::render::backend::{BackendKind, RenderBackend};
use crate::render::frame::{FrameComposer, FrameStack, FrameStats};
use crate::render::roi::{RoiRenderer, RoiStack};

/// Reference backend: one emitter at a time on the calling thread.
#[derive(Clone, Copy, Debug, Default)]
pub struct SequentialBackend;

impl RenderBackend for SequentialBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Sequential
    }

    #[tracing::instrument(skip_all, fields(n = emitters.len()))]
    fn render_rois(&self, roi: &RoiRenderer<'_>, emitters: &[Emitter]) -> PsfResult<RoiStack> {
        let px = roi.size().pixel_count();
        let mut data = vec![0.0f32; roi.size().stack_len(emitters.len())?];
        for (out, e) in data.chunks_exact_mut(px).zip(emitters) {
            roi.render_into(e, out)?;
        }
        Ok(RoiStack {
            size: roi.size(),
            data,
        })
    }

    #[tracing::instrument(skip_all, fields(n = emitters.len()))]
    fn render_frames(
        &self,
        composer: &FrameComposer<'_>,
        emitters: &[FrameEmitter],
    ) -> PsfResult<(FrameStack, FrameStats)> {
        composer.validate(emitters)?;

        let frame_len = composer.canvas().frame_len();
        let mut acc = composer.zeroed_accumulator()?;
        let mut scratch = vec![0.0f32; composer.roi().size().pixel_count()];
        let mut stats = FrameStats::default();

        for e in emitters {
            let footprint = composer.footprint(e);
            stats.record(footprint);
            let Some(clip) = footprint.clip() else {
                continue;
            };
            composer.roi().render_into(&e.emitter, &mut scratch)?;
            // Validated above, so the index is non-negative and in range.
            let start = e.frame_index as usize * frame_len;
            stats.pixels_accumulated +=
                composer.accumulate(clip, &scratch, &mut acc[start..start + frame_len]);
        }

        tracing::debug!(?stats, "frames composed");
        Ok((composer.finish(acc), stats))
    }
}
