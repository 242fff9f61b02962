use std::collections::BTreeMap;

use rayon::prelude::*;
use smallvec::SmallVec;

use crate::foundation::error::{PsfError, PsfResult};
use crate::model::emitter::{Emitter, FrameEmitter};
use crate::render::backend::{BackendKind, BackendOpts, RenderBackend};
use crate::render::frame::{Clip, FrameComposer, FrameStack, FrameStats};
use crate::render::roi::{RoiRenderer, RoiStack};

/// Chunks in flight per worker thread during frame composition. Bounds the ROI scratch memory
/// to `chunk_size * threads * WINDOW_CHUNKS_PER_THREAD` ROIs.
const WINDOW_CHUNKS_PER_THREAD: usize = 4;

/// Per-emitter parallel backend on a dedicated rayon pool.
///
/// ROIs are independent and rendered in chunks of `chunk_size` emitters. Frames are composed
/// partition-then-reduce: the ROIs of a window of emitters are rendered in parallel, then every
/// touched frame is reduced by exactly one worker, which adds that window's ROIs in emitter order.
/// No locks or atomics are involved, and each pixel sees the same addition order as
/// [`SequentialBackend`](crate::SequentialBackend).
#[derive(Debug)]
pub struct ParallelBackend {
    pool: rayon::ThreadPool,
    chunk_size: usize,
}

impl ParallelBackend {
    /// Build the worker pool described by `opts`.
    pub fn new(opts: &BackendOpts) -> PsfResult<Self> {
        let pool = build_thread_pool(opts.threads)?;
        let chunk_size = normalized_chunk_size(opts.chunk_size);
        tracing::debug!(
            threads = pool.current_num_threads(),
            chunk_size,
            "parallel backend ready"
        );
        Ok(Self { pool, chunk_size })
    }

    /// Worker threads in the pool.
    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Emitters per scheduled task.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    fn window_len(&self) -> usize {
        self.chunk_size
            .saturating_mul(self.threads())
            .saturating_mul(WINDOW_CHUNKS_PER_THREAD)
            .max(1)
    }
}

impl RenderBackend for ParallelBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Parallel
    }

    #[tracing::instrument(skip_all, fields(n = emitters.len(), threads = self.threads()))]
    fn render_rois(&self, roi: &RoiRenderer<'_>, emitters: &[Emitter]) -> PsfResult<RoiStack> {
        let px = roi.size().pixel_count();
        let mut data = vec![0.0f32; roi.size().stack_len(emitters.len())?];
        let chunk = self.chunk_size;

        self.pool.install(|| {
            data.par_chunks_mut(px.saturating_mul(chunk))
                .zip(emitters.par_chunks(chunk))
                .try_for_each(|(out, batch)| {
                    out.chunks_exact_mut(px)
                        .zip(batch)
                        .try_for_each(|(o, e)| roi.render_into(e, o))
                })
        })?;

        Ok(RoiStack {
            size: roi.size(),
            data,
        })
    }

    #[tracing::instrument(skip_all, fields(n = emitters.len(), threads = self.threads()))]
    fn render_frames(
        &self,
        composer: &FrameComposer<'_>,
        emitters: &[FrameEmitter],
    ) -> PsfResult<(FrameStack, FrameStats)> {
        composer.validate(emitters)?;

        let frame_len = composer.canvas().frame_len();
        let px = composer.roi().size().pixel_count();
        let chunk = self.chunk_size;
        let mut acc = composer.zeroed_accumulator()?;
        let mut stats = FrameStats::default();

        // Footprint classification is cheap; emitters entirely off-frame never reach a worker.
        let mut active = Vec::<(usize, Clip)>::with_capacity(emitters.len());
        for (i, e) in emitters.iter().enumerate() {
            let footprint = composer.footprint(e);
            stats.record(footprint);
            if let Some(clip) = footprint.clip() {
                active.push((i, clip));
            }
        }

        let window = self.window_len();
        let mut rois =
            vec![0.0f32; composer.roi().size().stack_len(window.min(active.len()))?];

        for batch in active.chunks(window) {
            let window_rois = &mut rois[..batch.len() * px];

            self.pool.install(|| {
                window_rois
                    .par_chunks_mut(px.saturating_mul(chunk))
                    .zip(batch.par_chunks(chunk))
                    .try_for_each(|(out, items)| {
                        out.chunks_exact_mut(px)
                            .zip(items)
                            .try_for_each(|(o, (i, _))| {
                                composer.roi().render_into(&emitters[*i].emitter, o)
                            })
                    })
            })?;

            // Validated above, so frame indices are non-negative and in range.
            let mut buckets = BTreeMap::<usize, SmallVec<[usize; 8]>>::new();
            for (slot, (i, _)) in batch.iter().enumerate() {
                buckets
                    .entry(emitters[*i].frame_index as usize)
                    .or_default()
                    .push(slot);
            }

            let window_rois = &*window_rois;
            let jobs = acc
                .chunks_mut(frame_len)
                .enumerate()
                .filter_map(|(f, frame)| buckets.get(&f).map(|slots| (frame, slots)))
                .collect::<Vec<_>>();

            let added: u64 = self.pool.install(|| {
                jobs.into_par_iter()
                    .map(|(frame, slots)| {
                        let mut n = 0u64;
                        for &slot in slots {
                            let roi = &window_rois[slot * px..(slot + 1) * px];
                            n += composer.accumulate(batch[slot].1, roi, frame);
                        }
                        n
                    })
                    .sum()
            });
            stats.pixels_accumulated += added;
        }

        tracing::debug!(?stats, "frames composed");
        Ok((composer.finish(acc), stats))
    }
}

fn build_thread_pool(threads: Option<usize>) -> PsfResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(PsfError::invalid_argument(
            "backend 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new().thread_name(|i| format!("splinepsf-{i}"));
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder.build().map_err(|e| {
        PsfError::Other(anyhow::Error::new(e).context("failed to build rayon thread pool"))
    })
}

fn normalized_chunk_size(chunk_size: usize) -> usize {
    chunk_size.max(1)
}

#[cfg(test)]
#[path = "../../tests/unit/render/parallel.rs"]
mod tests;
