use crate::foundation::core::{Dims3, FrameCanvas, RoiSize};
use crate::foundation::error::PsfResult;
use crate::model::emitter::{Emitter, EmitterColumns, FrameEmitter, FrameEmitterColumns};
use crate::render::backend::{BackendKind, BackendOpts, RenderBackend, create_backend};
use crate::render::frame::{FrameComposer, FrameStack, FrameStats};
use crate::render::roi::{RoiRenderer, RoiStack};
use crate::spline::eval::{EdgePolicy, SplineEvaluator};
use crate::spline::tensor::CoefficientTensor;

/// Options for [`PsfModel::with_opts`].
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PsfModelOpts {
    /// Execution strategy.
    pub backend: BackendKind,
    /// Thread and chunking controls for the parallel backend.
    pub backend_opts: BackendOpts,
    /// Evaluation outside the calibrated volume.
    pub edge: EdgePolicy,
}

/// A calibrated spline PSF bound to an ROI size and an execution backend.
///
/// The model owns its coefficients; render calls borrow them read-only and return fully
/// materialized buffers.
pub struct PsfModel {
    tensor: CoefficientTensor,
    roi_size: RoiSize,
    edge: EdgePolicy,
    backend: Box<dyn RenderBackend>,
}

impl std::fmt::Debug for PsfModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PsfModel")
            .field("dims", &self.tensor.dims())
            .field("roi_size", &self.roi_size)
            .field("edge", &self.edge)
            .field("backend", &self.backend.kind())
            .finish()
    }
}

/// Build a model from Fortran-ordered `(nx, ny, nz, 64)` coefficients with default options.
pub fn make_model(
    coeffs: &[f32],
    nx: usize,
    ny: usize,
    nz: usize,
    roi_size_x: usize,
    roi_size_y: usize,
) -> PsfResult<PsfModel> {
    PsfModel::with_opts(
        coeffs,
        nx,
        ny,
        nz,
        roi_size_x,
        roi_size_y,
        PsfModelOpts::default(),
    )
}

impl PsfModel {
    /// Build a model from Fortran-ordered coefficients.
    ///
    /// Fails with `InvalidDimension` when the buffer does not match `nx * ny * nz * 64` or a
    /// dimension is zero. A non-square ROI is accepted here and rejected at render time.
    #[allow(clippy::too_many_arguments)]
    #[tracing::instrument(skip(coeffs, opts), fields(len = coeffs.len()))]
    pub fn with_opts(
        coeffs: &[f32],
        nx: usize,
        ny: usize,
        nz: usize,
        roi_size_x: usize,
        roi_size_y: usize,
        opts: PsfModelOpts,
    ) -> PsfResult<Self> {
        let dims = Dims3::new(nx, ny, nz)?;
        let roi_size = RoiSize::new(roi_size_x, roi_size_y)?;
        let tensor = CoefficientTensor::from_fortran_order(coeffs, dims)?;
        Self::from_tensor(tensor, roi_size, opts)
    }

    /// Build a model around an already constructed tensor.
    ///
    /// Fails with `InvalidDimension` for an empty ROI.
    pub fn from_tensor(
        tensor: CoefficientTensor,
        roi_size: RoiSize,
        opts: PsfModelOpts,
    ) -> PsfResult<Self> {
        roi_size.check()?;
        let backend = create_backend(opts.backend, &opts.backend_opts)?;
        Ok(Self {
            tensor,
            roi_size,
            edge: opts.edge,
            backend,
        })
    }

    /// Coefficients backing this model.
    pub fn tensor(&self) -> &CoefficientTensor {
        &self.tensor
    }

    /// ROI edge lengths.
    pub fn roi_size(&self) -> RoiSize {
        self.roi_size
    }

    /// Active execution strategy.
    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }

    /// Evaluator over this model's coefficients.
    pub fn spline(&self) -> SplineEvaluator<'_> {
        SplineEvaluator::new(&self.tensor, self.edge)
    }

    fn roi_renderer(&self) -> PsfResult<RoiRenderer<'_>> {
        RoiRenderer::new(self.spline(), self.roi_size)
    }

    /// One ROI per emitter.
    pub fn render_roi_stack(&self, emitters: &[Emitter]) -> PsfResult<RoiStack> {
        let roi = self.roi_renderer()?;
        self.backend.render_rois(&roi, emitters)
    }

    /// Compose emitters into `canvas`.
    pub fn render_frame_stack(
        &self,
        canvas: FrameCanvas,
        emitters: &[FrameEmitter],
    ) -> PsfResult<(FrameStack, FrameStats)> {
        let composer = FrameComposer::new(self.roi_renderer()?, canvas);
        self.backend.render_frames(&composer, emitters)
    }

    /// Column form of [`PsfModel::render_roi_stack`].
    ///
    /// Returns `n * roi_size_x * roi_size_y` values, ROI after ROI, each row-major.
    pub fn render_rois(
        &self,
        x: &[f32],
        y: &[f32],
        z: &[f32],
        phot: &[f32],
    ) -> PsfResult<Vec<f32>> {
        let emitters = EmitterColumns { x, y, z, phot }.to_emitters()?;
        Ok(self.render_roi_stack(&emitters)?.into_vec())
    }

    /// Column form of [`PsfModel::render_frame_stack`].
    ///
    /// Returns `n_frames * frame_size_x * frame_size_y` values, frame after frame, each
    /// row-major with `frame_size_x` pixels per row.
    #[allow(clippy::too_many_arguments)]
    pub fn render_frames(
        &self,
        frame_size_x: usize,
        frame_size_y: usize,
        frame_index: &[i32],
        n_frames: usize,
        x: &[f32],
        y: &[f32],
        z: &[f32],
        pixel_x: &[i32],
        pixel_y: &[i32],
        phot: &[f32],
    ) -> PsfResult<Vec<f32>> {
        let canvas = FrameCanvas::new(frame_size_x, frame_size_y, n_frames)?;
        let emitters = FrameEmitterColumns {
            frame_index,
            x,
            y,
            z,
            pixel_x,
            pixel_y,
            phot,
        }
        .to_emitters()?;
        let (frames, _) = self.render_frame_stack(canvas, &emitters)?;
        Ok(frames.into_vec())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/psf.rs"]
mod tests;
