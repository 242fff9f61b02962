//! Cubic-spline point-spread function rendering for single-molecule localization simulation.
//!
//! A calibrated PSF is stored as a dense grid of tricubic polynomial cells
//! ([`CoefficientTensor`]). From it the crate renders either one fixed-size patch per emitter
//! ([`PsfModel::render_rois`]) or whole detector frames with many emitters accumulated at
//! integer pixel anchors ([`PsfModel::render_frames`]).
//!
//! # Pipeline overview
//!
//! 1. **Evaluate**: [`SplineEvaluator`] maps `(x, y, z)` in cell units to an intensity.
//! 2. **ROI**: [`RoiRenderer`] samples the spline on a pixel grid centred on the emitter and scales
//!    by photon count.
//! 3. **Compose**: [`FrameComposer`] adds each ROI into its frame, dropping pixels that fall off
//!    the edge.
//! 4. **Execute**: a [`RenderBackend`] (sequential or rayon-parallel) drives steps 2 and 3 over a
//!    batch. Both backends produce the same numbers.
//!
//! # Example
//!
//! ```
//! use splinepsf::make_model;
//!
//! // One cell whose constant term is 1.
//! let mut coeffs = vec![0.0f32; 64];
//! coeffs[0] = 1.0;
//! let model = make_model(&coeffs, 1, 1, 1, 3, 3)?;
//!
//! let rois = model.render_rois(&[0.5], &[0.5], &[0.0], &[100.0])?;
//! assert_eq!(rois.len(), 9);
//! assert!(rois.iter().all(|v| *v == 100.0));
//! # Ok::<(), splinepsf::PsfError>(())
//! ```
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;
mod model;
mod render;
mod spline;

pub use crate::foundation::core::{COEFFS_PER_CELL, Dims3, FrameCanvas, RoiSize};
pub use crate::foundation::error::{PsfError, PsfResult};
pub use crate::model::emitter::{Emitter, EmitterColumns, FrameEmitter, FrameEmitterColumns};
pub use crate::model::psf::{PsfModel, PsfModelOpts, make_model};
pub use crate::render::backend::{BackendKind, BackendOpts, RenderBackend, create_backend};
pub use crate::render::frame::{Clip, Footprint, FrameComposer, FrameStack, FrameStats, Span};
pub use crate::render::parallel::ParallelBackend;
pub use crate::render::roi::{RoiRenderer, RoiStack};
pub use crate::render::sequential::SequentialBackend;
pub use crate::spline::eval::{EdgePolicy, SplineEvaluator};
pub use crate::spline::tensor::{CoeffLayout, CoefficientTensor};
