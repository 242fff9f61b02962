use crate::foundation::core::{COEFFS_PER_CELL, Dims3};
use crate::foundation::error::{PsfError, PsfResult};

/// Memory layout of a flat coefficient buffer handed to [`CoefficientTensor::new`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum CoeffLayout {
    /// Column-major `(nx, ny, nz, 64)` array, flat index `ix + nx*(iy + ny*(iz + nz*c))`.
    ///
    /// This is how calibration tooling hands spline coefficients over.
    FortranOrder,
    /// Internal layout: cells in x-fastest order, each cell's 64 coefficients contiguous.
    CellMajor,
}

/// Dense per-cell tricubic coefficients.
///
/// Coefficient `c[i, j, k]` (power `i` in x, `j` in y, `k` in z) of a cell lives at offset
/// `i * 16 + j * 4 + k` inside that cell's 64-value block. The tensor is immutable after
/// construction and is shared by reference between render workers.
#[derive(Clone, Debug, PartialEq)]
pub struct CoefficientTensor {
    dims: Dims3,
    data: Vec<f32>,
}

impl CoefficientTensor {
    /// Build a tensor from a flat buffer in the given layout.
    ///
    /// Fails with [`PsfError::InvalidDimension`] for a zero axis or unless
    /// `data.len() == nx * ny * nz * 64`.
    pub fn new(data: &[f32], dims: Dims3, layout: CoeffLayout) -> PsfResult<Self> {
        dims.check()?;
        let expected = dims.coeff_len()?;
        if data.len() != expected {
            return Err(PsfError::invalid_dimension(format!(
                "coefficient buffer has {} values, expected {}x{}x{}x{} = {}",
                data.len(),
                dims.nx,
                dims.ny,
                dims.nz,
                COEFFS_PER_CELL,
                expected
            )));
        }

        let data = match layout {
            CoeffLayout::CellMajor => data.to_vec(),
            CoeffLayout::FortranOrder => {
                let cells = dims.cell_count()?;
                let mut out = vec![0.0f32; expected];
                for (cell, block) in out.chunks_exact_mut(COEFFS_PER_CELL).enumerate() {
                    for (c, v) in block.iter_mut().enumerate() {
                        *v = data[cell + cells * c];
                    }
                }
                out
            }
        };

        Ok(Self { dims, data })
    }

    /// Shorthand for [`CoefficientTensor::new`] with [`CoeffLayout::FortranOrder`].
    pub fn from_fortran_order(data: &[f32], dims: Dims3) -> PsfResult<Self> {
        Self::new(data, dims, CoeffLayout::FortranOrder)
    }

    /// Tensor dimensions in cells.
    pub fn dims(&self) -> Dims3 {
        self.dims
    }

    /// The 64 coefficients of cell `(ix, iy, iz)`.
    pub fn coefficients(&self, ix: usize, iy: usize, iz: usize) -> PsfResult<&[f32; 64]> {
        let Dims3 { nx, ny, nz } = self.dims;
        if ix >= nx || iy >= ny || iz >= nz {
            return Err(PsfError::out_of_range(format!(
                "cell ({ix}, {iy}, {iz}) outside tensor of {nx}x{ny}x{nz} cells"
            )));
        }
        let start = self.dims.cell_index(ix, iy, iz) * COEFFS_PER_CELL;
        self.data[start..start + COEFFS_PER_CELL]
            .try_into()
            .map_err(|_| PsfError::out_of_range("coefficient block has wrong length"))
    }

    /// Flat view of the internal cell-major storage.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}

#[cfg(test)]
#[path = "../../tests/unit/spline/tensor.rs"]
mod tests;
