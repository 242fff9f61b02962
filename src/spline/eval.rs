use crate::foundation::error::PsfResult;
use crate::spline::tensor::CoefficientTensor;

/// How coordinates outside `[0,nx) x [0,ny) x [0,nz)` are evaluated.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum EdgePolicy {
    /// Clamp to the nearest cell and clamp the fractional offset to `[0, 1]`.
    ///
    /// The spline keeps the value it has on the tensor boundary.
    #[default]
    Clamp,
    /// Anything outside the tensor evaluates to `0.0`.
    Zero,
}

/// Evaluates the tricubic spline stored in a [`CoefficientTensor`].
///
/// Coordinates are in cell units: `x = 2.25` is a quarter into cell `ix = 2`.
#[derive(Clone, Copy, Debug)]
pub struct SplineEvaluator<'a> {
    tensor: &'a CoefficientTensor,
    edge: EdgePolicy,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct AxisPos {
    cell: usize,
    frac: f32,
}

impl<'a> SplineEvaluator<'a> {
    /// Create an evaluator over `tensor`.
    pub fn new(tensor: &'a CoefficientTensor, edge: EdgePolicy) -> Self {
        Self { tensor, edge }
    }

    /// The underlying tensor.
    pub fn tensor(&self) -> &'a CoefficientTensor {
        self.tensor
    }

    /// Active edge policy.
    pub fn edge_policy(&self) -> EdgePolicy {
        self.edge
    }

    /// Spline intensity at `(x, y, z)`.
    ///
    /// Never fails for finite or non-finite coordinates; the error path only guards the cell
    /// lookup after the edge policy has been applied.
    pub fn evaluate(&self, x: f32, y: f32, z: f32) -> PsfResult<f32> {
        let dims = self.tensor.dims();
        let (Some(px), Some(py), Some(pz)) = (
            locate(x, dims.nx, self.edge),
            locate(y, dims.ny, self.edge),
            locate(z, dims.nz, self.edge),
        ) else {
            return Ok(0.0);
        };

        let c = self.tensor.coefficients(px.cell, py.cell, pz.cell)?;
        Ok(tricubic(c, px.frac, py.frac, pz.frac))
    }
}

fn locate(v: f32, n: usize, edge: EdgePolicy) -> Option<AxisPos> {
    let fl = v.floor();
    match edge {
        EdgePolicy::Zero => {
            // Written so that NaN falls outside.
            if !(v >= 0.0 && fl < n as f32) {
                return None;
            }
            Some(AxisPos {
                cell: fl as usize,
                frac: v - fl,
            })
        }
        EdgePolicy::Clamp => {
            let cell = if fl > 0.0 {
                (fl as usize).min(n - 1)
            } else {
                0
            };
            Some(AxisPos {
                cell,
                frac: (v - cell as f32).clamp(0.0, 1.0),
            })
        }
    }
}

/// `sum c[i,j,k] * fx^i * fy^j * fz^k` for one cell, by nested Horner.
pub(crate) fn tricubic(c: &[f32; 64], fx: f32, fy: f32, fz: f32) -> f32 {
    let mut acc_x = 0.0f32;
    for i in (0..4).rev() {
        let mut acc_y = 0.0f32;
        for j in (0..4).rev() {
            let b = i * 16 + j * 4;
            let acc_z = ((c[b + 3] * fz + c[b + 2]) * fz + c[b + 1]) * fz + c[b];
            acc_y = acc_y * fy + acc_z;
        }
        acc_x = acc_x * fx + acc_y;
    }
    acc_x
}

#[cfg(test)]
#[path = "../../tests/unit/spline/eval.rs"]
mod tests;
