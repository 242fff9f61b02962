use super::*;
use crate::foundation::core::Dims3;
use crate::spline::tensor::CoeffLayout;

fn tensor_from_cells(
    dims: Dims3,
    mut fill: impl FnMut(usize, usize, usize, usize) -> f32,
) -> CoefficientTensor {
    let mut data = Vec::with_capacity(dims.coeff_len().unwrap());
    for iz in 0..dims.nz {
        for iy in 0..dims.ny {
            for ix in 0..dims.nx {
                for c in 0..64 {
                    data.push(fill(ix, iy, iz, c));
                }
            }
        }
    }
    CoefficientTensor::new(&data, dims, CoeffLayout::CellMajor).unwrap()
}

fn naive(c: &[f32; 64], fx: f32, fy: f32, fz: f32) -> f64 {
    let mut acc = 0.0f64;
    for i in 0..4 {
        for j in 0..4 {
            for k in 0..4 {
                acc += f64::from(c[i * 16 + j * 4 + k])
                    * f64::from(fx).powi(i as i32)
                    * f64::from(fy).powi(j as i32)
                    * f64::from(fz).powi(k as i32);
            }
        }
    }
    acc
}

#[test]
fn grid_intersection_returns_constant_term() {
    let dims = Dims3::new(3, 4, 2).unwrap();
    let t = tensor_from_cells(dims, |ix, iy, iz, c| {
        (ix as f32) * 0.5 + (iy as f32) * 0.25 - (iz as f32) + (c as f32) * 0.01
    });
    let eval = SplineEvaluator::new(&t, EdgePolicy::Clamp);
    for iz in 0..2 {
        for iy in 0..4 {
            for ix in 0..3 {
                let v = eval.evaluate(ix as f32, iy as f32, iz as f32).unwrap();
                assert_eq!(v, t.coefficients(ix, iy, iz).unwrap()[0]);
            }
        }
    }
}

#[test]
fn evaluates_mixed_terms() {
    let dims = Dims3::new(1, 1, 1).unwrap();
    let t = tensor_from_cells(dims, |_, _, _, c| match c {
        0 => 1.0,
        16 => 2.0,
        4 => 3.0,
        1 => 5.0,
        21 => 7.0,
        _ => 0.0,
    });
    let eval = SplineEvaluator::new(&t, EdgePolicy::Clamp);
    let v = eval.evaluate(0.5, 0.25, 0.75).unwrap();
    let expected = 1.0 + 2.0 * 0.5 + 3.0 * 0.25 + 5.0 * 0.75 + 7.0 * 0.5 * 0.25 * 0.75;
    assert!((v - expected).abs() < 1e-6, "got {v}, expected {expected}");
}

#[test]
fn horner_matches_power_sum() {
    let dims = Dims3::new(1, 1, 1).unwrap();
    let t = tensor_from_cells(dims, |_, _, _, c| ((c * 37 % 11) as f32 - 5.0) * 0.1);
    let c = t.coefficients(0, 0, 0).unwrap();
    for &(fx, fy, fz) in &[
        (0.0, 0.0, 0.0),
        (0.1, 0.9, 0.5),
        (0.33, 0.66, 0.99),
        (0.999, 0.001, 0.5),
    ] {
        let got = f64::from(tricubic(c, fx, fy, fz));
        let want = naive(c, fx, fy, fz);
        assert!(
            (got - want).abs() <= 1e-5 * want.abs().max(1.0),
            "({fx}, {fy}, {fz}): {got} vs {want}"
        );
    }
}

fn ramp_tensor() -> CoefficientTensor {
    // Cell 0: constant 1. Cell 1: 2 + fx, so 3 at its far edge.
    let dims = Dims3::new(2, 1, 1).unwrap();
    tensor_from_cells(dims, |ix, _, _, c| match (ix, c) {
        (0, 0) => 1.0,
        (1, 0) => 2.0,
        (1, 16) => 1.0,
        _ => 0.0,
    })
}

#[test]
fn clamp_policy_continues_edge_values() {
    let t = ramp_tensor();
    let eval = SplineEvaluator::new(&t, EdgePolicy::Clamp);
    assert_eq!(eval.evaluate(-3.0, 0.0, 0.0).unwrap(), 1.0);
    assert_eq!(eval.evaluate(5.0, 0.0, 0.0).unwrap(), 3.0);
    assert_eq!(eval.evaluate(1.5, -4.0, 9.0).unwrap(), 2.5);
}

#[test]
fn zero_policy_blanks_outside_tensor() {
    let t = ramp_tensor();
    let eval = SplineEvaluator::new(&t, EdgePolicy::Zero);
    assert_eq!(eval.evaluate(-0.01, 0.0, 0.0).unwrap(), 0.0);
    assert_eq!(eval.evaluate(2.0, 0.0, 0.0).unwrap(), 0.0);
    assert_eq!(eval.evaluate(1.5, 1.0, 0.0).unwrap(), 0.0);
    assert_eq!(eval.evaluate(f32::NAN, 0.0, 0.0).unwrap(), 0.0);
    assert_eq!(eval.evaluate(1.5, 0.5, 0.5).unwrap(), 2.5);
    assert_eq!(eval.edge_policy(), EdgePolicy::Zero);
}
