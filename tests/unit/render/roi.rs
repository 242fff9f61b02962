use super::*;
use crate::foundation::core::Dims3;
use crate::spline::eval::EdgePolicy;
use crate::spline::tensor::{CoeffLayout, CoefficientTensor};

fn constant_term_tensor(n: usize, lit: impl Fn(usize, usize, usize) -> bool) -> CoefficientTensor {
    let dims = Dims3::new(n, n, n).unwrap();
    let mut data = vec![0.0f32; dims.coeff_len().unwrap()];
    for iz in 0..n {
        for iy in 0..n {
            for ix in 0..n {
                if lit(ix, iy, iz) {
                    data[dims.cell_index(ix, iy, iz) * 64] = 1.0;
                }
            }
        }
    }
    CoefficientTensor::new(&data, dims, CoeffLayout::CellMajor).unwrap()
}

fn smooth_tensor() -> CoefficientTensor {
    let dims = Dims3::new(6, 6, 3).unwrap();
    let mut data = Vec::with_capacity(dims.coeff_len().unwrap());
    for iz in 0..3 {
        for iy in 0..6 {
            for ix in 0..6 {
                for c in 0..64 {
                    let r2 = (ix as f32 - 2.5).powi(2) + (iy as f32 - 2.5).powi(2);
                    let base = (-r2 / 4.0).exp() * (1.0 + iz as f32 * 0.1);
                    data.push(if c == 0 { base } else { base * 0.01 * (c % 5) as f32 });
                }
            }
        }
    }
    CoefficientTensor::new(&data, dims, CoeffLayout::CellMajor).unwrap()
}

#[test]
fn single_lit_cell_lands_on_center_pixel() {
    let t = constant_term_tensor(5, |ix, iy, iz| (ix, iy, iz) == (2, 2, 2));
    let roi = RoiRenderer::new(
        SplineEvaluator::new(&t, EdgePolicy::Clamp),
        RoiSize::new(7, 7).unwrap(),
    )
    .unwrap();

    let out = roi.render(&Emitter::new(2.5, 2.5, 2.5, 1000.0)).unwrap();
    assert_eq!(out.len(), 49);
    for py in 0..7 {
        for px in 0..7 {
            let v = out[py * 7 + px];
            if (px, py) == (3, 3) {
                assert_eq!(v, 1000.0);
            } else {
                assert_eq!(v, 0.0, "pixel ({px}, {py})");
            }
        }
    }
}

#[test]
fn unit_constant_everywhere_fills_roi_under_clamp() {
    let t = constant_term_tensor(5, |_, _, _| true);
    let size = RoiSize::new(7, 7).unwrap();
    let e = Emitter::new(2.5, 2.5, 2.5, 1000.0);

    let clamp = RoiRenderer::new(SplineEvaluator::new(&t, EdgePolicy::Clamp), size).unwrap();
    assert!(clamp.render(&e).unwrap().iter().all(|v| *v == 1000.0));

    // Columns/rows 0 and 6 sample x = -0.5 and x = 5.5, outside the 5-cell tensor.
    let zero = RoiRenderer::new(SplineEvaluator::new(&t, EdgePolicy::Zero), size).unwrap();
    let out = zero.render(&e).unwrap();
    for py in 0..7 {
        for px in 0..7 {
            let edge = px == 0 || px == 6 || py == 0 || py == 6;
            assert_eq!(out[py * 7 + px], if edge { 0.0 } else { 1000.0 });
        }
    }
}

#[test]
fn photon_count_scales_linearly() {
    let t = smooth_tensor();
    let roi = RoiRenderer::new(
        SplineEvaluator::new(&t, EdgePolicy::Clamp),
        RoiSize::new(5, 5).unwrap(),
    )
    .unwrap();

    let a = roi.render(&Emitter::new(2.3, 2.7, 1.4, 250.0)).unwrap();
    let b = roi.render(&Emitter::new(2.3, 2.7, 1.4, 1000.0)).unwrap();
    for (va, vb) in a.iter().zip(&b) {
        let scaled = va * 4.0;
        assert!((scaled - vb).abs() <= 1e-5 * vb.abs().max(1.0));
    }
    assert!(b.iter().any(|v| *v > 0.0));
}

#[test]
fn non_square_roi_is_rejected() {
    let t = smooth_tensor();
    let err = RoiRenderer::new(
        SplineEvaluator::new(&t, EdgePolicy::Clamp),
        RoiSize::new(5, 7).unwrap(),
    )
    .unwrap_err();
    assert!(matches!(err, PsfError::InvalidArgument(_)));
}

#[test]
fn render_into_checks_buffer_length() {
    let t = smooth_tensor();
    let roi = RoiRenderer::new(
        SplineEvaluator::new(&t, EdgePolicy::Clamp),
        RoiSize::new(3, 3).unwrap(),
    )
    .unwrap();
    let mut short = vec![0.0f32; 8];
    assert!(matches!(
        roi.render_into(&Emitter::default(), &mut short),
        Err(PsfError::InvalidArgument(_))
    ));
}

#[test]
fn stack_accessors() {
    let stack = RoiStack {
        size: RoiSize::new(2, 2).unwrap(),
        data: vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0],
    };
    assert_eq!(stack.len(), 2);
    assert!(!stack.is_empty());
    assert_eq!(stack.roi(1), Some(&[4.0, 5.0, 6.0, 7.0][..]));
    assert_eq!(stack.roi(2), None);
    assert_eq!(stack.get(0, 1, 1), Some(3.0));
    assert_eq!(stack.get(1, 0, 1), Some(6.0));
    assert_eq!(stack.get(0, 2, 0), None);
    assert_eq!(stack.iter().count(), 2);
    assert_eq!(stack.into_vec().len(), 8);
}

#[test]
fn empty_roi_literal_is_rejected() {
    let t = constant_term_tensor(1, |_, _, _| true);
    let err = RoiRenderer::new(
        SplineEvaluator::new(&t, EdgePolicy::Clamp),
        RoiSize { x: 0, y: 0 },
    )
    .unwrap_err();
    assert!(matches!(err, PsfError::InvalidDimension(_)));
}
