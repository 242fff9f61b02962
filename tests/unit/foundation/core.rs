use super::*;

#[test]
fn dims_reject_zero_axes() {
    assert!(matches!(
        Dims3::new(0, 4, 4),
        Err(PsfError::InvalidDimension(_))
    ));
    assert!(matches!(
        Dims3::new(4, 4, 0),
        Err(PsfError::InvalidDimension(_))
    ));
    let d = Dims3::new(2, 3, 4).unwrap();
    assert_eq!(d.cell_count().unwrap(), 24);
    assert_eq!(d.coeff_len().unwrap(), 24 * 64);
}

#[test]
fn dims_cell_index_is_x_fastest() {
    let d = Dims3::new(2, 3, 4).unwrap();
    assert_eq!(d.cell_index(0, 0, 0), 0);
    assert_eq!(d.cell_index(1, 0, 0), 1);
    assert_eq!(d.cell_index(0, 1, 0), 2);
    assert_eq!(d.cell_index(0, 0, 1), 6);
    assert_eq!(d.cell_index(1, 2, 3), 23);
}

#[test]
fn dims_overflow_is_reported() {
    let d = Dims3::new(usize::MAX, 2, 1).unwrap();
    assert!(d.cell_count().is_err());
}

#[test]
fn roi_square_check() {
    assert!(RoiSize::new(7, 7).unwrap().require_square().is_ok());
    assert!(matches!(
        RoiSize::new(7, 9).unwrap().require_square(),
        Err(PsfError::InvalidArgument(_))
    ));
    assert!(matches!(
        RoiSize::new(0, 7),
        Err(PsfError::InvalidDimension(_))
    ));
}

#[test]
fn canvas_bounds() {
    let c = FrameCanvas::new(16, 8, 3).unwrap();
    assert_eq!(c.frame_len(), 128);
    assert_eq!(c.pixel_count().unwrap(), 384);
    assert!(c.contains_frame(0));
    assert!(c.contains_frame(2));
    assert!(!c.contains_frame(3));
    assert!(!c.contains_frame(-1));
    assert!(FrameCanvas::new(0, 8, 1).is_err());
    assert_eq!(FrameCanvas::new(4, 4, 0).unwrap().pixel_count().unwrap(), 0);
}

#[test]
fn literals_are_rechecked() {
    assert!(matches!(
        Dims3 { nx: 0, ny: 1, nz: 1 }.check(),
        Err(PsfError::InvalidDimension(_))
    ));
    assert!(matches!(
        RoiSize { x: 0, y: 0 }.check(),
        Err(PsfError::InvalidDimension(_))
    ));
    let canvas = FrameCanvas {
        width: 0,
        height: 4,
        n_frames: 1,
    };
    assert!(matches!(canvas.check(), Err(PsfError::InvalidArgument(_))));
}

#[test]
fn canvas_rejects_overflowing_frame_without_frames() {
    assert!(matches!(
        FrameCanvas::new(usize::MAX, 2, 0),
        Err(PsfError::InvalidArgument(_))
    ));
}
