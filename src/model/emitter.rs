use crate::foundation::error::{PsfError, PsfResult};

/// A point source relative to its ROI origin.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Emitter {
    /// Sub-pixel x position in ROI coordinates.
    pub x: f32,
    /// Sub-pixel y position in ROI coordinates.
    pub y: f32,
    /// Axial position in spline cell units.
    pub z: f32,
    /// Photon count; scales the whole ROI.
    pub phot: f32,
}

impl Emitter {
    /// Convenience constructor.
    pub fn new(x: f32, y: f32, z: f32, phot: f32) -> Self {
        Self { x, y, z, phot }
    }
}

/// An emitter placed into a frame stack.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FrameEmitter {
    /// Position and brightness, relative to the ROI placed at the pixel anchor.
    pub emitter: Emitter,
    /// Destination frame.
    pub frame_index: i32,
    /// Frame column of the ROI's top-left pixel. May be negative.
    pub pixel_x: i32,
    /// Frame row of the ROI's top-left pixel. May be negative.
    pub pixel_y: i32,
}

/// Column form of an emitter batch: one slice per attribute.
#[derive(Clone, Copy, Debug)]
pub struct EmitterColumns<'a> {
    /// x positions.
    pub x: &'a [f32],
    /// y positions.
    pub y: &'a [f32],
    /// z positions.
    pub z: &'a [f32],
    /// Photon counts.
    pub phot: &'a [f32],
}

impl EmitterColumns<'_> {
    /// Zip the columns into emitter records.
    ///
    /// Fails with [`PsfError::InvalidArgument`] when the columns differ in length.
    pub fn to_emitters(&self) -> PsfResult<Vec<Emitter>> {
        let n = common_len(&[
            ("x", self.x.len()),
            ("y", self.y.len()),
            ("z", self.z.len()),
            ("phot", self.phot.len()),
        ])?;
        Ok((0..n)
            .map(|i| Emitter::new(self.x[i], self.y[i], self.z[i], self.phot[i]))
            .collect())
    }
}

/// Column form of a frame emitter batch.
#[derive(Clone, Copy, Debug)]
pub struct FrameEmitterColumns<'a> {
    /// Destination frame per emitter.
    pub frame_index: &'a [i32],
    /// x positions inside the ROI footprint.
    pub x: &'a [f32],
    /// y positions inside the ROI footprint.
    pub y: &'a [f32],
    /// z positions.
    pub z: &'a [f32],
    /// ROI anchor columns.
    pub pixel_x: &'a [i32],
    /// ROI anchor rows.
    pub pixel_y: &'a [i32],
    /// Photon counts.
    pub phot: &'a [f32],
}

impl FrameEmitterColumns<'_> {
    /// Zip the columns into frame emitter records.
    pub fn to_emitters(&self) -> PsfResult<Vec<FrameEmitter>> {
        let n = common_len(&[
            ("frame_index", self.frame_index.len()),
            ("x", self.x.len()),
            ("y", self.y.len()),
            ("z", self.z.len()),
            ("pixel_x", self.pixel_x.len()),
            ("pixel_y", self.pixel_y.len()),
            ("phot", self.phot.len()),
        ])?;
        Ok((0..n)
            .map(|i| FrameEmitter {
                emitter: Emitter::new(self.x[i], self.y[i], self.z[i], self.phot[i]),
                frame_index: self.frame_index[i],
                pixel_x: self.pixel_x[i],
                pixel_y: self.pixel_y[i],
            })
            .collect())
    }
}

fn common_len(columns: &[(&str, usize)]) -> PsfResult<usize> {
    let Some(&(first_name, n)) = columns.first() else {
        return Ok(0);
    };
    if let Some(&(name, len)) = columns.iter().find(|(_, len)| *len != n) {
        return Err(PsfError::invalid_argument(format!(
            "emitter columns differ in length: '{first_name}' has {n}, '{name}' has {len}"
        )));
    }
    Ok(n)
}

#[cfg(test)]
#[path = "../../tests/unit/model/emitter.rs"]
mod tests;
