use crate::{
    Frame,
    foundation::error::{SpriteError, SpriteResult},
};

/// ITU-R 601-2 luma, the grayscale each pixel is pulled towards (or pushed away from).
pub fn luma(r: u8, g: u8, b: u8) -> f32 {
    0.299 * f32::from(r) + 0.587 * f32::from(g) + 0.114 * f32::from(b)
}

/// Scale color saturation by `multiplier`: 0 is grayscale, 1 is identity, >1 amplifies.
///
/// Alpha is left untouched.
pub fn saturate(frame: &Frame, multiplier: f32) -> SpriteResult<Frame> {
    if !multiplier.is_finite() || multiplier < 0.0 {
        return Err(SpriteError::validation(
            "saturation multiplier must be finite and >= 0",
        ));
    }
    if !frame.is_well_formed() {
        return Err(SpriteError::validation(
            "saturate expects data matching width*height*4",
        ));
    }
    if multiplier == 1.0 {
        return Ok(frame.clone());
    }

    let mut out = frame.clone();
    for px in out.data.chunks_exact_mut(4) {
        let gray = luma(px[0], px[1], px[2]);
        for c in &mut px[..3] {
            let v = gray + (f32::from(*c) - gray) * multiplier;
            *c = v.round().clamp(0.0, 255.0) as u8;
        }
    }
    Ok(out)
}
