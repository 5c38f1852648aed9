use image::imageops::{self, FilterType};

use crate::{
    Frame, ScaleFactor,
    foundation::error::{SpriteError, SpriteResult},
};

/// Output size for `width x height` under `scale`, never below 1x1.
pub fn scaled_dimensions(width: u32, height: u32, scale: ScaleFactor) -> (u32, u32) {
    fn dim(v: u32, s: f64) -> u32 {
        let scaled = (f64::from(v) * s).round();
        if scaled >= f64::from(u32::MAX) {
            u32::MAX
        } else {
            (scaled as u32).max(1)
        }
    }
    (dim(width, scale.get()), dim(height, scale.get()))
}

/// Nearest-neighbor resize. Source pixels are copied verbatim, never blended.
pub fn resize_nearest(frame: &Frame, scale: ScaleFactor) -> SpriteResult<Frame> {
    if !frame.is_well_formed() {
        return Err(SpriteError::validation("resize_nearest expects data matching width*height*4"));
    }

    let (new_w, new_h) = scaled_dimensions(frame.width, frame.height, scale);
    if (new_w, new_h) == (frame.width, frame.height) {
        return Ok(frame.clone());
    }

    let resized = imageops::resize(&frame.to_rgba_image()?, new_w, new_h, FilterType::Nearest);
    Ok(Frame::from_rgba_image(resized))
}
