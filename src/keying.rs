use crate::{Frame, Rgb};

/// Replace every pixel whose RGB exactly equals `key` with transparent black.
///
/// Malformed frames (no usable color plane) are returned unchanged.
pub fn key_color(frame: &Frame, key: Rgb) -> Frame {
    if !frame.is_well_formed() {
        tracing::debug!(
            width = frame.width,
            height = frame.height,
            len = frame.data.len(),
            "skipping color key on malformed frame"
        );
        return frame.clone();
    }

    let mut out = frame.clone();
    for px in out.data.chunks_exact_mut(4) {
        if key.matches(px) {
            px.copy_from_slice(&[0, 0, 0, 0]);
        }
    }
    out
}
