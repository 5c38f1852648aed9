use crate::{
    Frame,
    foundation::error::SpriteResult,
    mask::{alpha_plane, edge_mask},
};

/// Alpha difference that counts as an opaque/transparent boundary.
pub const OUTLINE_LEVEL: u8 = 250;

pub const OUTLINE_RGBA: [u8; 4] = [0, 0, 0, 255];

/// Paint a 1 px opaque black silhouette wherever the alpha channel jumps by more than `level`.
///
/// `level` is clamped to `1..=255`. Malformed frames are returned unchanged.
pub fn stroke(frame: &Frame, level: u8) -> SpriteResult<Frame> {
    if !frame.is_well_formed() {
        return Ok(frame.clone());
    }
    let level = level.max(1);

    let alpha = alpha_plane(frame)?;
    let edges = edge_mask(&alpha, frame.width, frame.height, level)?;

    let mut out = frame.clone();
    let mut marked = 0usize;
    for (px, edge) in out.data.chunks_exact_mut(4).zip(edges) {
        if edge {
            px.copy_from_slice(&OUTLINE_RGBA);
            marked += 1;
        }
    }
    tracing::trace!(marked, level, "stroked frame outline");
    Ok(out)
}
