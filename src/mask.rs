use crate::{
    Frame,
    foundation::error::{SpriteError, SpriteResult},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Each pixel takes its right neighbour's value.
    Left,
    /// Each pixel takes its left neighbour's value.
    Right,
    /// Each pixel takes the value of the row below.
    Up,
    /// Each pixel takes the value of the row above.
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];
}

/// Element-wise `|a - b| > level`. Multi-channel inputs are compared per scalar, not per pixel.
pub fn diff_mask(a: &[u8], b: &[u8], level: u8) -> SpriteResult<Vec<bool>> {
    if a.len() != b.len() {
        return Err(SpriteError::validation("diff_mask expects equal-length planes"));
    }
    Ok(a.iter()
        .zip(b)
        .map(|(&x, &y)| x.abs_diff(y) > level)
        .collect())
}

/// Shift a single-channel plane by one pixel, replicating the boundary row or column.
pub fn shift(plane: &[u8], width: u32, height: u32, dir: Direction) -> SpriteResult<Vec<u8>> {
    let (w, h) = (width as usize, height as usize);
    if w == 0 || h == 0 || plane.len() != w * h {
        return Err(SpriteError::validation("shift expects a plane matching width*height"));
    }

    let mut out = Vec::with_capacity(plane.len());
    for y in 0..h {
        for x in 0..w {
            let (sx, sy) = match dir {
                Direction::Left => ((x + 1).min(w - 1), y),
                Direction::Right => (x.saturating_sub(1), y),
                Direction::Up => (x, (y + 1).min(h - 1)),
                Direction::Down => (x, y.saturating_sub(1)),
            };
            out.push(plane[sy * w + sx]);
        }
    }
    Ok(out)
}

/// OR of the four directional diff masks of `plane` against its one-pixel shifts.
pub fn edge_mask(plane: &[u8], width: u32, height: u32, level: u8) -> SpriteResult<Vec<bool>> {
    let mut edges = vec![false; plane.len()];
    for dir in Direction::ALL {
        let shifted = shift(plane, width, height, dir)?;
        let diff = diff_mask(plane, &shifted, level)?;
        for (e, d) in edges.iter_mut().zip(diff) {
            *e |= d;
        }
    }
    Ok(edges)
}

/// Extract the transparency channel of a well-formed frame.
pub fn alpha_plane(frame: &Frame) -> SpriteResult<Vec<u8>> {
    if !frame.is_well_formed() {
        return Err(SpriteError::validation(
            "alpha_plane expects data matching width*height*4",
        ));
    }
    Ok(frame.data.chunks_exact(4).map(|px| px[3]).collect())
}
