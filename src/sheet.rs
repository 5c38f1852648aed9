//! Horizontal strip layout: one equal-width slot per frame, frames centered in their slot and
//! bottom-aligned against the tallest frame.

use crate::{
    Frame,
    foundation::error::{SpriteError, SpriteResult},
};

/// How the sheet canvas height is chosen.
///
/// Frames are always placed relative to the tallest frame; only the canvas height differs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SheetHeight {
    /// Canvas is as tall as the widest frame is wide. Non-square animations either float above
    /// the bottom edge or get clipped there.
    #[default]
    MaxFrameWidth,
    /// Canvas is as tall as the tallest frame.
    MaxFrameHeight,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SheetLayout {
    /// Width of every slot, i.e. the widest frame.
    pub slot_width: u32,
    pub max_frame_height: u32,
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Top-left corner of each frame on the canvas, in sequence order. `y` may exceed the
    /// canvas for frames that end up clipped.
    pub origins: Vec<(i64, i64)>,
}

/// Compute slot placement for frames of the given `(width, height)` sizes.
pub fn plan_layout(sizes: &[(u32, u32)], height: SheetHeight) -> SpriteResult<SheetLayout> {
    if sizes.is_empty() {
        return Err(SpriteError::validation(
            "cannot lay out a sheet from an empty frame sequence",
        ));
    }

    let slot_width = sizes.iter().map(|&(w, _)| w).max().unwrap_or(0);
    let max_frame_height = sizes.iter().map(|&(_, h)| h).max().unwrap_or(0);

    let canvas_width = u32::try_from(sizes.len())
        .ok()
        .and_then(|n| slot_width.checked_mul(n))
        .ok_or_else(|| SpriteError::validation("sheet width overflow"))?;
    let canvas_height = match height {
        SheetHeight::MaxFrameWidth => slot_width,
        SheetHeight::MaxFrameHeight => max_frame_height,
    };

    let origins = sizes
        .iter()
        .enumerate()
        .map(|(i, &(w, h))| {
            let slot_left = i64::from(slot_width) * i as i64;
            let left = slot_left + i64::from((slot_width - w) / 2);
            let up = i64::from(max_frame_height) - i64::from(h);
            (left, up)
        })
        .collect();

    Ok(SheetLayout {
        slot_width,
        max_frame_height,
        canvas_width,
        canvas_height,
        origins,
    })
}

/// Composite `frames` left to right onto one transparent sheet.
#[tracing::instrument(skip(frames), fields(frames = frames.len()))]
pub fn layout_sheet(frames: &[Frame], height: SheetHeight) -> SpriteResult<Frame> {
    let sizes: Vec<(u32, u32)> = frames.iter().map(|f| (f.width, f.height)).collect();
    let layout = plan_layout(&sizes, height)?;

    let mut canvas = image::RgbaImage::new(layout.canvas_width, layout.canvas_height);
    for (frame, &(x, y)) in frames.iter().zip(&layout.origins) {
        let img = frame.to_rgba_image()?;
        image::imageops::overlay(&mut canvas, &img, x, y);
    }

    tracing::debug!(
        width = layout.canvas_width,
        height = layout.canvas_height,
        slot_width = layout.slot_width,
        "laid out sheet"
    );
    Ok(Frame::from_rgba_image(canvas))
}
