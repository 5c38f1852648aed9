use crate::{
    Frame, Rgb, ScaleFactor,
    enhance::saturate,
    foundation::error::SpriteResult,
    keying::key_color,
    outline::{OUTLINE_LEVEL, stroke},
    scale::resize_nearest,
    sheet::{SheetHeight, layout_sheet},
};

/// Typed per-animation transform settings.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct PipelineSettings {
    pub background_color: Option<Rgb>,
    pub scale: ScaleFactor,
    pub saturation: f32,
    pub outline: bool,
}

impl PipelineSettings {
    pub fn new(scale: ScaleFactor) -> Self {
        Self {
            background_color: None,
            scale,
            saturation: 1.0,
            outline: false,
        }
    }
}

/// Run every enabled per-frame stage in order: key, resize, saturate, outline.
#[tracing::instrument(skip(frames), fields(frames = frames.len()))]
pub fn process_frames(
    frames: Vec<Frame>,
    settings: &PipelineSettings,
) -> SpriteResult<Vec<Frame>> {
    let mut frames = frames;

    if let Some(color) = settings.background_color {
        tracing::debug!(%color, "keying background color");
        frames = frames.iter().map(|f| key_color(f, color)).collect();
    }

    tracing::debug!(scale = settings.scale.get(), "resizing");
    frames = frames
        .iter()
        .map(|f| resize_nearest(f, settings.scale))
        .collect::<SpriteResult<_>>()?;

    if settings.saturation != 1.0 {
        tracing::debug!(saturation = settings.saturation, "saturating");
        frames = frames
            .iter()
            .map(|f| saturate(f, settings.saturation))
            .collect::<SpriteResult<_>>()?;
    }

    if settings.outline {
        tracing::debug!("outlining");
        frames = frames
            .iter()
            .map(|f| stroke(f, OUTLINE_LEVEL))
            .collect::<SpriteResult<_>>()?;
    }

    Ok(frames)
}

/// Transform `frames` and lay them out as one sheet.
pub fn render_sheet(
    frames: Vec<Frame>,
    settings: &PipelineSettings,
    height: SheetHeight,
) -> SpriteResult<Frame> {
    let frames = process_frames(frames, settings)?;
    layout_sheet(&frames, height)
}
