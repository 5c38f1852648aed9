//! Animated GIF input.
//!
//! Frames are coalesced (disposal and partial updates applied) and cached as numbered PNGs in a
//! directory next to the GIF, named after it. Later runs reuse the cache without decoding again.

use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use image::AnimationDecoder as _;

use crate::{
    Frame,
    foundation::error::{SpriteError, SpriteResult},
    source::load_frames_from_dir,
};

/// `walk.gif` caches its frames in `walk/`.
pub fn frame_cache_dir(gif_path: &Path) -> PathBuf {
    gif_path.with_extension("")
}

pub fn frame_file_name(index: usize) -> String {
    format!("frame_{index:04}.png")
}

/// Decode every coalesced frame of a GIF.
pub fn decode_gif(path: &Path) -> SpriteResult<Vec<Frame>> {
    let file = File::open(path)?;
    let decoder = image::codecs::gif::GifDecoder::new(BufReader::new(file))
        .map_err(|e| SpriteError::decode(path, e.to_string()))?;
    let frames = decoder
        .into_frames()
        .collect_frames()
        .map_err(|e| SpriteError::decode(path, e.to_string()))?;
    Ok(frames
        .into_iter()
        .map(|f| Frame::from_rgba_image(f.into_buffer()))
        .collect())
}

/// Write the GIF's frames into `dir`, returning the frame count.
///
/// Frames land in a sibling staging directory first so an interrupted run never leaves a
/// half-filled cache behind.
pub fn coalesce_into(gif_path: &Path, dir: &Path) -> SpriteResult<usize> {
    let frames = decode_gif(gif_path)?;

    let mut staging = dir.as_os_str().to_owned();
    staging.push(".partial");
    let staging = PathBuf::from(staging);
    if staging.exists() {
        std::fs::remove_dir_all(&staging)
            .with_context(|| format!("clear staging dir '{}'", staging.display()))?;
    }
    std::fs::create_dir_all(&staging)
        .with_context(|| format!("create staging dir '{}'", staging.display()))?;

    for (i, frame) in frames.iter().enumerate() {
        let out = staging.join(frame_file_name(i));
        frame
            .to_rgba_image()?
            .save_with_format(&out, image::ImageFormat::Png)?;
    }

    std::fs::rename(&staging, dir)
        .with_context(|| format!("move frames into '{}'", dir.display()))?;
    tracing::debug!(gif = %gif_path.display(), frames = frames.len(), "coalesced gif frames");
    Ok(frames.len())
}

/// Frames of `gif_path`, decoding into the cache directory only when it does not exist yet.
pub fn read_gif_as_frames(gif_path: &Path) -> SpriteResult<Vec<Frame>> {
    let dir = frame_cache_dir(gif_path);
    if !dir.exists() {
        coalesce_into(gif_path, &dir)?;
    }
    load_frames_from_dir(&dir)
}
