use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    Frame,
    foundation::error::{SpriteError, SpriteResult},
    gif,
};

/// Extensions (lowercase) treated as frame images. Everything else, config files included, is
/// ignored during discovery.
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "png", "bmp", "gif", "jpg", "jpeg", "tga", "tif", "tiff", "webp",
];

pub fn is_image_path(path: &Path) -> bool {
    extension_lower(path).is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

pub fn is_gif_path(path: &Path) -> bool {
    extension_lower(path).is_some_and(|ext| ext == "gif")
}

fn extension_lower(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
}

/// Where one animation's frames come from.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub enum AnimationSource {
    /// A single still image, or an animated GIF.
    File(PathBuf),
    /// A directory whose image files are the frames, in lexical order.
    Directory(PathBuf),
}

impl AnimationSource {
    pub fn path(&self) -> &Path {
        match self {
            AnimationSource::File(p) | AnimationSource::Directory(p) => p,
        }
    }
}

/// Directory entries sorted by path.
pub fn sorted_entries(dir: &Path) -> SpriteResult<Vec<PathBuf>> {
    let mut out = Vec::new();
    for entry in
        std::fs::read_dir(dir).with_context(|| format!("read directory '{}'", dir.display()))?
    {
        let entry = entry.with_context(|| format!("read entry in '{}'", dir.display()))?;
        out.push(entry.path());
    }
    out.sort();
    Ok(out)
}

pub fn subdirectories(dir: &Path) -> SpriteResult<Vec<PathBuf>> {
    Ok(sorted_entries(dir)?
        .into_iter()
        .filter(|p| p.is_dir())
        .collect())
}

pub fn image_files(dir: &Path) -> SpriteResult<Vec<PathBuf>> {
    Ok(sorted_entries(dir)?
        .into_iter()
        .filter(|p| p.is_file() && is_image_path(p))
        .collect())
}

fn subdirectories_recursive(dir: &Path, out: &mut Vec<PathBuf>) -> SpriteResult<()> {
    for sub in subdirectories(dir)? {
        out.push(sub.clone());
        subdirectories_recursive(&sub, out)?;
    }
    Ok(())
}

/// List the animations inside a character directory.
///
/// With `one_frame_per_file` every sub-directory (at any depth) is one animation; otherwise
/// every image file directly inside `character_dir` is.
pub fn discover_animations(
    character_dir: &Path,
    one_frame_per_file: bool,
) -> SpriteResult<Vec<AnimationSource>> {
    if one_frame_per_file {
        let mut dirs = Vec::new();
        subdirectories_recursive(character_dir, &mut dirs)?;
        dirs.sort();
        Ok(dirs.into_iter().map(AnimationSource::Directory).collect())
    } else {
        Ok(image_files(character_dir)?
            .into_iter()
            .map(AnimationSource::File)
            .collect())
    }
}

/// Decode one image file into an RGBA frame.
pub fn load_frame(path: &Path) -> SpriteResult<Frame> {
    match image::open(path) {
        Ok(img) => Ok(Frame::from_rgba_image(img.to_rgba8())),
        Err(image::ImageError::IoError(e)) => Err(SpriteError::Io(e)),
        Err(e) => Err(SpriteError::decode(path, e.to_string())),
    }
}

/// Load every image in `dir` in lexical order, skipping frames that fail to open or decode.
pub fn load_frames_from_dir(dir: &Path) -> SpriteResult<Vec<Frame>> {
    let mut frames = Vec::new();
    for path in image_files(dir)? {
        match load_frame(&path) {
            Ok(frame) => frames.push(frame),
            Err(e) if e.is_transient_access() => {
                tracing::warn!(path = %path.display(), error = %e, "frame file is locked, skipping");
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to decode frame, skipping");
            }
        }
    }
    Ok(frames)
}

/// Decode the full frame sequence of one animation.
#[tracing::instrument(skip_all, fields(source = %source.path().display()))]
pub fn load_animation(source: &AnimationSource) -> SpriteResult<Vec<Frame>> {
    match source {
        AnimationSource::File(path) if is_gif_path(path) => gif::read_gif_as_frames(path),
        AnimationSource::File(path) => Ok(vec![load_frame(path)?]),
        AnimationSource::Directory(dir) => load_frames_from_dir(dir),
    }
}
