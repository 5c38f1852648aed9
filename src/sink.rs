use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    Frame,
    foundation::error::{SpriteError, SpriteResult},
    source::AnimationSource,
};

/// Output path without the frame-count suffix: `source` re-rooted under `output_root`, with a
/// file source's extension removed.
pub fn output_stem(
    input_root: &Path,
    output_root: &Path,
    source: &AnimationSource,
) -> SpriteResult<PathBuf> {
    let rel = source.path().strip_prefix(input_root).map_err(|_| {
        SpriteError::validation(format!(
            "'{}' is not inside input root '{}'",
            source.path().display(),
            input_root.display()
        ))
    })?;
    let mut stem = output_root.join(rel);
    if matches!(source, AnimationSource::File(_)) {
        stem.set_extension("");
    }
    Ok(stem)
}

/// `output/game/char/idle` with 6 frames becomes `output/game/char/idle_6.png`.
pub fn sheet_path(stem: &Path, frame_count: usize) -> PathBuf {
    let mut name = stem.file_name().unwrap_or_default().to_owned();
    name.push(format!("_{frame_count}.png"));
    stem.with_file_name(name)
}

/// True if `file_name` is `<stem_name>_<N>.png`.
pub fn is_sheet_for(file_name: &str, stem_name: &str) -> bool {
    file_name
        .strip_prefix(stem_name)
        .and_then(|rest| rest.strip_prefix('_'))
        .and_then(|rest| rest.strip_suffix(".png"))
        .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
}

/// Whether a sheet for `stem` was already written, for any frame count.
pub fn has_existing_output(stem: &Path) -> SpriteResult<bool> {
    let (Some(parent), Some(stem_name)) = (stem.parent(), stem.file_name()) else {
        return Ok(false);
    };
    let stem_name = stem_name.to_string_lossy();
    let entries = match std::fs::read_dir(parent) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e.into()),
    };
    for entry in entries {
        let entry = entry?;
        if is_sheet_for(&entry.file_name().to_string_lossy(), &stem_name) {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Destination for finished sheets.
pub trait SheetSink {
    /// Whether a sheet for `stem` already exists, in which case the animation is skipped.
    fn exists(&self, stem: &Path) -> SpriteResult<bool>;
    /// Persist one sheet and return where it went.
    fn write_sheet(
        &mut self,
        stem: &Path,
        frame_count: usize,
        sheet: &Frame,
    ) -> SpriteResult<PathBuf>;
}

/// Writes lossless PNG sheets to disk, creating parent directories as needed.
#[derive(Clone, Copy, Debug, Default)]
pub struct PngSink;

impl SheetSink for PngSink {
    fn exists(&self, stem: &Path) -> SpriteResult<bool> {
        has_existing_output(stem)
    }

    fn write_sheet(
        &mut self,
        stem: &Path,
        frame_count: usize,
        sheet: &Frame,
    ) -> SpriteResult<PathBuf> {
        let path = sheet_path(stem, frame_count);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        image::save_buffer_with_format(
            &path,
            &sheet.data,
            sheet.width,
            sheet.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(path)
    }
}

/// Keeps sheets in memory.
#[derive(Clone, Debug, Default)]
pub struct InMemorySink {
    pub sheets: Vec<(PathBuf, Frame)>,
}

impl SheetSink for InMemorySink {
    fn exists(&self, stem: &Path) -> SpriteResult<bool> {
        let Some(stem_name) = stem.file_name().map(|n| n.to_string_lossy()) else {
            return Ok(false);
        };
        Ok(self.sheets.iter().any(|(path, _)| {
            path.parent() == stem.parent()
                && path
                    .file_name()
                    .is_some_and(|n| is_sheet_for(&n.to_string_lossy(), &stem_name))
        }))
    }

    fn write_sheet(
        &mut self,
        stem: &Path,
        frame_count: usize,
        sheet: &Frame,
    ) -> SpriteResult<PathBuf> {
        let path = sheet_path(stem, frame_count);
        self.sheets.push((path.clone(), sheet.clone()));
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_sources_lose_their_extension() {
        let stem = output_stem(
            Path::new("input"),
            Path::new("output"),
            &AnimationSource::File(PathBuf::from("input/sf3/ryu/idle.gif")),
        )
        .unwrap();
        assert_eq!(stem, PathBuf::from("output/sf3/ryu/idle"));
        assert_eq!(sheet_path(&stem, 12), PathBuf::from("output/sf3/ryu/idle_12.png"));
    }

    #[test]
    fn directory_sources_keep_their_name() {
        let stem = output_stem(
            Path::new("in"),
            Path::new("out"),
            &AnimationSource::Directory(PathBuf::from("in/g/c/walk.v2")),
        )
        .unwrap();
        assert_eq!(stem, PathBuf::from("out/g/c/walk.v2"));
        assert_eq!(sheet_path(&stem, 3), PathBuf::from("out/g/c/walk.v2_3.png"));
    }

    #[test]
    fn sources_outside_input_root_are_rejected() {
        assert!(
            output_stem(
                Path::new("input"),
                Path::new("output"),
                &AnimationSource::File(PathBuf::from("elsewhere/a.png")),
            )
            .is_err()
        );
    }

    #[test]
    fn sheet_name_matching_requires_a_frame_count() {
        assert!(is_sheet_for("idle_4.png", "idle"));
        assert!(is_sheet_for("idle_12.png", "idle"));
        assert!(!is_sheet_for("idle_long_4.png", "idle"));
        assert!(!is_sheet_for("idle_.png", "idle"));
        assert!(!is_sheet_for("idle.png", "idle"));
        assert!(!is_sheet_for("walk_4.png", "idle"));
    }

    #[test]
    fn png_sink_writes_and_detects_existing_sheets() {
        let dir = tempfile::tempdir().unwrap();
        let stem = dir.path().join("nested/deeper/idle");
        let mut sink = PngSink;
        assert!(!sink.exists(&stem).unwrap());

        let sheet = Frame::filled(4, 2, [1, 2, 3, 255]);
        let path = sink.write_sheet(&stem, 2, &sheet).unwrap();
        assert_eq!(path, dir.path().join("nested/deeper/idle_2.png"));
        assert!(sink.exists(&stem).unwrap());

        let back = image::open(&path).unwrap().to_rgba8();
        assert_eq!(back.dimensions(), (4, 2));
        assert_eq!(back.get_pixel(3, 1).0, [1, 2, 3, 255]);
    }

    #[test]
    fn in_memory_sink_tracks_written_stems() {
        let mut sink = InMemorySink::default();
        let stem = PathBuf::from("out/g/c/idle");
        assert!(!sink.exists(&stem).unwrap());
        sink.write_sheet(&stem, 1, &Frame::filled(1, 1, [0, 0, 0, 255]))
            .unwrap();
        assert!(sink.exists(&stem).unwrap());
        assert!(!sink.exists(Path::new("out/g/c/walk")).unwrap());
    }
}
