use std::path::{Path, PathBuf};

use crate::{
    config::{ConfigLayer, LayeredConfig},
    foundation::error::{SpriteError, SpriteResult},
    pipeline::render_sheet,
    sheet::SheetHeight,
    sink::{SheetSink, output_stem},
    source::{AnimationSource, discover_animations, load_animation, subdirectories},
};

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UnitOutcome {
    Written { path: PathBuf, frames: usize },
    SkippedExisting,
    SkippedEmpty,
    /// The animation's file could not be decoded. Logged as a warning, not a failure.
    SkippedUnreadable { error: String },
    Failed { error: String },
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct UnitReport {
    /// Path of the unit relative to the input root.
    pub unit: String,
    #[serde(flatten)]
    pub outcome: UnitOutcome,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct RunReport {
    pub units: Vec<UnitReport>,
}

impl RunReport {
    fn count(&self, pred: impl Fn(&UnitOutcome) -> bool) -> usize {
        self.units.iter().filter(|u| pred(&u.outcome)).count()
    }

    pub fn written(&self) -> usize {
        self.count(|o| matches!(o, UnitOutcome::Written { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| {
            matches!(
                o,
                UnitOutcome::SkippedExisting
                    | UnitOutcome::SkippedEmpty
                    | UnitOutcome::SkippedUnreadable { .. }
            )
        })
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, UnitOutcome::Failed { .. }))
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }
}

/// Converts every animation under `input_root/<game>/<character>/` into a sheet under
/// `output_root`, mirroring the directory layout.
#[derive(Clone, Debug)]
pub struct Batch {
    pub input_root: PathBuf,
    pub output_root: PathBuf,
    /// Highest-precedence config layer, usually built from command line flags.
    pub overrides: ConfigLayer,
    pub sheet_height: SheetHeight,
}

impl Batch {
    pub fn new(input_root: impl Into<PathBuf>, output_root: impl Into<PathBuf>) -> Self {
        Self {
            input_root: input_root.into(),
            output_root: output_root.into(),
            overrides: ConfigLayer::new("command line"),
            sheet_height: SheetHeight::default(),
        }
    }

    /// Process one game (or all of them) and one character (or all of them).
    ///
    /// Only a missing input root or a missing named game/character is an error; every
    /// per-animation failure is recorded in the report instead.
    pub fn run(
        &self,
        game: Option<&str>,
        character: Option<&str>,
        sink: &mut dyn SheetSink,
    ) -> SpriteResult<RunReport> {
        let games = match game {
            Some(name) => vec![existing_dir(&self.input_root.join(name))?],
            None => subdirectories(&self.input_root)?,
        };

        let mut report = RunReport::default();
        for game_dir in games {
            let characters = match character {
                Some(name) => vec![existing_dir(&game_dir.join(name))?],
                None => subdirectories(&game_dir)?,
            };
            for character_dir in characters {
                self.process_character(&game_dir, &character_dir, sink, &mut report);
            }
        }

        tracing::info!(
            written = report.written(),
            skipped = report.skipped(),
            failed = report.failed(),
            "batch finished"
        );
        Ok(report)
    }

    fn process_character(
        &self,
        game_dir: &Path,
        character_dir: &Path,
        sink: &mut dyn SheetSink,
        report: &mut RunReport,
    ) {
        let label = self.unit_label(character_dir);
        let sources = LayeredConfig::for_character(&self.overrides, game_dir, character_dir)
            .and_then(|config| {
                let sources = discover_animations(character_dir, config.one_frame_per_file())?;
                Ok((config, sources))
            });
        let (config, sources) = match sources {
            Ok(v) => v,
            Err(e) => {
                tracing::error!(character = %label, error = %e, "skipping character");
                self.fail_character(label, character_dir, &e, report);
                return;
            }
        };

        for source in &sources {
            report
                .units
                .push(self.process_animation(&config, source, sink));
        }
    }

    // One failed unit per blocked animation, or the character itself if none can be discovered.
    fn fail_character(
        &self,
        label: String,
        character_dir: &Path,
        error: &SpriteError,
        report: &mut RunReport,
    ) {
        let fallback = LayeredConfig::new(vec![self.overrides.clone(), ConfigLayer::defaults()]);
        let sources =
            discover_animations(character_dir, fallback.one_frame_per_file()).unwrap_or_default();
        if sources.is_empty() {
            report.units.push(UnitReport {
                unit: label,
                outcome: UnitOutcome::Failed {
                    error: error.to_string(),
                },
            });
            return;
        }
        for source in &sources {
            let unit = self.unit_label(source.path());
            report.units.push(UnitReport {
                outcome: UnitOutcome::Failed {
                    error: format!("{unit}: {error}"),
                },
                unit,
            });
        }
    }

    /// Convert a single animation. Never fails; errors end up in the returned report.
    pub fn process_animation(
        &self,
        config: &LayeredConfig,
        source: &AnimationSource,
        sink: &mut dyn SheetSink,
    ) -> UnitReport {
        let unit = self.unit_label(source.path());
        let outcome = match self.try_process_animation(&unit, config, source, sink) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(unit = %unit, error = %e, "animation failed");
                UnitOutcome::Failed {
                    error: e.to_string(),
                }
            }
        };
        UnitReport { unit, outcome }
    }

    fn try_process_animation(
        &self,
        unit: &str,
        config: &LayeredConfig,
        source: &AnimationSource,
        sink: &mut dyn SheetSink,
    ) -> SpriteResult<UnitOutcome> {
        let stem = output_stem(&self.input_root, &self.output_root, source)?;
        if sink.exists(&stem)? {
            tracing::debug!(unit, "output exists, skipping");
            return Ok(UnitOutcome::SkippedExisting);
        }

        let settings = config.animation_settings(unit)?.pipeline()?;
        let frames = match load_animation(source) {
            Ok(frames) => frames,
            Err(e) if e.is_decode() || e.is_transient_access() => {
                tracing::warn!(unit, error = %e, "animation could not be read, skipping");
                return Ok(UnitOutcome::SkippedUnreadable {
                    error: e.to_string(),
                });
            }
            Err(e) => return Err(e),
        };
        if frames.is_empty() {
            tracing::warn!(unit, "no readable frames, skipping");
            return Ok(UnitOutcome::SkippedEmpty);
        }

        tracing::info!(unit, frames = frames.len(), "processing");
        let frame_count = frames.len();
        let sheet = render_sheet(frames, &settings, self.sheet_height)?;
        let path = sink.write_sheet(&stem, frame_count, &sheet)?;
        tracing::info!(path = %path.display(), "wrote sheet");
        Ok(UnitOutcome::Written {
            path,
            frames: frame_count,
        })
    }

    fn unit_label(&self, path: &Path) -> String {
        path.strip_prefix(&self.input_root)
            .unwrap_or(path)
            .display()
            .to_string()
    }
}

fn existing_dir(path: &Path) -> SpriteResult<PathBuf> {
    if path.is_dir() {
        Ok(path.to_path_buf())
    } else {
        Err(SpriteError::validation(format!(
            "'{}' is not a directory",
            path.display()
        )))
    }
}
