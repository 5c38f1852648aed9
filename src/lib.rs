//! Convert character sprite animations into bottom-aligned sprite sheets.
//!
//! Frames flow through [`process_frames`] (color keying, nearest-neighbor rescale, saturation,
//! outline) and are composited by [`layout_sheet`]. [`Batch`] drives whole
//! `input/<game>/<character>/` trees with layered configuration.
#![forbid(unsafe_code)]

mod foundation;

pub mod batch;
pub mod config;
pub mod enhance;
pub mod gif;
pub mod keying;
pub mod mask;
pub mod outline;
pub mod pipeline;
pub mod scale;
pub mod sheet;
pub mod sink;
pub mod source;

pub use batch::{Batch, RunReport, UnitOutcome, UnitReport};
pub use config::{AnimationSettings, ConfigKey, ConfigLayer, ConfigValue, LayeredConfig};
pub use foundation::core::{Frame, Rgb, ScaleFactor, TARGET_AVG_HEIGHT};
pub use foundation::error::{SpriteError, SpriteResult};
pub use outline::OUTLINE_LEVEL;
pub use pipeline::{PipelineSettings, process_frames, render_sheet};
pub use sheet::{SheetHeight, SheetLayout, layout_sheet, plan_layout};
pub use sink::{InMemorySink, PngSink, SheetSink};
pub use source::AnimationSource;
