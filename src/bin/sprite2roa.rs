use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, ValueEnum};
use sprite2roa::{Batch, ConfigKey, ConfigLayer, ConfigValue, PngSink, Rgb, SheetHeight};

/// Convert sprite animations under `<input>/<game>/<character>/` into sprite sheets.
///
/// Settings resolve from command line flags first, then `<character>/config.toml`, then
/// `<game>/config.toml` (both with a `[config]` table), then defaults.
#[derive(Parser, Debug)]
#[command(name = "sprite2roa", version)]
struct Cli {
    /// Game to process (a directory in the input root). All games when omitted.
    game: Option<String>,

    /// Character to process (a directory in the game's folder). All characters when omitted.
    character: Option<String>,

    /// Input root.
    #[arg(long, default_value = "input")]
    input: PathBuf,

    /// Output root; the input layout is mirrored here.
    #[arg(long, default_value = "output")]
    output: PathBuf,

    /// Average character height of the source sprites, in pixels (e.g. 230).
    /// Sprites are scaled so this becomes ~30 px. Required here or in a config file.
    #[arg(long)]
    avg_char_height: Option<u32>,

    /// Treat every directory as one animation whose files are its frames, instead of treating
    /// every file (image, sheet or GIF) as one animation.
    #[arg(long)]
    one_frame_per_file: bool,

    /// Add a single pixel black outline around the sprites.
    #[arg(long)]
    should_outline: bool,

    /// RGB value to replace with transparency, e.g. "64 64 64".
    #[arg(long, value_parser = parse_rgb)]
    background_color: Option<Rgb>,

    /// Scale color saturation by this amount, e.g. 1.5.
    #[arg(long)]
    saturation: Option<f64>,

    /// How tall the output sheet canvas is.
    #[arg(long, value_enum, default_value_t = SheetHeightChoice::MaxFrameWidth)]
    sheet_height: SheetHeightChoice,

    /// Print the per-animation report as JSON on stdout.
    #[arg(long)]
    report_json: bool,

    /// More logging (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SheetHeightChoice {
    MaxFrameWidth,
    MaxFrameHeight,
}

fn parse_rgb(s: &str) -> Result<Rgb, String> {
    s.parse::<Rgb>().map_err(|e| e.to_string())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut batch = Batch::new(&cli.input, &cli.output);
    batch.overrides = overrides_from(&cli);
    batch.sheet_height = match cli.sheet_height {
        SheetHeightChoice::MaxFrameWidth => SheetHeight::MaxFrameWidth,
        SheetHeightChoice::MaxFrameHeight => SheetHeight::MaxFrameHeight,
    };

    let mut sink = PngSink;
    let report = batch
        .run(cli.game.as_deref(), cli.character.as_deref(), &mut sink)
        .with_context(|| format!("process input root '{}'", cli.input.display()))?;

    if cli.report_json {
        let json = serde_json::to_string_pretty(&report).context("serialize report")?;
        println!("{json}");
    }

    eprintln!(
        "{} written, {} skipped, {} failed",
        report.written(),
        report.skipped(),
        report.failed()
    );
    if report.has_failures() {
        anyhow::bail!("{} animation(s) failed", report.failed());
    }
    Ok(())
}

fn overrides_from(cli: &Cli) -> ConfigLayer {
    let mut layer = ConfigLayer::new("command line");
    if let Some(h) = cli.avg_char_height {
        layer.set(ConfigKey::AvgCharHeight, ConfigValue::Integer(i64::from(h)));
    }
    if let Some(color) = cli.background_color {
        layer.set(ConfigKey::BackgroundColor, ConfigValue::Color(color));
    }
    if let Some(s) = cli.saturation {
        layer.set(ConfigKey::Saturation, ConfigValue::Float(s));
    }
    // Flags only override when given, so config files can still turn them on.
    if cli.should_outline {
        layer.set(ConfigKey::ShouldOutline, ConfigValue::Boolean(true));
    }
    if cli.one_frame_per_file {
        layer.set(ConfigKey::OneFramePerFile, ConfigValue::Boolean(true));
    }
    layer
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
