use sprite2roa::{
    Batch, ConfigKey, ConfigLayer, ConfigValue, Frame, PipelineSettings, PngSink, Rgb,
    ScaleFactor, SheetHeight, UnitOutcome, layout_sheet, plan_layout, process_frames,
};

fn sprite(w: u32, h: u32, body: [u8; 4], background: [u8; 4]) -> Frame {
    let mut f = Frame::filled(w, h, background);
    for y in 1..h.saturating_sub(1) {
        for x in 1..w.saturating_sub(1) {
            let i = ((y * w + x) * 4) as usize;
            f.data[i..i + 4].copy_from_slice(&body);
        }
    }
    f
}

#[test]
fn opaque_red_frame_keyed_red_is_transparent_before_layout() {
    let settings = PipelineSettings {
        background_color: Some("255 0 0".parse().unwrap()),
        ..PipelineSettings::new(ScaleFactor::for_avg_height(30).unwrap())
    };
    let out = process_frames(vec![Frame::filled(2, 2, [255, 0, 0, 255])], &settings).unwrap();
    assert_eq!((out[0].width, out[0].height), (2, 2));
    assert!(out[0].data.chunks_exact(4).all(|px| px == [0, 0, 0, 0]));
}

#[test]
fn heterogeneous_frames_share_equal_slots() {
    let frames: Vec<Frame> = [(10u32, 20u32), (12, 18), (8, 22)]
        .iter()
        .map(|&(w, h)| Frame::filled(w, h, [30, 60, 90, 255]))
        .collect();

    let sheet = layout_sheet(&frames, SheetHeight::default()).unwrap();
    assert_eq!(sheet.width, 36);

    let layout = plan_layout(
        &frames.iter().map(|f| (f.width, f.height)).collect::<Vec<_>>(),
        SheetHeight::default(),
    )
    .unwrap();
    for (i, (f, &(x, _))) in frames.iter().zip(&layout.origins).enumerate() {
        assert_eq!(x, 12 * i as i64 + i64::from((12 - f.width) / 2));
    }
}

#[test]
fn full_pipeline_outlines_keyed_sprites_and_bottom_aligns() {
    let bg = [0, 255, 255, 255];
    let frames = vec![
        sprite(6, 8, [250, 200, 10, 255], bg),
        sprite(8, 6, [250, 200, 10, 255], bg),
    ];
    let settings = PipelineSettings {
        background_color: Some(Rgb::new(0, 255, 255)),
        outline: true,
        ..PipelineSettings::new(ScaleFactor::new(1.0).unwrap())
    };
    let processed = process_frames(frames, &settings).unwrap();
    let sheet = layout_sheet(&processed, SheetHeight::MaxFrameHeight).unwrap();
    assert_eq!((sheet.width, sheet.height), (16, 8));

    // Second frame is 6 tall, so it starts 2 rows down. Its keyed border stays clear and the
    // first opaque row becomes outline.
    assert_eq!(sheet.pixel(9, 2), Some([0, 0, 0, 255]));
    assert_eq!(sheet.pixel(9, 1), Some([0, 0, 0, 0]));
    assert_eq!(sheet.pixel(11, 4), Some([250, 200, 10, 255]));
}

#[test]
fn batch_over_png_sink_is_idempotent() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    let character = input.path().join("game/hero/walk");
    std::fs::create_dir_all(&character).unwrap();
    for (i, w) in [4u32, 6, 5].iter().enumerate() {
        Frame::filled(*w, 4, [1, 2, 3, 255])
            .into_rgba_image()
            .unwrap()
            .save_with_format(character.join(format!("{i:02}.png")), image::ImageFormat::Png)
            .unwrap();
    }

    let mut batch = Batch::new(input.path(), output.path());
    batch.overrides = ConfigLayer::new("test")
        .with(ConfigKey::AvgCharHeight, ConfigValue::Integer(30))
        .with(ConfigKey::OneFramePerFile, ConfigValue::Boolean(true));

    let report = batch.run(None, None, &mut PngSink).unwrap();
    assert_eq!(report.written(), 1);
    let UnitOutcome::Written { path, frames } = &report.units[0].outcome else {
        panic!("unexpected outcome {:?}", report.units[0].outcome);
    };
    assert_eq!(*frames, 3);
    assert_eq!(path, &output.path().join("game/hero/walk_3.png"));
    let sheet = image::open(path).unwrap().to_rgba8();
    assert_eq!(sheet.dimensions(), (18, 6));

    let again = batch.run(None, None, &mut PngSink).unwrap();
    assert_eq!(again.written(), 0);
    assert_eq!(again.units[0].outcome, UnitOutcome::SkippedExisting);
    assert!(!again.has_failures());
}
