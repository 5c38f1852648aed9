use std::path::{Path, PathBuf};

fn exe() -> PathBuf {
    std::env::var_os("CARGO_BIN_EXE_sprite2roa")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let mut p = PathBuf::from("target").join("debug");
            p.push(if cfg!(windows) {
                "sprite2roa.exe"
            } else {
                "sprite2roa"
            });
            p
        })
}

fn write_sprite(path: &Path, w: u32, h: u32) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    // Sprite on a flat gray background.
    let img = image::RgbaImage::from_fn(w, h, |x, y| {
        if x > 0 && y > 0 && x + 1 < w && y + 1 < h {
            image::Rgba([200, 40, 40, 255])
        } else {
            image::Rgba([64, 64, 64, 255])
        }
    });
    img.save_with_format(path, image::ImageFormat::Png).unwrap();
}

#[test]
fn cli_writes_sheet_and_skips_on_rerun() {
    let root = tempfile::tempdir().unwrap();
    let input = root.path().join("input");
    let output = root.path().join("output");
    write_sprite(&input.join("game/hero/idle.png"), 12, 12);

    let run = || {
        std::process::Command::new(exe())
            .arg("--input")
            .arg(&input)
            .arg("--output")
            .arg(&output)
            .args([
                "--avg-char-height",
                "60",
                "--background-color",
                "64 64 64",
                "--should-outline",
            ])
            .status()
            .unwrap()
    };

    assert!(run().success());
    let sheet_path = output.join("game/hero/idle_1.png");
    assert!(sheet_path.exists());

    let sheet = image::open(&sheet_path).unwrap().to_rgba8();
    assert_eq!(sheet.dimensions(), (6, 6));
    // Keyed background stays transparent, the sprite's rim gets the outline.
    assert_eq!(sheet.get_pixel(5, 5).0[3], 0);
    assert_eq!(sheet.get_pixel(4, 4).0, [0, 0, 0, 255]);
    assert_eq!(sheet.get_pixel(2, 2).0, [200, 40, 40, 255]);

    let before = std::fs::metadata(&sheet_path).unwrap().modified().unwrap();
    assert!(run().success());
    let after = std::fs::metadata(&sheet_path).unwrap().modified().unwrap();
    assert_eq!(before, after);
}

#[test]
fn cli_reports_failure_without_avg_char_height() {
    let root = tempfile::tempdir().unwrap();
    let input = root.path().join("input");
    write_sprite(&input.join("game/hero/idle.png"), 4, 4);

    let out = std::process::Command::new(exe())
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(root.path().join("output"))
        .arg("--report-json")
        .output()
        .unwrap();

    assert!(!out.status.success());
    let report: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(report["units"][0]["status"], "failed");
    assert!(
        report["units"][0]["error"]
            .as_str()
            .unwrap()
            .contains("avg_char_height")
    );
}

#[test]
fn cli_skips_undecodable_file_and_exits_cleanly() {
    let root = tempfile::tempdir().unwrap();
    let input = root.path().join("input");
    write_sprite(&input.join("game/hero/idle.png"), 4, 4);
    std::fs::write(input.join("game/hero/broken.png"), b"garbage").unwrap();

    let out = std::process::Command::new(exe())
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(root.path().join("output"))
        .args(["--avg-char-height", "30", "--report-json"])
        .output()
        .unwrap();

    assert!(out.status.success());
    let report: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(report["units"][0]["status"], "skipped_unreadable");
    assert_eq!(report["units"][1]["status"], "written");
}

#[test]
fn cli_rejects_malformed_background_color() {
    let root = tempfile::tempdir().unwrap();
    let status = std::process::Command::new(exe())
        .arg("--input")
        .arg(root.path())
        .args(["--background-color", "1 2"])
        .stderr(std::process::Stdio::null())
        .status()
        .unwrap();
    assert!(!status.success());
}
