use std::path::{Path, PathBuf};

use release_splash::{
    CropRect, OutputFormat, SplashConfig, SplashError, SplashJob, SplashStyle, make_splash,
    make_splashes, render_splash,
};

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "release_splash_e2e_{}_{}",
        name,
        std::process::id()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// Vertical blue-to-purple gradient, like a night-sky splash.
fn write_splash(path: &Path, w: u32, h: u32) {
    let img = image::RgbImage::from_fn(w, h, |_, y| {
        let t = (y * 255 / h.max(1)) as u8;
        image::Rgb([40 + t / 4, 30, 120 + t / 2])
    });
    img.save(path).unwrap();
}

/// Portrait with a bright face-colored center and a dark border.
fn write_portrait(path: &Path, w: u32, h: u32) {
    let img = image::RgbaImage::from_fn(w, h, |x, y| {
        if x > w / 4 && x < 3 * w / 4 && y > h / 4 && y < 3 * h / 4 {
            image::Rgba([230, 190, 160, 255])
        } else {
            image::Rgba([20, 20, 20, 255])
        }
    });
    img.save(path).unwrap();
}

fn job(dir: &Path, output: &str, splash: &Path, portrait: &Path) -> SplashJob {
    SplashJob {
        input: portrait.to_path_buf(),
        output: dir.join(output),
        config: SplashConfig {
            splash: Some(splash.to_path_buf()),
            fonts: vec![],
            ..SplashConfig::default()
        },
    }
}

#[test]
fn crop_past_portrait_edge_fails_then_valid_crop_renders() {
    let dir = temp_dir("crop");
    let splash = dir.join("splash.png");
    let portrait = dir.join("portrait.png");
    write_splash(&splash, 108, 192);
    write_portrait(&portrait, 2000, 1500);

    let mut j = job(&dir, "splash_main.jpg", &splash, &portrait);
    let _ = std::fs::remove_file(&j.output);
    j.config.crop = Some(CropRect::new(808, 0, 2016, 1200));
    let err = make_splash(&j).unwrap_err();
    assert!(matches!(err, SplashError::InvalidCrop(_)), "{err}");
    assert!(!j.output.exists());

    j.config.crop = Some(CropRect::new(400, 0, 1600, 1200));
    let report = make_splash(&j).unwrap();
    assert_eq!(report.format, OutputFormat::Jpeg);
    assert_eq!((report.width, report.height), (324, 576));
    assert!(report.font_fallback);

    let decoded = image::open(&j.output).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (324, 576));
}

#[test]
fn strip_label_and_shadow_land_in_expected_places() {
    let dir = temp_dir("pixels");
    let splash = dir.join("splash.png");
    let portrait = dir.join("portrait.png");
    write_splash(&splash, 120, 200);
    write_portrait(&portrait, 300, 200);

    let j = job(&dir, "unused.webp", &splash, &portrait);
    let rendered = render_splash(&j).unwrap();
    let g = rendered.geometry;
    let l = rendered.layout;
    let canvas = &rendered.canvas;
    assert_eq!((canvas.width, canvas.height), (360, 600));

    // Strip band sits above the bottom margin and darkens the splash.
    assert_eq!(g.strip_top + g.strip_height + g.bottom_offset, 600);
    let above = canvas.pixel(2, g.strip_top - 1);
    let inside = canvas.pixel(2, g.strip_top + 1);
    let below = canvas.pixel(2, g.strip_bottom());
    assert!(inside[2] < above[2] && inside[2] < below[2]);
    assert_eq!(inside[3], 255);

    // Gold foreground and dark shadow are both present in the label box.
    let gold = SplashStyle::default().text_color.premul();
    let mut gold_px = 0;
    let mut shadow_px = 0;
    for y in l.text_y..l.text_y + i64::from(l.text_height) + 2 {
        for x in l.text_x..l.text_x + i64::from(l.text_width) + 2 {
            let px = canvas.pixel(x as u32, y as u32);
            if px == gold {
                gold_px += 1;
            } else if u32::from(px[0]) + u32::from(px[1]) + u32::from(px[2]) < 120 {
                shadow_px += 1;
            }
        }
    }
    assert!(gold_px > 0, "no gold label pixels");
    assert!(shadow_px > 0, "no shadow pixels");

    // Circle center shows the portrait face, its corner shows the strip.
    let c = g.circle_size / 2;
    let face = canvas.pixel(
        (l.x_start + i64::from(c)) as u32,
        (l.circle_y + i64::from(c)) as u32,
    );
    assert!(face[0] > 150 && face[1] > 120);
    let corner = canvas.pixel(l.x_start as u32, l.circle_y as u32);
    let strip_same_row = canvas.pixel(0, l.circle_y as u32);
    for i in 0..4 {
        assert!(corner[i].abs_diff(strip_same_row[i]) <= 1, "{corner:?} vs {strip_same_row:?}");
    }
}

#[test]
fn identical_runs_are_byte_identical() {
    let dir = temp_dir("determinism");
    let splash = dir.join("splash.png");
    let portrait = dir.join("portrait.png");
    write_splash(&splash, 90, 160);
    write_portrait(&portrait, 120, 140);

    for ext in ["jpg", "webp"] {
        let a = job(&dir, &format!("a.{ext}"), &splash, &portrait);
        let b = job(&dir, &format!("b.{ext}"), &splash, &portrait);
        make_splash(&a).unwrap();
        make_splash(&b).unwrap();
        assert_eq!(
            std::fs::read(&a.output).unwrap(),
            std::fs::read(&b.output).unwrap(),
            "{ext}"
        );
    }
}

#[test]
fn outline_font_runs_are_byte_identical() {
    let fonts: Vec<PathBuf> = SplashConfig::default()
        .fonts
        .into_iter()
        .filter(|p| p.exists())
        .collect();
    if fonts.is_empty() {
        eprintln!("skipping outline font run: no default font file installed");
        return;
    }

    let dir = temp_dir("outline");
    let splash = dir.join("splash.png");
    let portrait = dir.join("portrait.png");
    write_splash(&splash, 120, 200);
    write_portrait(&portrait, 300, 200);

    let mut a = job(&dir, "a.webp", &splash, &portrait);
    a.config.fonts = fonts;
    let mut b = a.clone();
    b.output = dir.join("b.webp");

    let ra = make_splash(&a).unwrap();
    let rb = make_splash(&b).unwrap();
    assert!(!ra.font_fallback);
    assert_eq!(ra.layout, rb.layout);
    assert_eq!(
        std::fs::read(&a.output).unwrap(),
        std::fs::read(&b.output).unwrap()
    );

    let rendered = render_splash(&a).unwrap();
    let l = rendered.layout;
    assert!(l.text_width > 0 && l.text_height > 0);
    let gold = SplashStyle::default().text_color.premul();
    let mut gold_px = 0;
    for y in l.text_y..l.text_y + i64::from(l.text_height) {
        for x in l.text_x..l.text_x + i64::from(l.text_width) {
            if rendered.canvas.pixel(x as u32, y as u32) == gold {
                gold_px += 1;
            }
        }
    }
    assert!(gold_px > 0, "no gold label pixels");
}

#[test]
fn png_output_is_rejected_before_anything_is_written() {
    let dir = temp_dir("png");
    let j = SplashJob {
        input: dir.join("missing_portrait.png"),
        output: dir.join("out.png"),
        config: SplashConfig {
            splash: Some(dir.join("missing_splash.png")),
            ..SplashConfig::default()
        },
    };
    let _ = std::fs::remove_file(&j.output);
    let err = make_splash(&j).unwrap_err();
    assert!(matches!(err, SplashError::UnsupportedOutputFormat { .. }));
    assert!(!j.output.exists());
}

#[test]
fn missing_inputs_are_asset_not_found() {
    let dir = temp_dir("missing");
    let splash = dir.join("splash.png");
    write_splash(&splash, 30, 60);

    let j = job(&dir, "out.jpg", &splash, &dir.join("nope.png"));
    assert!(matches!(
        make_splash(&j).unwrap_err(),
        SplashError::AssetNotFound { .. }
    ));

    let j = job(&dir, "out.jpg", &dir.join("nope_splash.png"), &splash);
    assert!(matches!(
        make_splash(&j).unwrap_err(),
        SplashError::AssetNotFound { .. }
    ));
}

#[test]
fn undecodable_portrait_is_unsupported_format() {
    let dir = temp_dir("undecodable");
    let splash = dir.join("splash.png");
    let portrait = dir.join("portrait.png");
    write_splash(&splash, 30, 60);
    std::fs::write(&portrait, b"this is not a png").unwrap();

    let j = job(&dir, "out.jpg", &splash, &portrait);
    assert!(matches!(
        make_splash(&j).unwrap_err(),
        SplashError::UnsupportedImageFormat { .. }
    ));
}

#[test]
fn out_of_range_fraction_is_configuration_error() {
    let dir = temp_dir("fraction");
    let splash = dir.join("splash.png");
    let portrait = dir.join("portrait.png");
    write_splash(&splash, 30, 60);
    write_portrait(&portrait, 30, 30);

    let mut j = job(&dir, "out.jpg", &splash, &portrait);
    j.config.strip_height = 1.3;
    assert!(matches!(
        make_splash(&j).unwrap_err(),
        SplashError::InvalidConfiguration(_)
    ));
    assert!(!j.output.exists());
}

#[test]
fn reduced_opacity_blends_portrait_with_strip() {
    let dir = temp_dir("opacity");
    let splash = dir.join("splash.png");
    let portrait = dir.join("portrait.png");
    write_splash(&splash, 200, 200);
    image::RgbaImage::from_pixel(50, 50, image::Rgba([255, 255, 255, 255]))
        .save(&portrait)
        .unwrap();

    let mut j = job(&dir, "unused.jpg", &splash, &portrait);
    j.config.scale = 1;
    let full = render_splash(&j).unwrap();
    j.config.opacity = 0.5;
    let half = render_splash(&j).unwrap();
    j.config.opacity = 0.0;
    let none = render_splash(&j).unwrap();

    let l = full.layout;
    let c = full.geometry.circle_size / 2;
    let x = (l.x_start + i64::from(c)) as u32;
    let y = (l.circle_y + i64::from(c)) as u32;
    let strip_only = none.canvas.pixel(x, y);
    assert_eq!(full.canvas.pixel(x, y), [255, 255, 255, 255]);
    assert!(half.canvas.pixel(x, y)[0] < 255);
    assert!(half.canvas.pixel(x, y)[0] > strip_only[0]);
    assert_eq!(strip_only, none.canvas.pixel(0, y));
}

#[test]
fn batch_stops_at_first_failure() {
    let dir = temp_dir("batch");
    let splash = dir.join("splash.png");
    let portrait = dir.join("portrait.png");
    write_splash(&splash, 60, 100);
    write_portrait(&portrait, 80, 80);

    let first = job(&dir, "first.webp", &splash, &portrait);
    let second = job(&dir, "second.gif", &splash, &portrait);
    let third = job(&dir, "third.jpg", &splash, &portrait);
    for j in [&first, &second, &third] {
        let _ = std::fs::remove_file(&j.output);
    }

    let err = make_splashes(&[first.clone(), second, third.clone()]).unwrap_err();
    assert!(matches!(err, SplashError::UnsupportedOutputFormat { .. }));
    assert!(first.output.exists());
    assert!(!third.output.exists());

    let reports = make_splashes(&[first, third]).unwrap();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].format, OutputFormat::Webp);
    assert_eq!(reports[1].format, OutputFormat::Jpeg);
}
