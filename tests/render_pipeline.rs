use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

use smartqr::qr::overlay::logo_diameter;
use smartqr::{
    AnalyticsEntry, AnalyticsLog, Color, Error, FileStore, LogoSource, QrCompositor, QrDecoder,
    QrEncoder, StylingOptions,
};

fn write_logo(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("logo.png");
    let logo = RgbaImage::from_fn(64, 64, |x, y| {
        if (x / 8 + y / 8) % 2 == 0 {
            Rgba([230, 60, 30, 255])
        } else {
            Rgba([250, 200, 40, 255])
        }
    });
    logo.save_with_format(&path, ImageFormat::Png)
        .expect("write logo");
    path
}

#[tokio::test]
async fn wifi_scenario_renders_256_square() {
    let styling = StylingOptions {
        size: 256,
        foreground: Color::parse("#000000").unwrap(),
        background: Color::parse("#ffffff").unwrap(),
        ..StylingOptions::default()
    };

    let artifact = QrCompositor::new()
        .render("WIFI:T:WPA;S:HomeNet;P:secret123;;", &styling)
        .await
        .expect("render wifi");

    assert_eq!((artifact.width(), artifact.height()), (256, 256));

    let png = artifact.png_bytes().expect("png");
    let decoded = image::load_from_memory(&png).expect("decode png");
    assert_eq!((decoded.width(), decoded.height()), (256, 256));
    assert_eq!(
        QrDecoder::new().decode_bytes(&png).expect("scan"),
        "WIFI:T:WPA;S:HomeNet;P:secret123;;"
    );
}

#[tokio::test]
async fn logo_file_overlay_stays_scannable() {
    let dir = tempfile::tempdir().unwrap();
    let logo = write_logo(dir.path());

    let styling = StylingOptions {
        size: 512,
        logo_size_percent: 100,
        ..StylingOptions::default()
    }
    .with_logo(LogoSource::Path(logo));

    let payload = "https://example.com/events/tech-conference-2024";
    let artifact = QrCompositor::new()
        .render(payload, &styling)
        .await
        .expect("render with logo");

    let plain = QrEncoder::new()
        .rasterize(payload, 512, styling.foreground, styling.background)
        .unwrap();
    assert_ne!(artifact.image, plain, "logo should change the center");

    // Requested 100% is capped at 25%: pixels outside the padded disc are untouched.
    let cap = logo_diameter(512, 100);
    assert_eq!(cap, 128.0);
    let outside = (256.0 + cap / 2.0 + 8.0) as u32;
    assert_eq!(artifact.image.get_pixel(outside, 256), plain.get_pixel(outside, 256));

    let text = QrDecoder::new()
        .decode(&DynamicImage::ImageRgba8(artifact.image))
        .expect("scan with logo");
    assert_eq!(text, payload);
}

#[tokio::test]
async fn missing_logo_file_falls_back_to_plain_symbol() {
    let styling =
        StylingOptions::default().with_logo(LogoSource::parse("/definitely/not/here.png"));

    let artifact = QrCompositor::new()
        .render("fallback", &styling)
        .await
        .expect("render despite missing logo");

    let plain = QrEncoder::new()
        .rasterize("fallback", 256, Color::BLACK, Color::WHITE)
        .unwrap();
    assert_eq!(artifact.image, plain);
}

#[tokio::test]
async fn payload_over_capacity_is_encoding_error() {
    let err = QrCompositor::new()
        .render(&"A".repeat(4000), &StylingOptions::default())
        .await
        .expect_err("too long for level H");
    assert!(matches!(err, Error::Encoding(_)));
}

#[tokio::test]
async fn byte_capacity_boundary_at_level_h() {
    let compositor = QrCompositor::new();
    let styling = StylingOptions::default();

    let fits = compositor.render(&"x".repeat(1273), &styling).await;
    assert!(fits.is_ok(), "1273 bytes is the version 40-H limit");

    let err = compositor
        .render(&"x".repeat(1274), &styling)
        .await
        .expect_err("one byte past the limit");
    assert!(matches!(err, Error::Encoding(_)));
}

#[test]
fn history_round_trip_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let log = AnalyticsLog::new(FileStore::open(dir.path()).unwrap());

    let entry = AnalyticsEntry::new("WiFi", "home wifi", "WIFI:T:WPA;S:HomeNet;P:secret123;;");
    log.append(AnalyticsEntry::new("Text", "hello", "hello"))
        .unwrap();
    log.append(entry.clone()).unwrap();

    let reopened = AnalyticsLog::new(FileStore::open(dir.path()).unwrap());
    assert_eq!(reopened.list_all().unwrap()[0], entry);
    assert_eq!(reopened.stats().unwrap().wifi, 1);

    assert!(reopened.remove(&entry.id).unwrap());
    let remaining = reopened.list_all().unwrap();
    assert!(remaining.iter().all(|e| e.id != entry.id));

    reopened.clear().unwrap();
    assert!(reopened.list_all().unwrap().is_empty());
}
