//! Render a few QR codes to PNG files, with and without a logo
//!
//! Usage: cargo run --example generate_qr [-- path/to/logo.png]

use smartqr::{Color, LogoSource, QrCompositor, StylingOptions};
use std::path::Path;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let compositor = QrCompositor::new();

    // Plain WiFi QR code
    let wifi = "WIFI:T:WPA;S:HomeNet;P:secret123;;";
    let artifact = compositor.render(wifi, &StylingOptions::default()).await?;
    artifact.save(Path::new("qr_wifi.png")).await?;
    println!("✓ WiFi QR code saved to qr_wifi.png");

    // Branded link with custom colors and an optional logo
    let mut styling = StylingOptions {
        size: 512,
        foreground: Color::parse("#1e3a8a")?,
        background: Color::parse("#f8fafc")?,
        logo_size_percent: 22,
        ..StylingOptions::default()
    };
    if let Some(logo) = std::env::args().nth(1) {
        styling.logo = Some(LogoSource::parse(&logo));
    }

    let url = "https://linkedin.com/in/johndoe";
    let branded = compositor.render(url, &styling).await?;
    branded.save(Path::new("qr_branded.png")).await?;
    println!("✓ Branded QR code saved to qr_branded.png");
    println!("  Content: {}", url);

    Ok(())
}
