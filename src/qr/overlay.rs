//! Circular logo overlay drawn on top of a rasterized QR symbol

use crate::qr::Color;
use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage};

/// Largest logo diameter as a fraction of the image's linear size
pub const MAX_LOGO_FRACTION: f64 = 0.25;

/// Background disc extends this many pixels past the logo radius
pub const LOGO_PADDING: f64 = 6.0;

/// Width of the foreground ring around the background disc
const STROKE_WIDTH: f64 = 1.0;

/// Logo diameter in pixels for a `size` x `size` image.
///
/// Capped at 25% of `size` whatever the requested percentage, so the obscured
/// area stays inside the High error-correction budget.
pub fn logo_diameter(size: u32, percent: u8) -> f64 {
    let requested = f64::from(percent.min(100)) / 100.0 * f64::from(size);
    requested.min(MAX_LOGO_FRACTION * f64::from(size))
}

/// Draw the padded background disc, its ring and the clipped logo onto `canvas`.
pub fn draw_logo(
    canvas: &mut RgbaImage,
    logo: &DynamicImage,
    diameter: f64,
    foreground: Color,
    background: Color,
) {
    let (width, height) = canvas.dimensions();
    let cx = f64::from(width) / 2.0;
    let cy = f64::from(height) / 2.0;
    let logo_radius = diameter / 2.0;
    let disc_radius = logo_radius + LOGO_PADDING;

    // Disc and ring.
    let ring_inner = disc_radius - STROKE_WIDTH / 2.0;
    let ring_outer = disc_radius + STROKE_WIDTH / 2.0;
    for_each_in_radius(canvas, cx, cy, ring_outer, |pixel, dist| {
        if dist <= ring_inner {
            blend(pixel, background.rgba());
        } else {
            blend(pixel, foreground.rgba());
        }
    });

    let side = diameter.round() as u32;
    if side == 0 {
        return;
    }

    // Logo scaled to fill the clip circle's bounding square, then clipped.
    let scaled = imageops::resize(&logo.to_rgba8(), side, side, FilterType::Lanczos3);
    let origin_x = (cx - f64::from(side) / 2.0).round() as i64;
    let origin_y = (cy - f64::from(side) / 2.0).round() as i64;

    for (lx, ly, src) in scaled.enumerate_pixels() {
        let px = origin_x + i64::from(lx);
        let py = origin_y + i64::from(ly);
        if px < 0 || py < 0 || px >= i64::from(width) || py >= i64::from(height) {
            continue;
        }
        let dx = px as f64 + 0.5 - cx;
        let dy = py as f64 + 0.5 - cy;
        if (dx * dx + dy * dy).sqrt() <= logo_radius {
            blend(canvas.get_pixel_mut(px as u32, py as u32), *src);
        }
    }
}

fn for_each_in_radius<F>(canvas: &mut RgbaImage, cx: f64, cy: f64, radius: f64, mut f: F)
where
    F: FnMut(&mut Rgba<u8>, f64),
{
    let (width, height) = canvas.dimensions();
    let x0 = (cx - radius).floor().max(0.0) as u32;
    let y0 = (cy - radius).floor().max(0.0) as u32;
    let x1 = ((cx + radius).ceil() as u32).min(width);
    let y1 = ((cy + radius).ceil() as u32).min(height);

    for y in y0..y1 {
        for x in x0..x1 {
            let dx = f64::from(x) + 0.5 - cx;
            let dy = f64::from(y) + 0.5 - cy;
            let dist = (dx * dx + dy * dy).sqrt();
            if dist <= radius {
                f(canvas.get_pixel_mut(x, y), dist);
            }
        }
    }
}

/// Source-over alpha compositing
fn blend(dst: &mut Rgba<u8>, src: Rgba<u8>) {
    let sa = f64::from(src.0[3]) / 255.0;
    if sa <= 0.0 {
        return;
    }
    let da = f64::from(dst.0[3]) / 255.0;
    let out_a = sa + da * (1.0 - sa);
    for i in 0..3 {
        let s = f64::from(src.0[i]) * sa;
        let d = f64::from(dst.0[i]) * da * (1.0 - sa);
        dst.0[i] = ((s + d) / out_a).round().clamp(0.0, 255.0) as u8;
    }
    dst.0[3] = (out_a * 255.0).round() as u8;
}
