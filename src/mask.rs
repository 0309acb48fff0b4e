//! Circular portrait cut-out.

use image::imageops::FilterType;

use crate::assets::PremulImage;
use crate::foundation::core::{CropRect, mul_div255};
use crate::foundation::error::{SplashError, SplashResult};
use crate::geometry::MIN_CIRCLE_SIZE;

/// Single-channel disc mask of `size x size`: 255 where the pixel center lies inside the circle
/// inscribed between the first and last pixel centers, 0 elsewhere.
///
/// At size 2 no pixel center lies inside the disc, so the mask is empty; portraits are cut at
/// [`MIN_CIRCLE_SIZE`] or larger.
pub fn circle_mask(size: u32) -> image::GrayImage {
    let c = (f64::from(size) - 1.0) / 2.0;
    let r2 = c * c;
    image::GrayImage::from_fn(size, size, |x, y| {
        let dx = f64::from(x) - c;
        let dy = f64::from(y) - c;
        if dx * dx + dy * dy <= r2 {
            image::Luma([255])
        } else {
            image::Luma([0])
        }
    })
}

/// Multiply every mask value by `opacity`, rounding to nearest.
pub fn scale_mask(mask: &mut image::GrayImage, opacity: f32) {
    if opacity >= 1.0 {
        return;
    }
    let opacity = opacity.max(0.0);
    for px in mask.pixels_mut() {
        px.0[0] = (f32::from(px.0[0]) * opacity).round() as u8;
    }
}

/// Largest centered square of `img`.
pub fn center_square(img: &image::RgbaImage) -> image::RgbaImage {
    let (w, h) = img.dimensions();
    let side = w.min(h);
    image::imageops::crop_imm(img, (w - side) / 2, (h - side) / 2, side, side).to_image()
}

/// Crop, center-square, resample to `size` and cut a disc out of a portrait.
///
/// The result is premultiplied and its alpha is the disc mask scaled by `opacity`.
#[tracing::instrument(skip(portrait), fields(src_width = portrait.width(), src_height = portrait.height()))]
pub fn circular_portrait(
    portrait: &image::RgbaImage,
    crop: Option<CropRect>,
    size: u32,
    opacity: f32,
) -> SplashResult<PremulImage> {
    if size < MIN_CIRCLE_SIZE {
        return Err(SplashError::invalid_configuration(format!(
            "circle size must be at least {MIN_CIRCLE_SIZE}px, got {size}"
        )));
    }
    if !opacity.is_finite() || !(0.0..=1.0).contains(&opacity) {
        return Err(SplashError::invalid_configuration(format!(
            "opacity must be in [0, 1], got {opacity}"
        )));
    }

    let square = match crop {
        Some(rect) => {
            rect.check_within(portrait.width(), portrait.height())?;
            let (w, h) = rect.extent()?;
            let cropped = image::imageops::crop_imm(
                portrait,
                rect.x1 as u32,
                rect.y1 as u32,
                w as u32,
                h as u32,
            )
            .to_image();
            center_square(&cropped)
        }
        None => center_square(portrait),
    };
    let resized = image::imageops::resize(&square, size, size, FilterType::Lanczos3);

    let mut mask = circle_mask(size);
    scale_mask(&mut mask, opacity);

    let mut out = PremulImage::new_transparent(size, size)?;
    for (x, y, px) in resized.enumerate_pixels() {
        let m = u16::from(mask.get_pixel(x, y).0[0]);
        if m == 0 {
            continue;
        }
        let [r, g, b, a] = px.0;
        let a = mul_div255(u16::from(a), m);
        out.put_pixel(x, y, crate::foundation::core::premul_rgba8(r, g, b, a));
    }
    Ok(out)
}
