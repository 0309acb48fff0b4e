use std::io::Cursor;
use std::path::Path;

use image::imageops::FilterType;

use crate::assets::PremulImage;
use crate::foundation::error::{SplashError, SplashResult};

/// Read and decode an image file to straight RGBA8.
///
/// The container is detected from magic bytes, so a mismatched extension still decodes.
pub fn load_rgba(path: &Path) -> SplashResult<image::RgbaImage> {
    let bytes = std::fs::read(path).map_err(|err| {
        tracing::debug!(path = %path.display(), %err, "asset read failed");
        SplashError::asset_not_found(path)
    })?;
    decode_rgba(path, &bytes)
}

pub fn decode_rgba(path: &Path, bytes: &[u8]) -> SplashResult<image::RgbaImage> {
    let reader = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|err| SplashError::unsupported_image_format(path, err.to_string()))?;
    if reader.format().is_none() {
        return Err(SplashError::unsupported_image_format(
            path,
            "unrecognized image container",
        ));
    }
    let dyn_img = reader
        .decode()
        .map_err(|err| SplashError::unsupported_image_format(path, err.to_string()))?;
    let rgba = dyn_img.to_rgba8();
    if rgba.width() == 0 || rgba.height() == 0 {
        return Err(SplashError::unsupported_image_format(
            path,
            "image has zero width or height",
        ));
    }
    Ok(rgba)
}

/// Resize by an integer factor with Lanczos3. A factor of 1 returns the image unchanged.
pub fn upscale(img: image::RgbaImage, factor: u32) -> SplashResult<image::RgbaImage> {
    if factor == 0 {
        return Err(SplashError::invalid_configuration(
            "scale must be a positive integer",
        ));
    }
    if factor == 1 {
        return Ok(img);
    }
    let (w, h) = img.dimensions();
    let (Some(nw), Some(nh)) = (w.checked_mul(factor), h.checked_mul(factor)) else {
        return Err(SplashError::invalid_configuration(format!(
            "scale {factor} overflows image dimensions {w}x{h}"
        )));
    };
    Ok(image::imageops::resize(&img, nw, nh, FilterType::Lanczos3))
}

/// Load the base splash, upscale it, and premultiply it into a compositing canvas.
#[tracing::instrument(skip_all, fields(path = %path.display(), scale = scale))]
pub fn load_splash(path: &Path, scale: u32) -> SplashResult<PremulImage> {
    let rgba = load_rgba(path)?;
    let (w, h) = rgba.dimensions();
    let rgba = upscale(rgba, scale)?;
    tracing::debug!(
        src_width = w,
        src_height = h,
        width = rgba.width(),
        height = rgba.height(),
        "splash loaded"
    );
    Ok(PremulImage::from_straight(rgba))
}
