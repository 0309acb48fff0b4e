use std::io::{Cursor, Write as _};
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use image::ImageEncoder as _;

use crate::assets::PremulImage;
use crate::foundation::error::{SplashError, SplashResult};

/// Quality used for lossy output.
pub const JPEG_QUALITY: u8 = 92;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg,
    Webp,
}

impl OutputFormat {
    /// Infer the container from the output extension. Anything but `.jpg`, `.jpeg` and `.webp`
    /// is rejected.
    pub fn from_path(path: &Path) -> SplashResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("jpg" | "jpeg") => Ok(Self::Jpeg),
            Some("webp") => Ok(Self::Webp),
            Some(other) => Err(SplashError::unsupported_output_format(
                path,
                format!(".{other}"),
            )),
            None => Err(SplashError::unsupported_output_format(path, "")),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Jpeg => "JPEG",
            Self::Webp => "WebP",
        }
    }
}

/// Flatten to opaque RGB and encode into memory.
pub fn encode(canvas: &PremulImage, format: OutputFormat) -> SplashResult<Vec<u8>> {
    let rgb = canvas.flatten_to_rgb8();
    let (width, height) = rgb.dimensions();
    let mut buffer = Vec::new();
    match format {
        OutputFormat::Jpeg => {
            image::codecs::jpeg::JpegEncoder::new_with_quality(
                Cursor::new(&mut buffer),
                JPEG_QUALITY,
            )
            .write_image(rgb.as_raw(), width, height, image::ExtendedColorType::Rgb8)
            .context("encode JPEG")?;
        }
        OutputFormat::Webp => {
            image::codecs::webp::WebPEncoder::new_lossless(Cursor::new(&mut buffer))
                .write_image(rgb.as_raw(), width, height, image::ExtendedColorType::Rgb8)
                .context("encode WebP")?;
        }
    }
    Ok(buffer)
}

/// Write `bytes` to `path` through a sibling temporary file and a rename, so `path` either keeps
/// its previous content or receives the complete new file.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> SplashResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let tmp = temp_sibling(path);
    let result = write_then_rename(&tmp, path, bytes);
    if result.is_err() {
        let _ = std::fs::remove_file(&tmp);
    }
    result
}

fn write_then_rename(tmp: &Path, path: &Path, bytes: &[u8]) -> SplashResult<()> {
    {
        let mut f = std::fs::File::create(tmp)
            .with_context(|| format!("create temp file '{}'", tmp.display()))?;
        f.write_all(bytes)
            .with_context(|| format!("write temp file '{}'", tmp.display()))?;
        f.sync_all()
            .with_context(|| format!("sync temp file '{}'", tmp.display()))?;
    }
    std::fs::rename(tmp, path)
        .with_context(|| format!("move '{}' into place", path.display()))?;
    Ok(())
}

fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.{}.partial", std::process::id()))
}

/// Encode and atomically write the canvas in the format implied by `path`.
#[tracing::instrument(skip(canvas), fields(width = canvas.width, height = canvas.height))]
pub fn write_output(canvas: &PremulImage, path: &Path) -> SplashResult<OutputFormat> {
    let format = OutputFormat::from_path(path)?;
    let bytes = encode(canvas, format)?;
    write_atomic(path, &bytes)?;
    tracing::info!(path = %path.display(), format = format.label(), bytes = bytes.len(), "output written");
    Ok(format)
}
