//! Label font resolution, measurement and rasterization.
//!
//! Fonts are looked up through an ordered list of font files. The first one that reads and
//! registers wins; when none do, the built-in 8x8 bitmap font is used so that a missing system
//! font never blocks asset generation.

mod bitmap;
mod outline;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::foundation::error::{SplashError, SplashResult};

use self::outline::TextLayoutEngine;

/// Font files tried in order when no explicit list is configured.
pub const DEFAULT_FONT_CANDIDATES: &[&str] = &[
    "/System/Library/Fonts/Helvetica.ttc",
    "/System/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
];

pub fn default_font_candidates() -> Vec<PathBuf> {
    DEFAULT_FONT_CANDIDATES.iter().map(PathBuf::from).collect()
}

#[derive(Clone)]
pub struct OutlineFont {
    pub path: PathBuf,
    pub family: String,
    pub bytes: Arc<Vec<u8>>,
}

impl std::fmt::Debug for OutlineFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutlineFont")
            .field("path", &self.path)
            .field("family", &self.family)
            .field("bytes_len", &self.bytes.len())
            .finish()
    }
}

#[derive(Clone, Debug)]
pub enum FontFace {
    Outline(OutlineFont),
    /// Built-in 8x8 bitmap font, always available.
    Bitmap,
}

/// A face bound to a pixel size.
#[derive(Clone, Debug)]
pub struct LabelFont {
    pub face: FontFace,
    pub size_px: u32,
}

impl LabelFont {
    pub fn bitmap(size_px: u32) -> Self {
        Self {
            face: FontFace::Bitmap,
            size_px,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.face, FontFace::Bitmap)
    }

    /// Rendered text box `(width, height)` in pixels.
    pub fn measure(&self, text: &str) -> SplashResult<(u32, u32)> {
        match &self.face {
            FontFace::Outline(f) => {
                let mut engine = TextLayoutEngine::new();
                let layout = engine.layout_line(text, &f.bytes, self.size_px as f32)?;
                Ok(outline::layout_box(&layout))
            }
            FontFace::Bitmap => bitmap::measure(text, bitmap::scale_for(self.size_px)),
        }
    }

    /// Coverage mask of the text; its dimensions equal [`LabelFont::measure`].
    pub fn rasterize(&self, text: &str) -> SplashResult<image::GrayImage> {
        match &self.face {
            FontFace::Outline(f) => {
                let mut engine = TextLayoutEngine::new();
                let layout = engine.layout_line(text, &f.bytes, self.size_px as f32)?;
                outline::rasterize_layout(&layout, &f.bytes)
            }
            FontFace::Bitmap => bitmap::rasterize(text, bitmap::scale_for(self.size_px)),
        }
    }
}

/// Resolves "a font at size N" from an ordered list of font files.
#[derive(Clone, Debug)]
pub struct FontResolver {
    candidates: Vec<PathBuf>,
}

impl Default for FontResolver {
    fn default() -> Self {
        Self::new(default_font_candidates())
    }
}

impl FontResolver {
    pub fn new(candidates: Vec<PathBuf>) -> Self {
        Self { candidates }
    }

    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    /// First usable candidate at `size_px`, else the bitmap font. Never fails.
    pub fn resolve(&self, size_px: u32) -> LabelFont {
        let size_px = size_px.max(1);
        for path in &self.candidates {
            match load_outline(path) {
                Ok(font) => {
                    tracing::debug!(path = %path.display(), family = %font.family, size_px, "font resolved");
                    return LabelFont {
                        face: FontFace::Outline(font),
                        size_px,
                    };
                }
                Err(err) => {
                    tracing::debug!(path = %path.display(), %err, "font candidate skipped");
                }
            }
        }
        tracing::warn!(
            candidates = self.candidates.len(),
            size_px,
            "no usable font found, using built-in bitmap font"
        );
        LabelFont::bitmap(size_px)
    }
}

fn load_outline(path: &Path) -> SplashResult<OutlineFont> {
    let bytes = std::fs::read(path).map_err(|_| SplashError::asset_not_found(path))?;
    let family = TextLayoutEngine::new().register_family(&bytes)?;
    Ok(OutlineFont {
        path: path.to_path_buf(),
        family,
        bytes: Arc::new(bytes),
    })
}
