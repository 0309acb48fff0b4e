use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::core::CropRect;
use crate::foundation::error::{SplashError, SplashResult};
use crate::geometry::check_fraction;
use crate::render::SplashStyle;
use crate::text::default_font_candidates;

/// Base splash used when no override is given, relative to the repository root.
pub const DEFAULT_SPLASH: &str = "assets/splashscreens/stardroid_big_image.webp";

pub const DEFAULT_LABEL: &str = "Venus";
pub const DEFAULT_STRIP_HEIGHT: f64 = 0.13;
pub const DEFAULT_OPACITY: f32 = 1.0;
pub const DEFAULT_BOTTOM_MARGIN: f64 = 0.07;
pub const DEFAULT_SCALE: u32 = 3;

/// Options of one splash render.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SplashConfig {
    pub label: String,
    pub crop: Option<CropRect>,
    pub splash: Option<PathBuf>,
    /// Strip height as a fraction of the splash height.
    pub strip_height: f64,
    /// Portrait circle opacity.
    pub opacity: f32,
    /// Gap below the strip as a fraction of the splash height, to clear the navigation bar.
    pub bottom_margin: f64,
    /// Integer upscale applied to the splash before compositing.
    pub scale: u32,
    /// Font files tried in order before the built-in font.
    pub fonts: Vec<PathBuf>,
    pub style: SplashStyle,
}

impl Default for SplashConfig {
    fn default() -> Self {
        Self {
            label: DEFAULT_LABEL.to_string(),
            crop: None,
            splash: None,
            strip_height: DEFAULT_STRIP_HEIGHT,
            opacity: DEFAULT_OPACITY,
            bottom_margin: DEFAULT_BOTTOM_MARGIN,
            scale: DEFAULT_SCALE,
            fonts: default_font_candidates(),
            style: SplashStyle::default(),
        }
    }
}

impl SplashConfig {
    pub fn validate(&self) -> SplashResult<()> {
        if self.label.trim().is_empty() {
            return Err(SplashError::invalid_configuration("label must be non-empty"));
        }
        check_fraction("strip height", self.strip_height)?;
        check_fraction("bottom margin", self.bottom_margin)?;
        if !self.opacity.is_finite() || !(0.0..=1.0).contains(&self.opacity) {
            return Err(SplashError::invalid_configuration(format!(
                "opacity must be in [0, 1], got {}",
                self.opacity
            )));
        }
        if self.scale == 0 {
            return Err(SplashError::invalid_configuration(
                "scale must be a positive integer",
            ));
        }
        if let Some(crop) = self.crop {
            crop.extent()?;
        }
        Ok(())
    }

    pub fn splash_path(&self) -> &Path {
        self.splash
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_SPLASH))
    }
}

/// A portrait, an output path, and the options to render it with.
#[derive(Clone, Debug, PartialEq)]
pub struct SplashJob {
    pub input: PathBuf,
    pub output: PathBuf,
    pub config: SplashConfig,
}

/// Several variants of one release splash (typically main and large) sharing a portrait and label.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BatchManifest {
    pub input: PathBuf,
    #[serde(default = "default_label")]
    pub label: String,
    #[serde(default)]
    pub crop: Option<CropRect>,
    #[serde(default = "default_font_candidates")]
    pub fonts: Vec<PathBuf>,
    #[serde(default)]
    pub style: SplashStyle,
    pub variants: Vec<BatchVariant>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BatchVariant {
    pub output: PathBuf,
    #[serde(default)]
    pub splash: Option<PathBuf>,
    #[serde(default)]
    pub strip_height: Option<f64>,
    #[serde(default)]
    pub opacity: Option<f32>,
    #[serde(default)]
    pub bottom_margin: Option<f64>,
    #[serde(default)]
    pub scale: Option<u32>,
}

fn default_label() -> String {
    DEFAULT_LABEL.to_string()
}

impl BatchManifest {
    pub fn from_json_str(s: &str) -> SplashResult<Self> {
        serde_json::from_str(s).map_err(|err| {
            SplashError::invalid_configuration(format!("parse batch manifest: {err}"))
        })
    }

    pub fn read(path: &Path) -> SplashResult<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read batch manifest '{}'", path.display()))?;
        Self::from_json_str(&s)
    }

    /// Expand into one job per variant. Relative paths resolve against `base_dir`.
    pub fn jobs(&self, base_dir: &Path) -> SplashResult<Vec<SplashJob>> {
        if self.variants.is_empty() {
            return Err(SplashError::invalid_configuration(
                "batch manifest has no variants",
            ));
        }
        let resolve = |p: &Path| -> PathBuf {
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                base_dir.join(p)
            }
        };

        let mut jobs = Vec::with_capacity(self.variants.len());
        for v in &self.variants {
            let defaults = SplashConfig::default();
            let config = SplashConfig {
                label: self.label.clone(),
                crop: self.crop,
                splash: v.splash.as_deref().map(resolve),
                strip_height: v.strip_height.unwrap_or(defaults.strip_height),
                opacity: v.opacity.unwrap_or(defaults.opacity),
                bottom_margin: v.bottom_margin.unwrap_or(defaults.bottom_margin),
                scale: v.scale.unwrap_or(defaults.scale),
                fonts: self.fonts.iter().map(|p| resolve(p.as_path())).collect(),
                style: self.style,
            };
            config.validate()?;
            jobs.push(SplashJob {
                input: resolve(self.input.as_path()),
                output: resolve(v.output.as_path()),
                config,
            });
        }
        Ok(jobs)
    }
}
