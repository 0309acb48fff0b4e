use crate::foundation::error::{SplashError, SplashResult};

pub const CIRCLE_SIZE_FRAC: f64 = 0.80;
pub const MARGIN_FRAC: f64 = 0.10;
pub const FONT_SIZE_FRAC: f64 = 0.48;
/// Smallest portrait circle drawn. Below 3px the disc has no center pixel apart from its corners.
pub const MIN_CIRCLE_SIZE: u32 = 3;

/// Pixel-space strip geometry, derived once per run from the (upscaled) splash size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StripGeometry {
    pub splash_width: u32,
    pub splash_height: u32,
    pub strip_height: u32,
    pub circle_size: u32,
    pub margin: u32,
    pub bottom_offset: u32,
    pub strip_top: u32,
    pub font_size: u32,
}

impl StripGeometry {
    /// Resolve strip, circle, margin and font sizes from fractions of the splash height.
    ///
    /// Fractions outside `[0, 1]` are rejected, never clamped.
    pub fn resolve(
        splash_width: u32,
        splash_height: u32,
        strip_height_frac: f64,
        bottom_margin_frac: f64,
    ) -> SplashResult<Self> {
        check_fraction("strip height", strip_height_frac)?;
        check_fraction("bottom margin", bottom_margin_frac)?;
        if splash_width == 0 || splash_height == 0 {
            return Err(SplashError::invalid_configuration(format!(
                "splash dimensions must be positive, got {splash_width}x{splash_height}"
            )));
        }

        let strip_height = floor_frac(splash_height, strip_height_frac);
        let circle_size = floor_frac(strip_height, CIRCLE_SIZE_FRAC);
        let margin = floor_frac(strip_height, MARGIN_FRAC);
        let bottom_offset = floor_frac(splash_height, bottom_margin_frac);
        let font_size = floor_frac(strip_height, FONT_SIZE_FRAC);

        let Some(strip_top) = splash_height
            .checked_sub(strip_height)
            .and_then(|v| v.checked_sub(bottom_offset))
        else {
            return Err(SplashError::invalid_configuration(format!(
                "strip height {strip_height_frac} plus bottom margin {bottom_margin_frac} \
                 does not fit in the splash"
            )));
        };
        if circle_size < MIN_CIRCLE_SIZE {
            return Err(SplashError::invalid_configuration(format!(
                "strip height {strip_height_frac} of {splash_height}px gives a {circle_size}px \
                 portrait circle, need at least {MIN_CIRCLE_SIZE}px"
            )));
        }

        Ok(Self {
            splash_width,
            splash_height,
            strip_height,
            circle_size,
            margin,
            bottom_offset,
            strip_top,
            font_size,
        })
    }

    pub fn strip_bottom(&self) -> u32 {
        self.strip_top + self.strip_height
    }
}

pub(crate) fn check_fraction(name: &str, v: f64) -> SplashResult<()> {
    if !v.is_finite() || !(0.0..=1.0).contains(&v) {
        return Err(SplashError::invalid_configuration(format!(
            "{name} must be a fraction in [0, 1], got {v}"
        )));
    }
    Ok(())
}

fn floor_frac(v: u32, frac: f64) -> u32 {
    (f64::from(v) * frac).floor() as u32
}
