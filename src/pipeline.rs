use std::path::PathBuf;

use crate::assets::PremulImage;
use crate::assets::decode::{load_rgba, load_splash};
use crate::config::SplashJob;
use crate::encode::{OutputFormat, write_output};
use crate::foundation::error::SplashResult;
use crate::geometry::StripGeometry;
use crate::layout::GroupLayout;
use crate::mask::circular_portrait;
use crate::render::render_strip;
use crate::text::FontResolver;

/// Outcome of a rendered splash.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SplashReport {
    pub output: PathBuf,
    pub format: OutputFormat,
    pub width: u32,
    pub height: u32,
    pub geometry: StripGeometry,
    pub layout: GroupLayout,
    /// `true` when no configured font was usable and the built-in font was drawn.
    pub font_fallback: bool,
}

/// Composited canvas plus the measurements that produced it.
#[derive(Clone, Debug)]
pub struct RenderedSplash {
    pub canvas: PremulImage,
    pub geometry: StripGeometry,
    pub layout: GroupLayout,
    pub font_fallback: bool,
}

/// Load, lay out and composite a splash without writing it.
#[tracing::instrument(skip(job), fields(input = %job.input.display(), label = %job.config.label))]
pub fn render_splash(job: &SplashJob) -> SplashResult<RenderedSplash> {
    let config = &job.config;
    config.validate()?;

    let mut canvas = load_splash(config.splash_path(), config.scale)?;
    let portrait = load_rgba(&job.input)?;

    let geometry = StripGeometry::resolve(
        canvas.width,
        canvas.height,
        config.strip_height,
        config.bottom_margin,
    )?;
    tracing::debug!(?geometry, "strip geometry");

    let circle = circular_portrait(&portrait, config.crop, geometry.circle_size, config.opacity)?;
    drop(portrait);

    let font = FontResolver::new(config.fonts.clone()).resolve(geometry.font_size);
    let (text_width, text_height) = font.measure(&config.label)?;
    let label = font.rasterize(&config.label)?;
    let layout = GroupLayout::compute(&geometry, text_width, text_height);
    tracing::debug!(?layout, fallback = font.is_fallback(), "group layout");

    render_strip(
        &mut canvas,
        &geometry,
        &layout,
        &circle,
        &label,
        &config.style,
    );

    Ok(RenderedSplash {
        canvas,
        geometry,
        layout,
        font_fallback: font.is_fallback(),
    })
}

/// Render a splash and write it to `job.output`.
///
/// The output format is checked before any image is decoded, and the file is written atomically,
/// so a failed run never leaves a partial file behind.
pub fn make_splash(job: &SplashJob) -> SplashResult<SplashReport> {
    OutputFormat::from_path(&job.output)?;
    let rendered = render_splash(job)?;
    let format = write_output(&rendered.canvas, &job.output)?;
    Ok(SplashReport {
        output: job.output.clone(),
        format,
        width: rendered.canvas.width,
        height: rendered.canvas.height,
        geometry: rendered.geometry,
        layout: rendered.layout,
        font_fallback: rendered.font_fallback,
    })
}

/// Render jobs in order, stopping at the first failure.
pub fn make_splashes(jobs: &[SplashJob]) -> SplashResult<Vec<SplashReport>> {
    jobs.iter().map(make_splash).collect()
}
