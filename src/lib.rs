//! Composite a release branding strip onto an application splash image.
//!
//! A semi-transparent strip near the bottom of the splash holds a circular portrait and a gold
//! release label with a drop shadow. The pipeline runs forward only:
//!
//! - decode and upscale the splash, decode the portrait ([`assets`])
//! - resolve strip geometry from fractions of the splash height ([`geometry`])
//! - cut the circular portrait ([`mask`])
//! - resolve a font, measure the label and center the group ([`text`], [`layout`])
//! - composite strip, circle, shadow and label in that order ([`render`])
//! - flatten and write JPEG or WebP atomically ([`encode`])
#![forbid(unsafe_code)]

pub mod assets;
pub mod composite;
pub mod config;
pub mod encode;
mod foundation;
pub mod geometry;
pub mod layout;
pub mod mask;
pub mod pipeline;
pub mod render;
pub mod text;

pub use crate::assets::PremulImage;
pub use crate::config::{BatchManifest, BatchVariant, DEFAULT_SPLASH, SplashConfig, SplashJob};
pub use crate::encode::{JPEG_QUALITY, OutputFormat};
pub use crate::foundation::core::{CropRect, PremulRgba8, Rgba8};
pub use crate::foundation::error::{SplashError, SplashResult};
pub use crate::geometry::StripGeometry;
pub use crate::layout::GroupLayout;
pub use crate::pipeline::{RenderedSplash, SplashReport, make_splash, make_splashes, render_splash};
pub use crate::render::SplashStyle;
pub use crate::text::{FontResolver, LabelFont};
