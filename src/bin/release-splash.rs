use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use release_splash::{BatchManifest, CropRect, SplashConfig, SplashJob, SplashReport};

#[derive(Parser, Debug)]
#[command(name = "release-splash", version, about = "Add a release branding strip to a splash image")]
struct Cli {
    /// Log debug details (geometry, layout, font resolution) to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one splash variant.
    Make(MakeArgs),
    /// Render every variant listed in a JSON manifest.
    Batch(BatchArgs),
}

#[derive(Parser, Debug)]
struct MakeArgs {
    /// Portrait/source image.
    #[arg(long)]
    input: PathBuf,

    /// Output image path (.jpg, .jpeg or .webp); the format is inferred from the extension.
    #[arg(long)]
    output: PathBuf,

    /// Release label text.
    #[arg(long, default_value = release_splash::config::DEFAULT_LABEL)]
    label: String,

    /// Pixel crop of the portrait before compositing, as x1,y1,x2,y2.
    #[arg(long, value_name = "x1,y1,x2,y2")]
    crop: Option<CropRect>,

    /// Override the base splash image.
    #[arg(long)]
    splash: Option<PathBuf>,

    /// Strip height as a fraction of the splash height.
    #[arg(long = "strip-height", value_name = "FRAC", default_value_t = release_splash::config::DEFAULT_STRIP_HEIGHT)]
    strip_height: f64,

    /// Portrait circle opacity, 0.0 to 1.0.
    #[arg(long, default_value_t = release_splash::config::DEFAULT_OPACITY)]
    opacity: f32,

    /// Gap below the strip as a fraction of the splash height, to clear the navigation bar.
    #[arg(long = "bottom-margin", value_name = "FRAC", default_value_t = release_splash::config::DEFAULT_BOTTOM_MARGIN)]
    bottom_margin: f64,

    /// Upscale factor for the output to reduce pixelation on high-density screens.
    #[arg(long, default_value_t = release_splash::config::DEFAULT_SCALE)]
    scale: u32,

    /// Font file to try before the built-in list (repeatable, tried in order).
    #[arg(long = "font", value_name = "PATH")]
    fonts: Vec<PathBuf>,
}

#[derive(Parser, Debug)]
struct BatchArgs {
    /// JSON manifest listing the variants to render.
    #[arg(long)]
    manifest: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Command::Make(args) => cmd_make(args),
        Command::Batch(args) => cmd_batch(args),
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn cmd_make(args: MakeArgs) -> anyhow::Result<()> {
    let defaults = SplashConfig::default();
    let mut fonts = args.fonts;
    fonts.extend(defaults.fonts);

    let job = SplashJob {
        input: args.input,
        output: args.output,
        config: SplashConfig {
            label: args.label,
            crop: args.crop,
            splash: args.splash,
            strip_height: args.strip_height,
            opacity: args.opacity,
            bottom_margin: args.bottom_margin,
            scale: args.scale,
            fonts,
            style: defaults.style,
        },
    };

    let report = release_splash::make_splash(&job)
        .with_context(|| format!("make splash '{}'", job.output.display()))?;
    print_report(&report);
    Ok(())
}

fn cmd_batch(args: BatchArgs) -> anyhow::Result<()> {
    let manifest = BatchManifest::read(&args.manifest)?;
    let base_dir = args.manifest.parent().unwrap_or_else(|| Path::new("."));
    let jobs = manifest
        .jobs(base_dir)
        .with_context(|| format!("expand manifest '{}'", args.manifest.display()))?;

    let reports = release_splash::make_splashes(&jobs)
        .with_context(|| format!("render batch '{}'", args.manifest.display()))?;
    for report in &reports {
        print_report(report);
    }
    Ok(())
}

fn print_report(report: &SplashReport) {
    if report.font_fallback {
        eprintln!("note: no configured font was usable; label drawn with the built-in font");
    }
    eprintln!(
        "wrote {} ({} {}x{})",
        report.output.display(),
        report.format.label(),
        report.width,
        report.height
    );
}
