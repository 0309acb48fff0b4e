use crate::foundation::error::{SplashError, SplashResult};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub(crate) struct TextBrushRgba8 {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

const COVERAGE_BRUSH: TextBrushRgba8 = TextBrushRgba8 {
    r: 255,
    g: 255,
    b: 255,
    a: 255,
};

/// Stateful helper for building Parley text layouts from raw font bytes.
pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    pub(crate) fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
        }
    }

    /// Register font bytes and return the family name of the first face.
    pub(crate) fn register_family(&mut self, font_bytes: &[u8]) -> SplashResult<String> {
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.to_vec()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            SplashError::invalid_configuration("no font families registered from font bytes")
        })?;

        Ok(self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| {
                SplashError::invalid_configuration("registered font family has no name")
            })?
            .to_string())
    }

    /// Shape a single unwrapped line of text.
    pub(crate) fn layout_line(
        &mut self,
        text: &str,
        font_bytes: &[u8],
        size_px: f32,
    ) -> SplashResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(SplashError::invalid_configuration(
                "font size must be finite and > 0",
            ));
        }

        let family_name = self.register_family(font_bytes)?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(COVERAGE_BRUSH));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

/// Pixel box of a laid-out line, rounded up.
pub(crate) fn layout_box(layout: &parley::Layout<TextBrushRgba8>) -> (u32, u32) {
    (
        layout.width().ceil().max(0.0) as u32,
        layout.height().ceil().max(0.0) as u32,
    )
}

/// Rasterize a layout into an 8-bit coverage mask the size of its box.
pub(crate) fn rasterize_layout(
    layout: &parley::Layout<TextBrushRgba8>,
    font_bytes: &[u8],
) -> SplashResult<image::GrayImage> {
    let (w, h) = layout_box(layout);
    if w == 0 || h == 0 {
        return Ok(image::GrayImage::new(w, h));
    }
    let (Ok(w16), Ok(h16)) = (u16::try_from(w), u16::try_from(h)) else {
        return Err(SplashError::invalid_configuration(format!(
            "label box {w}x{h} exceeds the rasterizer limit"
        )));
    };

    let font = vello_cpu::peniko::FontData::new(
        vello_cpu::peniko::Blob::from(font_bytes.to_vec()),
        0,
    );
    let mut ctx = vello_cpu::RenderContext::new(w16, h16);
    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let brush = run.style().brush;
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                brush.r, brush.g, brush.b, brush.a,
            ));
            let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            ctx.glyph_run(&font)
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }
    ctx.flush();

    let mut pixmap = vello_cpu::Pixmap::new(w16, h16);
    ctx.render_to_pixmap(&mut pixmap);

    let alpha: Vec<u8> = pixmap
        .data_as_u8_slice()
        .chunks_exact(4)
        .map(|px| px[3])
        .collect();
    image::GrayImage::from_raw(w, h, alpha).ok_or_else(|| {
        SplashError::Other(anyhow::anyhow!(
            "rasterized label buffer does not match {w}x{h}"
        ))
    })
}
