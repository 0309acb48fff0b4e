use font8x8::{BASIC_FONTS, UnicodeFonts};

use crate::foundation::error::{SplashError, SplashResult};

const GLYPH_PX: u32 = 8;

/// Integer magnification that brings an 8px glyph closest to `size_px`.
pub(crate) fn scale_for(size_px: u32) -> u32 {
    ((size_px as f32 / GLYPH_PX as f32).round() as u32).max(1)
}

pub(crate) fn measure(text: &str, scale: u32) -> SplashResult<(u32, u32)> {
    let n = text.chars().count();
    let cell = GLYPH_PX.checked_mul(scale);
    let width = u32::try_from(n)
        .ok()
        .zip(cell)
        .and_then(|(n, cell)| n.checked_mul(cell));
    let (Some(w), Some(h)) = (width, cell) else {
        return Err(SplashError::invalid_configuration(format!(
            "label of {n} characters at {scale}x exceeds the rasterizer limit"
        )));
    };
    Ok((w, h))
}

/// Render text with the built-in 8x8 font, nearest-neighbour scaled.
pub(crate) fn rasterize(text: &str, scale: u32) -> SplashResult<image::GrayImage> {
    let (w, h) = measure(text, scale)?;
    let mut out = image::GrayImage::new(w, h);
    for (i, ch) in text.chars().enumerate() {
        let glyph = BASIC_FONTS
            .get(ch)
            .or_else(|| BASIC_FONTS.get('?'))
            .unwrap_or([0; 8]);
        let origin_x = i as u32 * GLYPH_PX * scale;
        for (row, bits) in glyph.iter().enumerate() {
            for col in 0..GLYPH_PX {
                if (bits >> col) & 1 == 0 {
                    continue;
                }
                for dy in 0..scale {
                    for dx in 0..scale {
                        out.put_pixel(
                            origin_x + col * scale + dx,
                            row as u32 * scale + dy,
                            image::Luma([255]),
                        );
                    }
                }
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_tracks_requested_size() {
        assert_eq!(scale_for(1), 1);
        assert_eq!(scale_for(8), 1);
        assert_eq!(scale_for(24), 3);
        assert_eq!(scale_for(359), 45);
    }

    #[test]
    fn measure_is_monospace() {
        assert_eq!(measure("Venus", 2).unwrap(), (80, 16));
        assert_eq!(measure("", 2).unwrap(), (0, 16));
    }

    #[test]
    fn rasterize_matches_measure_and_has_ink() {
        let mask = rasterize("Venus", 3).unwrap();
        assert_eq!(mask.dimensions(), measure("Venus", 3).unwrap());
        assert!(mask.pixels().any(|p| p.0[0] == 255));
        assert!(mask.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
    }

    #[test]
    fn unknown_glyph_falls_back_to_question_mark() {
        assert_eq!(rasterize("\u{10FFFF}", 1).unwrap(), rasterize("?", 1).unwrap());
    }

    #[test]
    fn oversized_label_is_an_error() {
        let long = "V".repeat(1 << 24);
        assert!(matches!(
            measure(&long, scale_for(45 * 8)),
            Err(SplashError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            measure("V", u32::MAX),
            Err(SplashError::InvalidConfiguration(_))
        ));
    }
}
