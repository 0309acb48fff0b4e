use crate::assets::PremulImage;
use crate::foundation::core::{PremulRgba8, mul_div255};

/// Premultiplied source-over: `src + dst * (1 - src.a)`.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    if src[3] == 0 {
        return dst;
    }
    if src[3] == 255 {
        return src;
    }

    let inv = 255u16 - u16::from(src[3]);

    let mut out = [0u8; 4];
    for i in 0..4 {
        let dc = mul_div255(u16::from(dst[i]), inv);
        out[i] = src[i].saturating_add(dc);
    }
    out
}

/// Composite `src` over `dst` with its top-left corner at `(x, y)`.
///
/// Offsets may be negative or run past the edge; only the overlapping region is touched.
pub fn paste_over(dst: &mut PremulImage, src: &PremulImage, x: i64, y: i64) {
    let Some(region) = overlap(dst, src.width, src.height, x, y) else {
        return;
    };
    for row in 0..region.h {
        let sy = region.sy + row;
        let dy = region.dy + row;
        let s_start = (sy as usize * src.width as usize + region.sx as usize) * 4;
        let s_row = &src.data[s_start..s_start + region.w as usize * 4];
        let d_row = &mut dst.row_mut(dy)[region.dx as usize * 4..(region.dx + region.w) as usize * 4];
        for (d, s) in d_row.chunks_exact_mut(4).zip(s_row.chunks_exact(4)) {
            let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
            d.copy_from_slice(&out);
        }
    }
}

/// Composite a solid color, modulated by an 8-bit coverage mask, over `dst` at `(x, y)`.
pub fn paint_coverage(
    dst: &mut PremulImage,
    coverage: &image::GrayImage,
    color: PremulRgba8,
    x: i64,
    y: i64,
) {
    let Some(region) = overlap(dst, coverage.width(), coverage.height(), x, y) else {
        return;
    };
    for row in 0..region.h {
        let d_row = dst.row_mut(region.dy + row);
        for col in 0..region.w {
            let cov = coverage.get_pixel(region.sx + col, region.sy + row).0[0];
            if cov == 0 {
                continue;
            }
            let src = scale_premul(color, cov);
            let i = (region.dx + col) as usize * 4;
            let d = &mut d_row[i..i + 4];
            let out = over([d[0], d[1], d[2], d[3]], src);
            d.copy_from_slice(&out);
        }
    }
}

/// Composite a solid color over every pixel of the rows `[top, top + height)`.
pub fn fill_rows(dst: &mut PremulImage, top: u32, height: u32, color: PremulRgba8) {
    let end = top.saturating_add(height).min(dst.height);
    for y in top.min(end)..end {
        for d in dst.row_mut(y).chunks_exact_mut(4) {
            let out = over([d[0], d[1], d[2], d[3]], color);
            d.copy_from_slice(&out);
        }
    }
}

fn scale_premul(px: PremulRgba8, k: u8) -> PremulRgba8 {
    if k == 255 {
        return px;
    }
    let k = u16::from(k);
    [
        mul_div255(u16::from(px[0]), k),
        mul_div255(u16::from(px[1]), k),
        mul_div255(u16::from(px[2]), k),
        mul_div255(u16::from(px[3]), k),
    ]
}

struct Overlap {
    sx: u32,
    sy: u32,
    dx: u32,
    dy: u32,
    w: u32,
    h: u32,
}

fn overlap(dst: &PremulImage, src_w: u32, src_h: u32, x: i64, y: i64) -> Option<Overlap> {
    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + i64::from(src_w)).min(i64::from(dst.width));
    let y1 = (y + i64::from(src_h)).min(i64::from(dst.height));
    if x0 >= x1 || y0 >= y1 {
        return None;
    }
    Some(Overlap {
        sx: (x0 - x) as u32,
        sy: (y0 - y) as u32,
        dx: x0 as u32,
        dy: y0 as u32,
        w: (x1 - x0) as u32,
        h: (y1 - y0) as u32,
    })
}
