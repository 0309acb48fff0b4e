pub mod decode;

use crate::foundation::core::PremulRgba8;
use crate::foundation::error::{SplashError, SplashResult};

/// Raster image in premultiplied RGBA8 form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PremulImage {
    pub width: u32,
    pub height: u32,
    /// Premultiplied RGBA8, row-major, tightly packed.
    pub data: Vec<u8>,
}

impl PremulImage {
    pub fn new_transparent(width: u32, height: u32) -> SplashResult<Self> {
        if width == 0 || height == 0 {
            return Err(SplashError::invalid_configuration(format!(
                "image dimensions must be positive, got {width}x{height}"
            )));
        }
        Ok(Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
        })
    }

    /// Take ownership of a straight-alpha image and premultiply it.
    pub fn from_straight(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        let mut data = img.into_raw();
        premultiply_rgba8_in_place(&mut data);
        Self {
            width,
            height,
            data,
        }
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    /// Pixel at `(x, y)`. Panics when out of bounds, like `image::ImageBuffer::get_pixel`.
    pub fn pixel(&self, x: u32, y: u32) -> PremulRgba8 {
        assert!(x < self.width && y < self.height, "pixel ({x},{y}) out of bounds");
        let i = self.offset(x, y);
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    pub fn put_pixel(&mut self, x: u32, y: u32, px: PremulRgba8) {
        assert!(x < self.width && y < self.height, "pixel ({x},{y}) out of bounds");
        let i = self.offset(x, y);
        self.data[i..i + 4].copy_from_slice(&px);
    }

    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let start = self.offset(0, y);
        let end = start + self.width as usize * 4;
        &mut self.data[start..end]
    }

    pub fn max_alpha(&self) -> u8 {
        self.data.chunks_exact(4).map(|px| px[3]).max().unwrap_or(0)
    }

    /// Drop alpha. Color channels are already premultiplied, so this is the image composited over
    /// opaque black.
    pub fn flatten_to_rgb8(&self) -> image::RgbImage {
        let mut rgb = Vec::with_capacity(self.width as usize * self.height as usize * 3);
        for px in self.data.chunks_exact(4) {
            rgb.extend_from_slice(&px[..3]);
        }
        image::RgbImage::from_raw(self.width, self.height, rgb)
            .unwrap_or_else(|| image::RgbImage::new(self.width, self.height))
    }
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}
