use std::str::FromStr;

use crate::foundation::error::{SplashError, SplashResult};

/// Premultiplied RGBA8 pixel.
pub type PremulRgba8 = [u8; 4];

/// Axis-aligned pixel rectangle `(x1, y1)..(x2, y2)`, right/bottom exclusive.
///
/// Coordinates are signed so that negative user input survives parsing and is reported as an
/// invalid crop against the image it is applied to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(from = "[i64; 4]", into = "[i64; 4]")]
pub struct CropRect {
    pub x1: i64,
    pub y1: i64,
    pub x2: i64,
    pub y2: i64,
}

impl CropRect {
    pub fn new(x1: i64, y1: i64, x2: i64, y2: i64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn width(self) -> i64 {
        self.x2.saturating_sub(self.x1)
    }

    pub fn height(self) -> i64 {
        self.y2.saturating_sub(self.y1)
    }

    /// Positive `(width, height)`, or an invalid crop when the extent is empty, inverted or does
    /// not fit in `i64`.
    pub fn extent(self) -> SplashResult<(i64, i64)> {
        let (Some(w), Some(h)) = (self.x2.checked_sub(self.x1), self.y2.checked_sub(self.y1))
        else {
            return Err(SplashError::invalid_crop(format!("{self} extent overflows")));
        };
        if w <= 0 || h <= 0 {
            return Err(SplashError::invalid_crop(format!(
                "{self} has non-positive extent"
            )));
        }
        Ok((w, h))
    }

    /// Check that the rectangle has positive extent and lies inside a `width x height` image.
    pub fn check_within(self, width: u32, height: u32) -> SplashResult<()> {
        self.extent()?;
        if self.x1 < 0 || self.y1 < 0 || self.x2 > i64::from(width) || self.y2 > i64::from(height)
        {
            return Err(SplashError::invalid_crop(format!(
                "{self} exceeds image bounds {width}x{height}"
            )));
        }
        Ok(())
    }
}

impl std::fmt::Display for CropRect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{},{},{})", self.x1, self.y1, self.x2, self.y2)
    }
}

impl From<[i64; 4]> for CropRect {
    fn from([x1, y1, x2, y2]: [i64; 4]) -> Self {
        Self::new(x1, y1, x2, y2)
    }
}

impl From<CropRect> for [i64; 4] {
    fn from(r: CropRect) -> Self {
        [r.x1, r.y1, r.x2, r.y2]
    }
}

impl FromStr for CropRect {
    type Err = SplashError;

    /// Parse `x1,y1,x2,y2`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .split(',')
            .map(|v| v.trim().parse::<i64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| {
                SplashError::invalid_configuration(format!(
                    "crop values must be integers, got '{s}'"
                ))
            })?;
        let [x1, y1, x2, y2] = parts[..] else {
            return Err(SplashError::invalid_configuration(format!(
                "crop requires exactly 4 values (x1,y1,x2,y2), got {}",
                parts.len()
            )));
        };
        Ok(Self::new(x1, y1, x2, y2))
    }
}

/// Straight (non-premultiplied) RGBA8 color, serialized as `[r, g, b, a]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(from = "[u8; 4]", into = "[u8; 4]")]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn premul(self) -> PremulRgba8 {
        premul_rgba8(self.r, self.g, self.b, self.a)
    }
}

impl From<[u8; 4]> for Rgba8 {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self::new(r, g, b, a)
    }
}

impl From<Rgba8> for [u8; 4] {
    fn from(c: Rgba8) -> Self {
        [c.r, c.g, c.b, c.a]
    }
}

pub fn premul_rgba8(r: u8, g: u8, b: u8, a: u8) -> PremulRgba8 {
    let a16 = u16::from(a);
    [
        mul_div255(u16::from(r), a16),
        mul_div255(u16::from(g), a16),
        mul_div255(u16::from(b), a16),
        a,
    ]
}

pub(crate) fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crop_parses_four_integers() {
        let r: CropRect = "808, 0,2016,1200".parse().unwrap();
        assert_eq!(r, CropRect::new(808, 0, 2016, 1200));
        assert_eq!(r.width(), 1208);
        assert_eq!(r.height(), 1200);
    }

    #[test]
    fn crop_shape_errors_are_configuration_errors() {
        assert!(matches!(
            "1,2,3".parse::<CropRect>(),
            Err(SplashError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            "1,2,x,4".parse::<CropRect>(),
            Err(SplashError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn crop_bounds_check() {
        CropRect::new(400, 0, 1600, 1200)
            .check_within(2000, 1500)
            .unwrap();
        assert!(matches!(
            CropRect::new(808, 0, 2016, 1200).check_within(2000, 1500),
            Err(SplashError::InvalidCrop(_))
        ));
        assert!(matches!(
            CropRect::new(-1, 0, 10, 10).check_within(20, 20),
            Err(SplashError::InvalidCrop(_))
        ));
        assert!(matches!(
            CropRect::new(10, 0, 10, 10).check_within(20, 20),
            Err(SplashError::InvalidCrop(_))
        ));
    }

    #[test]
    fn extreme_crop_extent_is_invalid_crop() {
        let r: CropRect = "-9223372036854775808,0,9223372036854775807,10"
            .parse()
            .unwrap();
        assert!(matches!(r.extent(), Err(SplashError::InvalidCrop(_))));
        assert!(matches!(
            r.check_within(2000, 1500),
            Err(SplashError::InvalidCrop(_))
        ));
        assert_eq!(r.width(), i64::MAX);
        assert_eq!(
            CropRect::new(400, 0, 1600, 1200).extent().unwrap(),
            (1200, 1200)
        );
    }

    #[test]
    fn crop_serde_as_array() {
        let r: CropRect = serde_json::from_str("[1,2,3,4]").unwrap();
        assert_eq!(r, CropRect::new(1, 2, 3, 4));
        assert_eq!(serde_json::to_string(&r).unwrap(), "[1,2,3,4]");
    }

    #[test]
    fn premul_rounds_like_decode() {
        assert_eq!(premul_rgba8(255, 220, 120, 255), [255, 220, 120, 255]);
        assert_eq!(premul_rgba8(0, 0, 0, 120), [0, 0, 0, 120]);
        assert_eq!(
            premul_rgba8(100, 50, 200, 128),
            [
                ((100u16 * 128 + 127) / 255) as u8,
                ((50u16 * 128 + 127) / 255) as u8,
                ((200u16 * 128 + 127) / 255) as u8,
                128
            ]
        );
    }
}
