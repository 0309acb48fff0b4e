use crate::geometry::StripGeometry;

/// Placement of the [circle, gap, text] group inside the strip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GroupLayout {
    pub text_width: u32,
    pub text_height: u32,
    pub total_width: u32,
    /// Left edge of the group; negative when the group is wider than the splash.
    pub x_start: i64,
    pub circle_y: i64,
    pub text_x: i64,
    pub text_y: i64,
}

impl GroupLayout {
    /// Center the group horizontally as a unit and each element vertically in the strip.
    pub fn compute(geom: &StripGeometry, text_width: u32, text_height: u32) -> Self {
        let total_width = geom.circle_size + geom.margin + text_width;
        let x_start = (i64::from(geom.splash_width) - i64::from(total_width)).div_euclid(2);

        let strip_top = i64::from(geom.strip_top);
        let strip_h = i64::from(geom.strip_height);
        let circle_y = strip_top + (strip_h - i64::from(geom.circle_size)).div_euclid(2);
        let text_y = strip_top + (strip_h - i64::from(text_height)).div_euclid(2);
        let text_x = x_start + i64::from(geom.circle_size) + i64::from(geom.margin);

        Self {
            text_width,
            text_height,
            total_width,
            x_start,
            circle_y,
            text_x,
            text_y,
        }
    }
}
