#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::new_rgb(0, 0, 0);
    pub const WHITE: Color = Color::new_rgb(255, 255, 255);

    /// Tint of the red cellophane strip across the top of the cabinet.
    pub const OVERLAY_RED: Color = Color::new_rgb(254, 30, 30);
    /// Tint of the green cellophane strip across the bottom of the cabinet.
    pub const OVERLAY_GREEN: Color = Color::new_rgb(30, 254, 30);

    #[inline]
    pub const fn new_rgb(r: u8, g: u8, b: u8) -> Color {
        Color { r, g, b, a: 0xff }
    }

    #[inline]
    pub const fn rgb(&self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    /// Per-channel multiply, the way a blend-multiply overlay combines two colours.
    pub const fn multiply(&self, other: Color) -> Color {
        Color::new_rgb(
            ((self.r as u16 * other.r as u16) / 255) as u8,
            ((self.g as u16 * other.g as u16) / 255) as u8,
            ((self.b as u16 * other.b as u16) / 255) as u8,
        )
    }

    /// Scale brightness by `num / den`.
    pub const fn dim(&self, num: u8, den: u8) -> Color {
        Color::new_rgb(
            ((self.r as u16 * num as u16) / den as u16) as u8,
            ((self.g as u16 * num as u16) / den as u16) as u8,
            ((self.b as u16 * num as u16) / den as u16) as u8,
        )
    }
}
