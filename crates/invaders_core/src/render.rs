use invaders_common::color::Color;

use crate::bitmap::Bitmap;
use crate::entity::Position;
use crate::sprites::{glyph, GLYPH_ADVANCE};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Something the scene can paint on.
///
/// Implementors only provide pixel access; everything else is built on top
/// and clips against the surface bounds.
pub trait Surface {
    fn width(&self) -> i32;
    fn height(&self) -> i32;
    /// Pixel at an in-bounds coordinate.
    fn pixel(&self, x: i32, y: i32) -> Color;
    /// Write an in-bounds coordinate.
    fn put(&mut self, x: i32, y: i32, color: Color);

    fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width() && y < self.height()
    }

    fn clear(&mut self, color: Color) {
        let (w, h) = (self.width(), self.height());
        self.fill_rect(Rect::new(0, 0, w, h), color);
    }

    /// Paint the lit pixels of `bitmap` with its top-left corner at `at`.
    fn blit(&mut self, bitmap: &Bitmap, at: Position, color: Color) {
        for (x, y) in bitmap.lit() {
            let (sx, sy) = (at.x + x, at.y + y);
            if self.contains(sx, sy) {
                self.put(sx, sy, color);
            }
        }
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.map_rect(rect, &mut |_| color);
    }

    /// Multiply-blend `color` over `rect`.
    fn tint_rect(&mut self, rect: Rect, color: Color) {
        self.map_rect(rect, &mut |c| c.multiply(color));
    }

    /// Darken the whole surface by `num / den`.
    fn dim(&mut self, num: u8, den: u8) {
        let (w, h) = (self.width(), self.height());
        self.map_rect(Rect::new(0, 0, w, h), &mut |c| c.dim(num, den));
    }

    /// Replace every pixel of `rect` (clipped) with `f` of its old colour.
    fn map_rect(&mut self, rect: Rect, f: &mut dyn FnMut(Color) -> Color) {
        let x0 = rect.x.max(0);
        let y0 = rect.y.max(0);
        let x1 = (rect.x + rect.width).min(self.width());
        let y1 = (rect.y + rect.height).min(self.height());
        for y in y0..y1 {
            for x in x0..x1 {
                let c = self.pixel(x, y);
                self.put(x, y, f(c));
            }
        }
    }
}

/// A borrowed RGB24 framebuffer, row-major, three bytes per pixel.
pub struct FrameBuffer<'a> {
    pixels: &'a mut [u8],
    width: usize,
    height: usize,
}

impl<'a> FrameBuffer<'a> {
    pub fn new(pixels: &'a mut [u8], width: usize, height: usize) -> Self {
        debug_assert_eq!(pixels.len(), width * height * 3);
        Self {
            pixels,
            width,
            height,
        }
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> usize {
        (y as usize * self.width + x as usize) * 3
    }
}

impl Surface for FrameBuffer<'_> {
    fn width(&self) -> i32 {
        self.width as i32
    }

    fn height(&self) -> i32 {
        self.height as i32
    }

    fn pixel(&self, x: i32, y: i32) -> Color {
        let i = self.index(x, y);
        Color::new_rgb(self.pixels[i], self.pixels[i + 1], self.pixels[i + 2])
    }

    fn put(&mut self, x: i32, y: i32, color: Color) {
        let i = self.index(x, y);
        self.pixels[i] = color.r;
        self.pixels[i + 1] = color.g;
        self.pixels[i + 2] = color.b;
    }
}

/// Draw `text` in the 5x7 font, one 8px cell per character. Characters the
/// font lacks (spaces included) just advance.
pub fn draw_text<S: Surface + ?Sized>(surface: &mut S, text: &str, at: Position, color: Color) {
    let mut x = at.x;
    for ch in text.chars() {
        if let Some(bitmap) = glyph(ch) {
            surface.blit(bitmap, Position::new(x, at.y), color);
        }
        x += GLYPH_ADVANCE;
    }
}
