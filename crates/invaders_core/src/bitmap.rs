/// A one-bit-per-pixel image. Sprites, shields and font glyphs are all bitmaps;
/// collision and shield erosion operate directly on their pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmap {
    width: i32,
    height: i32,
    pixels: Vec<bool>,
}

impl Bitmap {
    /// A fully clear bitmap.
    pub fn new(width: i32, height: i32) -> Self {
        let (width, height) = (width.max(0), height.max(0));
        Self {
            width,
            height,
            pixels: vec![false; (width * height) as usize],
        }
    }

    /// Decode ASCII art: `#` is a lit pixel, anything else is clear.
    /// Short rows are padded on the right.
    pub fn from_art(rows: &[&str]) -> Self {
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0) as i32;
        let mut bitmap = Self::new(width, rows.len() as i32);
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                if ch == '#' {
                    let idx = bitmap.index(x as i32, y as i32);
                    bitmap.pixels[idx] = true;
                }
            }
        }
        bitmap
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> usize {
        (y * self.width + x) as usize
    }

    #[inline]
    fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    /// Pixel lookup; anything outside the bitmap is clear.
    pub fn get(&self, x: i32, y: i32) -> bool {
        self.contains(x, y) && self.pixels[self.index(x, y)]
    }

    pub fn clear(&mut self, x: i32, y: i32) {
        if self.contains(x, y) {
            let idx = self.index(x, y);
            self.pixels[idx] = false;
        }
    }

    /// Number of lit pixels.
    pub fn count(&self) -> usize {
        self.pixels.iter().filter(|p| **p).count()
    }

    /// Coordinates of every lit pixel, row by row.
    pub fn lit(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.pixels
            .iter()
            .enumerate()
            .filter(|(_, on)| **on)
            .map(move |(i, _)| (i as i32 % self.width, i as i32 / self.width))
    }

    /// Does `other`, placed at (`dx`, `dy`) relative to this bitmap's origin,
    /// share at least one lit pixel with it?
    pub fn overlaps(&self, other: &Bitmap, dx: i32, dy: i32) -> bool {
        let x0 = dx.max(0);
        let y0 = dy.max(0);
        let x1 = (dx + other.width).min(self.width);
        let y1 = (dy + other.height).min(self.height);
        for y in y0..y1 {
            for x in x0..x1 {
                if self.pixels[self.index(x, y)] && other.get(x - dx, y - dy) {
                    return true;
                }
            }
        }
        false
    }

    /// Clear every pixel of this bitmap covered by a lit pixel of `other`
    /// placed at (`dx`, `dy`). Returns how many pixels were removed.
    pub fn carve(&mut self, other: &Bitmap, dx: i32, dy: i32) -> usize {
        let mut removed = 0;
        for (ox, oy) in other.lit() {
            let (x, y) = (ox + dx, oy + dy);
            if self.get(x, y) {
                self.clear(x, y);
                removed += 1;
            }
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn art_decodes_lit_pixels() {
        let b = Bitmap::from_art(&["#.#", ".#"]);
        assert_eq!((b.width(), b.height()), (3, 2));
        assert!(b.get(0, 0) && b.get(2, 0) && b.get(1, 1));
        assert!(!b.get(1, 0) && !b.get(2, 1));
        assert_eq!(b.count(), 3);
    }

    #[test]
    fn out_of_range_reads_are_clear() {
        let b = Bitmap::from_art(&["##", "##"]);
        assert!(!b.get(-1, 0));
        assert!(!b.get(0, 2));
        assert!(!b.get(5, 5));
    }

    #[test]
    fn overlap_is_pixel_exact_not_rectangular() {
        // Boxes intersect but the lit pixels never meet.
        let a = Bitmap::from_art(&["#.", ".."]);
        let b = Bitmap::from_art(&["..", ".#"]);
        assert!(!a.overlaps(&b, 0, 0));
        assert!(a.overlaps(&b, -1, -1));
    }

    #[test]
    fn carve_clears_only_covered_pixels() {
        let mut wall = Bitmap::from_art(&["####", "####"]);
        let stamp = Bitmap::from_art(&["#", "#"]);
        assert_eq!(wall.carve(&stamp, 1, 0), 2);
        assert_eq!(wall.count(), 6);
        assert!(!wall.get(1, 0) && !wall.get(1, 1));
        // Carving the same spot again removes nothing more.
        assert_eq!(wall.carve(&stamp, 1, 0), 0);
        // Partially outside is fine.
        assert_eq!(wall.carve(&stamp, 3, 1), 1);
    }

    #[test]
    fn lit_reports_coordinates() {
        let b = Bitmap::from_art(&["..#", "#.."]);
        let lit: Vec<_> = b.lit().collect();
        assert_eq!(lit, vec![(2, 0), (0, 1)]);
    }
}
