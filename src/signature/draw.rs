//! Freehand drawing surface.
//!
//! The drawing surface is isolated behind [`DrawSurface`] so signature
//! capture can be unit-tested without a real rendering target. The kiosk
//! front panel feeds pointer events into `stroke_*`; [`BitmapSurface`] is
//! the reference implementation that rasterizes strokes into a monochrome
//! bitmap and exports it as a compact hex-encoded snapshot.

/// A surface that accepts freehand strokes and can export its pixels.
pub trait DrawSurface {
    /// Pen down at (x, y).
    fn stroke_start(&mut self, x: u32, y: u32);

    /// Pen dragged to (x, y) while down. Ignored if the pen is up.
    fn stroke_move(&mut self, x: u32, y: u32);

    /// Pen lifted.
    fn stroke_end(&mut self);

    /// Snapshot of the current pixels, `None` while the surface is blank.
    fn export_image(&self) -> Option<String>;

    /// Erase everything and lift the pen.
    fn clear(&mut self);
}

/// Monochrome raster surface.
#[derive(Debug)]
pub struct BitmapSurface {
    width: u32,
    height: u32,
    pixels: Vec<bool>,
    pen: Option<(u32, u32)>,
}

/// Default capture dimensions, matching the signature box on the kiosk.
pub const DEFAULT_WIDTH: u32 = 240;
pub const DEFAULT_HEIGHT: u32 = 80;

impl BitmapSurface {
    /// Create a blank surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![false; (width * height) as usize],
            pen: None,
        }
    }

    /// Surface width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Surface height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether any pixel is set.
    pub fn is_blank(&self) -> bool {
        !self.pixels.iter().any(|p| *p)
    }

    /// Set one pixel, clamping out-of-range coordinates to the edge.
    pub fn set_pixel(&mut self, x: u32, y: u32) {
        let x = x.min(self.width - 1);
        let y = y.min(self.height - 1);
        self.pixels[(y * self.width + x) as usize] = true;
    }

    /// Read one pixel.
    pub fn pixel(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.pixels[(y * self.width + x) as usize]
    }

    // Bresenham line between two points.
    fn draw_line(&mut self, from: (u32, u32), to: (u32, u32)) {
        let (mut x0, mut y0) = (from.0 as i64, from.1 as i64);
        let (x1, y1) = (to.0 as i64, to.1 as i64);
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.set_pixel(x0 as u32, y0 as u32);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    /// Pack the pixels row-major into bytes, most significant bit first.
    fn packed_bytes(&self) -> Vec<u8> {
        let mut bytes = vec![0u8; (self.pixels.len() + 7) / 8];
        for (i, on) in self.pixels.iter().enumerate() {
            if *on {
                bytes[i / 8] |= 0x80 >> (i % 8);
            }
        }
        bytes
    }
}

impl Default for BitmapSurface {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

impl DrawSurface for BitmapSurface {
    fn stroke_start(&mut self, x: u32, y: u32) {
        self.set_pixel(x, y);
        self.pen = Some((x.min(self.width - 1), y.min(self.height - 1)));
    }

    fn stroke_move(&mut self, x: u32, y: u32) {
        if let Some(prev) = self.pen {
            let clamped = (x.min(self.width - 1), y.min(self.height - 1));
            self.draw_line(prev, clamped);
            self.pen = Some(clamped);
        }
    }

    fn stroke_end(&mut self) {
        self.pen = None;
    }

    fn export_image(&self) -> Option<String> {
        if self.is_blank() {
            return None;
        }
        Some(format!(
            "mono;{}x{};{}",
            self.width,
            self.height,
            hex::encode(self.packed_bytes())
        ))
    }

    fn clear(&mut self) {
        self.pixels.fill(false);
        self.pen = None;
    }
}
