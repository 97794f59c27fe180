/// A completed frame: row-major RGBA pixels, 4 bytes per pixel.
///
/// The buffer is sized to the screen at construction and fully overwritten
/// every frame; there are no partial updates. The rendering pipeline owns
/// it and hands it to the presentation layer by reference for the duration
/// of one present call.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl PixelBuffer {
    /// A black, fully opaque buffer.
    pub fn new(width: u32, height: u32) -> Self {
        let mut pixels = vec![0u8; width as usize * height as usize * 4];
        for px in pixels.chunks_exact_mut(4) {
            px[3] = 255;
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// RGBA of the pixel at (x, y). Panics if out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        assert!(x < self.width && y < self.height);
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_buffer_is_black_opaque() {
        let buf = PixelBuffer::new(4, 3);
        assert_eq!(buf.pixels.len(), 4 * 3 * 4);
        for px in buf.pixels.chunks_exact(4) {
            assert_eq!(px, &[0, 0, 0, 255]);
        }
    }

    #[test]
    fn pixel_indexing_is_row_major() {
        let mut buf = PixelBuffer::new(4, 3);
        let idx = (1 * 4 + 2) * 4; // (x=2, y=1)
        buf.pixels[idx] = 200;
        assert_eq!(buf.pixel(2, 1)[0], 200);
        assert_eq!(buf.pixel(2, 0)[0], 0);
    }

    #[test]
    #[should_panic]
    fn pixel_out_of_bounds_panics() {
        PixelBuffer::new(4, 3).pixel(4, 0);
    }
}
