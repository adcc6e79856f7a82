use crate::buffer::locate;
use crate::common::{
    GLYPH_WIDTH, PAGE_HEIGHT, SEGMENTS, TEXT_COLUMNS, X3_GLYPH_WIDTH, X3_SCALE, X3_TEXT_COLUMNS,
};
use crate::display::Oled;
use crate::error::{Error, OledResult};
use crate::font::{self, GLYPH_SIZE, Glyph};
use crate::transform::{self, copy_bit, orient};
use crate::transport::Transport;
use embedded_hal::delay::DelayNs;
use log::{debug, error, trace};

const BITMAP_ROW_YIELD_MS: u32 = 1;
const FADEOUT_STEP_YIELD_MS: u32 = 1;

impl<T: Transport, D: DelayNs> Oled<T, D> {
    /// Light the pixel at (`x`, `y`), or clear it when `invert` is set, and
    /// push the one byte that holds it. Off-panel coordinates are ignored.
    pub fn set_pixel(&mut self, x: i32, y: i32, invert: bool) -> OledResult<()> {
        let Some(location) = locate(&self.geometry, x, y) else {
            trace!("OLED: pixel ({x},{y}) off panel");
            return Ok(());
        };
        self.plot(location, !invert);
        self.flush_range(location.page, location.segment, 1)
    }

    /// Bresenham line from (`x1`, `y1`) to (`x2`, `y2`), both ends included.
    /// Only the stretch of the line that crosses the panel is walked.
    pub fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, invert: bool) -> OledResult<()> {
        let (x1, y1, x2, y2) = (i64::from(x1), i64::from(y1), i64::from(x2), i64::from(y2));
        let x = Axis::new(x1, x2);
        let y = Axis::new(y1, y2);
        let width = i64::try_from(self.geometry.width()).unwrap_or(i64::MAX);
        let height = i64::try_from(self.geometry.height()).unwrap_or(i64::MAX);

        if x.delta > y.delta {
            for (px, py) in line_span(x, y, width) {
                self.plot_line_point(px, py, invert)?;
            }
        } else {
            for (py, px) in line_span(y, x, height) {
                self.plot_line_point(px, py, invert)?;
            }
        }
        Ok(())
    }

    fn plot_line_point(&mut self, x: i64, y: i64, invert: bool) -> OledResult<()> {
        match (i32::try_from(x), i32::try_from(y)) {
            (Ok(x), Ok(y)) => self.set_pixel(x, y, invert),
            _ => Ok(()),
        }
    }

    /// Blit a 1bpp bitmap with its top-left corner at (`xpos`, `ypos`).
    ///
    /// `bitmap` holds `height` rows of `width / 8` bytes, MSB first. Each
    /// source bit is composited into the existing page byte, so content above
    /// and below the bitmap inside a shared page is kept. The whole buffer is
    /// pushed once the blit is done.
    pub fn draw_bitmap(
        &mut self,
        xpos: usize,
        ypos: usize,
        bitmap: &[u8],
        width: usize,
        height: usize,
        invert: bool,
    ) -> OledResult<()> {
        if width % 8 != 0 {
            error!("OLED: bitmap width {width} must be a multiple of 8");
            return Err(Error::BitmapWidth(width));
        }
        let stride = width / 8;
        let Some(needed) = stride.checked_mul(height) else {
            debug!("OLED: bitmap {width}x{height} too large");
            return Ok(());
        };
        if bitmap.len() < needed {
            return Err(Error::BufferSize {
                expected: needed,
                actual: bitmap.len(),
            });
        }
        let fits_x = xpos.checked_add(width).is_some_and(|end| end <= SEGMENTS);
        let fits_y = ypos
            .checked_add(height)
            .is_some_and(|end| end <= self.geometry.height());
        if !(fits_x && fits_y) {
            debug!("OLED: bitmap {width}x{height} at ({xpos},{ypos}) leaves the buffer");
            return Ok(());
        }
        if needed == 0 {
            return Ok(());
        }

        let mut page = ypos / PAGE_HEIGHT;
        let mut dst_bit = u8::try_from(ypos % PAGE_HEIGHT).unwrap_or_default();
        for row in bitmap[..needed].chunks_exact(stride) {
            let mut segment = xpos;
            for &byte in row {
                let src = if invert { !byte } else { byte };
                for src_bit in (0..8u8).rev() {
                    if let Some(stored) = self.buffer.segment(page, segment) {
                        let composed = copy_bit(src, src_bit, orient(stored, self.flip), dst_bit);
                        self.buffer
                            .set_segment(page, segment, orient(composed, self.flip));
                    }
                    segment += 1;
                }
            }
            self.delay.delay_ms(BITMAP_ROW_YIELD_MS);
            dst_bit += 1;
            if usize::from(dst_bit) == PAGE_HEIGHT {
                page += 1;
                dst_bit = 0;
            }
        }
        self.show_buffer()
    }

    /// Draw up to 16 8x8 characters on `page`, starting at segment 0.
    pub fn draw_text(&mut self, page: usize, text: impl AsRef<[u8]>, invert: bool) -> OledResult<()> {
        if page >= self.geometry.pages() {
            debug!("OLED: text page {page} out of range");
            return Ok(());
        }
        for (column, &code) in text.as_ref().iter().take(TEXT_COLUMNS).enumerate() {
            let mut image = font::glyph(code);
            if invert {
                transform::invert(&mut image);
            }
            if self.flip {
                transform::flip(&mut image);
            }
            self.display_image(page, column * GLYPH_WIDTH, &image)?;
        }
        Ok(())
    }

    /// Draw up to 5 characters scaled 3x (24x24 pixels) over `page` and the
    /// two pages below it.
    pub fn draw_text_x3(&mut self, page: usize, text: impl AsRef<[u8]>, invert: bool) -> OledResult<()> {
        if page
            .checked_add(X3_SCALE)
            .is_none_or(|end| end > self.geometry.pages())
        {
            debug!("OLED: x3 text page {page} out of range");
            return Ok(());
        }
        for (column, &code) in text.as_ref().iter().take(X3_TEXT_COLUMNS).enumerate() {
            let tall = scale_glyph_x3(&font::glyph(code));
            let segment = column * X3_GLYPH_WIDTH;
            for band in 0..X3_SCALE {
                let mut image = [0u8; X3_GLYPH_WIDTH];
                for (run, bits) in image.chunks_exact_mut(X3_SCALE).zip(tall.iter()) {
                    run.fill(bits.to_le_bytes()[band]);
                }
                if invert {
                    transform::invert(&mut image);
                }
                if self.flip {
                    transform::flip(&mut image);
                }
                self.display_image(page + band, segment, &image)?;
            }
        }
        Ok(())
    }

    pub fn clear_screen(&mut self, invert: bool) -> OledResult<()> {
        for page in 0..self.geometry.pages() {
            self.clear_line(page, invert)?;
        }
        Ok(())
    }

    pub fn clear_line(&mut self, page: usize, invert: bool) -> OledResult<()> {
        self.draw_text(page, [0u8; TEXT_COLUMNS], invert)
    }

    /// Wipe the panel page by page, shifting one pixel row out of each
    /// segment per step until the page is dark.
    pub fn fadeout(&mut self) -> OledResult<()> {
        for page in 0..self.geometry.pages() {
            let mut pattern = 0xFFu8;
            for _ in 0..PAGE_HEIGHT {
                pattern = if self.flip {
                    pattern >> 1
                } else {
                    pattern << 1
                };
                if let Some(row) = self.buffer.page_mut(page) {
                    row.fill(pattern);
                }
                self.flush_page(page)?;
                self.delay.delay_ms(FADEOUT_STEP_YIELD_MS);
            }
        }
        Ok(())
    }
}

/// One coordinate of a line: where it starts, which way it steps and how
/// far it travels.
#[derive(Clone, Copy)]
struct Axis {
    start: i64,
    step: i64,
    delta: i64,
}

impl Axis {
    fn new(from: i64, to: i64) -> Self {
        Self {
            start: from,
            step: if to > from { 1 } else { -1 },
            delta: (to - from).abs(),
        }
    }
}

/// Points of a Bresenham line, in drawing order, whose `major` coordinate
/// lies in `0..limit`. The minor coordinate at step `k` is
/// `floor((2 * minor.delta * k + major.delta) / (2 * major.delta))` steps
/// from its start, which is what the incremental error term produces.
fn line_span(major: Axis, minor: Axis, limit: i64) -> impl Iterator<Item = (i64, i64)> {
    let (first, last) = if major.step > 0 {
        ((-major.start).max(0), (limit - 1 - major.start).min(major.delta))
    } else {
        ((major.start - limit + 1).max(0), major.start.min(major.delta))
    };
    (first..=last).map(move |k| {
        let advance = if major.delta == 0 {
            0
        } else {
            let k = i128::from(k);
            (2 * i128::from(minor.delta) * k + i128::from(major.delta))
                / (2 * i128::from(major.delta))
        };
        let advance = i64::try_from(advance).unwrap_or(i64::MAX);
        (
            major.start + major.step * k,
            minor.start.saturating_add(minor.step * advance),
        )
    })
}

/// Stretch one glyph column to 24 bits: every source bit becomes three.
pub(crate) fn widen_x3(column: u8) -> u32 {
    let mut out = 0u32;
    let mut out_mask = 0b111u32;
    for bit in 0..8 {
        if column & (1 << bit) != 0 {
            out |= out_mask;
        }
        out_mask <<= 3;
    }
    out
}

fn scale_glyph_x3(glyph: &Glyph) -> [u32; GLYPH_SIZE] {
    glyph.map(widen_x3)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widen_x3_single_bits() {
        assert_eq!(widen_x3(0x00), 0);
        assert_eq!(widen_x3(0x01), 0b111);
        assert_eq!(widen_x3(0x02), 0b111_000);
        assert_eq!(widen_x3(0x80), 0b111 << 21);
        assert_eq!(widen_x3(0xFF), 0x00FF_FFFF);
    }

    #[test]
    fn test_line_span_matches_incremental_walk() {
        let (x, y) = (Axis::new(0, 9), Axis::new(0, 4));
        let points: Vec<_> = line_span(x, y, 128).collect();
        assert_eq!(
            points,
            vec![
                (0, 0),
                (1, 0),
                (2, 1),
                (3, 1),
                (4, 2),
                (5, 2),
                (6, 3),
                (7, 3),
                (8, 4),
                (9, 4)
            ]
        );
    }

    #[test]
    fn test_line_span_skips_off_panel_stretch() {
        let x = Axis::new(i64::from(i32::MAX), i64::from(i32::MIN));
        let y = Axis::new(0, 0);
        let points: Vec<_> = line_span(x, y, 128).collect();
        assert_eq!(points.len(), 128);
        assert_eq!(points.first(), Some(&(127, 0)));
        assert_eq!(points.last(), Some(&(0, 0)));
    }

    #[test]
    fn test_widen_x3_byte_split() {
        // 0x7C: rows 2..=6 -> output rows 6..=20
        let tall = widen_x3(0x7C);
        assert_eq!(tall.to_le_bytes(), [0xC0, 0xFF, 0x1F, 0x00]);
    }
}
