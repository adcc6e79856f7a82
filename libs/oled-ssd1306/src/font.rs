//! 8x8 glyph lookup.
//!
//! The `font8x8` tables are row-major (one byte per pixel row, bit 0 is the
//! leftmost pixel). Page memory is column-major, so glyphs are transposed on
//! lookup into one byte per segment with bit 0 as the top pixel.

use font8x8::legacy::{BASIC_LEGACY, LATIN_LEGACY};

pub const GLYPH_SIZE: usize = 8;

/// One glyph as page segments, left to right.
pub type Glyph = [u8; GLYPH_SIZE];

const LATIN_FIRST: usize = 0xA0;

/// Column-major glyph for a character code. Codes without an entry render
/// blank.
pub fn glyph(code: u8) -> Glyph {
    let code = usize::from(code);
    let rows = if code < BASIC_LEGACY.len() {
        &BASIC_LEGACY[code]
    } else if code >= LATIN_FIRST {
        &LATIN_LEGACY[code - LATIN_FIRST]
    } else {
        return [0; GLYPH_SIZE];
    };
    transpose(rows)
}

fn transpose(rows: &[u8; GLYPH_SIZE]) -> Glyph {
    let mut columns = [0u8; GLYPH_SIZE];
    for (y, row) in rows.iter().enumerate() {
        for (x, column) in columns.iter_mut().enumerate() {
            if row & (1 << x) != 0 {
                *column |= 1 << y;
            }
        }
    }
    columns
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glyph_capital_a() {
        assert_eq!(glyph(b'A'), [0x7C, 0x7E, 0x13, 0x13, 0x7E, 0x7C, 0x00, 0x00]);
    }

    #[test]
    fn test_glyph_space_and_nul_are_blank() {
        assert_eq!(glyph(b' '), [0; GLYPH_SIZE]);
        assert_eq!(glyph(0), [0; GLYPH_SIZE]);
    }

    #[test]
    fn test_glyph_gap_renders_blank() {
        assert_eq!(glyph(0x80), [0; GLYPH_SIZE]);
        assert_eq!(glyph(0x9F), [0; GLYPH_SIZE]);
    }

    #[test]
    fn test_glyph_latin_supplement_present() {
        // U+00C4 (A with diaeresis)
        assert_ne!(glyph(0xC4), [0; GLYPH_SIZE]);
    }
}
