use crate::error::{Error, OledResult};

/// Segments (byte-wide columns) held per page, independent of panel width.
pub const SEGMENTS: usize = 128;
/// Pixel rows covered by one page.
pub const PAGE_HEIGHT: usize = 8;

pub const GLYPH_WIDTH: usize = 8;
pub const TEXT_COLUMNS: usize = SEGMENTS / GLYPH_WIDTH;

pub const X3_SCALE: usize = 3;
pub const X3_GLYPH_WIDTH: usize = GLYPH_WIDTH * X3_SCALE;
pub const X3_TEXT_COLUMNS: usize = SEGMENTS / X3_GLYPH_WIDTH;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollType {
    Right,
    Left,
    Down,
    Up,
    Stop,
}

/// Validated panel dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Geometry {
    width: usize,
    height: usize,
    pages: usize,
}

impl Geometry {
    /// Width may be anything up to [`SEGMENTS`]; height selects 4 (32px) or
    /// 8 (64px) pages.
    pub fn new(width: usize, height: usize) -> OledResult<Self> {
        let pages = match height {
            32 => 4,
            64 => 8,
            _ => return Err(Error::InvalidGeometry { width, height }),
        };
        if width == 0 || width > SEGMENTS {
            return Err(Error::InvalidGeometry { width, height });
        }
        Ok(Self {
            width,
            height,
            pages,
        })
    }

    pub const fn width(&self) -> usize {
        self.width
    }

    pub const fn height(&self) -> usize {
        self.height
    }

    pub const fn pages(&self) -> usize {
        self.pages
    }

    pub const fn buffer_len(&self) -> usize {
        self.pages * SEGMENTS
    }
}
