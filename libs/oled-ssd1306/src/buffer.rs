use crate::common::{Geometry, PAGE_HEIGHT, SEGMENTS};
use crate::error::{Error, OledResult};

/// Where a pixel lives in page memory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Location {
    pub page: usize,
    pub bit: u8,
    pub segment: usize,
}

/// Map a pixel coordinate to its page, bit and segment. Coordinates outside
/// the panel map to `None`.
pub fn locate(geometry: &Geometry, x: i32, y: i32) -> Option<Location> {
    let x = usize::try_from(x).ok()?;
    let y = usize::try_from(y).ok()?;
    if x >= geometry.width() || y >= geometry.height() {
        return None;
    }
    Some(Location {
        page: y / PAGE_HEIGHT,
        bit: u8::try_from(y % PAGE_HEIGHT).ok()?,
        segment: x,
    })
}

/// Page memory: `pages` rows of [`SEGMENTS`] bytes, allocated once.
///
/// Bit `i` of a segment byte is the pixel at row `page * 8 + i` (before any
/// orientation flip is applied by the caller).
pub struct FrameBuffer {
    pages: usize,
    data: Box<[u8]>,
}

impl FrameBuffer {
    #[must_use]
    pub fn new(pages: usize) -> Self {
        let data: Box<[u8]> = vec![0x00; pages * SEGMENTS].into_boxed_slice();
        Self { pages, data }
    }

    pub fn pages(&self) -> usize {
        self.pages
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn page(&self, page: usize) -> Option<&[u8]> {
        self.data.chunks_exact(SEGMENTS).nth(page)
    }

    pub fn page_mut(&mut self, page: usize) -> Option<&mut [u8]> {
        self.data.chunks_exact_mut(SEGMENTS).nth(page)
    }

    pub fn segment(&self, page: usize, segment: usize) -> Option<u8> {
        self.index(page, segment).map(|i| self.data[i])
    }

    pub fn set_segment(&mut self, page: usize, segment: usize, value: u8) -> bool {
        match self.index(page, segment) {
            Some(i) => {
                self.data[i] = value;
                true
            }
            None => false,
        }
    }

    /// Copy `bytes` into `page` starting at `segment`. Nothing is written if
    /// the run does not fit inside the page.
    pub fn write(&mut self, page: usize, segment: usize, bytes: &[u8]) -> bool {
        let Some(end) = segment.checked_add(bytes.len()) else {
            return false;
        };
        if page >= self.pages || end > SEGMENTS {
            return false;
        }
        let start = page * SEGMENTS + segment;
        self.data[start..start + bytes.len()].copy_from_slice(bytes);
        true
    }

    /// Overwrite page `dst` with the contents of page `src`.
    pub fn copy_page(&mut self, src: usize, dst: usize) -> bool {
        if src >= self.pages || dst >= self.pages {
            return false;
        }
        self.data
            .copy_within(src * SEGMENTS..(src + 1) * SEGMENTS, dst * SEGMENTS);
        true
    }

    pub fn fill(&mut self, value: u8) {
        self.data.fill(value);
    }

    /// Replace the whole buffer. `bytes` must be exactly [`Self::len`] long.
    pub fn load(&mut self, bytes: &[u8]) -> OledResult<()> {
        if bytes.len() != self.data.len() {
            return Err(Error::BufferSize {
                expected: self.data.len(),
                actual: bytes.len(),
            });
        }
        self.data.copy_from_slice(bytes);
        Ok(())
    }

    fn index(&self, page: usize, segment: usize) -> Option<usize> {
        (page < self.pages && segment < SEGMENTS).then(|| page * SEGMENTS + segment)
    }
}
