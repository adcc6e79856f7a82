use crate::buffer::{FrameBuffer, Location};
use crate::common::{Geometry, SEGMENTS};
use crate::error::OledResult;
use crate::scroll::ScrollWindow;
use crate::transform::orient;
use crate::transport::Transport;
use embedded_hal::delay::DelayNs;
use log::{debug, info};

const DEFAULT_WIDTH: usize = 128;
const DEFAULT_HEIGHT: usize = 64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OledConfig {
    pub width: usize,
    pub height: usize,
    /// Rotate the panel by 180 degrees. Every byte written to the panel is
    /// bit-reversed and the transport mirrors the page and segment order.
    pub flip: bool,
}

impl Default for OledConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            flip: false,
        }
    }
}

/// A paged monochrome panel and its in-memory frame buffer.
///
/// The buffer is the source of truth. Every drawing and scrolling call
/// mutates it and pushes the touched bytes through the transport. `D` is
/// used to yield between the steps of long-running effects.
pub struct Oled<T, D> {
    pub(crate) transport: T,
    pub(crate) delay: D,
    pub(crate) geometry: Geometry,
    pub(crate) flip: bool,
    pub(crate) buffer: FrameBuffer,
    pub(crate) scroll_window: Option<ScrollWindow>,
}

impl<T: Transport, D: DelayNs> Oled<T, D> {
    /// Validate the geometry and allocate the buffer. The panel is not
    /// touched until [`Self::init`].
    pub fn new(transport: T, delay: D, config: OledConfig) -> OledResult<Self> {
        let geometry = Geometry::new(config.width, config.height)?;
        Ok(Self {
            transport,
            delay,
            geometry,
            flip: config.flip,
            buffer: FrameBuffer::new(geometry.pages()),
            scroll_window: None,
        })
    }

    /// Bring the controller up and zero the buffer.
    pub fn init(&mut self) -> OledResult<()> {
        info!(
            "OLED: initializing {}x{} panel ({} pages, flip={})",
            self.geometry.width(),
            self.geometry.height(),
            self.geometry.pages(),
            self.flip
        );
        self.transport.initialize(&self.geometry, self.flip)?;
        self.buffer.fill(0x00);
        Ok(())
    }

    pub fn width(&self) -> usize {
        self.geometry.width()
    }

    pub fn height(&self) -> usize {
        self.geometry.height()
    }

    pub fn pages(&self) -> usize {
        self.geometry.pages()
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn flip(&self) -> bool {
        self.flip
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Give back the transport and delay.
    pub fn release(self) -> (T, D) {
        (self.transport, self.delay)
    }

    /// The whole buffer, page after page, [`SEGMENTS`] bytes each.
    pub fn buffer(&self) -> &[u8] {
        self.buffer.as_slice()
    }

    /// Replace the whole buffer without touching the panel. Call
    /// [`Self::show_buffer`] to push it.
    pub fn set_buffer(&mut self, bytes: &[u8]) -> OledResult<()> {
        self.buffer.load(bytes)
    }

    /// Push every page to the panel.
    pub fn show_buffer(&mut self) -> OledResult<()> {
        for page in 0..self.geometry.pages() {
            self.flush_page(page)?;
        }
        Ok(())
    }

    /// Write a run of raw segment bytes at (`page`, `segment`) and push it.
    /// Runs that do not fit inside the buffer are ignored.
    pub fn display_image(&mut self, page: usize, segment: usize, images: &[u8]) -> OledResult<()> {
        if !self.buffer.write(page, segment, images) {
            debug!(
                "OLED: display_image page={page} segment={segment} len={} out of range",
                images.len()
            );
            return Ok(());
        }
        self.flush_range(page, segment, images.len())
    }

    /// Clamp `contrast` to 0..=255 and send it.
    pub fn set_contrast(&mut self, contrast: i32) -> OledResult<()> {
        let contrast = u8::try_from(contrast.clamp(0, 255)).unwrap_or(u8::MAX);
        debug!("OLED: contrast={contrast}");
        self.transport.set_contrast(contrast)
    }

    /// Log the geometry and every page as hex.
    pub fn dump(&self) {
        info!(
            "OLED: width={} height={} pages={} flip={}",
            self.geometry.width(),
            self.geometry.height(),
            self.geometry.pages(),
            self.flip
        );
        for page in 0..self.geometry.pages() {
            if let Some(row) = self.buffer.page(page) {
                let hex: String = row.iter().map(|b| format!("{b:02x}")).collect();
                info!("OLED: page[{page}] {hex}");
            }
        }
    }

    /// Log and return one stored segment byte.
    pub fn dump_page(&self, page: usize, segment: usize) -> Option<u8> {
        let value = self.buffer.segment(page, segment);
        match value {
            Some(byte) => info!("OLED: page[{page}].segment[{segment}]={byte:02x}"),
            None => info!("OLED: page[{page}].segment[{segment}] out of range"),
        }
        value
    }

    /// Push `len` stored bytes of `page` from `segment`, clipped to the
    /// panel width.
    pub(crate) fn flush_range(&mut self, page: usize, segment: usize, len: usize) -> OledResult<()> {
        let width = self.geometry.width();
        if segment >= width || len == 0 {
            return Ok(());
        }
        let end = segment.saturating_add(len).min(width);
        let Some(row) = self.buffer.page(page) else {
            return Ok(());
        };
        self.transport.send_page(page, segment, &row[segment..end])
    }

    pub(crate) fn flush_page(&mut self, page: usize) -> OledResult<()> {
        self.flush_range(page, 0, SEGMENTS)
    }

    /// Set (`on`) or clear one pixel in the buffer only.
    pub(crate) fn plot(&mut self, location: Location, on: bool) {
        let Some(stored) = self.buffer.segment(location.page, location.segment) else {
            return;
        };
        let mask = 1u8 << location.bit;
        let logical = orient(stored, self.flip);
        let logical = if on { logical | mask } else { logical & !mask };
        self.buffer
            .set_segment(location.page, location.segment, orient(logical, self.flip));
    }
}
