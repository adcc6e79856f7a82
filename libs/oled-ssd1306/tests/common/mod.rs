#![allow(dead_code)]

use embedded_hal_mock::eh1::delay::NoopDelay;
use oled_ssd1306::common::{Geometry, SEGMENTS, ScrollType};
use oled_ssd1306::{Oled, OledConfig, OledResult, Transport};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageWrite {
    pub page: usize,
    pub segment: usize,
    pub data: Vec<u8>,
}

/// In-memory transport that records every call and keeps a copy of what
/// the panel would show.
#[derive(Default)]
pub struct RecordingTransport {
    pub initialized: Option<(Geometry, bool)>,
    pub writes: Vec<PageWrite>,
    pub contrast: Vec<u8>,
    pub scrolls: Vec<ScrollType>,
    pub panel: Vec<u8>,
}

impl RecordingTransport {
    pub fn clear_log(&mut self) {
        self.writes.clear();
        self.contrast.clear();
        self.scrolls.clear();
    }
}

impl Transport for RecordingTransport {
    fn initialize(&mut self, geometry: &Geometry, flip: bool) -> OledResult<()> {
        self.initialized = Some((*geometry, flip));
        self.panel = vec![0x00; geometry.buffer_len()];
        Ok(())
    }

    fn send_page(&mut self, page: usize, segment: usize, data: &[u8]) -> OledResult<()> {
        let start = page * SEGMENTS + segment;
        self.panel[start..start + data.len()].copy_from_slice(data);
        self.writes.push(PageWrite {
            page,
            segment,
            data: data.to_vec(),
        });
        Ok(())
    }

    fn set_contrast(&mut self, contrast: u8) -> OledResult<()> {
        self.contrast.push(contrast);
        Ok(())
    }

    fn set_hardware_scroll(&mut self, scroll: ScrollType) -> OledResult<()> {
        self.scrolls.push(scroll);
        Ok(())
    }
}

pub type TestOled = Oled<RecordingTransport, NoopDelay>;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A 128-wide panel, initialized, with an empty call log.
pub fn oled(height: usize, flip: bool) -> TestOled {
    init_logger();
    let config = OledConfig {
        width: 128,
        height,
        flip,
    };
    let mut oled = Oled::new(RecordingTransport::default(), NoopDelay::new(), config).unwrap();
    oled.init().unwrap();
    oled.transport_mut().clear_log();
    oled
}

pub fn page(oled: &TestOled, page: usize) -> &[u8] {
    &oled.buffer()[page * SEGMENTS..(page + 1) * SEGMENTS]
}

/// Fill the buffer with a deterministic, non-repeating pattern.
pub fn patterned(oled: &mut TestOled) -> Vec<u8> {
    let len = oled.buffer().len();
    let bytes: Vec<u8> = (0..len)
        .map(|i| u8::try_from((i * 37 + 11) % 251).unwrap())
        .collect();
    oled.set_buffer(&bytes).unwrap();
    bytes
}
