use crate::command::{self, CONTROL_CMD_STREAM, CONTROL_DATA_STREAM, Panel};
use crate::common::{Geometry, ScrollType};
use crate::error::{Error, OledResult};
use crate::transport::Transport;
use embedded_hal::i2c::{Error as _, I2c};
use log::{debug, error, info, trace, warn};

pub const DEFAULT_ADDRESS: u8 = 0x3C;

/// SSD1306 on an I2C bus. Every transaction starts with a control byte that
/// marks the rest as commands or display data.
pub struct I2cInterface<I2C> {
    i2c: I2C,
    address: u8,
    offset_x: usize,
    panel: Option<Panel>,
}

impl<I2C: I2c> I2cInterface<I2C> {
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self {
            i2c,
            address,
            offset_x: 0,
            panel: None,
        }
    }

    /// Shift every column by `offset_x`, for controllers with more column
    /// RAM than the glass shows (SH1106 panels use 2).
    #[must_use]
    pub fn with_offset_x(mut self, offset_x: usize) -> Self {
        self.offset_x = offset_x;
        self
    }

    pub fn release(self) -> I2C {
        self.i2c
    }

    fn write_frame(&mut self, control: u8, payload: &[u8]) -> OledResult<()> {
        let mut frame = Vec::with_capacity(payload.len() + 1);
        frame.push(control);
        frame.extend_from_slice(payload);
        trace!(
            "OLED: i2c write control=0x{control:02X} len={}",
            payload.len()
        );
        self.i2c
            .write(self.address, &frame)
            .map_err(|e| Error::I2c(e.kind()))
    }
}

impl<I2C: I2c> Transport for I2cInterface<I2C> {
    fn initialize(&mut self, geometry: &Geometry, flip: bool) -> OledResult<()> {
        self.panel = Some(Panel {
            geometry: *geometry,
            flip,
        });
        let result = self.write_frame(
            CONTROL_CMD_STREAM,
            &command::init_sequence(geometry, flip),
        );
        match &result {
            Ok(()) => info!("OLED: configured over I2C at 0x{:02X}", self.address),
            Err(e) => error!("OLED: I2C configuration failed: {e}"),
        }
        result
    }

    fn send_page(&mut self, page: usize, segment: usize, data: &[u8]) -> OledResult<()> {
        let Some(panel) = self.panel else {
            warn!("OLED: send_page before initialize");
            return Ok(());
        };
        if !panel.accepts(page, segment) {
            return Ok(());
        }
        let address = command::page_address(panel.physical_page(page), segment + self.offset_x);
        self.write_frame(CONTROL_CMD_STREAM, &address)?;
        self.write_frame(CONTROL_DATA_STREAM, data)
    }

    fn set_contrast(&mut self, contrast: u8) -> OledResult<()> {
        self.write_frame(CONTROL_CMD_STREAM, &command::contrast(contrast))
    }

    fn set_hardware_scroll(&mut self, scroll: ScrollType) -> OledResult<()> {
        let Some(panel) = self.panel else {
            warn!("OLED: hardware scroll before initialize");
            return Ok(());
        };
        let result = self.write_frame(
            CONTROL_CMD_STREAM,
            &command::hardware_scroll(scroll, &panel.geometry),
        );
        match &result {
            Ok(()) => debug!("OLED: scroll {scroll:?} command sent"),
            Err(e) => error!("OLED: scroll {scroll:?} command failed: {e}"),
        }
        result
    }
}
