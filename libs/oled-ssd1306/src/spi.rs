use crate::command::{self, Panel};
use crate::common::{Geometry, ScrollType};
use crate::error::{Error, OledResult};
use crate::transport::Transport;
use embedded_hal::digital::{Error as _, OutputPin};
use embedded_hal::spi::{Error as _, SpiBus};
use log::{debug, error, info, trace, warn};

/// SSD1306 on a 4-wire SPI bus. The DC pin is driven low for command bytes
/// and high for display data.
pub struct SpiInterface<SPI, DC> {
    spi: SPI,
    dc: DC,
    offset_x: usize,
    panel: Option<Panel>,
}

impl<SPI: SpiBus, DC: OutputPin> SpiInterface<SPI, DC> {
    pub fn new(spi: SPI, dc: DC) -> Self {
        Self {
            spi,
            dc,
            offset_x: 0,
            panel: None,
        }
    }

    #[must_use]
    pub fn with_offset_x(mut self, offset_x: usize) -> Self {
        self.offset_x = offset_x;
        self
    }

    pub fn release(self) -> (SPI, DC) {
        (self.spi, self.dc)
    }

    fn send_commands(&mut self, commands: &[u8]) -> OledResult<()> {
        self.dc.set_low().map_err(|e| Error::Pin(e.kind()))?;
        self.write(commands)
    }

    fn send_data(&mut self, data: &[u8]) -> OledResult<()> {
        self.dc.set_high().map_err(|e| Error::Pin(e.kind()))?;
        self.write(data)
    }

    // The DC level must not change while bytes are still on the wire.
    fn write(&mut self, bytes: &[u8]) -> OledResult<()> {
        self.spi.write(bytes).map_err(|e| Error::Spi(e.kind()))?;
        self.spi.flush().map_err(|e| Error::Spi(e.kind()))?;
        trace!("OLED: spi sent {} bytes", bytes.len());
        Ok(())
    }
}

impl<SPI: SpiBus, DC: OutputPin> Transport for SpiInterface<SPI, DC> {
    fn initialize(&mut self, geometry: &Geometry, flip: bool) -> OledResult<()> {
        self.panel = Some(Panel {
            geometry: *geometry,
            flip,
        });
        let result = self.send_commands(&command::init_sequence(geometry, flip));
        match &result {
            Ok(()) => info!("OLED: configured over SPI"),
            Err(e) => error!("OLED: SPI configuration failed: {e}"),
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
        self.send_commands(&address)?;
        self.send_data(data)
    }

    fn set_contrast(&mut self, contrast: u8) -> OledResult<()> {
        self.send_commands(&command::contrast(contrast))
    }

    fn set_hardware_scroll(&mut self, scroll: ScrollType) -> OledResult<()> {
        let Some(panel) = self.panel else {
            warn!("OLED: hardware scroll before initialize");
            return Ok(());
        };
        let result = self.send_commands(&command::hardware_scroll(scroll, &panel.geometry));
        match &result {
            Ok(()) => debug!("OLED: scroll {scroll:?} command sent"),
            Err(e) => error!("OLED: scroll {scroll:?} command failed: {e}"),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State as PinState, Transaction as PinTransaction,
    };
    use embedded_hal_mock::eh1::spi::{Mock as SpiMock, Transaction as SpiTransaction};

    fn spi_write(bytes: &[u8]) -> [SpiTransaction<u8>; 2] {
        [
            SpiTransaction::write_vec(bytes.to_vec()),
            SpiTransaction::flush(),
        ]
    }

    #[test]
    fn test_send_page_toggles_dc() {
        let geometry = Geometry::new(128, 32).unwrap();
        let init = command::init_sequence(&geometry, false);

        let mut spi_expectations = Vec::new();
        spi_expectations.extend(spi_write(&init));
        spi_expectations.extend(spi_write(&[0x08, 0x10, 0xB1]));
        spi_expectations.extend(spi_write(&[0xDE, 0xAD]));
        let mut spi = SpiMock::new(&spi_expectations);
        let mut dc = PinMock::new(&[
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
        ]);

        let mut interface = SpiInterface::new(spi.clone(), dc.clone());
        interface.initialize(&geometry, false).unwrap();
        interface.send_page(1, 8, &[0xDE, 0xAD]).unwrap();

        spi.done();
        dc.done();
    }

    #[test]
    fn test_send_page_flipped_mirrors_page() {
        let geometry = Geometry::new(128, 32).unwrap();
        let init = command::init_sequence(&geometry, true);

        let mut spi_expectations = Vec::new();
        spi_expectations.extend(spi_write(&init));
        spi_expectations.extend(spi_write(&[0x00, 0x10, 0xB3]));
        spi_expectations.extend(spi_write(&[0x80]));
        let mut spi = SpiMock::new(&spi_expectations);
        let mut dc = PinMock::new(&[
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
        ]);

        let mut interface = SpiInterface::new(spi.clone(), dc.clone());
        interface.initialize(&geometry, true).unwrap();
        interface.send_page(0, 0, &[0x80]).unwrap();

        spi.done();
        dc.done();
    }

    #[test]
    fn test_commands_before_initialize() {
        let mut spi = SpiMock::new(&spi_write(&[0x81, 0x10]));
        let mut dc = PinMock::new(&[PinTransaction::set(PinState::Low)]);

        let mut interface = SpiInterface::new(spi.clone(), dc.clone());
        interface.set_contrast(0x10).unwrap();
        // No geometry yet: dropped without touching the bus.
        interface.send_page(0, 0, &[0xFF]).unwrap();
        interface.set_hardware_scroll(ScrollType::Right).unwrap();

        spi.done();
        dc.done();
    }
}
