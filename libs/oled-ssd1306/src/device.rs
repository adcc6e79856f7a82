use crate::display::{Oled, OledConfig};
use crate::error::{Error, OledResult};
use crate::i2c::{self, I2cInterface};
use crate::spi::SpiInterface;
use crate::transport::Transport;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{Error as _, OutputPin};
use linux_embedded_hal::{
    CdevPin, Delay, I2cdev, SpidevBus,
    gpio_cdev::{Chip, LineRequestFlags},
    spidev::{SpiModeFlags, SpidevOptions},
};
use log::info;

const DEFAULT_I2C_BUS_PATH: &str = "/dev/i2c-1";
const DEFAULT_SPI_BUS_PATH: &str = "/dev/spidev0.0";
const DEFAULT_SPI_BITS_PER_WORD: u8 = 8;
const DEFAULT_SPI_MAX_SPEED_HZ: u32 = 8_000_000;
const DEFAULT_GPIO_CHIP_PATH: &str = "/dev/gpiochip0";
const DEFAULT_DC_PIN: u32 = 24;
const DEFAULT_SPI_RST_PIN: u32 = 25;
const DEFAULT_OFFSET_X: usize = 0;

const RESET_LOW_MS: u32 = 50;

const OLED_DC_CONSUMER: &str = "oled-dc";
const OLED_RST_CONSUMER: &str = "oled-rst";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Bus {
    #[default]
    I2c,
    Spi,
}

/// Linux wiring of the panel. Unset fields fall back to defaults for a
/// Raspberry Pi with a 128x64 panel on I2C bus 1.
#[derive(Default)]
pub struct DeviceConfig {
    pub bus: Option<Bus>,
    pub i2c_bus_path: Option<String>,
    pub i2c_address: Option<u8>,
    pub spi_bus_path: Option<String>,
    pub spi_options: Option<SpidevOptions>,
    pub gpio_chip_path: Option<String>,
    pub dc_pin: Option<u32>,
    /// Reset line. On SPI it defaults to GPIO 25; on I2C no reset is pulsed
    /// unless a pin is given.
    pub rst_pin: Option<u32>,
    pub offset_x: Option<usize>,
    pub width: Option<usize>,
    pub height: Option<usize>,
    pub flip: Option<bool>,
}

pub type LinuxOled = Oled<Box<dyn Transport>, Delay>;

/// An opened and initialized panel. Holds the reset line so it stays
/// driven high while the panel is in use.
pub struct Device {
    pub display: LinuxOled,
    _rst: Option<CdevPin>,
}

impl Device {
    pub fn new(config: DeviceConfig) -> OledResult<Self> {
        let defaults = OledConfig::default();
        let oled_config = OledConfig {
            width: config.width.unwrap_or(defaults.width),
            height: config.height.unwrap_or(defaults.height),
            flip: config.flip.unwrap_or(defaults.flip),
        };
        let bus = config.bus.unwrap_or_default();
        let gpio_chip_path = config
            .gpio_chip_path
            .unwrap_or_else(|| DEFAULT_GPIO_CHIP_PATH.to_string());
        let offset_x = config.offset_x.unwrap_or(DEFAULT_OFFSET_X);
        let rst_pin = match bus {
            Bus::I2c => config.rst_pin,
            Bus::Spi => Some(config.rst_pin.unwrap_or(DEFAULT_SPI_RST_PIN)),
        };

        info!("Initializing OLED device on {bus:?}...");

        let rst = match rst_pin {
            Some(pin) => {
                let mut rst = request_output(&gpio_chip_path, pin, 1, OLED_RST_CONSUMER)?;
                hardware_reset(&mut rst, &mut Delay {})?;
                Some(rst)
            }
            None => None,
        };

        let transport: Box<dyn Transport> = match bus {
            Bus::I2c => {
                let i2c_bus_path = config
                    .i2c_bus_path
                    .unwrap_or_else(|| DEFAULT_I2C_BUS_PATH.to_string());
                let address = config.i2c_address.unwrap_or(i2c::DEFAULT_ADDRESS);
                let i2c_bus = I2cdev::new(i2c_bus_path)?;
                Box::new(I2cInterface::new(i2c_bus, address).with_offset_x(offset_x))
            }
            Bus::Spi => {
                let spi_bus_path = config
                    .spi_bus_path
                    .unwrap_or_else(|| DEFAULT_SPI_BUS_PATH.to_string());
                let spi_options = config.spi_options.unwrap_or_else(|| {
                    SpidevOptions::new()
                        .bits_per_word(DEFAULT_SPI_BITS_PER_WORD)
                        .max_speed_hz(DEFAULT_SPI_MAX_SPEED_HZ)
                        .mode(SpiModeFlags::SPI_MODE_0)
                        .build()
                });
                let mut spi_bus = SpidevBus::open(spi_bus_path)?;
                spi_bus.configure(&spi_options)?;
                let dc_pin = config.dc_pin.unwrap_or(DEFAULT_DC_PIN);
                let dc = request_output(&gpio_chip_path, dc_pin, 0, OLED_DC_CONSUMER)?;
                Box::new(SpiInterface::new(spi_bus, dc).with_offset_x(offset_x))
            }
        };

        let mut display = Oled::new(transport, Delay {}, oled_config)?;
        display.init()?;

        Ok(Self { display, _rst: rst })
    }
}

fn request_output(
    gpio_chip_path: &str,
    pin: u32,
    initial: u8,
    consumer: &str,
) -> OledResult<CdevPin> {
    let mut chip = Chip::new(gpio_chip_path)?;
    let line = chip
        .get_line(pin)?
        .request(LineRequestFlags::OUTPUT, initial, consumer)?;
    Ok(CdevPin::new(line)?)
}

/// Pulse the reset line low, then release it high.
pub fn hardware_reset<P: OutputPin, D: DelayNs>(rst: &mut P, delay: &mut D) -> OledResult<()> {
    rst.set_low().map_err(|e| Error::Pin(e.kind()))?;
    delay.delay_ms(RESET_LOW_MS);
    rst.set_high().map_err(|e| Error::Pin(e.kind()))?;
    Ok(())
}
