use linux_embedded_hal::gpio_cdev::Error as GpioError;
use linux_embedded_hal::SPIError;
use linux_embedded_hal::i2cdev::linux::LinuxI2CError;
use std::io::Error as IoError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unsupported panel geometry {width}x{height}")]
    InvalidGeometry { width: usize, height: usize },
    #[error("Bitmap width {0} is not a multiple of 8")]
    BitmapWidth(usize),
    #[error("Buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSize { expected: usize, actual: usize },
    #[error("SPI error: {0:?}")]
    Spi(embedded_hal::spi::ErrorKind),
    #[error("I2C error: {0:?}")]
    I2c(embedded_hal::i2c::ErrorKind),
    #[error("Pin error: {0:?}")]
    Pin(embedded_hal::digital::ErrorKind),
    #[error("SPI device error: {0}")]
    SpiDev(#[from] SPIError),
    #[error("IO error: {0}")]
    Io(#[from] IoError),
    #[error("GPIO error: {0}")]
    Gpio(#[from] GpioError),
    #[error("I2C device error: {0}")]
    I2cDev(#[from] LinuxI2CError),
}

pub type OledResult<T> = Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::ErrorKind;

    fn open_spidev() -> OledResult<()> {
        Err(SPIError::from(IoError::from(ErrorKind::NotFound)))?;
        Ok(())
    }

    #[test]
    fn test_spidev_error_converts() {
        assert!(matches!(open_spidev(), Err(Error::SpiDev(_))));
    }
}
