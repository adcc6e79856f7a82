//! Frame buffer driver for SSD1306 monochrome OLED panels.
//!
//! The panel memory is split into pages, 8-pixel-tall bands of 128 one-byte
//! segments. [`Oled`] owns an in-memory copy of that memory, draws into it,
//! and mirrors every change to the panel through a [`Transport`].

pub mod buffer;
pub mod command;
pub mod common;
pub mod device;
pub mod display;
mod error;
pub mod font;
mod graphics;
pub mod i2c;
mod render;
pub mod scroll;
pub mod spi;
pub mod transform;
pub mod transport;

pub use common::{Geometry, ScrollType};
pub use device::{Bus, Device, DeviceConfig, LinuxOled};
pub use display::{Oled, OledConfig};
pub use error::{Error, OledResult};
pub use transport::Transport;
