use crate::buffer::locate;
use crate::display::Oled;
use crate::error::Error;
use crate::transport::Transport;
use embedded_graphics::{
    pixelcolor::BinaryColor,
    prelude::{DrawTarget, OriginDimensions, Pixel, Size},
};
use embedded_hal::delay::DelayNs;

// Drawing through embedded-graphics only touches the buffer; call
// `show_buffer` to push the result.
impl<T: Transport, D: DelayNs> DrawTarget for Oled<T, D> {
    type Color = BinaryColor;
    type Error = Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            if let Some(location) = locate(&self.geometry, coord.x, coord.y) {
                self.plot(location, color.is_on());
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: BinaryColor) -> Result<(), Self::Error> {
        self.buffer.fill(if color.is_on() { 0xFF } else { 0x00 });
        Ok(())
    }
}

impl<T: Transport, D: DelayNs> OriginDimensions for Oled<T, D> {
    fn size(&self) -> Size {
        Size::new(
            u32::try_from(self.geometry.width()).unwrap_or(u32::MAX),
            u32::try_from(self.geometry.height()).unwrap_or(u32::MAX),
        )
    }
}
