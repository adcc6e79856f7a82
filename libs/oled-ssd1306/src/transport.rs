use crate::common::{Geometry, ScrollType};
use crate::error::OledResult;

/// The bus side of the panel. [`crate::Oled`] writes every change through
/// this trait and never looks at which bus sits behind it.
///
/// Calls are synchronous and block until the bus transaction completes.
pub trait Transport {
    /// Bring the controller up. Called once before any drawing.
    fn initialize(&mut self, geometry: &Geometry, flip: bool) -> OledResult<()>;

    /// Write `data` to `page` starting at `segment`. The caller keeps
    /// `page < pages` and `segment + data.len() <= width`.
    fn send_page(&mut self, page: usize, segment: usize, data: &[u8]) -> OledResult<()>;

    fn set_contrast(&mut self, contrast: u8) -> OledResult<()>;

    fn set_hardware_scroll(&mut self, scroll: ScrollType) -> OledResult<()>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn initialize(&mut self, geometry: &Geometry, flip: bool) -> OledResult<()> {
        (**self).initialize(geometry, flip)
    }

    fn send_page(&mut self, page: usize, segment: usize, data: &[u8]) -> OledResult<()> {
        (**self).send_page(page, segment, data)
    }

    fn set_contrast(&mut self, contrast: u8) -> OledResult<()> {
        (**self).set_contrast(contrast)
    }

    fn set_hardware_scroll(&mut self, scroll: ScrollType) -> OledResult<()> {
        (**self).set_hardware_scroll(scroll)
    }
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn initialize(&mut self, geometry: &Geometry, flip: bool) -> OledResult<()> {
        (**self).initialize(geometry, flip)
    }

    fn send_page(&mut self, page: usize, segment: usize, data: &[u8]) -> OledResult<()> {
        (**self).send_page(page, segment, data)
    }

    fn set_contrast(&mut self, contrast: u8) -> OledResult<()> {
        (**self).set_contrast(contrast)
    }

    fn set_hardware_scroll(&mut self, scroll: ScrollType) -> OledResult<()> {
        (**self).set_hardware_scroll(scroll)
    }
}

/// Transport for unit tests that only counts page writes.
#[cfg(test)]
#[derive(Default)]
pub(crate) struct CountingTransport {
    pub pages_sent: Vec<usize>,
}

#[cfg(test)]
impl Transport for CountingTransport {
    fn initialize(&mut self, _geometry: &Geometry, _flip: bool) -> OledResult<()> {
        Ok(())
    }

    fn send_page(&mut self, page: usize, _segment: usize, _data: &[u8]) -> OledResult<()> {
        self.pages_sent.push(page);
        Ok(())
    }

    fn set_contrast(&mut self, _contrast: u8) -> OledResult<()> {
        Ok(())
    }

    fn set_hardware_scroll(&mut self, _scroll: ScrollType) -> OledResult<()> {
        Ok(())
    }
}
