//! Software line scrolling and bit-level wraparound scrolling.

use crate::common::{ScrollType, TEXT_COLUMNS};
use crate::display::Oled;
use crate::error::OledResult;
use crate::transform::orient;
use crate::transport::Transport;
use embedded_hal::delay::DelayNs;
use log::debug;

/// Which way lines move through a [`ScrollWindow`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollDirection {
    /// `start < end`: lines move toward higher page numbers.
    Forward,
    /// `start >= end`: lines move toward lower page numbers.
    Backward,
}

/// Page range used by software line scrolling. New lines enter at `start`
/// and old lines fall out at `end`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScrollWindow {
    pub start: usize,
    pub end: usize,
    pub direction: ScrollDirection,
}

impl ScrollWindow {
    /// `None` when either index is not a page of the panel.
    pub fn new(start: usize, end: usize, pages: usize) -> Option<Self> {
        if start >= pages || end >= pages {
            return None;
        }
        let direction = if start < end {
            ScrollDirection::Forward
        } else {
            ScrollDirection::Backward
        };
        Some(Self {
            start,
            end,
            direction,
        })
    }

    /// `(source, destination)` page pairs of one advance, walked from the
    /// trailing edge back toward `start`.
    pub fn moves(&self) -> Vec<(usize, usize)> {
        match self.direction {
            ScrollDirection::Forward => ((self.start + 1)..=self.end)
                .rev()
                .map(|dst| (dst - 1, dst))
                .collect(),
            ScrollDirection::Backward => (self.end..self.start).map(|dst| (dst + 1, dst)).collect(),
        }
    }

    /// Every page of the window, from `end` back to `start`.
    pub fn pages(&self) -> Vec<usize> {
        match self.direction {
            ScrollDirection::Forward => (self.start..=self.end).rev().collect(),
            ScrollDirection::Backward => (self.end..=self.start).collect(),
        }
    }
}

impl<T: Transport, D: DelayNs> Oled<T, D> {
    /// Set the software scroll window. Out-of-range pages disable scrolling.
    pub fn software_scroll(&mut self, start: usize, end: usize) {
        self.scroll_window = ScrollWindow::new(start, end, self.geometry.pages());
        debug!(
            "OLED: software_scroll start={start} end={end} pages={} -> {:?}",
            self.geometry.pages(),
            self.scroll_window
        );
    }

    pub fn scroll_window(&self) -> Option<ScrollWindow> {
        self.scroll_window
    }

    /// Move every line of the window one page along and write `text` on the
    /// freed line at `start`. Does nothing while scrolling is disabled.
    pub fn scroll_text(&mut self, text: impl AsRef<[u8]>, invert: bool) -> OledResult<()> {
        let Some(window) = self.scroll_window else {
            debug!("OLED: scroll_text with scrolling disabled");
            return Ok(());
        };
        for (src, dst) in window.moves() {
            if !self.buffer.copy_page(src, dst) {
                debug!("OLED: scroll src={src} dst={dst} out of range");
                continue;
            }
            self.flush_page(dst)?;
        }
        let text = text.as_ref();
        let text = &text[..text.len().min(TEXT_COLUMNS)];
        self.draw_text(window.start, text, invert)
    }

    /// Clear every line of the window.
    pub fn scroll_clear(&mut self) -> OledResult<()> {
        let Some(window) = self.scroll_window else {
            debug!("OLED: scroll_clear with scrolling disabled");
            return Ok(());
        };
        for page in window.pages() {
            self.clear_line(page, false)?;
        }
        Ok(())
    }

    /// Start or stop the controller's own continuous scrolling. The buffer
    /// is not touched.
    pub fn hardware_scroll(&mut self, scroll: ScrollType) -> OledResult<()> {
        self.transport.set_hardware_scroll(scroll)
    }

    /// Rotate buffer content by one pixel with wraparound.
    ///
    /// `Left`/`Right` rotate each page in `start..=end` (pages) by one
    /// segment. `Up`/`Down` rotate each segment column in `start..=end`
    /// (segments) by one pixel row through all pages. `end` is clamped to
    /// the last page or segment.
    ///
    /// With `delay` set, every page is pushed afterwards, yielding `delay`
    /// milliseconds after each page when non-zero. With `None` only the
    /// buffer changes.
    pub fn wrap_around(
        &mut self,
        scroll: ScrollType,
        start: usize,
        end: usize,
        delay: Option<u32>,
    ) -> OledResult<()> {
        match scroll {
            ScrollType::Right | ScrollType::Left => {
                let last = end.min(self.geometry.pages() - 1);
                for page in start..=last {
                    if let Some(row) = self.buffer.page_mut(page) {
                        if scroll == ScrollType::Right {
                            row.rotate_right(1);
                        } else {
                            row.rotate_left(1);
                        }
                    }
                }
            }
            ScrollType::Up | ScrollType::Down => {
                let last = end.min(self.geometry.width() - 1);
                for segment in start..=last {
                    let mut column = self.read_column(segment);
                    if scroll == ScrollType::Up {
                        shift_column_up(&mut column);
                    } else {
                        shift_column_down(&mut column);
                    }
                    self.write_column(segment, &column);
                }
            }
            ScrollType::Stop => {}
        }

        if let Some(delay_ms) = delay {
            for page in 0..self.geometry.pages() {
                self.flush_page(page)?;
                if delay_ms > 0 {
                    self.delay.delay_ms(delay_ms);
                }
            }
        }
        Ok(())
    }

    /// One segment across all pages, top page first, in logical bit order.
    fn read_column(&self, segment: usize) -> Vec<u8> {
        (0..self.geometry.pages())
            .filter_map(|page| self.buffer.segment(page, segment))
            .map(|byte| orient(byte, self.flip))
            .collect()
    }

    fn write_column(&mut self, segment: usize, column: &[u8]) {
        for (page, &byte) in column.iter().enumerate() {
            self.buffer
                .set_segment(page, segment, orient(byte, self.flip));
        }
    }
}

/// Move a column of page bytes up one pixel. Bit 0 of each page falls into
/// bit 7 of the page above; the top pixel of the first page wraps to the
/// bottom of the last.
pub(crate) fn shift_column_up(column: &mut [u8]) {
    let Some(&wrapped) = column.first() else {
        return;
    };
    for page in 0..column.len() {
        let next = column.get(page + 1).copied().unwrap_or(wrapped);
        column[page] = (column[page] >> 1) | ((next & 0x01) << 7);
    }
}

/// Mirror of [`shift_column_up`].
pub(crate) fn shift_column_down(column: &mut [u8]) {
    let Some(&wrapped) = column.last() else {
        return;
    };
    for page in (0..column.len()).rev() {
        let prev = if page == 0 { wrapped } else { column[page - 1] };
        column[page] = (column[page] << 1) | ((prev & 0x80) >> 7);
    }
}
