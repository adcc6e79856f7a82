//! SSD1306 command bytes and the sequences both bus adapters send.

use crate::common::{Geometry, ScrollType};

/// I2C control byte announcing a run of command bytes.
pub const CONTROL_CMD_STREAM: u8 = 0x00;
/// I2C control byte announcing a run of display data.
pub const CONTROL_DATA_STREAM: u8 = 0x40;

#[derive(Debug, Clone, Copy)]
#[repr(u8)]
pub enum Command {
    SetLowColumn = 0x00,
    SetHighColumn = 0x10,
    SetMemoryAddrMode = 0x20,
    HorizontalRight = 0x26,
    HorizontalLeft = 0x27,
    ContinuousScroll = 0x29,
    DeactivateScroll = 0x2E,
    ActivateScroll = 0x2F,
    SetDisplayStartLine = 0x40,
    SetContrast = 0x81,
    SetChargePump = 0x8D,
    SetSegmentRemap0 = 0xA0,
    SetSegmentRemap1 = 0xA1,
    SetVerticalScrollArea = 0xA3,
    DisplayRam = 0xA4,
    DisplayNormal = 0xA6,
    SetMuxRatio = 0xA8,
    DisplayOff = 0xAE,
    DisplayOn = 0xAF,
    SetPageStart = 0xB0,
    SetComScanMode = 0xC8,
    SetDisplayOffset = 0xD3,
    SetDisplayClkDiv = 0xD5,
    SetComPinMap = 0xDA,
    SetVcomhDeselect = 0xDB,
}

const PAGE_ADDRESSING_MODE: u8 = 0x02;
const CLOCK_DIVIDE: u8 = 0x80;
const CHARGE_PUMP_ON: u8 = 0x14;
const VCOMH_LEVEL: u8 = 0x40;
const SCROLL_INTERVAL: u8 = 0x07;

fn low_byte(value: usize) -> u8 {
    value.to_le_bytes()[0]
}

/// Controller bring-up, sent once.
pub fn init_sequence(geometry: &Geometry, flip: bool) -> Vec<u8> {
    let (com_pins, mux) = if geometry.pages() == 4 {
        (0x02, 0x1F)
    } else {
        (0x12, 0x3F)
    };
    let remap = if flip {
        Command::SetSegmentRemap0
    } else {
        Command::SetSegmentRemap1
    };
    vec![
        Command::DisplayOff as u8,
        Command::SetMuxRatio as u8,
        mux,
        Command::SetDisplayOffset as u8,
        0x00,
        Command::SetDisplayStartLine as u8,
        remap as u8,
        Command::SetComScanMode as u8,
        Command::SetDisplayClkDiv as u8,
        CLOCK_DIVIDE,
        Command::SetComPinMap as u8,
        com_pins,
        Command::SetContrast as u8,
        0xFF,
        Command::DisplayRam as u8,
        Command::SetVcomhDeselect as u8,
        VCOMH_LEVEL,
        Command::SetMemoryAddrMode as u8,
        PAGE_ADDRESSING_MODE,
        Command::SetLowColumn as u8,
        Command::SetHighColumn as u8,
        Command::SetChargePump as u8,
        CHARGE_PUMP_ON,
        Command::DeactivateScroll as u8,
        Command::DisplayNormal as u8,
        Command::DisplayOn as u8,
    ]
}

/// Column and page pointer for a page write. `column` already includes any
/// panel column offset.
pub fn page_address(page: usize, column: usize) -> [u8; 3] {
    let column = low_byte(column);
    [
        Command::SetLowColumn as u8 | (column & 0x0F),
        Command::SetHighColumn as u8 | ((column >> 4) & 0x0F),
        Command::SetPageStart as u8 | (low_byte(page) & 0x07),
    ]
}

pub fn contrast(value: u8) -> [u8; 2] {
    [Command::SetContrast as u8, value]
}

pub fn hardware_scroll(scroll: ScrollType, geometry: &Geometry) -> Vec<u8> {
    let rows = low_byte(geometry.height());
    match scroll {
        ScrollType::Right | ScrollType::Left => {
            let command = if scroll == ScrollType::Right {
                Command::HorizontalRight
            } else {
                Command::HorizontalLeft
            };
            vec![
                command as u8,
                0x00,
                0x00,
                SCROLL_INTERVAL,
                0x07,
                0x00,
                0xFF,
                Command::ActivateScroll as u8,
            ]
        }
        ScrollType::Up | ScrollType::Down => {
            let offset = if scroll == ScrollType::Up { 0x01 } else { 0x3F };
            vec![
                Command::ContinuousScroll as u8,
                0x00,
                0x00,
                SCROLL_INTERVAL,
                0x00,
                offset,
                Command::SetVerticalScrollArea as u8,
                0x00,
                rows,
                Command::ActivateScroll as u8,
            ]
        }
        ScrollType::Stop => vec![Command::DeactivateScroll as u8],
    }
}

/// Panel state an adapter learns at `initialize`.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Panel {
    pub geometry: Geometry,
    pub flip: bool,
}

impl Panel {
    /// The physical page for a buffer page. Flipped panels store pages
    /// bottom-up.
    pub fn physical_page(&self, page: usize) -> usize {
        if self.flip {
            self.geometry.pages() - 1 - page
        } else {
            page
        }
    }

    /// Whether a write starting at (`page`, `segment`) lands on the panel.
    pub fn accepts(&self, page: usize, segment: usize) -> bool {
        page < self.geometry.pages() && segment < self.geometry.width()
    }
}
