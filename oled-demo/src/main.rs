use clap::{Parser, ValueEnum};
use crossbeam_channel::{select, tick};
use embedded_graphics::{
    Drawable,
    pixelcolor::BinaryColor,
    prelude::{Point, Primitive, Size},
    primitives::{Circle, PrimitiveStyle, Rectangle},
};
use oled_ssd1306::{Bus, Device, DeviceConfig, LinuxOled, OledResult, ScrollType};
use std::thread;
use std::time::Duration;

const STEP_PAUSE: Duration = Duration::from_millis(1500);
const WRAP_STEP_DELAY_MS: u32 = 2;
const HARDWARE_SCROLL_TIME: Duration = Duration::from_secs(3);

/// 16x16 smiley, two bytes per row, MSB first.
const SMILEY: [u8; 32] = [
    0x07, 0xE0, 0x18, 0x18, 0x20, 0x04, 0x40, 0x02, 0x4C, 0x32, 0x8C, 0x31, 0x80, 0x01, 0x80,
    0x01, 0x80, 0x01, 0x88, 0x11, 0x44, 0x22, 0x43, 0xC2, 0x20, 0x04, 0x18, 0x18, 0x07, 0xE0,
    0x00, 0x00,
];

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BusArg {
    I2c,
    Spi,
}

impl From<BusArg> for Bus {
    fn from(bus: BusArg) -> Self {
        match bus {
            BusArg::I2c => Bus::I2c,
            BusArg::Spi => Bus::Spi,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "oled-demo")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Bus the panel is wired to
    #[arg(long, value_enum, default_value_t = BusArg::I2c)]
    bus: BusArg,

    #[arg(long, default_value_t = 128)]
    width: usize,

    /// Panel height in pixels (32 or 64)
    #[arg(long, default_value_t = 64)]
    height: usize,

    /// Rotate the panel by 180 degrees
    #[arg(long)]
    flip: bool,

    /// I2C address, decimal or 0x-prefixed hex
    #[arg(long, value_parser = parse_address)]
    address: Option<u8>,

    /// Column offset for controllers with hidden columns (2 for SH1106)
    #[arg(long)]
    offset_x: Option<usize>,

    /// How long the clock runs before the fadeout
    #[arg(long, default_value_t = 10)]
    clock_seconds: u64,
}

fn parse_address(value: &str) -> Result<u8, String> {
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => value.parse(),
    };
    parsed.map_err(|e| format!("invalid I2C address '{value}': {e}"))
}

fn main() -> OledResult<()> {
    env_logger::init();
    let cli = Cli::parse();

    let (stop_tx, stop_rx) = crossbeam_channel::bounded::<()>(1);
    if let Err(e) = ctrlc::set_handler(move || {
        log::info!("Received Ctrl+C, stopping demo...");
        let _ = stop_tx.try_send(());
    }) {
        log::error!("Failed to set Ctrl-C handler: {e}");
    }

    let config = DeviceConfig {
        bus: Some(cli.bus.into()),
        i2c_address: cli.address,
        offset_x: cli.offset_x,
        width: Some(cli.width),
        height: Some(cli.height),
        flip: Some(cli.flip),
        ..DeviceConfig::default()
    };
    let mut device = Device::new(config)?;
    let oled = &mut device.display;
    oled.dump();

    let stages: [fn(&mut LinuxOled) -> OledResult<()>; 5] =
        [text, software_scroll, graphics, wraparound, hardware_scroll];
    let mut stopped = false;
    for stage in stages {
        if stop_rx.try_recv().is_ok() {
            log::info!("Demo stopped");
            stopped = true;
            break;
        }
        stage(oled)?;
    }
    if !stopped {
        clock(oled, &stop_rx, cli.clock_seconds)?;
    }

    oled.fadeout()?;
    log::info!("Demo finished");
    Ok(())
}

fn pause() {
    thread::sleep(STEP_PAUSE);
}

fn text(oled: &mut LinuxOled) -> OledResult<()> {
    log::info!("Demo: text");
    oled.clear_screen(false)?;
    oled.draw_text(0, "SSD1306 demo", false)?;
    oled.draw_text(1, format!("{}x{}", oled.width(), oled.height()), true)?;
    for contrast in [0x10, 0x80, 0xFF] {
        oled.set_contrast(contrast)?;
        thread::sleep(Duration::from_millis(300));
    }
    pause();

    if oled.pages() >= 5 {
        oled.draw_text_x3(2, "12:34", false)?;
    } else {
        oled.draw_text_x3(1, "OLED", false)?;
    }
    pause();
    Ok(())
}

fn software_scroll(oled: &mut LinuxOled) -> OledResult<()> {
    log::info!("Demo: software scroll");
    oled.clear_screen(false)?;
    oled.software_scroll(0, oled.pages() - 1);
    for line in 0..oled.pages() * 2 {
        oled.scroll_text(format!("line {line:>2}"), line % 2 == 1)?;
        thread::sleep(Duration::from_millis(250));
    }
    oled.scroll_clear()?;
    oled.software_scroll(oled.pages(), 0);
    Ok(())
}

fn graphics(oled: &mut LinuxOled) -> OledResult<()> {
    log::info!("Demo: bitmap and lines");
    oled.clear_screen(false)?;
    oled.draw_bitmap(0, 0, &SMILEY, 16, 16, false)?;
    oled.draw_bitmap(20, 3, &SMILEY, 16, 16, true)?;

    let right = i32::try_from(oled.width()).unwrap_or(128) - 1;
    let bottom = i32::try_from(oled.height()).unwrap_or(64) - 1;
    oled.draw_line(0, bottom, right, 0, false)?;
    oled.draw_line(0, 0, right, bottom, false)?;
    pause();

    Circle::new(Point::new(right - 30, 2), 28)
        .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
        .draw(oled)?;
    Rectangle::new(Point::new(right - 40, bottom - 8), Size::new(40, 8))
        .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
        .draw(oled)?;
    oled.show_buffer()?;
    pause();
    Ok(())
}

fn wraparound(oled: &mut LinuxOled) -> OledResult<()> {
    log::info!("Demo: wraparound scroll");
    let pages = oled.pages();
    let width = oled.width();
    for _ in 0..32 {
        oled.wrap_around(ScrollType::Right, 0, pages - 1, Some(WRAP_STEP_DELAY_MS))?;
    }
    for _ in 0..32 {
        oled.wrap_around(ScrollType::Left, 0, pages - 1, Some(0))?;
    }
    for _ in 0..oled.height() {
        oled.wrap_around(ScrollType::Up, 0, width - 1, Some(0))?;
    }
    // Shift the buffer without flushing, then push the result once.
    for _ in 0..8 {
        oled.wrap_around(ScrollType::Down, 0, width - 1, None)?;
    }
    oled.show_buffer()?;
    pause();
    Ok(())
}

fn hardware_scroll(oled: &mut LinuxOled) -> OledResult<()> {
    log::info!("Demo: hardware scroll");
    for scroll in [ScrollType::Left, ScrollType::Right] {
        oled.hardware_scroll(scroll)?;
        thread::sleep(HARDWARE_SCROLL_TIME);
    }
    oled.hardware_scroll(ScrollType::Stop)?;
    // The controller scrolled its own RAM; rewrite it from the buffer.
    oled.show_buffer()
}

fn clock(
    oled: &mut LinuxOled,
    stop_rx: &crossbeam_channel::Receiver<()>,
    seconds: u64,
) -> OledResult<()> {
    log::info!("Demo: clock for {seconds}s");
    oled.clear_screen(false)?;
    oled.draw_text(0, "Clock", false)?;
    let line = oled.pages() - 1;
    let ticker = tick(Duration::from_secs(1));

    for _ in 0..seconds {
        let now = chrono::Local::now();
        oled.draw_text(line, now.format("%H:%M:%S").to_string(), false)?;
        select! {
            recv(ticker) -> _ => {}
            recv(stop_rx) -> _ => {
                log::info!("Clock stopped");
                break;
            }
        }
    }
    Ok(())
}
