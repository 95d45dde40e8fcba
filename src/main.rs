use std::env;
use std::process;

use embedded_hal::delay::DelayNs;
use rppal::hal::Delay;
use rppal::spi::{Bus, Mode as SpiMode, SlaveSelect, Spi};

use pixel_strip::{waveform, Color, PixelStrip};

fn usage() -> ! {
  eprintln!("usage: pixel-strip <count> [<red> <green> <blue>]");
  process::exit(1)
}

fn main() {
  env_logger::init();

  let mut args = env::args().skip(1);

  let count: usize = match args.next() {
    Some(count) => count.parse().unwrap_or_else(|_| usage()),
    None => usage(),
  };

  let color = match (args.next(), args.next(), args.next()) {
    (Some(r), Some(g), Some(b)) => Color::new(
      r.parse().unwrap_or_else(|_| usage()),
      g.parse().unwrap_or_else(|_| usage()),
      b.parse().unwrap_or_else(|_| usage()),
    ),
    (None, ..) => Color::new(0x10, 0x10, 0x10),
    _ => usage(),
  };

  let spi = Spi::new(Bus::Spi0, SlaveSelect::Ss0, waveform::CLOCK_HZ, SpiMode::Mode0).unwrap();
  let mut strip = PixelStrip::new(spi, count).unwrap();
  let mut delay = Delay::new();

  // Single-pixel chase to verify per-pixel addressing, then hold the color.
  for index in 0..count {
    strip.fill(Color::BLACK).unwrap().set(index, color).unwrap().draw().unwrap();
    delay.delay_ms(50);
  }

  strip.fill(color).unwrap().draw().unwrap();
}
