//! SPI waveform encoding for the WS2812 single-wire protocol.
//!
//! Each protocol bit is emulated by one SPI byte clocked out MSB first at
//! 8 MHz, so every SPI bit lasts 125 ns. The run of high bits at the top of
//! the byte forms the pulse: [`ZERO`] yields 375 ns high / 625 ns low and
//! [`ONE`] yields 750 ns high / 250 ns low, both inside the WS2812B timing
//! windows.

use std::sync::OnceLock;

/// SPI byte representing a WS2812 logical 0.
pub const ZERO: u8 = 0b1110_0000;

/// SPI byte representing a WS2812 logical 1.
pub const ONE: u8 = 0b1111_1100;

/// SPI clock rate the [`ZERO`]/[`ONE`] pulse widths are calculated for.
pub const CLOCK_HZ: u32 = 8_000_000;

/// Waveform bytes per color channel, one per channel bit.
pub const BYTES_PER_CHANNEL: usize = 8;

static TABLE: OnceLock<[[u8; BYTES_PER_CHANNEL]; 256]> = OnceLock::new();

/// Returns the 8-byte SPI waveform for a channel value, MSB first.
///
/// The table behind this lookup is built on first use and shared read-only by
/// every strip in the process.
pub fn waveform(value: u8) -> &'static [u8; BYTES_PER_CHANNEL] {
  let table = TABLE.get_or_init(|| {
    let mut table = [[0; BYTES_PER_CHANNEL]; 256];

    for (value, entry) in table.iter_mut().enumerate() {
      for (i, byte) in entry.iter_mut().enumerate() {
        *byte = if value & (0x80 >> i) != 0 { ONE } else { ZERO };
      }
    }

    table
  });

  &table[usize::from(value)]
}
