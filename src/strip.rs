use std::fmt;

use smart_leds::SmartLedsWrite;

use crate::color::{coerce_channel, Color};
use crate::link::{BitOrder, SerialLink};
use crate::waveform::{waveform, BYTES_PER_CHANNEL, CLOCK_HZ};

/// Frame-buffer bytes per pixel: 8 waveform bytes for each of 3 channels.
pub const BYTES_PER_PIXEL: usize = 3 * BYTES_PER_CHANNEL;

#[derive(Debug, PartialEq, Eq)]
pub enum Error<E> {
  /// A pixel index or fill bound fell outside the strip. The frame buffer is
  /// left untouched.
  PixelOutOfRange { index: usize, frame_size: usize },
  /// The serial peripheral rejected a configure or transmit call.
  Link(E),
}

impl<E: fmt::Display> fmt::Display for Error<E> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::PixelOutOfRange { index, frame_size } => {
        write!(f, "pixel index {index} is out of range for a strip of {frame_size} pixels")
      },
      Self::Link(err) => write!(f, "serial link error: {err}"),
    }
  }
}

impl<E: std::error::Error + 'static> std::error::Error for Error<E> {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      Self::Link(err) => Some(err),
      _ => None,
    }
  }
}

/// A WS2812 strip backed by a frame buffer of pre-expanded SPI waveforms.
///
/// The buffer holds `frame_size * 24` waveform bytes followed by a single
/// zero byte, the low period that latches the frame into the strip. `set` and
/// `fill` only mutate the buffer; nothing reaches the hardware until `draw`.
#[derive(Debug)]
pub struct PixelStrip<S> {
  link: S,
  frame_size: usize,
  buffer: Vec<u8>,
}

/// Expands a color into its 24 waveform bytes.
///
/// The strip consumes the green channel first and swaps red and blue
/// relative to the caller's red-green-blue order. Verified against real
/// hardware; changing this reorders colors on the wire.
fn encode(color: Color) -> [u8; BYTES_PER_PIXEL] {
  let green = coerce_channel("green", color.green);
  let red = coerce_channel("red", color.red);
  let blue = coerce_channel("blue", color.blue);

  let mut block = [0; BYTES_PER_PIXEL];
  block[..8].copy_from_slice(waveform(green));
  block[8..16].copy_from_slice(waveform(red));
  block[16..].copy_from_slice(waveform(blue));
  block
}

impl<S: SerialLink> PixelStrip<S> {
  /// Creates a strip, configures the peripheral and transmits a blank frame.
  pub fn new(link: S, frame_size: usize) -> Result<Self, Error<S::Error>> {
    let mut strip = Self::new_deferred(link, frame_size);
    strip.configure()?.draw()?;
    Ok(strip)
  }

  /// Creates a blanked strip without touching the peripheral.
  ///
  /// The caller is responsible for calling [`configure`](Self::configure)
  /// before the first [`draw`](Self::draw).
  pub fn new_deferred(link: S, frame_size: usize) -> Self {
    let mut strip = Self {
      link,
      frame_size,
      buffer: vec![0; frame_size * BYTES_PER_PIXEL + 1],
    };

    if frame_size > 0 {
      strip.blit(0, frame_size - 1, &encode(Color::BLACK));
    }

    strip
  }

  /// Number of pixels in the strip, fixed at construction.
  pub fn frame_size(&self) -> usize {
    self.frame_size
  }

  /// The encoded frame as it would go over the wire, reset byte included.
  pub fn frame(&self) -> &[u8] {
    &self.buffer
  }

  /// Applies the protocol's bit order and clock rate to the peripheral.
  ///
  /// Only needed after [`new_deferred`](Self::new_deferred); [`new`](Self::new)
  /// already configures. Reconfiguring after a draw is a caller error this
  /// core cannot detect.
  pub fn configure(&mut self) -> Result<&mut Self, Error<S::Error>> {
    self.link.configure(BitOrder::MsbFirst, CLOCK_HZ).map_err(Error::Link)?;
    Ok(self)
  }

  /// Sets a single pixel in the frame buffer.
  pub fn set(&mut self, index: usize, color: impl Into<Color>) -> Result<&mut Self, Error<S::Error>> {
    self.check_index(index)?;
    self.blit(index, index, &encode(color.into()));
    Ok(self)
  }

  /// Fills the whole strip with one color.
  pub fn fill(&mut self, color: impl Into<Color>) -> Result<&mut Self, Error<S::Error>> {
    if self.frame_size == 0 {
      return Ok(self);
    }

    let last = self.frame_size - 1;
    self.fill_range(color, 0, last)
  }

  /// Fills every pixel in `[start, end]`, both ends inclusive.
  ///
  /// A reversed range is normalized by swapping the bounds.
  pub fn fill_range(
    &mut self,
    color: impl Into<Color>,
    start: usize,
    end: usize,
  ) -> Result<&mut Self, Error<S::Error>> {
    self.check_index(start)?;
    self.check_index(end)?;

    let (start, end) = if start > end { (end, start) } else { (start, end) };
    self.blit(start, end, &encode(color.into()));
    Ok(self)
  }

  /// Transmits the frame buffer, reset byte included.
  pub fn draw(&mut self) -> Result<&mut Self, Error<S::Error>> {
    self.link.write(&self.buffer).map_err(Error::Link)?;
    Ok(self)
  }

  fn check_index(&self, index: usize) -> Result<(), Error<S::Error>> {
    if index < self.frame_size {
      Ok(())
    } else {
      Err(Error::PixelOutOfRange { index, frame_size: self.frame_size })
    }
  }

  fn blit(&mut self, start: usize, end: usize, block: &[u8; BYTES_PER_PIXEL]) {
    let bytes = &mut self.buffer[start * BYTES_PER_PIXEL..(end + 1) * BYTES_PER_PIXEL];

    for chunk in bytes.chunks_exact_mut(BYTES_PER_PIXEL) {
      chunk.copy_from_slice(block);
    }
  }
}

impl<S: SerialLink> SmartLedsWrite for PixelStrip<S> {
  type Error = Error<S::Error>;
  type Color = Color;

  /// Sets at most `frame_size` pixels from the iterator, then draws once.
  fn write<T, I>(&mut self, iterator: T) -> Result<(), Self::Error>
  where
    T: Iterator<Item = I>,
    I: Into<Self::Color>,
  {
    for (index, color) in iterator.take(self.frame_size).enumerate() {
      self.set(index, color)?;
    }

    self.draw()?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use std::convert::Infallible;

  use smart_leds::RGB8;

  use super::*;
  use crate::waveform::{ONE, ZERO};

  #[derive(Debug, Default)]
  struct MockLink {
    configured: Vec<(BitOrder, u32)>,
    frames: Vec<Vec<u8>>,
  }

  impl SerialLink for MockLink {
    type Error = Infallible;

    fn configure(&mut self, bit_order: BitOrder, clock_hz: u32) -> Result<(), Infallible> {
      self.configured.push((bit_order, clock_hz));
      Ok(())
    }

    fn write(&mut self, buffer: &[u8]) -> Result<(), Infallible> {
      self.frames.push(buffer.to_vec());
      Ok(())
    }
  }

  #[test]
  fn new_configures_and_transmits_blank_frame() {
    let mut link = MockLink::default();
    PixelStrip::new(&mut link, 2).unwrap();

    assert_eq!(link.configured, vec![(BitOrder::MsbFirst, 8_000_000)]);
    assert_eq!(link.frames.len(), 1);

    let frame = &link.frames[0];
    assert_eq!(frame.len(), 2 * BYTES_PER_PIXEL + 1);
    assert!(frame[..2 * BYTES_PER_PIXEL].iter().all(|&b| b == ZERO));
    assert_eq!(frame[2 * BYTES_PER_PIXEL], 0);
  }

  #[test]
  fn new_deferred_does_not_touch_the_link() {
    let mut link = MockLink::default();
    let strip = PixelStrip::new_deferred(&mut link, 4);

    assert_eq!(strip.frame().len(), 4 * BYTES_PER_PIXEL + 1);
    drop(strip);
    assert!(link.configured.is_empty());
    assert!(link.frames.is_empty());
  }

  #[test]
  fn set_writes_green_red_blue_waveforms() {
    let mut link = MockLink::default();
    let mut strip = PixelStrip::new_deferred(&mut link, 2);
    strip.set(1, Color::new(0xA5, 0x0F, 0x00)).unwrap();

    let offset = BYTES_PER_PIXEL;
    let frame = strip.frame();
    assert_eq!(&frame[offset..offset + 8], waveform(0x0F));
    assert_eq!(&frame[offset + 8..offset + 16], waveform(0xA5));
    assert_eq!(&frame[offset + 16..offset + 24], waveform(0x00));
  }

  #[test]
  fn set_out_of_range_is_fatal_and_leaves_buffer_untouched() {
    let mut link = MockLink::default();
    let mut strip = PixelStrip::new_deferred(&mut link, 3);
    strip.set(0, (1, 2, 3)).unwrap();
    let before = strip.frame().to_vec();

    let err = strip.set(3, Color::new(255, 255, 255)).unwrap_err();
    assert_eq!(err, Error::PixelOutOfRange { index: 3, frame_size: 3 });
    assert_eq!(strip.frame(), &before[..]);
  }

  #[test]
  fn invalid_channels_are_coerced_to_full_brightness() {
    let mut link = MockLink::default();
    let mut strip = PixelStrip::new_deferred(&mut link, 1);
    strip.set(0, Color::new(256, -1, 300)).unwrap();

    assert!(strip.frame()[..BYTES_PER_PIXEL].iter().all(|&b| b == ONE));
  }

  #[test]
  fn fill_range_is_inclusive_and_order_insensitive() {
    let color = Color::new(0x10, 0x20, 0x30);

    let mut link = MockLink::default();
    let mut ascending = PixelStrip::new_deferred(&mut link, 5);
    ascending.fill_range(color, 1, 3).unwrap();

    let mut link = MockLink::default();
    let mut descending = PixelStrip::new_deferred(&mut link, 5);
    descending.fill_range(color, 3, 1).unwrap();

    assert_eq!(ascending.frame(), descending.frame());

    let block = encode(color);
    for index in 1..=3 {
      let offset = index * BYTES_PER_PIXEL;
      assert_eq!(&ascending.frame()[offset..offset + BYTES_PER_PIXEL], &block);
    }
    assert_eq!(&ascending.frame()[..BYTES_PER_PIXEL], waveform(0).as_slice().repeat(3));
  }

  #[test]
  fn fill_range_rejects_out_of_range_bounds() {
    let mut link = MockLink::default();
    let mut strip = PixelStrip::new_deferred(&mut link, 3);
    let before = strip.frame().to_vec();

    let err = strip.fill_range(Color::new(1, 1, 1), 0, 3).unwrap_err();
    assert_eq!(err, Error::PixelOutOfRange { index: 3, frame_size: 3 });
    assert_eq!(strip.frame(), &before[..]);
  }

  #[test]
  fn reset_byte_survives_every_operation() {
    let mut link = MockLink::default();
    let mut strip = PixelStrip::new(&mut link, 3).unwrap();

    strip
      .fill(Color::new(255, 255, 255))
      .unwrap()
      .set(2, Color::new(1, 2, 3))
      .unwrap()
      .draw()
      .unwrap();

    assert_eq!(*strip.frame().last().unwrap(), 0);
    drop(strip);
    for frame in &link.frames {
      assert_eq!(*frame.last().unwrap(), 0);
    }
  }

  #[test]
  fn draw_transmits_single_red_pixel_frame() {
    let mut link = MockLink::default();
    let mut strip = PixelStrip::new_deferred(&mut link, 3);

    strip
      .fill(Color::BLACK)
      .unwrap()
      .set(1, Color::new(255, 0, 0))
      .unwrap()
      .configure()
      .unwrap()
      .draw()
      .unwrap();
    drop(strip);

    let frame = &link.frames[0];
    assert_eq!(frame.len(), 73);

    let mut middle = [ZERO; BYTES_PER_PIXEL];
    middle[8..16].copy_from_slice(&[ONE; 8]);
    assert_eq!(&frame[24..48], &middle);

    assert!(frame[..24].iter().all(|&b| b == ZERO));
    assert!(frame[48..72].iter().all(|&b| b == ZERO));
    assert_eq!(frame[72], 0);
  }

  #[test]
  fn empty_strip_holds_only_the_reset_byte() {
    let mut link = MockLink::default();
    let mut strip = PixelStrip::new_deferred(&mut link, 0);

    strip.fill(Color::new(9, 9, 9)).unwrap().draw().unwrap();
    drop(strip);
    assert_eq!(link.frames, vec![vec![0]]);
  }

  #[test]
  fn smart_leds_write_caps_at_frame_size_and_draws_once() {
    let mut link = MockLink::default();
    let mut strip = PixelStrip::new_deferred(&mut link, 2);

    let colors = [RGB8 { r: 255, g: 0, b: 0 }; 5];
    strip.write(colors.iter().cloned()).unwrap();
    drop(strip);

    assert_eq!(link.frames.len(), 1);
    let frame = &link.frames[0];
    for offset in [0, BYTES_PER_PIXEL] {
      assert_eq!(&frame[offset..offset + 8], waveform(0));
      assert_eq!(&frame[offset + 8..offset + 16], waveform(255));
      assert_eq!(&frame[offset + 16..offset + 24], waveform(0));
    }
  }
}
