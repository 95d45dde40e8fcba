use rppal::spi::Spi;

/// Bit transmission order of the serial peripheral.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BitOrder {
  MsbFirst,
  LsbFirst,
}

/// Byte-oriented serial interface a strip transmits through.
///
/// The waveform encoding assumes the peripheral shifts each byte out MSB
/// first at [`CLOCK_HZ`](crate::waveform::CLOCK_HZ);
/// [`PixelStrip::configure`](crate::PixelStrip::configure) applies exactly
/// that through this trait.
pub trait SerialLink {
  type Error: std::error::Error + 'static;

  /// Applies the given bit order and clock rate to the peripheral.
  fn configure(&mut self, bit_order: BitOrder, clock_hz: u32) -> Result<(), Self::Error>;

  /// Transmits the buffer in order, blocking until the write completes.
  fn write(&mut self, buffer: &[u8]) -> Result<(), Self::Error>;
}

impl<T: SerialLink> SerialLink for &mut T {
  type Error = T::Error;

  fn configure(&mut self, bit_order: BitOrder, clock_hz: u32) -> Result<(), Self::Error> {
    (**self).configure(bit_order, clock_hz)
  }

  fn write(&mut self, buffer: &[u8]) -> Result<(), Self::Error> {
    (**self).write(buffer)
  }
}

impl SerialLink for Spi {
  type Error = rppal::spi::Error;

  fn configure(&mut self, bit_order: BitOrder, clock_hz: u32) -> Result<(), Self::Error> {
    self.set_bit_order(match bit_order {
      BitOrder::MsbFirst => rppal::spi::BitOrder::MsbFirst,
      BitOrder::LsbFirst => rppal::spi::BitOrder::LsbFirst,
    })?;
    self.set_clock_speed(clock_hz)
  }

  fn write(&mut self, buffer: &[u8]) -> Result<(), Self::Error> {
    Spi::write(self, buffer).map(|_| ())
  }
}
