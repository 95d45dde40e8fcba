use smart_leds::RGB8;

/// An RGB color as accepted by [`PixelStrip`](crate::PixelStrip).
///
/// Channels are `i32` rather than `u8` so that out-of-range values reach the
/// write path, where they are reported and coerced to 255 instead of failing
/// the whole update.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Color {
  pub red: i32,
  pub green: i32,
  pub blue: i32,
}

impl Color {
  pub const BLACK: Self = Self::new(0, 0, 0);

  pub const fn new(red: i32, green: i32, blue: i32) -> Self {
    Self { red, green, blue }
  }
}

impl From<RGB8> for Color {
  fn from(color: RGB8) -> Self {
    Self::new(color.r.into(), color.g.into(), color.b.into())
  }
}

impl From<(i32, i32, i32)> for Color {
  fn from((red, green, blue): (i32, i32, i32)) -> Self {
    Self::new(red, green, blue)
  }
}

impl From<[i32; 3]> for Color {
  fn from([red, green, blue]: [i32; 3]) -> Self {
    Self::new(red, green, blue)
  }
}

/// Validates one channel value, substituting full brightness for anything
/// outside `0..=255`. Out-of-range input is a caller bug, but a single bad
/// channel should not abort an otherwise valid batch update, so it is only
/// reported through the logger.
pub(crate) fn coerce_channel(channel: &str, value: i32) -> u8 {
  match u8::try_from(value) {
    Ok(value) => value,
    Err(_) => {
      log::error!("{channel} channel value {value} is out of range, using 255");
      255
    },
  }
}
