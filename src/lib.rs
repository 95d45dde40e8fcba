//! Drive a WS2812-family RGB LED strip from a standard SPI peripheral.
//!
//! The strip's proprietary single-wire protocol is emulated by clocking out
//! one SPI byte per protocol bit at 8 MHz, MSB first. Every possible channel
//! value is pre-expanded into its 8-byte waveform once per process
//! ([`waveform`]); a [`PixelStrip`] keeps a frame buffer of those waveforms
//! plus a trailing reset byte and hands it to the peripheral on
//! [`draw`](PixelStrip::draw).
//!
//! On a Raspberry Pi, `rppal::spi::Spi` can be used directly as the
//! [`SerialLink`]. Note that `core_freq=250` must be set in
//! `/boot/config.txt` to get a stable SPI clock.

mod color;
pub use color::Color;

mod link;
pub use link::{BitOrder, SerialLink};

mod strip;
pub use strip::{Error, PixelStrip, BYTES_PER_PIXEL};

pub mod waveform;
